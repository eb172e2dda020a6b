//! # Order Client
//!
//! Provides a high‑level API for the order ledger. It wraps a
//! `ResourceClient<Order>` and is the only way the rest of the system (chat
//! engine, manager commands, dashboard) touches orders.

use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{Order, OrderCreate, OrderId, OrderStatus, StatusUpdate};
use crate::order_actor::OrderError;
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order ledger actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Appends a new `Pending` order and returns it with its issued id.
    #[instrument(skip(self, params), fields(room = %params.room, guest = %params.guest_identity))]
    pub async fn place_order(&self, params: OrderCreate) -> Result<Order, OrderError> {
        debug!(?params, "place_order called");
        let order = self.inner.append(params).await.map_err(OrderError::from)?;
        info!(order_id = %order.id, "Order placed");
        Ok(order)
    }

    /// Moves an order forward to `status`.
    ///
    /// Fails with [`OrderError::NotFound`] for unknown ids and
    /// [`OrderError::InvalidTransition`] for backward or repeated moves; the
    /// ledger is left untouched in both cases.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .update(id, StatusUpdate { status })
            .await
            .map_err(OrderError::from)
    }

    /// Looks an order up by id.
    pub async fn find(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        self.get(id).await
    }

    /// Every order, oldest first.
    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        self.list().await
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        OrderError::from(e)
    }
}
