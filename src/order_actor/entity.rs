//! Entity trait implementation for the Order domain type.
//!
//! This module contains the [`ActorEntity`] trait implementation that enables
//! [`Order`] to be kept in the ledger by the generic
//! [`ResourceActor`](crate::framework::ResourceActor).

use crate::framework::ActorEntity;
use crate::model::{is_room_number, Order, OrderCreate, OrderId, StatusUpdate};
use crate::order_actor::OrderError;

impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = StatusUpdate;
    type Error = OrderError;

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// Creates a new `Pending` order. Refuses malformed rooms and empty item lists.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        if !is_room_number(&params.room) {
            return Err(OrderError::ValidationError(format!(
                "invalid room number {:?}",
                params.room
            )));
        }
        if params.items.is_empty() {
            return Err(OrderError::ValidationError("order has no items".into()));
        }
        Ok(Order::new(id, params))
    }

    /// Applies a status change if it moves the order forward.
    fn on_update(&mut self, update: StatusUpdate) -> Result<(), OrderError> {
        if !self.status.can_advance_to(update.status) {
            return Err(OrderError::InvalidTransition {
                id: self.id,
                from: self.status,
                to: update.status,
            });
        }
        self.status = update.status;
        Ok(())
    }
}
