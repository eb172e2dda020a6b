//! # Order Ledger Actor
//!
//! The durable order ledger: one [`ResourceActor`] over a [`Store`] of
//! [`Order`]s. Chat placement, manager commands and the dashboard all reach it
//! through an [`OrderClient`], so every read-modify-write is serialized here.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`] type for type-safe error handling
//! - [`OrderIdGenerator`] - collision-checked, clock-derived identifiers
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use hotel_concierge::framework::MemoryStore;
//! use hotel_concierge::model::{Identity, Order, OrderCreate};
//! use hotel_concierge::order_actor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = order_actor::new(MemoryStore::<Order>::new());
//!     tokio::spawn(actor.run());
//!
//!     let order = client
//!         .place_order(OrderCreate {
//!             room: "101".into(),
//!             items: vec!["Club Sandwich - ₹450".into()],
//!             guest_identity: Identity::from("15550001@c.us"),
//!         })
//!         .await?;
//!     assert!(order.id.to_string().len() >= 13);
//!     Ok(())
//! }
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::OrderClient;
use crate::framework::{ResourceActor, Store};
use crate::model::{Order, OrderId};
use chrono::Utc;

/// Smallest identifier ever issued; keeps ids at 13+ digits whatever the clock says.
pub const MIN_ORDER_ID: u64 = 1_000_000_000_000;

/// Issues order identifiers from the millisecond clock.
///
/// Each id is the largest of: the clock, one past the previous id, and one
/// past the largest id already in the ledger. Two orders in the same
/// millisecond, a clock stepping backwards, or a ledger written by an earlier
/// process therefore never produce a duplicate.
pub struct OrderIdGenerator {
    last: u64,
    clock: Box<dyn Fn() -> u64 + Send>,
}

impl OrderIdGenerator {
    pub fn new() -> Self {
        Self::with_clock(|| u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0))
    }

    /// Generator with an injected millisecond clock.
    pub fn with_clock(clock: impl Fn() -> u64 + Send + 'static) -> Self {
        Self {
            last: 0,
            clock: Box::new(clock),
        }
    }

    pub fn next_id(&mut self, existing: &[Order]) -> OrderId {
        let persisted = existing.iter().map(|order| order.id.0).max().unwrap_or(0);
        let id = (self.clock)()
            .max(self.last.saturating_add(1))
            .max(persisted.saturating_add(1))
            .max(MIN_ORDER_ID);
        self.last = id;
        OrderId(id)
    }
}

impl Default for OrderIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a new Order ledger actor over `store` and its client.
pub fn new<S: Store<Order>>(store: S) -> (ResourceActor<Order, S>, OrderClient) {
    let mut ids = OrderIdGenerator::new();
    let (actor, generic_client) =
        ResourceActor::new(32, store, move |existing: &[Order]| ids.next_id(existing));
    (actor, OrderClient::new(generic_client))
}
