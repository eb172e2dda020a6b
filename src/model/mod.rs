//! Pure data structures: the catalog, orders and inbound messages.

pub mod catalog;
pub mod message;
pub mod order;

pub use catalog::*;
pub use message::*;
pub use order::*;
