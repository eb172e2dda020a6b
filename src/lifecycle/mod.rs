//! Runtime orchestration and lifecycle management.
//!
//! - [`ConciergeSystem`] - starts the ledger, router and dispatcher tasks, wires them together and shuts them down
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod concierge_system;
pub mod tracing;

pub use self::concierge_system::*;
pub use self::tracing::*;
