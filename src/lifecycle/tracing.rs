//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global subscriber: compact, one line per
//! event, no module paths. Actors identify themselves with structured fields
//! (`entity_type`, `order_id`, `guest`) instead.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Default: this crate at info
//! hotel-concierge
//!
//! # Every request payload and routing decision
//! RUST_LOG=hotel_concierge=debug hotel-concierge
//!
//! # Only the ledger
//! RUST_LOG=hotel_concierge::framework=debug hotel-concierge
//! ```
//!
//! ## What a Placed Order Looks Like
//!
//! **With the default filter**:
//!
//! ```text
//! INFO Concierge started
//! INFO Appended entity_type="Order" id=1718000000000
//! INFO continue_conversation{guest=15550001@c.us}:place_order{room=101 guest=15550001@c.us}: Order placed order_id=1718000000000
//! INFO handle{command=...}: Order updated by manager order_id=1718000000000 status=Confirmed
//! ```
//!
//! Payloads are logged once, at `debug`, where they enter the system
//! (`?params` on the client, `?update` in the actor).

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "hotel_concierge=info";

pub fn setup_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // Actors log entity_type instead
        .compact()
        .with_writer(std::io::stderr)
        .init();
}
