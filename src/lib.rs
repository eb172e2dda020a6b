//! # Hotel Concierge
//!
//! > **A chat order-taking agent for a hotel, built from resource-oriented actors.**
//!
//! Guests write free text ("menu", "order", "101", "a club sandwich please",
//! "confirm"); the concierge walks each of them through a small state machine
//! and records the result in a durable order ledger. A manager advances orders
//! with chat commands (`confirm #<id>`, `done #<id>`, `reject #<id>`) and a
//! dashboard does the same over HTTP.
//!
//! ## 🏗️ Design
//!
//! ### One writer for the ledger
//! The ledger is a JSON file that is loaded, changed and rewritten in full on
//! every request. A single [`ResourceActor`](framework::ResourceActor) owns it
//! and handles one request at a time, so chat, manager commands and the
//! dashboard can never interleave a read-modify-write. The monotonic status
//! policy lives on the record itself ([`ActorEntity::on_update`](framework::ActorEntity::on_update)),
//! so every caller gets the same rules.
//!
//! ### One owner for guest sessions
//! The [`Concierge`](router::Concierge) actor owns the
//! [`ConversationEngine`](conversation::ConversationEngine) and drains inbound
//! chat from a single queue. No locks guard session state because nothing
//! else can reach it.
//!
//! ### Fire-and-forget notifications
//! Outbound messages go through a [`Notifier`](notify::Notifier) queue and a
//! dispatcher task. Slow or failing transports never stall the router and
//! never roll back a ledger change.
//!
//! ### Type-safe errors
//! Each layer has its own `thiserror` enum ([`StoreError`](framework::StoreError),
//! [`FrameworkError`](framework::FrameworkError), [`OrderError`](order_actor::OrderError),
//! [`DeliveryError`](notify::DeliveryError)). Bad rooms or unknown items are
//! not errors at all: they are replies to the guest.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Generic single-writer actor over a [`Store`](framework::Store), plus
//! [`mock`](framework::mock) helpers for testing clients without an actor.
//!
//! ### 2. The Data ([`model`])
//! [`Catalog`](model::Catalog), [`Order`](model::Order) and inbound messages.
//!
//! ### 3. The Ledger ([`order_actor`], [`clients`])
//! [`Order`](model::Order) as an actor entity and the
//! [`OrderClient`](clients::OrderClient) every component uses.
//!
//! ### 4. The Conversation ([`conversation`], [`router`], [`manager`], [`replies`])
//! Guest sessions, intent classification, manager commands and every text we send.
//!
//! ### 5. The Edges ([`notify`], [`dashboard`], [`config`])
//! Transports, the HTTP facade and command-line configuration.
//!
//! ### 6. The Orchestrator ([`lifecycle`])
//! [`ConciergeSystem`](lifecycle::ConciergeSystem) starts, wires and stops the tasks.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=hotel_concierge=debug cargo run -- --ledger-path orders.json
//! ```

pub mod clients;
pub mod config;
pub mod conversation;
pub mod dashboard;
pub mod framework;
pub mod lifecycle;
pub mod manager;
pub mod model;
pub mod notify;
pub mod order_actor;
pub mod replies;
pub mod router;
