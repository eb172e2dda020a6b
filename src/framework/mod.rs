//! Durable single-writer actor framework.
//!
//! This module provides the building blocks behind the order ledger: one actor
//! task owns the durable store, and every read or write goes through it.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that record types implement to live in a ledger
//! - [`ResourceActor`] - Generic actor that serializes all access to a [`Store`]
//! - [`ResourceClient`] - Cloneable handle that sends requests to the actor
//! - [`Store`] - Durable backing for the full record collection
//! - [`FrameworkError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] for utilities to test clients without spawning a real actor.

pub mod core;
pub mod mock;
pub mod store;

pub use self::core::*;
pub use self::store::{JsonFileStore, MemoryStore, Store, StoreError};
