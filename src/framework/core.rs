//! # Core Actor Framework
//!
//! This module defines the generic building blocks for the ledger actor.
//!
//! ## Key Types
//!
//! - [`ActorEntity`]: The trait that every persisted record must implement.
//! - [`ResourceActor`]: The generic actor that owns the [`Store`] and processes requests.
//! - [`ResourceClient`]: The generic client for communicating with the actor.
//! - [`FrameworkError`]: Common errors (e.g., ActorClosed, NotFound, Persistence).
//!
//! ## Read-Modify-Write
//!
//! The store holds the *whole* collection. Every request loads it, works on an
//! in-memory copy and, for mutations, writes the full copy back. That is only
//! sound if no two requests overlap, which the actor guarantees by draining its
//! channel one message at a time.

use crate::framework::store::{Store, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that any record must implement to be managed by [`ResourceActor`].
///
/// # Architecture Note
/// The actor only knows how to load, append, find and rewrite records. What a
/// record *is*, how it is built from a creation payload and which updates it
/// accepts are all decided here, by the record type itself.
///
/// Associated types keep the wire between client and actor type safe: an
/// `Order` ledger only accepts `OrderCreate` payloads.
pub trait ActorEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The unique identifier for this record.
    type Id: PartialEq + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new record.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing record.
    type Update: Send + Sync + Debug;

    /// Error raised when a creation payload or an update is refused.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The identifier of this record.
    fn id(&self) -> &Self::Id;

    /// Construct the full record from the freshly issued ID and the payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Apply an update in place. Returning an error leaves the stored record untouched.
    fn on_update(&mut self, update: Self::Update) -> Result<(), Self::Error>;
}

/// Issues identifiers for new records.
///
/// The generator is handed the current snapshot of the ledger so it can avoid
/// every identifier already persisted, not just the ones it issued itself.
pub type IdGenerator<T> = Box<dyn FnMut(&[T]) -> <T as ActorEntity>::Id + Send>;

// =============================================================================
// 2. THE GENERIC MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Message sent to the actor to request an operation.
///
/// - **Append**: builds a record from [`ActorEntity::Create`] and adds it to the end.
/// - **Get**: looks a record up by ID.
/// - **Update**: applies an [`ActorEntity::Update`] to one record.
/// - **List**: returns the whole collection in ledger order.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Append {
        params: T::Create,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// The generic actor that owns a durable collection of records.
///
/// **Concurrency Model**:
/// The actor is the single serialization point for its store. Requests from
/// any number of clients (chat router, manager commands, dashboard) queue up
/// on the channel and run to completion one after another, so a
/// read-modify-write never races another one.
pub struct ResourceActor<T: ActorEntity, S: Store<T>> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: S,
    next_id_fn: IdGenerator<T>,
}

impl<T: ActorEntity, S: Store<T>> ResourceActor<T, S> {
    /// Creates the actor and its client.
    ///
    /// * `buffer_size` - capacity of the request channel; clients wait when it is full.
    /// * `store` - durable backing for the collection.
    /// * `next_id_fn` - identifier generator, see [`IdGenerator`].
    pub fn new(
        buffer_size: usize,
        store: S,
        next_id_fn: impl FnMut(&[T]) -> T::Id + Send + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store,
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the actor's event loop until every client has been dropped.
    pub async fn run(mut self) {
        // Extract just the type name (e.g., "Order" instead of "hotel_concierge::model::order::Order")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Append { params, respond_to } => {
                    debug!(entity_type, ?params, "Append");
                    let result = self.append(params).await;
                    match &result {
                        Ok(item) => info!(entity_type, id = %item.id(), "Appended"),
                        Err(e) => warn!(entity_type, error = %e, "Append failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let result = self
                        .store
                        .load()
                        .await
                        .map(|items| items.into_iter().find(|item| item.id() == &id))
                        .map_err(FrameworkError::from);
                    match &result {
                        Ok(item) => debug!(entity_type, %id, found = item.is_some(), "Get"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Get failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = self.update(&id, update).await;
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Updated"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::List { respond_to } => {
                    let result = self.store.load().await.map_err(FrameworkError::from);
                    match &result {
                        Ok(items) => debug!(entity_type, size = items.len(), "List"),
                        Err(e) => warn!(entity_type, error = %e, "List failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, "Shutdown");
    }

    async fn append(&mut self, params: T::Create) -> Result<T, FrameworkError> {
        let mut items = self.store.load().await?;
        let id = (self.next_id_fn)(&items);
        let item = T::from_create_params(id, params)
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;
        items.push(item.clone());
        self.store.save(&items).await?;
        Ok(item)
    }

    async fn update(&mut self, id: &T::Id, update: T::Update) -> Result<T, FrameworkError> {
        let mut items = self.store.load().await?;
        let item = items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_update(update)
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;
        let updated = item.clone();
        self.store.save(&items).await?;
        Ok(updated)
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// A type-safe, cheaply cloneable client for a [`ResourceActor`].
#[derive(Clone)]
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn append(&self, params: T::Create) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Append { params, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Get { id, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Update {
                id,
                update,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::List { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::store::MemoryStore;
    use serde::Deserialize;

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: u32,
        text: String,
        locked: bool,
    }

    #[derive(Debug)]
    enum NoteUpdate {
        Rewrite(String),
        Lock,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("note is locked")]
    struct Locked;

    impl ActorEntity for Note {
        type Id = u32;
        type Create = String;
        type Update = NoteUpdate;
        type Error = Locked;

        fn id(&self) -> &u32 {
            &self.id
        }

        fn from_create_params(id: u32, text: String) -> Result<Self, Locked> {
            Ok(Self {
                id,
                text,
                locked: false,
            })
        }

        fn on_update(&mut self, update: NoteUpdate) -> Result<(), Locked> {
            if self.locked {
                return Err(Locked);
            }
            match update {
                NoteUpdate::Rewrite(text) => self.text = text,
                NoteUpdate::Lock => self.locked = true,
            }
            Ok(())
        }
    }

    fn next_note_id(existing: &[Note]) -> u32 {
        existing.iter().map(|n| n.id).max().unwrap_or(0) + 1
    }

    #[tokio::test]
    async fn test_append_get_update_list() {
        let (actor, client) = ResourceActor::new(10, MemoryStore::<Note>::new(), next_note_id);
        tokio::spawn(actor.run());

        let first = client.append("first".into()).await.unwrap();
        let second = client.append("second".into()).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let found = client.get(2).await.unwrap().unwrap();
        assert_eq!(found.text, "second");
        assert!(client.get(99).await.unwrap().is_none());

        let updated = client
            .update(1, NoteUpdate::Rewrite("edited".into()))
            .await
            .unwrap();
        assert_eq!(updated.text, "edited");

        let all = client.list().await.unwrap();
        assert_eq!(
            all.iter().map(|n| n.text.as_str()).collect::<Vec<_>>(),
            vec!["edited", "second"]
        );
    }

    #[tokio::test]
    async fn test_refused_update_leaves_store_untouched() {
        let store = MemoryStore::<Note>::new();
        let (actor, client) = ResourceActor::new(10, store.clone(), next_note_id);
        tokio::spawn(actor.run());

        client.append("keep".into()).await.unwrap();
        client.update(1, NoteUpdate::Lock).await.unwrap();
        let before = store.snapshot();

        let err = client
            .update(1, NoteUpdate::Rewrite("nope".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, FrameworkError::EntityError(_)));
        assert_eq!(store.snapshot(), before);

        let missing = client.update(7, NoteUpdate::Lock).await.unwrap_err();
        assert!(matches!(missing, FrameworkError::NotFound(id) if id == "7"));
    }

    #[tokio::test]
    async fn test_closed_actor_reports_actor_closed() {
        let (actor, client) = ResourceActor::new(1, MemoryStore::<Note>::new(), next_note_id);
        drop(actor);
        let err = client.list().await.unwrap_err();
        assert!(matches!(err, FrameworkError::ActorClosed));
    }
}
