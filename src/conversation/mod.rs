//! # Conversation Engine
//!
//! Walks each guest through room → items → confirmation. The engine owns the
//! [`SessionStore`], so only the task that owns the engine can ever see or
//! change a guest's state.
//!
//! ## Transitions
//!
//! | State                  | Input            | Next                   |
//! |------------------------|------------------|------------------------|
//! | idle                   | "order"          | `AwaitingRoom`         |
//! | `AwaitingRoom`         | 3-4 digits       | `AwaitingOrder`        |
//! | `AwaitingOrder`        | matching items   | `AwaitingConfirmation` |
//! | `AwaitingConfirmation` | "confirm"        | idle, order placed     |
//! | `AwaitingConfirmation` | "cancel"         | idle                   |
//!
//! Any other input in the first two states keeps the state and produces an
//! error reply. Any other input while awaiting confirmation is left to the
//! router ([`ConversationEngine::continue_conversation`] returns `None`).

pub mod session;

pub use session::*;

use crate::clients::OrderClient;
use crate::model::{is_room_number, Catalog, Identity, OrderCreate};
use crate::notify::Notifier;
use crate::replies;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Default idle time after which a half-finished conversation is forgotten.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

pub struct ConversationEngine {
    catalog: Arc<Catalog>,
    sessions: SessionStore,
    orders: OrderClient,
    notifier: Notifier,
}

impl ConversationEngine {
    pub fn new(
        catalog: Arc<Catalog>,
        orders: OrderClient,
        notifier: Notifier,
        session_ttl: Duration,
    ) -> Self {
        Self {
            catalog,
            sessions: SessionStore::new(session_ttl),
            orders,
            notifier,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The live state for `guest`, if any.
    pub fn state(&mut self, guest: &Identity, now: Instant) -> Option<&ConversationState> {
        self.sessions.get(guest, now)
    }

    pub fn has_session(&mut self, guest: &Identity, now: Instant) -> bool {
        self.sessions.get(guest, now).is_some()
    }

    /// Starts (or restarts) the ordering flow and returns the room prompt.
    pub fn start_order(&mut self, guest: &Identity, now: Instant) -> String {
        self.sessions.put(guest, ConversationState::AwaitingRoom, now);
        replies::ROOM_PROMPT.to_string()
    }

    pub fn purge_expired(&mut self, now: Instant) -> usize {
        self.sessions.purge_expired(now)
    }

    /// Feeds `text` (trimmed and lowercased) into the guest's session.
    ///
    /// Returns the reply for the guest, or `None` when the guest has no
    /// session or the session does not handle this input.
    #[instrument(skip(self, now), fields(guest = %guest))]
    pub async fn continue_conversation(
        &mut self,
        guest: &Identity,
        text: &str,
        now: Instant,
    ) -> Option<String> {
        let state = self.sessions.get(guest, now)?.clone();

        match state {
            ConversationState::AwaitingRoom => {
                if !is_room_number(text) {
                    self.sessions.touch(guest, now);
                    return Some(replies::INVALID_ROOM.to_string());
                }
                let room = text.to_string();
                let reply = replies::room_noted(&room);
                self.sessions
                    .put(guest, ConversationState::AwaitingOrder { room }, now);
                Some(reply)
            }
            ConversationState::AwaitingOrder { room } => {
                let items = self.catalog.match_items(text);
                if items.is_empty() {
                    self.sessions.touch(guest, now);
                    return Some(replies::NO_VALID_ITEM.to_string());
                }
                let reply = replies::confirmation_prompt(&room, &items);
                self.sessions.put(
                    guest,
                    ConversationState::AwaitingConfirmation { room, items },
                    now,
                );
                Some(reply)
            }
            ConversationState::AwaitingConfirmation { room, items } => match text {
                "confirm" => Some(self.confirm(guest, room, items, now).await),
                "cancel" => {
                    self.sessions.remove(guest);
                    info!("Order cancelled");
                    Some(replies::ORDER_CANCELLED.to_string())
                }
                _ => None,
            },
        }
    }

    async fn confirm(
        &mut self,
        guest: &Identity,
        room: String,
        items: Vec<String>,
        now: Instant,
    ) -> String {
        let params = OrderCreate {
            room,
            items,
            guest_identity: guest.clone(),
        };
        match self.orders.place_order(params).await {
            Ok(order) => {
                self.sessions.remove(guest);
                self.notifier.notify_manager(replies::new_order_alert(&order));
                replies::order_placed(order.id, &self.catalog.hotel)
            }
            Err(e) => {
                warn!(error = %e, "Order could not be placed, keeping session");
                self.sessions.touch(guest, now);
                replies::ORDER_NOT_PLACED.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{MemoryStore, Store, StoreError};
    use crate::model::{Order, OrderStatus};
    use crate::notify::{ChannelTransport, Delivery};
    use crate::order_actor;
    use async_trait::async_trait;
    use tokio::sync::mpsc::UnboundedReceiver;

    struct Harness {
        engine: ConversationEngine,
        store: MemoryStore<Order>,
        deliveries: UnboundedReceiver<Delivery>,
    }

    fn harness() -> Harness {
        let store = MemoryStore::<Order>::new();
        let (actor, orders) = order_actor::new(store.clone());
        tokio::spawn(actor.run());
        let (transport, deliveries) = ChannelTransport::new();
        let (notifier, dispatcher) = Notifier::new(Identity::from("manager@c.us"), transport);
        tokio::spawn(dispatcher.run());
        let engine = ConversationEngine::new(
            Arc::new(Catalog::oceanview()),
            orders,
            notifier,
            DEFAULT_SESSION_TTL,
        );
        Harness {
            engine,
            store,
            deliveries,
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl Store<Order> for BrokenStore {
        async fn load(&self) -> Result<Vec<Order>, StoreError> {
            Ok(Vec::new())
        }

        async fn save(&self, _items: &[Order]) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk full".into()))
        }
    }

    #[tokio::test]
    async fn test_room_validation() {
        let mut h = harness();
        let guest = Identity::from("guest@c.us");
        let now = Instant::now();
        h.engine.start_order(&guest, now);

        for bad in ["12", "12345", "abc", "10a"] {
            let reply = h.engine.continue_conversation(&guest, bad, now).await;
            assert_eq!(reply.as_deref(), Some(replies::INVALID_ROOM));
            assert_eq!(
                h.engine.state(&guest, now),
                Some(&ConversationState::AwaitingRoom)
            );
        }

        let reply = h.engine.continue_conversation(&guest, "1204", now).await;
        assert_eq!(reply, Some(replies::room_noted("1204")));
        assert_eq!(
            h.engine.state(&guest, now),
            Some(&ConversationState::AwaitingOrder {
                room: "1204".into()
            })
        );
    }

    #[tokio::test]
    async fn test_items_must_match_the_catalog() {
        let mut h = harness();
        let guest = Identity::from("guest@c.us");
        let now = Instant::now();
        h.engine.start_order(&guest, now);
        h.engine.continue_conversation(&guest, "101", now).await;

        let reply = h.engine.continue_conversation(&guest, "sushi", now).await;
        assert_eq!(reply.as_deref(), Some(replies::NO_VALID_ITEM));

        let reply = h
            .engine
            .continue_conversation(&guest, "i want a club sandwich please", now)
            .await
            .unwrap();
        assert!(reply.contains("Club Sandwich - ₹450"));
        assert_eq!(
            h.engine.state(&guest, now),
            Some(&ConversationState::AwaitingConfirmation {
                room: "101".into(),
                items: vec!["Club Sandwich - ₹450".into()],
            })
        );
    }

    #[tokio::test]
    async fn test_confirm_places_one_pending_order() {
        let mut h = harness();
        let guest = Identity::from("guest@c.us");
        let now = Instant::now();
        h.engine.start_order(&guest, now);
        h.engine.continue_conversation(&guest, "101", now).await;
        h.engine.continue_conversation(&guest, "pizza", now).await;

        let reply = h
            .engine
            .continue_conversation(&guest, "confirm", now)
            .await
            .unwrap();
        assert!(!h.engine.has_session(&guest, now));

        let orders = h.store.snapshot();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, OrderStatus::Pending);
        assert_eq!(orders[0].items, vec!["Margherita Pizza - ₹800".to_string()]);
        assert_eq!(orders[0].guest_identity, guest);
        assert_eq!(reply, replies::order_placed(orders[0].id, &Catalog::oceanview().hotel));

        let alert = h.deliveries.recv().await.unwrap();
        assert_eq!(alert.to, Identity::from("manager@c.us"));
        assert!(alert.text.contains(&format!("#{}", orders[0].id)));
    }

    #[tokio::test]
    async fn test_cancel_writes_nothing() {
        let mut h = harness();
        let guest = Identity::from("guest@c.us");
        let now = Instant::now();
        h.engine.start_order(&guest, now);
        h.engine.continue_conversation(&guest, "101", now).await;
        h.engine.continue_conversation(&guest, "beef steak", now).await;

        let reply = h.engine.continue_conversation(&guest, "cancel", now).await;
        assert_eq!(reply.as_deref(), Some(replies::ORDER_CANCELLED));
        assert!(!h.engine.has_session(&guest, now));
        assert!(h.store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_other_input_awaiting_confirmation_is_not_handled() {
        let mut h = harness();
        let guest = Identity::from("guest@c.us");
        let now = Instant::now();
        h.engine.start_order(&guest, now);
        h.engine.continue_conversation(&guest, "101", now).await;
        h.engine.continue_conversation(&guest, "beef steak", now).await;

        assert_eq!(h.engine.continue_conversation(&guest, "menu", now).await, None);
        assert!(h.engine.has_session(&guest, now));
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_the_session() {
        let (actor, orders) = order_actor::new(BrokenStore);
        tokio::spawn(actor.run());
        let (transport, mut deliveries) = ChannelTransport::new();
        let (notifier, dispatcher) = Notifier::new(Identity::from("manager@c.us"), transport);
        tokio::spawn(dispatcher.run());
        let mut engine = ConversationEngine::new(
            Arc::new(Catalog::oceanview()),
            orders,
            notifier,
            DEFAULT_SESSION_TTL,
        );

        let guest = Identity::from("guest@c.us");
        let now = Instant::now();
        engine.start_order(&guest, now);
        engine.continue_conversation(&guest, "101", now).await;
        engine.continue_conversation(&guest, "pizza", now).await;

        let reply = engine.continue_conversation(&guest, "confirm", now).await;
        assert_eq!(reply.as_deref(), Some(replies::ORDER_NOT_PLACED));
        assert!(matches!(
            engine.state(&guest, now),
            Some(ConversationState::AwaitingConfirmation { .. })
        ));

        drop(engine);
        assert!(deliveries.recv().await.is_none(), "manager must not be notified");
    }

    #[tokio::test]
    async fn test_expired_session_is_idle() {
        let mut h = harness();
        let guest = Identity::from("guest@c.us");
        let start = Instant::now();
        h.engine.start_order(&guest, start);

        let later = start + DEFAULT_SESSION_TTL + Duration::from_secs(1);
        assert_eq!(h.engine.continue_conversation(&guest, "101", later).await, None);
        assert!(!h.engine.has_session(&guest, later));
    }
}
