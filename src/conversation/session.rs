//! Per-guest conversation state with idle expiry.

use crate::model::Identity;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Where a guest is in the ordering flow. A guest with no session is idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationState {
    AwaitingRoom,
    AwaitingOrder { room: String },
    AwaitingConfirmation { room: String, items: Vec<String> },
}

#[derive(Debug)]
struct Session {
    state: ConversationState,
    last_activity: Instant,
}

/// Owns every live session. A session untouched for longer than the TTL is
/// treated as absent and removed the next time it is looked at.
#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<Identity, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    /// The live state for `guest`, purging it first if it has expired.
    pub fn get(&mut self, guest: &Identity, now: Instant) -> Option<&ConversationState> {
        let expired = self
            .sessions
            .get(guest)
            .is_some_and(|session| self.is_expired(session, now));
        if expired {
            debug!(%guest, "Session expired");
            self.sessions.remove(guest);
        }
        self.sessions.get(guest).map(|session| &session.state)
    }

    /// Creates or replaces the session for `guest` and marks it active.
    pub fn put(&mut self, guest: &Identity, state: ConversationState, now: Instant) {
        self.sessions.insert(
            guest.clone(),
            Session {
                state,
                last_activity: now,
            },
        );
    }

    /// Marks the session active without changing its state.
    pub fn touch(&mut self, guest: &Identity, now: Instant) {
        if let Some(session) = self.sessions.get_mut(guest) {
            session.last_activity = now;
        }
    }

    pub fn remove(&mut self, guest: &Identity) -> Option<ConversationState> {
        self.sessions.remove(guest).map(|session| session.state)
    }

    /// Drops every expired session, returning how many went.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.sessions.len();
        let ttl = self.ttl;
        self.sessions
            .retain(|_, session| now.saturating_duration_since(session.last_activity) <= ttl);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn is_expired(&self, session: &Session, now: Instant) -> bool {
        now.saturating_duration_since(session.last_activity) > self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_expire_after_ttl() {
        let mut store = SessionStore::new(Duration::from_secs(60));
        let guest = Identity::from("guest@c.us");
        let start = Instant::now();

        store.put(&guest, ConversationState::AwaitingRoom, start);
        assert_eq!(
            store.get(&guest, start + Duration::from_secs(60)),
            Some(&ConversationState::AwaitingRoom)
        );
        assert_eq!(store.get(&guest, start + Duration::from_secs(61)), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_touch_extends_the_session() {
        let mut store = SessionStore::new(Duration::from_secs(60));
        let guest = Identity::from("guest@c.us");
        let start = Instant::now();

        store.put(&guest, ConversationState::AwaitingRoom, start);
        store.touch(&guest, start + Duration::from_secs(50));
        assert!(store.get(&guest, start + Duration::from_secs(100)).is_some());
    }

    #[test]
    fn test_purge_expired_keeps_live_sessions() {
        let mut store = SessionStore::new(Duration::from_secs(60));
        let start = Instant::now();
        store.put(&Identity::from("old"), ConversationState::AwaitingRoom, start);
        store.put(
            &Identity::from("new"),
            ConversationState::AwaitingOrder { room: "101".into() },
            start + Duration::from_secs(90),
        );

        assert_eq!(store.purge_expired(start + Duration::from_secs(100)), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.remove(&Identity::from("old")), None);
    }
}
