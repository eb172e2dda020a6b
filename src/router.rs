//! # Command Router
//!
//! Every inbound chat message passes through here. [`classify`] turns the text
//! into an [`Intent`] without side effects; the [`Concierge`] actor then runs
//! that intent against the conversation engine or the manager handler.
//!
//! ## Ordering
//!
//! The concierge drains a single queue, one message at a time, and owns the
//! [`ConversationEngine`] outright. A guest's transition therefore always
//! finishes before the next message (from anyone) is looked at.

use crate::conversation::ConversationEngine;
use crate::manager::{ManagerCommand, ManagerCommandHandler};
use crate::model::{Identity, InboundMessage};
use crate::notify::Notifier;
use crate::replies;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// What an inbound message asks for. First matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ManagerCommand(ManagerCommand),
    /// The sender has a live session; let the engine try first.
    Continue,
    Menu,
    StartOrder,
    CheckIn,
    Housekeeping,
    Welcome,
}

/// Classifies a trimmed, lowercased message.
pub fn classify(text: &str, sender_is_manager: bool, has_session: bool) -> Intent {
    if sender_is_manager {
        if let Some(command) = ManagerCommand::parse(text) {
            return Intent::ManagerCommand(command);
        }
    }
    if has_session {
        return Intent::Continue;
    }
    classify_fresh(text)
}

/// Classification for a sender with no session and no manager rights.
pub fn classify_fresh(text: &str) -> Intent {
    if text.contains("menu") || text.contains("food") {
        Intent::Menu
    } else if text.contains("order") {
        Intent::StartOrder
    } else if text.contains("check-in") {
        Intent::CheckIn
    } else if text.contains("housekeeping") {
        Intent::Housekeeping
    } else {
        Intent::Welcome
    }
}

/// Errors returned by a [`ConciergeHandle`].
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("Concierge closed")]
    Closed,
    #[error("Concierge dropped response channel")]
    Dropped,
}

struct RouterRequest {
    message: InboundMessage,
    respond_to: Option<oneshot::Sender<Option<Intent>>>,
}

/// Cloneable handle for feeding inbound messages to the [`Concierge`].
#[derive(Clone)]
pub struct ConciergeHandle {
    sender: mpsc::Sender<RouterRequest>,
}

impl ConciergeHandle {
    /// Queues a message without waiting for it to be handled.
    pub async fn submit(&self, message: InboundMessage) -> Result<(), RouterError> {
        self.sender
            .send(RouterRequest {
                message,
                respond_to: None,
            })
            .await
            .map_err(|_| RouterError::Closed)
    }

    /// Queues a message and waits until it has been handled.
    ///
    /// Returns the intent that ran, or `None` if the message was discarded
    /// (group message or blank body).
    pub async fn process(&self, message: InboundMessage) -> Result<Option<Intent>, RouterError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(RouterRequest {
                message,
                respond_to: Some(respond_to),
            })
            .await
            .map_err(|_| RouterError::Closed)?;
        response.await.map_err(|_| RouterError::Dropped)
    }
}

/// The router actor. Owns the conversation engine.
pub struct Concierge {
    receiver: mpsc::Receiver<RouterRequest>,
    engine: ConversationEngine,
    manager: ManagerCommandHandler,
    notifier: Notifier,
}

impl Concierge {
    pub fn new(
        buffer_size: usize,
        engine: ConversationEngine,
        manager: ManagerCommandHandler,
        notifier: Notifier,
    ) -> (Self, ConciergeHandle) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let concierge = Self {
            receiver,
            engine,
            manager,
            notifier,
        };
        (concierge, ConciergeHandle { sender })
    }

    /// Handles messages until every [`ConciergeHandle`] has been dropped.
    pub async fn run(mut self) {
        info!("Concierge started");
        let mut handled = 0usize;

        while let Some(RouterRequest {
            message,
            respond_to,
        }) = self.receiver.recv().await
        {
            let intent = self.route(message).await;
            if intent.is_some() {
                handled += 1;
            }
            if let Some(respond_to) = respond_to {
                let _ = respond_to.send(intent);
            }
        }

        info!(handled, "Concierge shutdown");
    }

    async fn route(&mut self, message: InboundMessage) -> Option<Intent> {
        let Some(text) = message.normalized() else {
            debug!(from = %message.from, group = message.is_group, "Discarded");
            return None;
        };
        let from = message.from;
        let now = Instant::now();

        let purged = self.engine.purge_expired(now);
        if purged > 0 {
            debug!(purged, "Expired sessions purged");
        }

        let is_manager = &from == self.notifier.manager();
        let has_session = self.engine.has_session(&from, now);
        let intent = match classify(&text, is_manager, has_session) {
            Intent::ManagerCommand(command) => {
                info!(action = ?command.action, order_id = %command.order_id, "Manager command");
                if let Err(e) = self.manager.handle(&command).await {
                    debug!(error = %e, "Manager command reported");
                }
                return Some(Intent::ManagerCommand(command));
            }
            Intent::Continue => {
                if let Some(reply) = self.engine.continue_conversation(&from, &text, now).await {
                    self.notifier.notify(&from, reply);
                    return Some(Intent::Continue);
                }
                classify_fresh(&text)
            }
            fresh => fresh,
        };

        debug!(%from, ?intent, "Routed");
        let reply = self.reply_for(&from, &intent, now);
        self.notifier.notify(&from, reply);
        Some(intent)
    }

    fn reply_for(&mut self, from: &Identity, intent: &Intent, now: Instant) -> String {
        if *intent == Intent::StartOrder {
            return self.engine.start_order(from, now);
        }
        let catalog = self.engine.catalog();
        let hotel = &catalog.hotel;
        match intent {
            Intent::Menu => replies::menu(catalog),
            Intent::CheckIn => replies::check_in(hotel),
            Intent::Housekeeping => replies::housekeeping(hotel),
            Intent::Welcome => replies::welcome(hotel),
            Intent::StartOrder | Intent::ManagerCommand(_) | Intent::Continue => {
                warn!(?intent, "Intent has no static reply");
                replies::welcome(hotel)
            }
        }
    }
}
