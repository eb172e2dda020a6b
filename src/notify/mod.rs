//! # Notification Dispatcher
//!
//! Outbound messages never go straight to the chat provider. Callers enqueue
//! them on a [`Notifier`] handle and a single [`NotificationDispatcher`] task
//! drains the queue into the [`Transport`].
//!
//! ## Delivery Model
//!
//! - Enqueueing never blocks and never fails from the caller's point of view.
//! - Messages leave in the order they were enqueued.
//! - A failed delivery is logged at `warn` and dropped; it never undoes the
//!   ledger change that triggered it.

pub mod transport;

pub use transport::*;

use crate::model::Identity;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct Outbound {
    to: Identity,
    text: String,
}

/// Cheaply cloneable handle for enqueueing outbound messages.
#[derive(Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<Outbound>,
    manager: Identity,
}

impl Notifier {
    /// Creates the handle and the dispatcher that will drain it into `transport`.
    pub fn new(
        manager: Identity,
        transport: impl Transport,
    ) -> (Self, NotificationDispatcher) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let dispatcher = NotificationDispatcher {
            receiver,
            transport: Box::new(transport),
        };
        (Self { sender, manager }, dispatcher)
    }

    /// The privileged identity allowed to issue manager commands.
    pub fn manager(&self) -> &Identity {
        &self.manager
    }

    pub fn notify(&self, to: &Identity, text: impl Into<String>) {
        let outbound = Outbound {
            to: to.clone(),
            text: text.into(),
        };
        if let Err(mpsc::error::SendError(lost)) = self.sender.send(outbound) {
            warn!(to = %lost.to, "Dispatcher stopped, message dropped");
        }
    }

    pub fn notify_manager(&self, text: impl Into<String>) {
        self.notify(&self.manager, text);
    }
}

/// Background task that owns the transport.
pub struct NotificationDispatcher {
    receiver: mpsc::UnboundedReceiver<Outbound>,
    transport: Box<dyn Transport>,
}

impl NotificationDispatcher {
    /// Delivers queued messages until every [`Notifier`] has been dropped.
    pub async fn run(mut self) {
        info!("Notification dispatcher started");
        let mut delivered = 0usize;
        let mut failed = 0usize;

        while let Some(Outbound { to, text }) = self.receiver.recv().await {
            match self.transport.send_text(&to, &text).await {
                Ok(()) => {
                    delivered += 1;
                    debug!(%to, "Delivered");
                }
                Err(e) => {
                    failed += 1;
                    warn!(%to, error = %e, "Delivery failed");
                }
            }
        }

        info!(delivered, failed, "Notification dispatcher shutdown");
    }
}
