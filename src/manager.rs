//! # Manager Command Handler
//!
//! The manager drives orders forward from chat with `confirm #<id>`,
//! `done #<id>` and `reject #<id>`. Every outcome, good or bad, is reported
//! back to the manager; nothing here ever fails the caller.

use crate::clients::OrderClient;
use crate::model::{Order, OrderId, OrderStatus};
use crate::notify::Notifier;
use crate::order_actor::OrderError;
use crate::replies;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, instrument, warn};

static COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(confirm|done|reject)\s+#([0-9]{13,})$").expect("manager command pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerAction {
    Confirm,
    Done,
    Reject,
}

impl ManagerAction {
    pub fn target_status(self) -> OrderStatus {
        match self {
            ManagerAction::Confirm => OrderStatus::Confirmed,
            ManagerAction::Done => OrderStatus::Completed,
            ManagerAction::Reject => OrderStatus::Rejected,
        }
    }
}

/// A parsed manager command. The order id is kept exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerCommand {
    pub action: ManagerAction,
    pub order_id: String,
}

impl ManagerCommand {
    /// Parses a trimmed, lowercased message.
    pub fn parse(text: &str) -> Option<Self> {
        let captures = COMMAND.captures(text)?;
        let action = match &captures[1] {
            "confirm" => ManagerAction::Confirm,
            "done" => ManagerAction::Done,
            _ => ManagerAction::Reject,
        };
        Some(Self {
            action,
            order_id: captures[2].to_string(),
        })
    }
}

/// Applies manager commands to the ledger and reports the outcome.
#[derive(Clone)]
pub struct ManagerCommandHandler {
    orders: OrderClient,
    notifier: Notifier,
}

impl ManagerCommandHandler {
    pub fn new(orders: OrderClient, notifier: Notifier) -> Self {
        Self { orders, notifier }
    }

    /// Runs `command`. The result is returned for logging only; the manager
    /// has already been told about it.
    #[instrument(skip(self))]
    pub async fn handle(&self, command: &ManagerCommand) -> Result<Order, OrderError> {
        let status = command.action.target_status();
        // An id too long for u64 cannot be in the ledger.
        let Ok(id) = command.order_id.parse::<OrderId>() else {
            self.notifier
                .notify_manager(replies::manager_not_found(&command.order_id));
            return Err(OrderError::NotFound(command.order_id.clone()));
        };

        match self.orders.update_status(id, status).await {
            Ok(order) => {
                info!(order_id = %order.id, %status, "Order updated by manager");
                self.notifier
                    .notify_manager(replies::manager_updated(order.id, order.status));
                if let Some(text) = replies::guest_status(order.id, order.status) {
                    self.notifier.notify(&order.guest_identity, text);
                }
                Ok(order)
            }
            Err(e) => {
                let notice = match &e {
                    OrderError::NotFound(_) => replies::manager_not_found(&command.order_id),
                    OrderError::InvalidTransition { id, from, to } => {
                        replies::manager_invalid_transition(*id, *from, *to)
                    }
                    _ => replies::manager_failed(&command.order_id),
                };
                warn!(error = %e, "Manager command failed");
                self.notifier.notify_manager(notice);
                Err(e)
            }
        }
    }
}
