//! Represents a placed room-service order.
//!
//! # Actor Framework
//! This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
//! allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
//!
//! See [`impl ActorEntity for Order`](#impl-ActorEntity-for-Order) for details on:
//! - Creation parameters ([`OrderCreate`])
//! - Update parameters ([`StatusUpdate`])

use crate::model::Identity;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::LazyLock;

static ROOM_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3,4}$").expect("room pattern compiles"));

/// Whether `text` is a 3–4 digit room number.
pub fn is_room_number(text: &str) -> bool {
    ROOM_NUMBER.is_match(text)
}

/// Type-safe identifier for Orders.
///
/// Issued from the millisecond clock, so it always has at least 13 digits;
/// see [`crate::order_actor::OrderIdGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Lifecycle of an order.
///
/// Status only moves forward: `Pending → Confirmed → Completed`, or
/// `Pending → Rejected`. `Completed` and `Rejected` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Completed,
    Rejected,
}

impl OrderStatus {
    /// Whether `next` is a forward step from `self`.
    pub fn can_advance_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Completed)
                | (Pending, Rejected)
                | (Confirmed, Completed)
        )
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Completed => "Completed",
            OrderStatus::Rejected => "Rejected",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub room: String,
    /// Full item descriptors, e.g. `Club Sandwich - ₹450`.
    pub items: Vec<String>,
    pub guest_identity: Identity,
    pub status: OrderStatus,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Payload for appending a new order to the ledger.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub room: String,
    pub items: Vec<String>,
    pub guest_identity: Identity,
}

/// Payload for moving an order to a new status.
#[derive(Debug, Clone, Copy)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

impl Order {
    /// Creates a new `Pending` order stamped with the current time.
    pub fn new(id: OrderId, params: OrderCreate) -> Self {
        Self {
            id,
            room: params.room,
            items: params.items,
            guest_identity: params.guest_identity,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_status_only_moves_forward() {
        let allowed = [
            (Pending, Confirmed),
            (Pending, Completed),
            (Pending, Rejected),
            (Confirmed, Completed),
        ];
        let all = [Pending, Confirmed, Completed, Rejected];
        for from in all {
            for to in all {
                assert_eq!(
                    from.can_advance_to(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_order_serializes_with_dashboard_field_names() {
        let order = Order::new(
            OrderId(1_700_000_000_000),
            OrderCreate {
                room: "101".into(),
                items: vec!["Margherita Pizza - ₹800".into()],
                guest_identity: Identity::from("15550001@c.us"),
            },
        );
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["id"], 1_700_000_000_000u64);
        assert_eq!(value["room"], "101");
        assert_eq!(value["guestIdentity"], "15550001@c.us");
        assert_eq!(value["status"], "Pending");
        assert!(value["timestamp"].is_string());

        let back: Order = serde_json::from_value(value).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn test_room_numbers_are_three_or_four_ascii_digits() {
        for room in ["101", "0420", "9999"] {
            assert!(is_room_number(room), "{room}");
        }
        for bad in ["", "12", "12345", "10a", " 101", "room 101", "١٠١"] {
            assert!(!is_room_number(bad), "{bad}");
        }
    }

    #[test]
    fn test_order_id_parses_digits_only() {
        assert_eq!("1700000000000".parse::<OrderId>().unwrap(), OrderId(1_700_000_000_000));
        assert!("12ab".parse::<OrderId>().is_err());
        assert!("99999999999999999999999".parse::<OrderId>().is_err());
    }
}
