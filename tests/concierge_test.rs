use hotel_concierge::framework::JsonFileStore;
use hotel_concierge::lifecycle::{ConciergeSettings, ConciergeSystem};
use hotel_concierge::model::{Identity, InboundMessage, OrderStatus};
use hotel_concierge::notify::{ChannelTransport, Delivery};
use hotel_concierge::replies;
use hotel_concierge::router::Intent;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

const GUEST: &str = "15550001@c.us";
const MANAGER: &str = "9779819809195@c.us";

struct Hotel {
    system: ConciergeSystem,
    deliveries: UnboundedReceiver<Delivery>,
    _dir: TempDir,
}

impl Hotel {
    async fn open() -> Self {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("orders.json"))
            .await
            .unwrap();
        let (transport, deliveries) = ChannelTransport::new();
        let system = ConciergeSystem::start(store, transport, ConciergeSettings::default());
        Self {
            system,
            deliveries,
            _dir: dir,
        }
    }

    async fn say(&self, from: &str, text: &str) -> Option<Intent> {
        self.system
            .concierge
            .process(InboundMessage::direct(from, text))
            .await
            .expect("concierge stopped")
    }

    async fn next(&mut self) -> Delivery {
        tokio::time::timeout(Duration::from_secs(2), self.deliveries.recv())
            .await
            .expect("no delivery in time")
            .expect("dispatcher stopped")
    }

    /// Sends a guest message and returns the single reply it produced.
    async fn ask(&mut self, text: &str) -> String {
        self.say(GUEST, text).await.expect("message discarded");
        let reply = self.next().await;
        assert_eq!(reply.to, Identity::from(GUEST));
        reply.text
    }
}

#[tokio::test]
async fn test_order_pizza_end_to_end() {
    let mut hotel = Hotel::open().await;

    assert_eq!(hotel.ask("Hi, I want to ORDER").await, replies::ROOM_PROMPT);
    assert_eq!(hotel.ask("101").await, replies::room_noted("101"));
    let prompt = hotel.ask("pizza").await;
    assert!(prompt.contains("Margherita Pizza - ₹800"));
    assert!(prompt.contains("Room: 101"));

    assert_eq!(hotel.say(GUEST, "Confirm").await, Some(Intent::Continue));
    let alert = hotel.next().await;
    assert_eq!(alert.to, Identity::from(MANAGER));
    assert!(alert.text.starts_with("📢 *NEW ORDER*"));
    let placed = hotel.next().await;
    assert_eq!(placed.to, Identity::from(GUEST));

    let orders = hotel.system.orders.list_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.room, "101");
    assert_eq!(order.items, vec!["Margherita Pizza - ₹800".to_string()]);
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(placed.text.contains(&format!("#{}", order.id)));
    assert!(placed.text.contains("30–45 mins"));
    assert!(alert.text.contains(&format!("#{}", order.id)));

    // The session is gone: "confirm" again is just an unknown message.
    assert_eq!(hotel.say(GUEST, "confirm").await, Some(Intent::Welcome));
    hotel.next().await;
    assert_eq!(hotel.system.orders.list_orders().await.unwrap().len(), 1);

    hotel.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_manager_confirms_and_completes() {
    let mut hotel = Hotel::open().await;
    hotel.ask("order").await;
    hotel.ask("202").await;
    hotel.ask("beef steak and a chocolate lava cake").await;
    hotel.say(GUEST, "confirm").await;
    hotel.next().await;
    hotel.next().await;
    let id = hotel.system.orders.list_orders().await.unwrap()[0].id;

    let intent = hotel.say(MANAGER, &format!("CONFIRM #{id}")).await;
    assert!(matches!(intent, Some(Intent::ManagerCommand(_))));
    let notice = hotel.next().await;
    assert_eq!(notice.to, Identity::from(MANAGER));
    assert_eq!(notice.text, replies::manager_updated(id, OrderStatus::Confirmed));
    let guest = hotel.next().await;
    assert_eq!(guest.to, Identity::from(GUEST));
    assert_eq!(
        Some(guest.text),
        replies::guest_status(id, OrderStatus::Confirmed)
    );

    hotel.say(MANAGER, &format!("done #{id}")).await;
    hotel.next().await;
    hotel.next().await;

    // Completed is final.
    hotel.say(MANAGER, &format!("reject #{id}")).await;
    let refused = hotel.next().await;
    assert_eq!(refused.to, Identity::from(MANAGER));
    assert!(refused.text.contains("Completed"));

    let order = hotel.system.orders.find(id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Completed);

    hotel.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_manager_unknown_order() {
    let mut hotel = Hotel::open().await;

    hotel.say(MANAGER, "confirm #1999999999999").await;
    let notice = hotel.next().await;
    assert_eq!(notice.to, Identity::from(MANAGER));
    assert_eq!(notice.text, replies::manager_not_found("1999999999999"));
    assert!(hotel.system.orders.list_orders().await.unwrap().is_empty());

    hotel.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_guests_cannot_issue_manager_commands() {
    let mut hotel = Hotel::open().await;
    assert_eq!(
        hotel.say(GUEST, "confirm #1999999999999").await,
        Some(Intent::Welcome)
    );
    hotel.next().await;
    hotel.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cancel_leaves_ledger_empty() {
    let mut hotel = Hotel::open().await;
    hotel.ask("order").await;
    hotel.ask("101").await;
    hotel.ask("club sandwich").await;

    assert_eq!(hotel.ask("cancel").await, replies::ORDER_CANCELLED);
    assert!(hotel.system.orders.list_orders().await.unwrap().is_empty());

    // Back to idle.
    assert_eq!(hotel.say(GUEST, "101").await, Some(Intent::Welcome));

    hotel.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_fresh_intents_while_awaiting_confirmation() {
    let mut hotel = Hotel::open().await;
    hotel.ask("order").await;
    hotel.ask("101").await;
    hotel.ask("vegetable curry").await;

    // Not a confirmation reply: answered as a fresh message, session kept.
    assert_eq!(hotel.say(GUEST, "what's on the menu?").await, Some(Intent::Menu));
    assert!(hotel.next().await.text.contains("*Menu – Oceanview Resort*"));

    hotel.say(GUEST, "confirm").await;
    hotel.next().await;
    hotel.next().await;
    let orders = hotel.system.orders.list_orders().await.unwrap();
    assert_eq!(orders[0].items, vec!["Vegetable Curry - ₹600".to_string()]);

    // "order" mid-flow restarts it.
    hotel.ask("order").await;
    hotel.ask("303").await;
    hotel.ask("pasta").await;
    assert_eq!(hotel.ask("order").await, replies::ROOM_PROMPT);
    assert_eq!(hotel.ask("304").await, replies::room_noted("304"));

    hotel.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_static_replies_and_discarded_messages() {
    let mut hotel = Hotel::open().await;

    assert!(hotel.ask("check-in?").await.contains("2:00 PM"));
    assert!(hotel.ask("need housekeeping").await.contains("ext. 55"));
    assert!(hotel.ask("hello").await.starts_with("👋 Welcome to *Oceanview Resort*!"));

    assert_eq!(hotel.say(GUEST, "   ").await, None);
    let group = InboundMessage {
        from: Identity::from(GUEST),
        body: "menu".into(),
        is_group: true,
    };
    assert_eq!(hotel.system.concierge.process(group).await.unwrap(), None);
    assert!(hotel.deliveries.try_recv().is_err());

    hotel.system.shutdown().await.unwrap();
}
