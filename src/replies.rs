//! Every text the concierge sends, guest-facing and manager-facing.

use crate::model::{Catalog, HotelInfo, Order, OrderId, OrderStatus};
use std::fmt::Write;

pub const ROOM_PROMPT: &str = "🛎️ Please enter your room number (e.g. 101):";

pub const INVALID_ROOM: &str = "🚫 Invalid room number. Please enter a 3-4 digit number:";

pub const NO_VALID_ITEM: &str = "⚠️ No valid item found. Please check the menu.";

pub const ORDER_CANCELLED: &str =
    "❎ Your order has been cancelled. Reply \"order\" whenever you want to start again.";

pub const ORDER_NOT_PLACED: &str = "⚠️ Sorry, we could not place your order right now. \
Reply \"confirm\" to try again or \"cancel\" to drop it.";

pub fn welcome(hotel: &HotelInfo) -> String {
    format!(
        "👋 Welcome to *{}*!\n\nReply:\n• \"menu\" to see food\n• \"order\" to place order\n• \"check-in\" info\n• \"housekeeping\" help",
        hotel.name
    )
}

/// The full menu, one block per category with its service hours.
pub fn menu(catalog: &Catalog) -> String {
    let mut text = format!(
        "📋 *Menu – {}*\n\nReply \"order\" after choosing your food.\n\n",
        catalog.hotel.name
    );
    for category in &catalog.categories {
        let _ = writeln!(
            text,
            "🍽 {} ({}):",
            category.name.to_uppercase(),
            category.hours
        );
        for item in &category.items {
            let _ = writeln!(text, "• {}", item.descriptor());
        }
        text.push('\n');
    }
    text.truncate(text.trim_end().len());
    text
}

pub fn check_in(hotel: &HotelInfo) -> String {
    format!(
        "🕒 *Check-in:* {}\n🕚 *Check-out:* {}",
        hotel.check_in_time, hotel.check_out_time
    )
}

pub fn housekeeping(hotel: &HotelInfo) -> String {
    format!(
        "🧼 *Housekeeping Hours:* {}\n📞 Call ext. {} for urgent cleaning requests.",
        hotel.housekeeping_hours, hotel.housekeeping_extension
    )
}

pub fn room_noted(room: &str) -> String {
    format!("✅ Room {room} noted. Now enter the items you want to order.")
}

pub fn confirmation_prompt(room: &str, items: &[String]) -> String {
    format!(
        "🧾 Confirm your order:\nRoom: {room}\nItems:\n{}\n\nReply \"confirm\" to place the order.\nReply \"cancel\" to cancel your order.",
        items.join("\n")
    )
}

pub fn order_placed(id: OrderId, hotel: &HotelInfo) -> String {
    format!(
        "✅ Order #{id} placed! Delivery in {}.",
        hotel.delivery_estimate
    )
}

pub fn new_order_alert(order: &Order) -> String {
    format!(
        "📢 *NEW ORDER*\n#{}\n🏨 Room: {}\n🍽 Items:\n{}",
        order.id,
        order.room,
        order.items.join("\n")
    )
}

pub fn manager_updated(id: OrderId, status: OrderStatus) -> String {
    format!("✅ Order #{id} updated to *{status}*.")
}

pub fn manager_not_found(id: &str) -> String {
    format!("⚠️ Order #{id} not found.")
}

pub fn manager_invalid_transition(id: OrderId, current: OrderStatus, requested: OrderStatus) -> String {
    format!("⚠️ Order #{id} is already *{current}* and cannot be marked *{requested}*.")
}

pub fn manager_failed(id: &str) -> String {
    format!("❌ Order #{id} could not be updated right now. Please try again.")
}

/// What the guest is told when their order reaches `status`. Nothing for `Pending`.
pub fn guest_status(id: OrderId, status: OrderStatus) -> Option<String> {
    match status {
        OrderStatus::Pending => None,
        OrderStatus::Confirmed => Some(format!(
            "🛎️ Your order #{id} has been *confirmed* by the manager."
        )),
        OrderStatus::Completed => Some(format!(
            "✅ Your order #{id} has been *completed*. Enjoy your meal!"
        )),
        OrderStatus::Rejected => Some(format!(
            "❌ Your order #{id} was *rejected* by the manager. Please contact reception for help."
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_lists_every_category_with_hours() {
        let text = menu(&Catalog::oceanview());
        assert!(text.starts_with("📋 *Menu – Oceanview Resort*"));
        assert!(text.contains("🍽 BREAKFAST (7:00 AM - 10:30 AM):\n• Continental Breakfast - ₹500"));
        assert!(text.contains("🍽 ROOMSERVICE (24/7):"));
        assert!(text.ends_with("• Chocolate Lava Cake - ₹350"));
    }

    #[test]
    fn test_confirmation_prompt_advertises_both_replies() {
        let text = confirmation_prompt("101", &["Margherita Pizza - ₹800".to_string()]);
        assert!(text.contains("Room: 101\nItems:\nMargherita Pizza - ₹800"));
        assert!(text.contains("\"confirm\""));
        assert!(text.contains("\"cancel\""));
    }

    #[test]
    fn test_guest_status_templates() {
        let id = OrderId(1_700_000_000_000);
        assert_eq!(guest_status(id, OrderStatus::Pending), None);
        assert_eq!(
            guest_status(id, OrderStatus::Confirmed).unwrap(),
            "🛎️ Your order #1700000000000 has been *confirmed* by the manager."
        );
        assert!(guest_status(id, OrderStatus::Rejected)
            .unwrap()
            .contains("*rejected*"));
    }
}
