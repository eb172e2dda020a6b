//! The hotel's static menu and house information.
//!
//! A [`Catalog`] never changes after start-up. The built-in profile is
//! [`Catalog::oceanview`]; [`Catalog::load`] reads an alternative profile from
//! a JSON file with the same shape.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors raised while loading a catalog profile.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("catalog {} is malformed: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("catalog has no orderable items")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub display_name: String,
    pub price_label: String,
}

impl MenuItem {
    pub fn new(display_name: impl Into<String>, price_label: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            price_label: price_label.into(),
        }
    }

    /// The form stored on orders and shown to guests, e.g. `Club Sandwich - ₹450`.
    pub fn descriptor(&self) -> String {
        format!("{} - {}", self.display_name, self.price_label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    /// Service hours as shown to guests.
    pub hours: String,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelInfo {
    pub name: String,
    pub check_in_time: String,
    pub check_out_time: String,
    pub housekeeping_hours: String,
    pub housekeeping_extension: String,
    pub delivery_estimate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub hotel: HotelInfo,
    /// Categories in display order.
    pub categories: Vec<Category>,
}

impl Catalog {
    /// The built-in Oceanview Resort profile.
    pub fn oceanview() -> Self {
        let category = |name: &str, hours: &str, items: [(&str, &str); 3]| Category {
            name: name.to_string(),
            hours: hours.to_string(),
            items: items
                .into_iter()
                .map(|(name, price)| MenuItem::new(name, price))
                .collect(),
        };

        Self {
            hotel: HotelInfo {
                name: "Oceanview Resort".into(),
                check_in_time: "2:00 PM".into(),
                check_out_time: "11:00 AM".into(),
                housekeeping_hours: "8AM–6PM".into(),
                housekeeping_extension: "55".into(),
                delivery_estimate: "30–45 mins".into(),
            },
            categories: vec![
                category(
                    "breakfast",
                    "7:00 AM - 10:30 AM",
                    [
                        ("Continental Breakfast", "₹500"),
                        ("Full English Breakfast", "₹750"),
                        ("Pancakes with Maple Syrup", "₹450"),
                    ],
                ),
                category(
                    "lunch",
                    "12:00 PM - 3:00 PM",
                    [
                        ("Grilled Chicken Sandwich", "₹650"),
                        ("Margherita Pizza", "₹800"),
                        ("Vegetable Pasta", "₹550"),
                    ],
                ),
                category(
                    "dinner",
                    "6:30 PM - 11:00 PM",
                    [
                        ("Grilled Salmon", "₹1200"),
                        ("Beef Steak", "₹1500"),
                        ("Vegetable Curry", "₹600"),
                    ],
                ),
                category(
                    "roomService",
                    "24/7",
                    [
                        ("Club Sandwich", "₹450"),
                        ("Chicken Burger", "₹550"),
                        ("Chocolate Lava Cake", "₹350"),
                    ],
                ),
            ],
        }
    }

    /// Reads a catalog profile from a JSON file.
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: Catalog =
            serde_json::from_slice(&bytes).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if catalog.categories.iter().all(|c| c.items.is_empty()) {
            return Err(CatalogError::Empty);
        }
        Ok(catalog)
    }

    /// Items the guest asked for, as full descriptors in catalog order.
    ///
    /// An item matches when its name occurs anywhere in `message`,
    /// case-insensitively. An item listed in two categories is returned twice.
    /// When nothing matches that way and the whole message is a run of words
    /// taken from item names (`"pizza"`, `"lava cake"`), those items match
    /// instead.
    pub fn match_items(&self, message: &str) -> Vec<String> {
        let message = message.to_lowercase();
        let items = || self.categories.iter().flat_map(|category| category.items.iter());

        let found: Vec<String> = items()
            .filter(|item| message.contains(&item.display_name.to_lowercase()))
            .map(MenuItem::descriptor)
            .collect();
        if !found.is_empty() {
            return found;
        }

        let asked = words(&message);
        if asked.is_empty() {
            return found;
        }
        items()
            .filter(|item| {
                let lowered = item.display_name.to_lowercase();
                let name = words(&lowered);
                name.windows(asked.len()).any(|run| run == asked.as_slice())
            })
            .map(MenuItem::descriptor)
            .collect()
    }
}

fn words(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .collect()
}

impl Default for Catalog {
    fn default() -> Self {
        Self::oceanview()
    }
}
