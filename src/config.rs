//! Command-line and environment configuration.

use crate::conversation::DEFAULT_SESSION_TTL;
use crate::lifecycle::DEFAULT_MANAGER;
use crate::model::{Catalog, CatalogError, Identity};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Parser)]
#[command(name = "hotel-concierge", about = "Chat order-taking concierge for a hotel")]
pub struct Config {
    /// JSON file holding the order ledger.
    #[arg(long, env = "HOTEL_LEDGER_PATH", default_value = "orders.json")]
    pub ledger_path: PathBuf,

    /// Chat identity allowed to issue manager commands.
    #[arg(long, env = "HOTEL_MANAGER", default_value = DEFAULT_MANAGER)]
    pub manager: String,

    /// Address the dashboard listens on.
    #[arg(long, env = "HOTEL_DASHBOARD_ADDR", default_value = "0.0.0.0:3000")]
    pub dashboard_addr: SocketAddr,

    /// Alternative catalog profile; the built-in Oceanview Resort menu otherwise.
    #[arg(long, env = "HOTEL_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Seconds of silence after which a half-finished conversation is dropped.
    #[arg(long, env = "HOTEL_SESSION_TTL_SECS", default_value_t = DEFAULT_SESSION_TTL.as_secs())]
    pub session_ttl_secs: u64,
}

impl Config {
    pub fn manager_identity(&self) -> Identity {
        Identity::new(self.manager.trim())
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// The configured catalog profile, or the built-in one.
    pub async fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog {
            Some(path) => {
                let catalog = Catalog::load(path).await?;
                info!(path = %path.display(), hotel = %catalog.hotel.name, "Catalog loaded");
                Ok(catalog)
            }
            None => Ok(Catalog::oceanview()),
        }
    }
}
