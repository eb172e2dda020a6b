//! # Hotel Concierge
//!
//! Runs the concierge against the terminal: inbound chat arrives on stdin as
//! `<identity>: <text>` lines, outbound messages are printed to stdout, logs go
//! to stderr and the dashboard listens on `--dashboard-addr`.
//!
//! ```text
//! $ hotel-concierge --ledger-path /var/lib/hotel/orders.json
//! 15550001@c.us: order
//! [to 15550001@c.us]
//! 🛎️ Please enter your room number (e.g. 101):
//! ```

use anyhow::Context;
use clap::Parser;
use hotel_concierge::config::Config;
use hotel_concierge::dashboard;
use hotel_concierge::framework::JsonFileStore;
use hotel_concierge::lifecycle::{setup_tracing, ConciergeSettings, ConciergeSystem};
use hotel_concierge::notify::StdioTransport;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let config = Config::parse();

    let catalog = config
        .load_catalog()
        .await
        .context("failed to load catalog profile")?;
    let store = JsonFileStore::open(&config.ledger_path)
        .await
        .with_context(|| format!("failed to open ledger {}", config.ledger_path.display()))?;
    info!(ledger = %store.path().display(), hotel = %catalog.hotel.name, "Starting concierge");

    let system = ConciergeSystem::start(
        store,
        StdioTransport,
        ConciergeSettings {
            manager: config.manager_identity(),
            catalog,
            session_ttl: config.session_ttl(),
        },
    );

    let listener = TcpListener::bind(config.dashboard_addr)
        .await
        .with_context(|| format!("failed to bind dashboard on {}", config.dashboard_addr))?;
    info!(addr = %config.dashboard_addr, "Dashboard listening");
    let (stop_server, server_stopped) = oneshot::channel::<()>();
    let app = dashboard::router(system.dashboard_state());
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = server_stopped.await;
            })
            .await
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    info!("Stdin closed");
                    break;
                };
                match StdioTransport::parse_line(&line) {
                    Some(message) => system.concierge.submit(message).await?,
                    None if line.trim().is_empty() => {}
                    None => warn!("Expected `<identity>: <text>`"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    let _ = stop_server.send(());
    server
        .await
        .context("dashboard task failed")?
        .context("dashboard server failed")?;
    system.shutdown().await?;

    info!("Concierge stopped");
    Ok(())
}
