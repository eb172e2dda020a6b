use crate::clients::OrderClient;
use crate::conversation::{ConversationEngine, DEFAULT_SESSION_TTL};
use crate::dashboard::DashboardState;
use crate::framework::Store;
use crate::manager::ManagerCommandHandler;
use crate::model::{Catalog, Identity, Order};
use crate::notify::{Notifier, Transport};
use crate::order_actor;
use crate::router::{Concierge, ConciergeHandle};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Identity of the manager when none is configured.
pub const DEFAULT_MANAGER: &str = "9779819809195@c.us";

const ROUTER_BUFFER: usize = 64;

/// Everything the running system needs besides its store and transport.
#[derive(Debug, Clone)]
pub struct ConciergeSettings {
    pub manager: Identity,
    pub catalog: Catalog,
    pub session_ttl: Duration,
}

impl Default for ConciergeSettings {
    fn default() -> Self {
        Self {
            manager: Identity::from(DEFAULT_MANAGER),
            catalog: Catalog::oceanview(),
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

/// Error raised when a system task did not finish cleanly.
#[derive(Debug, thiserror::Error)]
#[error("{task} task failed: {source}")]
pub struct SystemError {
    pub task: &'static str,
    #[source]
    pub source: tokio::task::JoinError,
}

/// The running concierge.
///
/// `ConciergeSystem` is responsible for:
/// - **Lifecycle Management**: starting and stopping the three long-lived tasks
/// - **Dependency Wiring**: handing the ledger client and notifier to the
///   conversation engine, the manager handler and the dashboard
///
/// # Architecture
///
/// - **Ledger actor**: the only writer of the order store
/// - **Concierge (router) actor**: owns every guest session, handles inbound chat one message at a time
/// - **Notification dispatcher**: drains outbound messages into the transport
///
/// # Example
///
/// ```ignore
/// let system = ConciergeSystem::start(store, StdioTransport, ConciergeSettings::default());
/// system.concierge.submit(InboundMessage::direct("15550001@c.us", "menu")).await?;
/// system.shutdown().await?;
/// ```
pub struct ConciergeSystem {
    /// Client for the order ledger.
    pub orders: OrderClient,

    /// Handle for enqueueing outbound messages.
    pub notifier: Notifier,

    /// Handle for feeding inbound chat messages to the router.
    pub concierge: ConciergeHandle,

    /// Task handles in shutdown order.
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl ConciergeSystem {
    /// Spawns every task and returns the handles used to talk to them.
    pub fn start<S, T>(store: S, transport: T, settings: ConciergeSettings) -> Self
    where
        S: Store<Order>,
        T: Transport,
    {
        let (ledger, orders) = order_actor::new(store);
        let (notifier, dispatcher) = Notifier::new(settings.manager, transport);

        let engine = ConversationEngine::new(
            Arc::new(settings.catalog),
            orders.clone(),
            notifier.clone(),
            settings.session_ttl,
        );
        let manager = ManagerCommandHandler::new(orders.clone(), notifier.clone());
        let (router, concierge) = Concierge::new(ROUTER_BUFFER, engine, manager, notifier.clone());

        let router_handle = tokio::spawn(router.run());
        let ledger_handle = tokio::spawn(ledger.run());
        let dispatcher_handle = tokio::spawn(dispatcher.run());
        info!(manager = %notifier.manager(), "Concierge system started");

        Self {
            orders,
            notifier,
            concierge,
            handles: vec![
                ("router", router_handle),
                ("ledger", ledger_handle),
                ("dispatcher", dispatcher_handle),
            ],
        }
    }

    /// Shared state for the dashboard routes.
    pub fn dashboard_state(&self) -> DashboardState {
        DashboardState {
            orders: self.orders.clone(),
            notifier: self.notifier.clone(),
        }
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the handles closes the router's queue; once the router exits it
    /// releases its own ledger client and notifier, which lets the ledger and
    /// then the dispatcher drain and exit. Every queued message is handled and
    /// every queued notification is attempted before this returns.
    ///
    /// Any [`DashboardState`] handed out must be dropped first, or the ledger
    /// and dispatcher will keep waiting for it.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        drop(self.concierge);
        drop(self.orders);
        drop(self.notifier);

        for (task, handle) in self.handles {
            if let Err(source) = handle.await {
                error!(task, error = %source, "Task failed");
                return Err(SystemError { task, source });
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
