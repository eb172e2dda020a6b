//! # Dashboard Facade
//!
//! JSON routes for the staff dashboard. They go through the same
//! [`OrderClient`] as the chat side, so the monotonic status policy and the
//! single-writer guarantee hold for both.
//!
//! | Method | Path                                             | Body                  |
//! |--------|--------------------------------------------------|-----------------------|
//! | GET    | `/orders`, `/api/orders`                         |                       |
//! | POST   | `/orders/{id}/status`, `/api/orders/{id}/status` | `{"status": "Done"}`  |

use crate::clients::OrderClient;
use crate::model::{Order, OrderId, OrderStatus};
use crate::notify::Notifier;
use crate::order_actor::OrderError;
use crate::replies;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

#[derive(Clone)]
pub struct DashboardState {
    pub orders: OrderClient,
    pub notifier: Notifier,
}

/// Status values accepted from the dashboard. `Done` is the dashboard's name
/// for `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RequestedStatus {
    Done,
    Completed,
    Confirmed,
    Rejected,
}

impl From<RequestedStatus> for OrderStatus {
    fn from(status: RequestedStatus) -> Self {
        match status {
            RequestedStatus::Done | RequestedStatus::Completed => OrderStatus::Completed,
            RequestedStatus::Confirmed => OrderStatus::Confirmed,
            RequestedStatus::Rejected => OrderStatus::Rejected,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: RequestedStatus,
}

/// A failed request, rendered as `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "Order not found".into(),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        let status = match &e {
            OrderError::NotFound(_) => return Self::not_found(),
            OrderError::InvalidTransition { .. } => StatusCode::CONFLICT,
            OrderError::ValidationError(_) => StatusCode::BAD_REQUEST,
            OrderError::Persistence(_) | OrderError::ActorCommunicationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub fn router(state: DashboardState) -> Router {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/api/orders", get(list_orders))
        .route("/orders/{id}/status", post(update_status))
        .route("/api/orders/{id}/status", post(update_status))
        .with_state(state)
}

async fn list_orders(State(state): State<DashboardState>) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = state.orders.list_orders().await.map_err(|e| {
        warn!(error = %e, "Dashboard list failed");
        ApiError::from(e)
    })?;
    Ok(Json(orders))
}

async fn update_status(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Value>, ApiError> {
    let id: OrderId = id.parse().map_err(|_| ApiError::not_found())?;
    let status = OrderStatus::from(body.status);

    let order = state.orders.update_status(id, status).await.map_err(|e| {
        warn!(%id, %status, error = %e, "Dashboard update refused");
        ApiError::from(e)
    })?;

    info!(%id, %status, "Order updated from dashboard");
    if let Some(text) = replies::guest_status(order.id, order.status) {
        state.notifier.notify(&order.guest_identity, text);
    }
    Ok(Json(json!({ "success": true })))
}
