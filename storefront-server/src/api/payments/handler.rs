//! Payment API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::orders::reconcile;
use crate::orders::status::OrderStatus;
use crate::orders::GatewayNotification;
use crate::utils::{AppError, AppResult};

/// Webhook acknowledgement body
#[derive(Debug, Serialize)]
pub struct WebhookReply {
    pub status: &'static str,
    pub order_id: String,
    pub order_status: OrderStatus,
}

/// Gateway webhook endpoint
///
/// Applies mutation path 1. A bad signature or unknown order is reported
/// with the matching status code and no state change; the gateway retries
/// on anything but 2xx.
pub async fn notification(
    State(state): State<ServerState>,
    Json(payload): Json<GatewayNotification>,
) -> AppResult<Json<WebhookReply>> {
    let outcome = state.mutation_gateway().apply_notification(payload).await?;

    Ok(Json(WebhookReply {
        status: "ok",
        order_id: outcome.order_id,
        order_status: outcome.status,
    }))
}

#[derive(Debug, Deserialize)]
pub struct FinishQuery {
    pub order_id: Option<String>,
}

/// Data for the post-payment landing page
#[derive(Debug, Serialize)]
pub struct FinishReply {
    pub order_id: String,
    pub status: OrderStatus,
    pub display_label: &'static str,
}

/// Where the gateway redirects the customer after the hosted payment page
///
/// Returns the stored status for the landing page; the authoritative update
/// arrives through the webhook.
pub async fn finish(
    State(state): State<ServerState>,
    Query(query): Query<FinishQuery>,
) -> AppResult<Json<FinishReply>> {
    let order_id = query
        .order_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("Order ID is required".to_string()))?;

    let order = state
        .order_repository()
        .find_by_id(&order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;

    let resolution = reconcile::resolve(&order, None);
    Ok(Json(FinishReply {
        order_id,
        status: resolution.status,
        display_label: resolution.display_label,
    }))
}
