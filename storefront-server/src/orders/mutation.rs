//! Mutation Gateway
//!
//! The sole write path for an order's canonical status and payment fields.
//! Three triggers feed it: the gateway webhook, an explicit admin override,
//! and a client-initiated status re-check. All of them run the
//! reconciliation engine and persist through [`OrderRepository`]; nothing
//! else in the codebase writes `status` or `payment.*`.
//!
//! Dependencies are injected at construction so the whole path runs against
//! an in-memory store and a scripted gateway in tests.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::Order;
use crate::db::repository::{OrderRepository, RepoError};
use crate::orders::reconcile::{self, Resolution};
use crate::orders::status::{FraudStatus, GatewayStatus, LiveStatus, OrderStatus};
use crate::payment::{GatewayError, PaymentGateway, signature};
use crate::utils::time::now_rfc3339;

/// Mutation failure taxonomy
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Notification rejected: {0}")]
    Authenticity(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Store(#[from] RepoError),
}

pub type MutationResult<T> = Result<T, MutationError>;

/// Inbound gateway notification (webhook body)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayNotification {
    pub order_id: String,
    pub status_code: String,
    pub transaction_status: GatewayStatus,
    pub fraud_status: Option<FraudStatus>,
    pub payment_type: Option<String>,
    pub transaction_time: Option<String>,
    pub gross_amount: String,
    pub signature_key: String,
}

/// Result of applying a webhook notification
#[derive(Debug, Clone, Serialize)]
pub struct WebhookOutcome {
    pub order_id: String,
    pub status: OrderStatus,
    /// false means the notification was an idempotent no-op
    pub changed: bool,
}

/// Result of a client-initiated status re-check
#[derive(Debug, Clone)]
pub struct RecheckOutcome {
    pub order_id: String,
    pub resolution: Resolution,
    /// false means the gateway could not be reached and the stored status is
    /// being shown as a fallback
    pub verified: bool,
    pub changed: bool,
}

/// The single write path for order status
#[derive(Clone)]
pub struct MutationGateway {
    orders: OrderRepository,
    gateway: Arc<dyn PaymentGateway>,
    server_key: String,
}

impl MutationGateway {
    pub fn new(
        orders: OrderRepository,
        gateway: Arc<dyn PaymentGateway>,
        server_key: impl Into<String>,
    ) -> Self {
        Self {
            orders,
            gateway,
            server_key: server_key.into(),
        }
    }

    /// Path 1: apply a gateway webhook notification
    ///
    /// The signature is checked before anything is read or written; a
    /// mismatch leaves the order document (including `updated_at`) untouched.
    pub async fn apply_notification(
        &self,
        notification: GatewayNotification,
    ) -> MutationResult<WebhookOutcome> {
        if notification.order_id.is_empty() {
            return Err(MutationError::Validation("Order id is required".to_string()));
        }

        if !signature::verify(
            &notification.order_id,
            &notification.status_code,
            &notification.gross_amount,
            &self.server_key,
            &notification.signature_key,
        ) {
            tracing::warn!(order_id = %notification.order_id, "Webhook signature mismatch");
            return Err(MutationError::Authenticity(format!(
                "Invalid signature for order {}",
                notification.order_id
            )));
        }

        let order = self.load(&notification.order_id).await?;

        let live = LiveStatus::new(notification.transaction_status, notification.fraud_status);
        let resolution = reconcile::resolve(&order, Some(&live));

        let mut payment = order.payment.clone();
        payment.gateway_status = Some(notification.transaction_status);
        payment.fraud_status = notification.fraud_status;
        if let Some(payment_type) = notification.payment_type {
            payment.gateway_transaction_type = Some(payment_type);
        }

        let changed = resolution.status != order.status
            || payment.gateway_status != order.payment.gateway_status
            || payment.fraud_status != order.payment.fraud_status
            || payment.gateway_transaction_type != order.payment.gateway_transaction_type;

        if changed {
            self.orders
                .update_payment_state(&order.order_id, resolution.status, payment, now_rfc3339())
                .await?;
            tracing::info!(
                order_id = %order.order_id,
                from = %order.status,
                to = %resolution.status,
                "Order updated from gateway notification"
            );
        } else {
            tracing::debug!(order_id = %order.order_id, "Gateway notification was a no-op");
        }

        Ok(WebhookOutcome {
            order_id: order.order_id,
            status: resolution.status,
            changed,
        })
    }

    /// Path 2: explicit admin status override
    ///
    /// Bypasses monotonicity - an admin may downgrade, including out of a
    /// terminal status. Idempotent: overriding to the current status writes
    /// nothing.
    pub async fn admin_override(
        &self,
        order_id: &str,
        target: OrderStatus,
    ) -> MutationResult<Order> {
        if order_id.is_empty() {
            return Err(MutationError::Validation("Order id is required".to_string()));
        }

        let order = self.load(order_id).await?;
        if order.status == target {
            return Ok(order);
        }

        let updated = self
            .orders
            .update_status(order_id, target, now_rfc3339())
            .await?;
        tracing::info!(
            order_id = %order_id,
            from = %order.status,
            to = %target,
            "Order status overridden by admin"
        );
        Ok(updated)
    }

    /// Path 3: client-initiated re-check against the gateway
    ///
    /// A gateway failure is not an error here: the stored status comes back
    /// with `verified: false` so the caller can show "last known status".
    /// Persisted changes are forward-only - a poll never regresses stored
    /// state, it can only advance the lifecycle or record a first-seen paid
    /// gateway state in place.
    pub async fn recheck(&self, order_id: &str) -> MutationResult<RecheckOutcome> {
        if order_id.is_empty() {
            return Err(MutationError::Validation("Order id is required".to_string()));
        }

        let order = self.load(order_id).await?;

        // COD orders have no gateway transaction to consult
        if !order.is_online() {
            return Ok(RecheckOutcome {
                resolution: reconcile::resolve(&order, None),
                order_id: order.order_id,
                verified: true,
                changed: false,
            });
        }

        let status_response = match self.gateway.transaction_status(order_id).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    order_id = %order_id,
                    error = %e,
                    "Could not verify payment, returning last known status"
                );
                return Ok(RecheckOutcome {
                    resolution: reconcile::resolve(&order, None),
                    order_id: order.order_id,
                    verified: false,
                    changed: false,
                });
            }
        };

        let live = status_response.live();
        let resolution = reconcile::resolve(&order, Some(&live));

        let forward =
            resolution.status != order.status && resolution.status.rank() > order.status.rank();
        // A paid state seen for the first time is recorded even when the
        // canonical status stays put, so the one-way rule holds across later
        // stale polls. Stale data never overwrites recorded paid fields.
        let record_paid =
            resolution.status == order.status && live.is_paid() && !order.payment.is_paid();
        let persist = forward || record_paid;
        if persist {
            let mut payment = order.payment.clone();
            payment.gateway_status = Some(live.transaction_status);
            payment.fraud_status = live.fraud_status;
            if let Some(payment_type) = status_response.payment_type {
                payment.gateway_transaction_type = Some(payment_type);
            }

            self.orders
                .update_payment_state(&order.order_id, resolution.status, payment, now_rfc3339())
                .await?;
            tracing::info!(
                order_id = %order.order_id,
                from = %order.status,
                to = %resolution.status,
                "Order updated from status re-check"
            );
        }

        Ok(RecheckOutcome {
            order_id: order.order_id,
            resolution,
            verified: true,
            changed: persist,
        })
    }

    async fn load(&self, order_id: &str) -> MutationResult<Order> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| MutationError::NotFound(format!("Order {} not found", order_id)))
    }
}
