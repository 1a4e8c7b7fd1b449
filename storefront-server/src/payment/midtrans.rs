//! Midtrans payment gateway client
//!
//! Two calls are consumed from the gateway: Snap create-transaction (returns
//! the hosted payment page URL) and the core-API transaction status lookup.
//! The [`PaymentGateway`] trait is the seam the mutation gateway and the
//! tests mock; [`MidtransClient`] is the real HTTP implementation.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::core::config::MidtransConfig;
use crate::db::models::Order;
use crate::orders::status::{FraudStatus, GatewayStatus, LiveStatus};

const PRODUCTION_SNAP_BASE: &str = "https://app.midtrans.com";
const SANDBOX_SNAP_BASE: &str = "https://app.sandbox.midtrans.com";
const PRODUCTION_API_BASE: &str = "https://api.midtrans.com";
const SANDBOX_API_BASE: &str = "https://api.sandbox.midtrans.com";

/// Gateway call failure
///
/// Callers decide the policy: fatal at order creation, degrade-to-stored on
/// a status re-check.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Gateway returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Gateway response could not be decoded: {0}")]
    Decode(String),
}

/// The payment gateway seam
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted-payment transaction for a new online order
    async fn create_transaction(
        &self,
        request: SnapTransactionRequest,
    ) -> Result<SnapTransaction, GatewayError>;

    /// Fetch the live transaction status for an order id
    async fn transaction_status(
        &self,
        order_id: &str,
    ) -> Result<TransactionStatusResponse, GatewayError>;
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TransactionDetails {
    pub order_id: String,
    pub gross_amount: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GatewayAddress {
    pub first_name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerDetails {
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub billing_address: GatewayAddress,
    pub shipping_address: GatewayAddress,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemDetail {
    pub id: String,
    pub price: i64,
    pub quantity: u32,
    pub name: String,
}

/// Snap create-transaction request body
#[derive(Debug, Clone, Serialize)]
pub struct SnapTransactionRequest {
    pub transaction_details: TransactionDetails,
    pub customer_details: CustomerDetails,
    pub item_details: Vec<ItemDetail>,
}

impl SnapTransactionRequest {
    /// Build the Snap payload for an order
    ///
    /// The delivery fee goes in as its own item line so the line sum equals
    /// the gross amount, which Midtrans enforces.
    pub fn for_order(order: &Order) -> Self {
        let address = GatewayAddress {
            first_name: order.customer.name.clone(),
            phone: order.customer.phone.clone(),
            address: order.customer.address.clone(),
        };

        let mut item_details: Vec<ItemDetail> = order
            .items
            .iter()
            .map(|item| ItemDetail {
                id: item.id.clone(),
                price: item.unit_price,
                quantity: item.quantity,
                name: item.name.clone(),
            })
            .collect();

        if order.payment.delivery_fee > 0 {
            item_details.push(ItemDetail {
                id: "DELIVERY".to_string(),
                price: order.payment.delivery_fee,
                quantity: 1,
                name: "Biaya Pengiriman".to_string(),
            });
        }

        Self {
            transaction_details: TransactionDetails {
                order_id: order.order_id.clone(),
                gross_amount: order.payment.total_amount,
            },
            customer_details: CustomerDetails {
                first_name: order.customer.name.clone(),
                // the storefront has no customer accounts; Midtrans requires
                // an email, so a throwaway one is derived from the order id
                email: format!("{}@temp.com", order.order_id),
                phone: order.customer.phone.clone(),
                billing_address: address.clone(),
                shipping_address: address,
            },
            item_details,
        }
    }
}

/// Snap create-transaction response
#[derive(Debug, Clone, Deserialize)]
pub struct SnapTransaction {
    pub token: String,
    pub redirect_url: String,
}

/// Core-API transaction status response (fields the engine consumes)
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionStatusResponse {
    pub status_code: String,
    pub transaction_status: GatewayStatus,
    pub fraud_status: Option<FraudStatus>,
    pub payment_type: Option<String>,
    pub transaction_time: Option<String>,
    pub gross_amount: Option<String>,
}

impl TransactionStatusResponse {
    pub fn live(&self) -> LiveStatus {
        LiveStatus::new(self.transaction_status, self.fraud_status)
    }
}

// =============================================================================
// HTTP client
// =============================================================================

/// Real Midtrans client over HTTPS
pub struct MidtransClient {
    http: reqwest::Client,
    auth_header: String,
    snap_base_url: String,
    api_base_url: String,
}

impl MidtransClient {
    pub fn new(config: &MidtransConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        let (snap_default, api_default) = if config.is_production {
            (PRODUCTION_SNAP_BASE, PRODUCTION_API_BASE)
        } else {
            (SANDBOX_SNAP_BASE, SANDBOX_API_BASE)
        };

        Ok(Self {
            http,
            // Midtrans uses basic auth with the server key as username and
            // an empty password
            auth_header: format!("Basic {}", BASE64.encode(format!("{}:", config.server_key))),
            snap_base_url: config
                .snap_base_url
                .clone()
                .unwrap_or_else(|| snap_default.to_string()),
            api_base_url: config
                .api_base_url
                .clone()
                .unwrap_or_else(|| api_default.to_string()),
        })
    }
}

#[async_trait]
impl PaymentGateway for MidtransClient {
    async fn create_transaction(
        &self,
        request: SnapTransactionRequest,
    ) -> Result<SnapTransaction, GatewayError> {
        let url = format!("{}/snap/v1/transactions", self.snap_base_url);
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                code: status.as_u16(),
                body,
            });
        }

        response
            .json::<SnapTransaction>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    async fn transaction_status(
        &self,
        order_id: &str,
    ) -> Result<TransactionStatusResponse, GatewayError> {
        let url = format!("{}/v2/{}/status", self.api_base_url, order_id);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                code: status.as_u16(),
                body,
            });
        }

        response
            .json::<TransactionStatusResponse>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Customer, Fulfillment, OrderItem, OrderType, PaymentMethod};

    fn order_with_fee(delivery_fee: i64) -> Order {
        Order::create(
            "BA-1700000000000".to_string(),
            Customer {
                name: "Budi".to_string(),
                phone: "081234567890".to_string(),
                address: "Jl. Merdeka 1".to_string(),
                note: None,
            },
            vec![
                OrderItem {
                    id: "bipang-1kg".to_string(),
                    name: "Babi Panggang 1kg".to_string(),
                    unit_price: 40_000,
                    quantity: 1,
                    image_ref: None,
                },
                OrderItem {
                    id: "sambal".to_string(),
                    name: "Sambal Andaliman".to_string(),
                    unit_price: 12_000,
                    quantity: 2,
                    image_ref: None,
                },
            ],
            Fulfillment {
                order_type: OrderType::Delivery,
                scheduled_date: "2026-08-07".to_string(),
                scheduled_time: None,
                delivery_method: "Dikirim kurir flat Rp 12.000".to_string(),
            },
            PaymentMethod::Online,
            delivery_fee,
            "2026-08-07T10:00:00Z".to_string(),
        )
    }

    #[test]
    fn test_snap_request_includes_delivery_line() {
        let request = SnapTransactionRequest::for_order(&order_with_fee(12_000));

        assert_eq!(request.transaction_details.gross_amount, 76_000);
        assert_eq!(request.item_details.len(), 3);
        let delivery = request.item_details.last().unwrap();
        assert_eq!(delivery.id, "DELIVERY");
        assert_eq!(delivery.price, 12_000);

        // gross amount must equal the sum of the item lines
        let line_sum: i64 = request
            .item_details
            .iter()
            .map(|line| line.price * line.quantity as i64)
            .sum();
        assert_eq!(line_sum, request.transaction_details.gross_amount);
    }

    #[test]
    fn test_snap_request_skips_zero_delivery_fee() {
        let request = SnapTransactionRequest::for_order(&order_with_fee(0));
        assert_eq!(request.item_details.len(), 2);
        assert_eq!(request.transaction_details.gross_amount, 64_000);
    }
}
