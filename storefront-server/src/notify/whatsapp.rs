//! WhatsApp order notifications
//!
//! Fire-and-forget confirmation messages through a Dripsender-style "send
//! text to phone" webhook. Delivery failures are logged and never fail the
//! request that triggered them.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::core::config::WhatsAppConfig;
use crate::db::models::Order;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Notification endpoint returned HTTP {0}")]
    Status(u16),
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    api_key: &'a str,
    text: &'a str,
    phone: &'a str,
}

/// Outbound WhatsApp sender
pub struct WhatsAppNotifier {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    public_base_url: String,
}

impl WhatsAppNotifier {
    pub fn new(
        config: &WhatsAppConfig,
        public_base_url: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            public_base_url: public_base_url.into(),
        })
    }

    /// Whether a sender key is configured; without one sends become no-ops
    pub fn is_enabled(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Confirmation message for a freshly created order
    pub fn order_confirmation_message(&self, order: &Order) -> String {
        format!(
            "Terima kasih telah berbelanja di Babi Panggang Apung \n\
             Pesanan Anda sedang diproses. Order ID: {} \n\
             {}/cekorder/{}",
            order.order_id, self.public_base_url, order.order_id
        )
    }

    /// Send the order confirmation to the customer's WhatsApp number
    pub async fn send_order_confirmation(&self, order: &Order) -> Result<(), NotifyError> {
        if !self.is_enabled() {
            tracing::debug!(order_id = %order.order_id, "WhatsApp sender not configured, skipping");
            return Ok(());
        }

        let text = self.order_confirmation_message(order);
        let phone = normalize_phone(&order.customer.phone);
        self.send(&text, &phone).await
    }

    async fn send(&self, text: &str, phone: &str) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(&self.api_url)
            .json(&SendRequest {
                api_key: &self.api_key,
                text,
                phone,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        tracing::info!(phone = %phone, "WhatsApp notification sent");
        Ok(())
    }
}

/// Convert a local `08...` number to the international `628...` form
pub fn normalize_phone(phone: &str) -> String {
    match phone.strip_prefix('0') {
        Some(rest) => format!("62{}", rest),
        None => phone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Customer, Fulfillment, OrderItem, OrderType, PaymentMethod};

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("081234567890"), "6281234567890");
        assert_eq!(normalize_phone("6281234567890"), "6281234567890");
        assert_eq!(normalize_phone("+6281234567890"), "+6281234567890");
    }

    #[test]
    fn test_confirmation_message_contains_lookup_link() {
        let config = WhatsAppConfig {
            api_url: "https://api.dripsender.id/send".to_string(),
            api_key: String::new(),
            request_timeout_ms: 10_000,
        };
        let notifier = WhatsAppNotifier::new(&config, "https://bipangapung.example").unwrap();

        let order = Order::create(
            "BA-1700000000000".to_string(),
            Customer {
                name: "Budi".to_string(),
                phone: "081234567890".to_string(),
                address: "Jl. Merdeka 1".to_string(),
                note: None,
            },
            vec![OrderItem {
                id: "bipang-1kg".to_string(),
                name: "Babi Panggang 1kg".to_string(),
                unit_price: 40_000,
                quantity: 1,
                image_ref: None,
            }],
            Fulfillment {
                order_type: OrderType::Pickup,
                scheduled_date: "2026-08-07".to_string(),
                scheduled_time: None,
                delivery_method: "Di Ambil di Toko".to_string(),
            },
            PaymentMethod::Cod,
            0,
            "2026-08-07T10:00:00Z".to_string(),
        );

        let message = notifier.order_confirmation_message(&order);
        assert!(message.contains("BA-1700000000000"));
        assert!(message.contains("https://bipangapung.example/cekorder/BA-1700000000000"));
        assert!(!notifier.is_enabled());
    }
}
