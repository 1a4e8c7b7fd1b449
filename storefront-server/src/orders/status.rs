//! Order status vocabulary
//!
//! Canonical order statuses, the Midtrans transaction/fraud status enums they
//! are derived from, and the customer-facing labels. Every surface reads the
//! canonical status through [`crate::orders::reconcile`]; nothing re-derives
//! status from raw gateway fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical order status
///
/// Lifecycle: `pending → processing → completed`, with `cancelled` reachable
/// from `pending` and `processing`. `unpaid` is the sub-state of `pending`
/// for online orders whose gateway transaction has not reached a paid state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Unpaid,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses never change again without an explicit admin override
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Position in the lifecycle, used for the monotonicity check
    ///
    /// Automatic updates may only move to a strictly higher rank. Both
    /// terminal statuses share the highest rank so neither can replace the
    /// other without an admin override.
    pub fn rank(&self) -> u8 {
        match self {
            OrderStatus::Unpaid => 0,
            OrderStatus::Pending => 1,
            OrderStatus::Processing => 2,
            OrderStatus::Completed | OrderStatus::Cancelled => 3,
        }
    }

    /// Customer-facing label (presentation adapter)
    pub fn display_label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Menunggu",
            OrderStatus::Unpaid => "Belum Bayar",
            OrderStatus::Processing => "Diproses",
            OrderStatus::Completed => "Selesai",
            OrderStatus::Cancelled => "Dibatalkan",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Unpaid => "unpaid",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "unpaid" => Ok(OrderStatus::Unpaid),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("Unrecognized order status: {}", other)),
        }
    }
}

/// Midtrans `transaction_status` values the engine understands
///
/// Anything else (refund, authorize, ...) deserializes to `Unknown` and falls
/// back to the stored status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GatewayStatus {
    Capture,
    Settlement,
    Pending,
    Deny,
    Cancel,
    Expire,
    #[serde(other)]
    Unknown,
}

/// Midtrans `fraud_status` values
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FraudStatus {
    Accept,
    Challenge,
    Deny,
    #[serde(other)]
    Unknown,
}

/// Live transaction state reported by the gateway
///
/// Built from either a webhook notification or a status poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveStatus {
    pub transaction_status: GatewayStatus,
    pub fraud_status: Option<FraudStatus>,
}

impl LiveStatus {
    pub fn new(transaction_status: GatewayStatus, fraud_status: Option<FraudStatus>) -> Self {
        Self {
            transaction_status,
            fraud_status,
        }
    }

    /// A paid state: `settlement`, or `capture` accepted by fraud screening
    pub fn is_paid(&self) -> bool {
        match self.transaction_status {
            GatewayStatus::Settlement => true,
            GatewayStatus::Capture => self.fraud_status == Some(FraudStatus::Accept),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(OrderStatus::Pending.display_label(), "Menunggu");
        assert_eq!(OrderStatus::Unpaid.display_label(), "Belum Bayar");
        assert_eq!(OrderStatus::Processing.display_label(), "Diproses");
        assert_eq!(OrderStatus::Completed.display_label(), "Selesai");
        assert_eq!(OrderStatus::Cancelled.display_label(), "Dibatalkan");
    }

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Unpaid,
            OrderStatus::Processing,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Unpaid.is_terminal());
        assert!(!OrderStatus::Processing.is_terminal());
    }

    #[test]
    fn test_lifecycle_ranks_move_forward() {
        assert!(OrderStatus::Unpaid.rank() < OrderStatus::Pending.rank());
        assert!(OrderStatus::Pending.rank() < OrderStatus::Processing.rank());
        assert!(OrderStatus::Processing.rank() < OrderStatus::Completed.rank());
        assert_eq!(OrderStatus::Completed.rank(), OrderStatus::Cancelled.rank());
    }

    #[test]
    fn test_paid_states() {
        assert!(LiveStatus::new(GatewayStatus::Settlement, None).is_paid());
        assert!(LiveStatus::new(GatewayStatus::Capture, Some(FraudStatus::Accept)).is_paid());
        assert!(!LiveStatus::new(GatewayStatus::Capture, Some(FraudStatus::Challenge)).is_paid());
        assert!(!LiveStatus::new(GatewayStatus::Capture, None).is_paid());
        assert!(!LiveStatus::new(GatewayStatus::Pending, None).is_paid());
        assert!(!LiveStatus::new(GatewayStatus::Expire, None).is_paid());
    }

    #[test]
    fn test_unknown_gateway_status_deserializes() {
        let status: GatewayStatus = serde_json::from_str("\"refund\"").unwrap();
        assert_eq!(status, GatewayStatus::Unknown);
        let status: GatewayStatus = serde_json::from_str("\"settlement\"").unwrap();
        assert_eq!(status, GatewayStatus::Settlement);
    }
}
