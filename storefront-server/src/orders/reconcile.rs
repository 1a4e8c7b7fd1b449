//! Status Reconciliation Engine
//!
//! The single place that derives the canonical order status from stored order
//! state and (optionally) a live gateway transaction status. Pure functions,
//! no I/O - every caller (webhook, admin panel, order-lookup page) goes
//! through [`resolve`] instead of re-deriving status from raw fields.
//!
//! # Rules
//!
//! - Cash-on-destination orders ignore gateway input entirely; their status
//!   is whatever the admin last set.
//! - A paid gateway state (`settlement`, `capture`+`accept`) maps to
//!   `pending` unless the kitchen already advanced the order.
//! - Paid transitions are one-way: a stale `pending` poll never re-derives
//!   `unpaid` once a paid state was recorded.
//! - `expire`/`deny`/`cancel` map to `cancelled`, except a `completed` order
//!   stays `completed` (only an admin may downgrade a terminal status).
//! - Missing or unrecognized live data falls back to the stored status.

use crate::db::models::Order;
use crate::orders::status::{FraudStatus, GatewayStatus, LiveStatus, OrderStatus};

/// Outcome of a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The canonical status to display and persist
    pub status: OrderStatus,
    /// Customer-facing label for `status`
    pub display_label: &'static str,
    pub is_terminal: bool,
    /// Whether a "resume payment" affordance should be shown
    pub requires_payment_action: bool,
}

/// Compute the canonical status for `order`
///
/// `live` carries a freshly fetched gateway transaction status when one is
/// available. Callers that failed to reach the gateway pass `None` and get
/// the stored status back - the "could not verify, showing last known
/// status" path is the caller's to signal, never an error from here.
pub fn resolve(order: &Order, live: Option<&LiveStatus>) -> Resolution {
    // COD orders are driven by admin edits alone
    if !order.is_online() {
        return resolution(order.status, order);
    }

    let Some(live) = live else {
        return resolution(order.status, order);
    };

    let stored = order.status;
    let status = match live.transaction_status {
        GatewayStatus::Settlement => paid_candidate(stored),
        GatewayStatus::Capture => match live.fraud_status {
            Some(FraudStatus::Accept) => paid_candidate(stored),
            // Held by fraud screening: paid but not released
            Some(FraudStatus::Challenge) => paid_candidate(stored),
            // Fraud-denied captures are rare and ambiguous; keep what we have
            _ => stored,
        },
        GatewayStatus::Pending => {
            // One-way rule: a stale pending poll never demotes a paid or
            // already-advanced order
            if stored_paid(order) || stored.rank() > OrderStatus::Pending.rank() {
                stored
            } else {
                OrderStatus::Unpaid
            }
        }
        GatewayStatus::Expire | GatewayStatus::Deny | GatewayStatus::Cancel => {
            if stored == OrderStatus::Completed {
                stored
            } else {
                OrderStatus::Cancelled
            }
        }
        GatewayStatus::Unknown => stored,
    };

    resolution(status, order)
}

/// Paid at the gateway: keep any kitchen/terminal progress, otherwise the
/// order is back in the `pending` queue awaiting processing
fn paid_candidate(stored: OrderStatus) -> OrderStatus {
    match stored {
        OrderStatus::Processing | OrderStatus::Completed | OrderStatus::Cancelled => stored,
        OrderStatus::Pending | OrderStatus::Unpaid => OrderStatus::Pending,
    }
}

/// Whether the stored gateway fields already record a paid state
fn stored_paid(order: &Order) -> bool {
    order.payment.is_paid()
}

fn resolution(status: OrderStatus, order: &Order) -> Resolution {
    Resolution {
        status,
        display_label: status.display_label(),
        is_terminal: status.is_terminal(),
        // An expired or cancelled transaction's link is dead, so only an
        // unpaid order with a stored link gets the resume affordance
        requires_payment_action: status == OrderStatus::Unpaid
            && order.payment.payment_url.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Customer, Fulfillment, OrderItem, OrderType, PaymentMethod};

    fn base_order(method: PaymentMethod) -> Order {
        Order::create(
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
                order_type: OrderType::Delivery,
                scheduled_date: "2026-08-07".to_string(),
                scheduled_time: None,
                delivery_method: "Dikirim kurir flat Rp 12.000".to_string(),
            },
            method,
            12_000,
            "2026-08-07T10:00:00Z".to_string(),
        )
    }

    fn online_order() -> Order {
        let mut order = base_order(PaymentMethod::Online);
        order.payment.payment_url = Some("https://app.midtrans.com/snap/v4/redirection/x".into());
        order
    }

    fn live(status: GatewayStatus, fraud: Option<FraudStatus>) -> LiveStatus {
        LiveStatus::new(status, fraud)
    }

    #[test]
    fn test_cod_ignores_gateway_input() {
        let mut order = base_order(PaymentMethod::Cod);
        order.status = OrderStatus::Processing;

        for gw in [
            GatewayStatus::Settlement,
            GatewayStatus::Pending,
            GatewayStatus::Expire,
        ] {
            let res = resolve(&order, Some(&live(gw, None)));
            assert_eq!(res.status, OrderStatus::Processing);
        }
    }

    #[test]
    fn test_no_live_data_falls_back_to_stored() {
        let mut order = online_order();
        order.status = OrderStatus::Processing;
        let res = resolve(&order, None);
        assert_eq!(res.status, OrderStatus::Processing);
        assert_eq!(res.display_label, "Diproses");
    }

    #[test]
    fn test_settlement_moves_fresh_order_to_pending() {
        let order = online_order();
        let res = resolve(&order, Some(&live(GatewayStatus::Settlement, None)));
        assert_eq!(res.status, OrderStatus::Pending);
        assert_eq!(res.display_label, "Menunggu");
        assert!(!res.requires_payment_action);
    }

    #[test]
    fn test_settlement_keeps_advanced_stored_status() {
        let mut order = online_order();
        order.status = OrderStatus::Processing;
        let res = resolve(&order, Some(&live(GatewayStatus::Settlement, None)));
        assert_eq!(res.status, OrderStatus::Processing);

        order.status = OrderStatus::Completed;
        let res = resolve(&order, Some(&live(GatewayStatus::Settlement, None)));
        assert_eq!(res.status, OrderStatus::Completed);
    }

    #[test]
    fn test_capture_accept_behaves_like_settlement() {
        let order = online_order();
        let res = resolve(
            &order,
            Some(&live(GatewayStatus::Capture, Some(FraudStatus::Accept))),
        );
        assert_eq!(res.status, OrderStatus::Pending);
    }

    #[test]
    fn test_capture_challenge_is_held_as_pending() {
        let order = online_order();
        let res = resolve(
            &order,
            Some(&live(GatewayStatus::Capture, Some(FraudStatus::Challenge))),
        );
        assert_eq!(res.status, OrderStatus::Pending);
        assert!(!res.requires_payment_action);
    }

    #[test]
    fn test_gateway_pending_means_unpaid_with_resume_link() {
        let order = online_order();
        let res = resolve(&order, Some(&live(GatewayStatus::Pending, None)));
        assert_eq!(res.status, OrderStatus::Unpaid);
        assert_eq!(res.display_label, "Belum Bayar");
        assert!(res.requires_payment_action);
    }

    #[test]
    fn test_stale_pending_never_demotes_a_paid_order() {
        // gateway previously reported settlement; a stale poll says pending
        let mut order = online_order();
        order.payment.gateway_status = Some(GatewayStatus::Settlement);

        let res = resolve(&order, Some(&live(GatewayStatus::Pending, None)));
        assert_eq!(res.status, OrderStatus::Pending);

        order.status = OrderStatus::Processing;
        let res = resolve(&order, Some(&live(GatewayStatus::Pending, None)));
        assert_eq!(res.status, OrderStatus::Processing);
    }

    #[test]
    fn test_stale_pending_never_demotes_an_advanced_order() {
        let mut order = online_order();
        order.status = OrderStatus::Completed;
        let res = resolve(&order, Some(&live(GatewayStatus::Pending, None)));
        assert_eq!(res.status, OrderStatus::Completed);
    }

    #[test]
    fn test_expiry_cancels_and_kills_resume_link() {
        let order = online_order();
        let res = resolve(&order, Some(&live(GatewayStatus::Expire, None)));
        assert_eq!(res.status, OrderStatus::Cancelled);
        assert_eq!(res.display_label, "Dibatalkan");
        assert!(res.is_terminal);
        // payment_url is still stored, but the link is dead
        assert!(!res.requires_payment_action);
    }

    #[test]
    fn test_deny_and_cancel_map_to_cancelled() {
        let order = online_order();
        for gw in [GatewayStatus::Deny, GatewayStatus::Cancel] {
            let res = resolve(&order, Some(&live(gw, None)));
            assert_eq!(res.status, OrderStatus::Cancelled);
        }
    }

    #[test]
    fn test_completed_order_survives_stale_expiry() {
        let mut order = online_order();
        order.status = OrderStatus::Completed;
        order.payment.gateway_status = Some(GatewayStatus::Settlement);
        let res = resolve(&order, Some(&live(GatewayStatus::Expire, None)));
        assert_eq!(res.status, OrderStatus::Completed);
    }

    #[test]
    fn test_unknown_gateway_status_keeps_stored() {
        let mut order = online_order();
        order.status = OrderStatus::Processing;
        let res = resolve(&order, Some(&live(GatewayStatus::Unknown, None)));
        assert_eq!(res.status, OrderStatus::Processing);
    }

    #[test]
    fn test_cancelled_stays_cancelled_on_late_settlement() {
        // terminal protection: only an admin override may leave cancelled
        let mut order = online_order();
        order.status = OrderStatus::Cancelled;
        let res = resolve(&order, Some(&live(GatewayStatus::Settlement, None)));
        assert_eq!(res.status, OrderStatus::Cancelled);
    }
}
