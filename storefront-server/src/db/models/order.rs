//! Order Model
//!
//! The order document stored in the `orders` table, keyed by the time-based
//! order id. Amounts are integer rupiah. Totals are recomputed server-side at
//! creation; client-supplied totals are never trusted.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::orders::status::{FraudStatus, GatewayStatus, LiveStatus, OrderStatus};

// =============================================================================
// Order (main document)
// =============================================================================

/// Payment method chosen at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on destination - settled by hand, never touches the gateway
    Cod,
    /// Online payment through the hosted gateway page
    Online,
}

/// Fulfillment type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Pickup,
    Delivery,
}

/// Customer contact details, immutable after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub note: Option<String>,
}

/// A single order line, immutable after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub name: String,
    pub unit_price: i64,
    pub quantity: u32,
    pub image_ref: Option<String>,
}

impl OrderItem {
    pub fn line_total(&self) -> i64 {
        self.unit_price * self.quantity as i64
    }
}

/// When and how the order is handed over
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fulfillment {
    pub order_type: OrderType,
    /// Requested date (YYYY-MM-DD)
    pub scheduled_date: String,
    pub scheduled_time: Option<String>,
    /// Chosen delivery method, e.g. "Dikirim kurir flat Rp 12.000"
    pub delivery_method: String,
}

/// Payment state of the order
///
/// `gateway_*` fields are only ever set for online orders; the canonical
/// `Order::status` is derived from them by the reconciliation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub method: PaymentMethod,
    pub items_subtotal: i64,
    pub delivery_fee: i64,
    pub total_amount: i64,
    pub gateway_status: Option<GatewayStatus>,
    pub gateway_transaction_type: Option<String>,
    pub fraud_status: Option<FraudStatus>,
    pub payment_url: Option<String>,
}

impl PaymentInfo {
    /// Whether the recorded gateway fields reflect a paid state
    pub fn is_paid(&self) -> bool {
        self.gateway_status
            .map(|gw| LiveStatus::new(gw, self.fraud_status).is_paid())
            .unwrap_or(false)
    }
}

/// Order document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub fulfillment: Fulfillment,
    pub payment: PaymentInfo,
    /// Canonical status - mutated only through the mutation gateway
    pub status: OrderStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Order {
    /// Assemble a new order, recomputing all amounts from the item lines
    ///
    /// The invariant `total_amount == items_subtotal + delivery_fee` holds by
    /// construction; any totals in the client request are ignored.
    pub fn create(
        order_id: String,
        customer: Customer,
        items: Vec<OrderItem>,
        fulfillment: Fulfillment,
        method: PaymentMethod,
        delivery_fee: i64,
        created_at: String,
    ) -> Self {
        let items_subtotal = items_subtotal(&items);
        Self {
            order_id,
            customer,
            items,
            fulfillment,
            payment: PaymentInfo {
                method,
                items_subtotal,
                delivery_fee,
                total_amount: items_subtotal + delivery_fee,
                gateway_status: None,
                gateway_transaction_type: None,
                fraud_status: None,
                payment_url: None,
            },
            status: OrderStatus::Pending,
            updated_at: created_at.clone(),
            created_at,
        }
    }

    pub fn is_online(&self) -> bool {
        self.payment.method == PaymentMethod::Online
    }
}

/// Sum of `unit_price * quantity` over all item lines
pub fn items_subtotal(items: &[OrderItem]) -> i64 {
    items.iter().map(OrderItem::line_total).sum()
}

// =============================================================================
// API Request Types
// =============================================================================

/// Item line as submitted by the checkout page
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemCreate {
    #[validate(length(min = 1, message = "Item id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    #[validate(range(min = 0, message = "Unit price must not be negative"))]
    pub unit_price: i64,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
    pub image_ref: Option<String>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 6, message = "Phone number is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    pub note: Option<String>,
    pub order_type: OrderType,
    #[validate(length(min = 1, message = "Scheduled date is required"))]
    pub scheduled_date: String,
    pub scheduled_time: Option<String>,
    #[validate(length(min = 1, message = "Delivery method is required"))]
    pub delivery_method: String,
    pub payment_method: PaymentMethod,
    #[validate(length(min = 1, message = "At least one item is required"), nested)]
    pub items: Vec<OrderItemCreate>,
}

/// Admin status override payload
///
/// `status` stays a plain string so an unrecognized value maps to a
/// validation error instead of a generic body-rejection.
#[derive(Debug, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: String,
}

// =============================================================================
// API Response Types
// =============================================================================

/// Per-status order counts for the admin dashboard cards
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderStats {
    pub total: u64,
    pub pending: u64,
    pub unpaid: u64,
    pub processing: u64,
    pub completed: u64,
    pub cancelled: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, unit_price: i64, quantity: u32) -> OrderItem {
        OrderItem {
            id: id.to_string(),
            name: format!("Item {}", id),
            unit_price,
            quantity,
            image_ref: None,
        }
    }

    fn customer() -> Customer {
        Customer {
            name: "Budi".to_string(),
            phone: "081234567890".to_string(),
            address: "Jl. Merdeka 1".to_string(),
            note: None,
        }
    }

    fn fulfillment() -> Fulfillment {
        Fulfillment {
            order_type: OrderType::Delivery,
            scheduled_date: "2026-08-07".to_string(),
            scheduled_time: Some("11:00".to_string()),
            delivery_method: "Dikirim kurir flat Rp 12.000".to_string(),
        }
    }

    #[test]
    fn test_totals_recomputed_from_item_lines() {
        // Two items (40_000 x1, 12_000 x2) plus flat delivery fee
        let order = Order::create(
            "BA-1700000000000".to_string(),
            customer(),
            vec![item("bipang-1kg", 40_000, 1), item("sambal", 12_000, 2)],
            fulfillment(),
            PaymentMethod::Online,
            12_000,
            "2026-08-07T10:00:00Z".to_string(),
        );

        assert_eq!(order.payment.items_subtotal, 64_000);
        assert_eq!(order.payment.delivery_fee, 12_000);
        assert_eq!(order.payment.total_amount, 76_000);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(
            order.payment.total_amount,
            order.payment.items_subtotal + order.payment.delivery_fee
        );
    }

    #[test]
    fn test_new_order_carries_no_gateway_state() {
        let order = Order::create(
            "BA-1700000000001".to_string(),
            customer(),
            vec![item("bipang-500g", 25_000, 1)],
            fulfillment(),
            PaymentMethod::Cod,
            0,
            "2026-08-07T10:00:00Z".to_string(),
        );

        assert!(order.payment.gateway_status.is_none());
        assert!(order.payment.fraud_status.is_none());
        assert!(order.payment.payment_url.is_none());
        assert_eq!(order.created_at, order.updated_at);
    }

    #[test]
    fn test_create_request_validation() {
        let req = OrderCreate {
            name: String::new(),
            phone: "081".to_string(),
            address: "Jl. Merdeka 1".to_string(),
            note: None,
            order_type: OrderType::Pickup,
            scheduled_date: "2026-08-07".to_string(),
            scheduled_time: None,
            delivery_method: "Di Ambil di Toko".to_string(),
            payment_method: PaymentMethod::Cod,
            items: vec![],
        };

        let err = req.validate().unwrap_err();
        let fields = err.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("phone"));
        assert!(fields.contains_key("items"));
    }
}
