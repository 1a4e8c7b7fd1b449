//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{
    Customer, Fulfillment, Order, OrderCreate, OrderItem, OrderStats, OrderStatusUpdate,
    OrderType, PaymentMethod,
};
use crate::orders::status::OrderStatus;
use crate::payment::SnapTransactionRequest;
use crate::utils::time::{now_millis, now_rfc3339};
use crate::utils::{AppError, AppResult};

/// Response for a created order
#[derive(Debug, Serialize)]
pub struct OrderCreated {
    pub order_id: String,
    pub status: OrderStatus,
    pub total_amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
}

/// Create an order from the checkout payload
///
/// Totals are recomputed from the item lines; for online payment the gateway
/// transaction is created before anything is persisted - an order is never
/// stored as payable without a live transaction behind it.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderCreated>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let delivery_fee = match payload.order_type {
        OrderType::Pickup => 0,
        OrderType::Delivery => state.config.delivery_fee_for(&payload.delivery_method),
    };

    let items: Vec<OrderItem> = payload
        .items
        .iter()
        .map(|item| OrderItem {
            id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            image_ref: item.image_ref.clone(),
        })
        .collect();

    let mut order = Order::create(
        format!("BA-{}", now_millis()),
        Customer {
            name: payload.name.clone(),
            phone: payload.phone.clone(),
            address: payload.address.clone(),
            note: payload.note.clone(),
        },
        items,
        Fulfillment {
            order_type: payload.order_type,
            scheduled_date: payload.scheduled_date.clone(),
            scheduled_time: payload.scheduled_time.clone(),
            delivery_method: payload.delivery_method.clone(),
        },
        payload.payment_method,
        delivery_fee,
        now_rfc3339(),
    );

    // Online payment: a gateway failure here is fatal to the request
    if order.is_online() {
        let transaction = state
            .gateway
            .create_transaction(SnapTransactionRequest::for_order(&order))
            .await?;
        order.payment.payment_url = Some(transaction.redirect_url);
    }

    let order = state.order_repository().create(order).await?;

    tracing::info!(
        order_id = %order.order_id,
        method = ?order.payment.method,
        total = order.payment.total_amount,
        "Order created"
    );

    // Fire-and-forget confirmation message
    let notifier = state.notifier.clone();
    let created = order.clone();
    tokio::spawn(async move {
        if let Err(e) = notifier.send_order_confirmation(&created).await {
            tracing::warn!(
                order_id = %created.order_id,
                error = %e,
                "Failed to send order confirmation"
            );
        }
    });

    Ok(Json(OrderCreated {
        order_id: order.order_id.clone(),
        status: order.status,
        total_amount: order.payment.total_amount,
        payment_url: order.payment.payment_url.clone(),
    }))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state
        .order_repository()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;
    Ok(Json(order))
}

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Restrict to one customer's orders (phone is the customer identity)
    pub phone: Option<String>,
}

/// List orders, newest first (admin)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = state.order_repository();
    let orders = match query.phone.as_deref() {
        Some(phone) => repo.find_by_phone(phone).await?,
        None => repo.find_all().await?,
    };
    Ok(Json(orders))
}

/// Update order status (admin override)
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let target: OrderStatus = payload
        .status
        .parse()
        .map_err(AppError::Validation)?;

    let order = state.mutation_gateway().admin_override(&id, target).await?;
    Ok(Json(order))
}

#[derive(Debug, Serialize)]
pub struct OrderDeleted {
    pub order_id: String,
    pub deleted: bool,
}

/// Hard delete an order (admin)
pub async fn delete_order(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDeleted>> {
    let deleted = state.order_repository().delete(&id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Order {} not found", id)));
    }

    tracing::info!(order_id = %id, "Order deleted by admin");
    Ok(Json(OrderDeleted {
        order_id: id,
        deleted: true,
    }))
}

/// Response for a status re-check
#[derive(Debug, Serialize)]
pub struct RecheckReply {
    pub order_id: String,
    pub status: OrderStatus,
    pub display_label: &'static str,
    pub is_terminal: bool,
    pub requires_payment_action: bool,
    /// false when the gateway could not be reached and the last known
    /// status is shown instead
    pub verified: bool,
    pub changed: bool,
}

/// Re-check the payment status against the gateway
pub async fn recheck(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<RecheckReply>> {
    let outcome = state.mutation_gateway().recheck(&id).await?;
    Ok(Json(RecheckReply {
        order_id: outcome.order_id,
        status: outcome.resolution.status,
        display_label: outcome.resolution.display_label,
        is_terminal: outcome.resolution.is_terminal,
        requires_payment_action: outcome.resolution.requires_payment_action,
        verified: outcome.verified,
        changed: outcome.changed,
    }))
}

/// Per-status counts for the dashboard cards (admin)
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<OrderStats>> {
    let stats = state.order_repository().stats().await?;
    Ok(Json(stats))
}

/// CSV export of all orders (admin)
pub async fn export_csv(State(state): State<ServerState>) -> AppResult<impl IntoResponse> {
    let orders = state.order_repository().find_all().await?;

    let mut csv = String::from(
        "order_id,created_at,status,customer_name,phone,payment_method,items_subtotal,delivery_fee,total_amount\n",
    );
    for order in &orders {
        let method = match order.payment.method {
            PaymentMethod::Cod => "cod",
            PaymentMethod::Online => "online",
        };
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            csv_field(&order.order_id),
            csv_field(&order.created_at),
            order.status,
            csv_field(&order.customer.name),
            csv_field(&order.customer.phone),
            method,
            order.payment.items_subtotal,
            order.payment.delivery_fee,
            order.payment.total_amount,
        ));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"orders.csv\"",
            ),
        ],
        csv,
    ))
}

/// Quote a CSV field, doubling embedded quotes
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
