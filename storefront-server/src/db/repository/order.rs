//! Order Repository
//!
//! Point lookups by order id, creation-time-descending listings, partial
//! field updates via MERGE, and the per-status counts for the dashboard.
//! Status/payment writes stay behind the mutation gateway.

use serde::{Deserialize, Serialize};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderStats, PaymentInfo};
use crate::orders::status::OrderStatus;

const TABLE: &str = "orders";

/// MERGE payload for an admin status override
#[derive(Debug, Serialize)]
struct StatusMerge {
    status: OrderStatus,
    updated_at: String,
}

/// MERGE payload for a reconciliation result (webhook / re-check)
#[derive(Debug, Serialize)]
struct ReconcileMerge {
    status: OrderStatus,
    payment: PaymentInfo,
    updated_at: String,
}

/// Row shape of the GROUP BY status aggregation
#[derive(Debug, Deserialize)]
struct StatusCount {
    status: OrderStatus,
    count: u64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a freshly assembled order
    ///
    /// Order ids are write-once; colliding ids are rejected instead of
    /// overwritten.
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        if self.find_by_id(&order.order_id).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Order {} already exists",
                order.order_id
            )));
        }

        let order_id = order.order_id.clone();
        let created: Option<Order> = self
            .base
            .db()
            .create((TABLE, order_id.as_str()))
            .content(order)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, order_id: &str) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select((TABLE, order_id)).await?;
        Ok(order)
    }

    /// All orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM type::table($table) ORDER BY created_at DESC")
            .bind(("table", TABLE))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders for one customer (identified by phone number), newest first
    pub async fn find_by_phone(&self, phone: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM type::table($table) WHERE customer.phone = $phone \
                 ORDER BY created_at DESC",
            )
            .bind(("table", TABLE))
            .bind(("phone", phone.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Set the canonical status (admin override path)
    pub async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        updated_at: String,
    ) -> RepoResult<Order> {
        let thing = RecordId::from_table_key(TABLE, order_id);
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", StatusMerge { status, updated_at }))
            .await?;

        self.find_by_id(order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order_id)))
    }

    /// Persist a reconciliation result: canonical status plus the gateway
    /// fields it was derived from, in one document write
    pub async fn update_payment_state(
        &self,
        order_id: &str,
        status: OrderStatus,
        payment: PaymentInfo,
        updated_at: String,
    ) -> RepoResult<Order> {
        let thing = RecordId::from_table_key(TABLE, order_id);
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind((
                "thing",
                thing,
            ))
            .bind((
                "data",
                ReconcileMerge {
                    status,
                    payment,
                    updated_at,
                },
            ))
            .await?;

        self.find_by_id(order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order_id)))
    }

    /// Hard delete (admin action); returns whether a document was removed
    pub async fn delete(&self, order_id: &str) -> RepoResult<bool> {
        let deleted: Option<Order> = self.base.db().delete((TABLE, order_id)).await?;
        Ok(deleted.is_some())
    }

    /// Per-status order counts for the dashboard cards
    pub async fn stats(&self) -> RepoResult<OrderStats> {
        let counts: Vec<StatusCount> = self
            .base
            .db()
            .query(
                "SELECT status, count() AS count FROM type::table($table) GROUP BY status",
            )
            .bind(("table", TABLE))
            .await?
            .take(0)?;

        let mut stats = OrderStats::default();
        for row in counts {
            stats.total += row.count;
            match row.status {
                OrderStatus::Pending => stats.pending = row.count,
                OrderStatus::Unpaid => stats.unpaid = row.count,
                OrderStatus::Processing => stats.processing = row.count,
                OrderStatus::Completed => stats.completed = row.count,
                OrderStatus::Cancelled => stats.cancelled = row.count,
            }
        }
        Ok(stats)
    }
}
