// ============================================================================
// Store - Relational Access for Customers, Products, Orders, Order Items
// ============================================================================
//
// `Store` is the only seam between the domain and persistence. It returns
// flat rows; shaping them is the aggregator's job.
//
// Backends:
// - PgStore: PostgreSQL through sqlx
// - MemoryStore: in-process tables with the same query semantics
//
// ============================================================================

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::models::{Customer, Order, OrderItemRow, OrderLineRow};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{entity} {id} does not exist")]
    MissingReference { entity: &'static str, id: i32 },

    #[error("Conflict: {0}")]
    Conflict(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Exact, case-sensitive email lookup.
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, StoreError>;

    /// orders ⋈ order_items ⋈ products for one customer, newest order first,
    /// then order id descending, then item id ascending. Orders without items
    /// produce no rows.
    async fn customer_order_lines(&self, customer_id: i32) -> Result<Vec<OrderLineRow>, StoreError>;

    /// The order, only if it belongs to `customer_id`.
    async fn find_customer_order(
        &self,
        order_id: i32,
        customer_id: i32,
    ) -> Result<Option<Order>, StoreError>;

    /// order_items ⋈ products for one order, by item id.
    async fn order_item_lines(&self, order_id: i32) -> Result<Vec<OrderItemRow>, StoreError>;
}
