use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::models::{Customer, Order, OrderItemRow, OrderLineRow};
use crate::utils::{retry_on_transient, RetryConfig, RetryResult};

use super::{Store, StoreError};

// ============================================================================
// PostgreSQL Store
// ============================================================================
//
// Runtime-checked queries mapped into `FromRow` structs. Money columns are
// NUMERIC(10,2) and decode straight into `Decimal`.
//
// ============================================================================

const FIND_CUSTOMER_BY_EMAIL: &str = "\
    SELECT id, email, name, password_hash, created_at
    FROM customers
    WHERE email = $1
    LIMIT 1";

const CUSTOMER_ORDER_LINES: &str = "\
    SELECT o.id AS order_id, o.total_price, o.status, o.order_date,
           oi.id AS item_id, oi.quantity, oi.unit_price,
           p.name AS product_name
    FROM orders o
    INNER JOIN order_items oi ON oi.order_id = o.id
    INNER JOIN products p ON p.id = oi.product_id
    WHERE o.customer_id = $1
    ORDER BY o.order_date DESC, o.id DESC, oi.id ASC";

const FIND_CUSTOMER_ORDER: &str = "\
    SELECT id, customer_id, total_price, status, order_date, created_at
    FROM orders
    WHERE id = $1 AND customer_id = $2";

const ORDER_ITEM_LINES: &str = "\
    SELECT oi.id AS item_id, oi.quantity, oi.unit_price, p.name AS product_name
    FROM order_items oi
    INNER JOIN products p ON p.id = oi.product_id
    WHERE oi.order_id = $1
    ORDER BY oi.id ASC";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build the connection pool, retrying transient connection failures.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout);

        let retry = RetryConfig {
            max_attempts: config.connect_attempts,
            ..RetryConfig::default()
        };

        let result = retry_on_transient(retry, |attempt| {
            let options = options.clone();
            let url = config.url.clone();
            async move {
                tracing::info!(attempt = attempt, "Connecting to PostgreSQL...");
                options.connect(&url).await
            }
        })
        .await;

        match result {
            RetryResult::Success(pool) => {
                tracing::info!(
                    max_connections = config.max_connections,
                    "✅ PostgreSQL pool ready"
                );
                Ok(Self::new(pool))
            }
            RetryResult::Failed(e) | RetryResult::PermanentFailure(e) => Err(e.into()),
        }
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("📐 Schema migrations applied");
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, StoreError> {
        let customer = sqlx::query_as::<_, Customer>(FIND_CUSTOMER_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(customer)
    }

    async fn customer_order_lines(&self, customer_id: i32) -> Result<Vec<OrderLineRow>, StoreError> {
        let rows = sqlx::query_as::<_, OrderLineRow>(CUSTOMER_ORDER_LINES)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(customer_id, rows = rows.len(), "Loaded customer order lines");
        Ok(rows)
    }

    async fn find_customer_order(
        &self,
        order_id: i32,
        customer_id: i32,
    ) -> Result<Option<Order>, StoreError> {
        let order = sqlx::query_as::<_, Order>(FIND_CUSTOMER_ORDER)
            .bind(order_id)
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn order_item_lines(&self, order_id: i32) -> Result<Vec<OrderItemRow>, StoreError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(ORDER_ITEM_LINES)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

// ============================================================================
// Integration Tests
// ============================================================================
//
// These need a reachable PostgreSQL (DATABASE_URL) and run with
// `cargo test -- --ignored`. Each test gets a fresh database with the
// embedded migrations applied.
//
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderStatus;
    use rust_decimal::Decimal;

    async fn seed_customer(pool: &PgPool, email: &str, password: &str) -> sqlx::Result<i32> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO customers (email, name, password_hash) VALUES ($1, 'Test Customer', $2) RETURNING id",
        )
        .bind(email)
        .bind(password)
        .fetch_one(pool)
        .await
    }

    async fn seed_product(pool: &PgPool, name: &str, price: Decimal) -> sqlx::Result<i32> {
        sqlx::query_scalar::<_, i32>("INSERT INTO products (name, price) VALUES ($1, $2) RETURNING id")
            .bind(name)
            .bind(price)
            .fetch_one(pool)
            .await
    }

    async fn seed_order(
        pool: &PgPool,
        customer_id: i32,
        total: Decimal,
        status: OrderStatus,
        order_date: &str,
    ) -> sqlx::Result<i32> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO orders (customer_id, total_price, status, order_date)
             VALUES ($1, $2, $3, $4::timestamp) RETURNING id",
        )
        .bind(customer_id)
        .bind(total)
        .bind(status)
        .bind(order_date)
        .fetch_one(pool)
        .await
    }

    async fn seed_item(
        pool: &PgPool,
        order_id: i32,
        product_id: i32,
        quantity: i32,
        unit_price: Decimal,
    ) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price) VALUES ($1, $2, $3, $4)",
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .execute(pool)
        .await?;
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_find_customer_by_email_is_exact(pool: PgPool) -> sqlx::Result<()> {
        seed_customer(&pool, "test@example.com", "hashed_password_123").await?;
        let store = PgStore::new(pool);

        let found = store.find_customer_by_email("test@example.com").await.unwrap();
        assert_eq!(found.unwrap().password_hash, "hashed_password_123");

        let upper = store.find_customer_by_email("TEST@EXAMPLE.COM").await.unwrap();
        assert!(upper.is_none());
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_customer_order_lines_ordering(pool: PgPool) -> sqlx::Result<()> {
        let customer_id = seed_customer(&pool, "test@example.com", "hash123").await?;
        let product_id = seed_product(&pool, "Test Product", Decimal::new(1000, 2)).await?;
        let older = seed_order(&pool, customer_id, Decimal::new(1000, 2), OrderStatus::Delivered, "2024-01-01").await?;
        let newer = seed_order(&pool, customer_id, Decimal::new(2000, 2), OrderStatus::Shipped, "2024-02-01").await?;
        seed_item(&pool, older, product_id, 1, Decimal::new(1000, 2)).await?;
        seed_item(&pool, newer, product_id, 2, Decimal::new(1000, 2)).await?;
        let store = PgStore::new(pool);

        let rows = store.customer_order_lines(customer_id).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].order_id, newer);
        assert_eq!(rows[0].status, OrderStatus::Shipped);
        assert_eq!(rows[0].unit_price, Decimal::new(1000, 2));
        assert_eq!(rows[1].order_id, older);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_find_customer_order_checks_owner(pool: PgPool) -> sqlx::Result<()> {
        let owner = seed_customer(&pool, "owner@example.com", "a").await?;
        let other = seed_customer(&pool, "other@example.com", "b").await?;
        let order_id = seed_order(&pool, owner, Decimal::new(999, 2), OrderStatus::Pending, "2024-03-01").await?;
        let store = PgStore::new(pool);

        assert!(store.find_customer_order(order_id, owner).await.unwrap().is_some());
        assert!(store.find_customer_order(order_id, other).await.unwrap().is_none());
        assert!(store.order_item_lines(order_id).await.unwrap().is_empty());
        Ok(())
    }
}
