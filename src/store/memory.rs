use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::cmp::Reverse;
use tokio::sync::RwLock;

use crate::domain::order::OrderStatus;
use crate::models::{
    Customer, NewCustomer, NewOrder, NewOrderItem, NewProduct, Order, OrderItem, OrderItemRow,
    OrderLineRow, Product,
};

use super::{Store, StoreError};

// ============================================================================
// In-Memory Store
// ============================================================================
//
// Mirrors the PostgreSQL schema: serial ids starting at 1, now() defaults,
// unique customer emails and referential checks on insert. Reads follow
// the same join and ordering rules as the SQL queries.
//
// ============================================================================

#[derive(Default)]
struct Tables {
    customers: Vec<Customer>,
    products: Vec<Product>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
}

impl Tables {
    fn product(&self, id: i32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

fn next_id(len: usize) -> i32 {
    len as i32 + 1
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_customer(&self, new: NewCustomer) -> Result<Customer, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.customers.iter().any(|c| c.email == new.email) {
            return Err(StoreError::Conflict(format!(
                "customer email {} already registered",
                new.email
            )));
        }

        let customer = Customer {
            id: next_id(tables.customers.len()),
            email: new.email,
            name: new.name,
            password_hash: new.password_hash,
            created_at: now(),
        };
        tables.customers.push(customer.clone());
        Ok(customer)
    }

    pub async fn insert_product(&self, new: NewProduct) -> Result<Product, StoreError> {
        let mut tables = self.tables.write().await;

        let product = Product {
            id: next_id(tables.products.len()),
            name: new.name,
            description: new.description,
            price: new.price,
            created_at: now(),
        };
        tables.products.push(product.clone());
        Ok(product)
    }

    pub async fn insert_order(&self, new: NewOrder) -> Result<Order, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.customers.iter().any(|c| c.id == new.customer_id) {
            return Err(StoreError::MissingReference {
                entity: "customer",
                id: new.customer_id,
            });
        }

        let created_at = now();
        let order = Order {
            id: next_id(tables.orders.len()),
            customer_id: new.customer_id,
            total_price: new.total_price,
            status: new.status.unwrap_or_default(),
            order_date: new.order_date.unwrap_or(created_at),
            created_at,
        };
        tables.orders.push(order.clone());
        Ok(order)
    }

    pub async fn insert_order_item(&self, new: NewOrderItem) -> Result<OrderItem, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.orders.iter().any(|o| o.id == new.order_id) {
            return Err(StoreError::MissingReference {
                entity: "order",
                id: new.order_id,
            });
        }
        if tables.product(new.product_id).is_none() {
            return Err(StoreError::MissingReference {
                entity: "product",
                id: new.product_id,
            });
        }

        let item = OrderItem {
            id: next_id(tables.order_items.len()),
            order_id: new.order_id,
            product_id: new.product_id,
            quantity: new.quantity,
            unit_price: new.unit_price,
        };
        tables.order_items.push(item.clone());
        Ok(item)
    }

    /// Store seeded with a demo account (`demo@example.com` / `demo123`).
    pub async fn with_demo_data() -> Result<Self, StoreError> {
        let store = Self::new();

        let demo = store
            .insert_customer(NewCustomer {
                email: "demo@example.com".to_string(),
                name: "Demo Customer".to_string(),
                password_hash: "demo123".to_string(),
            })
            .await?;

        let mut products = Vec::new();
        for (name, description, cents) in [
            ("Wireless Mouse", Some("Ergonomic 2.4GHz mouse"), 2499),
            ("Mechanical Keyboard", Some("Tenkeyless, brown switches"), 8999),
            ("USB-C Cable", None, 1299),
        ] {
            let product = store
                .insert_product(NewProduct {
                    name: name.to_string(),
                    description: description.map(str::to_string),
                    price: Decimal::new(cents, 2),
                })
                .await?;
            products.push(product);
        }

        let demo_orders = [
            (OrderStatus::Delivered, (2024, 1, 15), vec![(0, 1, 2499), (2, 2, 1299)]),
            (OrderStatus::Shipped, (2024, 3, 2), vec![(1, 1, 8499)]),
            (OrderStatus::Pending, (2024, 4, 20), vec![(2, 3, 1299)]),
        ];

        for (status, (year, month, day), lines) in demo_orders {
            let total: Decimal = lines
                .iter()
                .map(|&(_, quantity, cents)| Decimal::new(cents, 2) * Decimal::from(quantity))
                .sum();
            let order_date = NaiveDate::from_ymd_opt(year, month, day)
                .and_then(|d| d.and_hms_opt(9, 0, 0));

            let order = store
                .insert_order(NewOrder {
                    customer_id: demo.id,
                    total_price: total,
                    status: Some(status),
                    order_date,
                })
                .await?;

            for (product_index, quantity, cents) in lines {
                store
                    .insert_order_item(NewOrderItem {
                        order_id: order.id,
                        product_id: products[product_index].id,
                        quantity,
                        unit_price: Decimal::new(cents, 2),
                    })
                    .await?;
            }
        }

        tracing::info!(email = %demo.email, "🧪 Seeded in-memory store with demo data");
        Ok(store)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.customers.iter().find(|c| c.email == email).cloned())
    }

    async fn customer_order_lines(&self, customer_id: i32) -> Result<Vec<OrderLineRow>, StoreError> {
        let tables = self.tables.read().await;

        let mut orders: Vec<&Order> = tables
            .orders
            .iter()
            .filter(|o| o.customer_id == customer_id)
            .collect();
        orders.sort_by_key(|o| (Reverse(o.order_date), Reverse(o.id)));

        let mut rows = Vec::new();
        for order in orders {
            let mut items: Vec<&OrderItem> = tables
                .order_items
                .iter()
                .filter(|i| i.order_id == order.id)
                .collect();
            items.sort_by_key(|i| i.id);

            for item in items {
                let Some(product) = tables.product(item.product_id) else {
                    continue;
                };
                rows.push(OrderLineRow {
                    order_id: order.id,
                    total_price: order.total_price,
                    status: order.status,
                    order_date: order.order_date,
                    item_id: item.id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    product_name: product.name.clone(),
                });
            }
        }

        Ok(rows)
    }

    async fn find_customer_order(
        &self,
        order_id: i32,
        customer_id: i32,
    ) -> Result<Option<Order>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .iter()
            .find(|o| o.id == order_id && o.customer_id == customer_id)
            .cloned())
    }

    async fn order_item_lines(&self, order_id: i32) -> Result<Vec<OrderItemRow>, StoreError> {
        let tables = self.tables.read().await;

        let mut rows: Vec<OrderItemRow> = tables
            .order_items
            .iter()
            .filter(|i| i.order_id == order_id)
            .filter_map(|item| {
                tables.product(item.product_id).map(|product| OrderItemRow {
                    item_id: item.id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    product_name: product.name.clone(),
                })
            })
            .collect();
        rows.sort_by_key(|r| r.item_id);

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_customer(email: &str) -> NewCustomer {
        NewCustomer {
            email: email.to_string(),
            name: "Test Customer".to_string(),
            password_hash: "hash123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let store = MemoryStore::new();
        let first = store.insert_customer(new_customer("a@example.com")).await.unwrap();
        let second = store.insert_customer(new_customer("b@example.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.insert_customer(new_customer("a@example.com")).await.unwrap();

        let result = store.insert_customer(new_customer("a@example.com")).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_order_defaults() {
        let store = MemoryStore::new();
        let customer = store.insert_customer(new_customer("a@example.com")).await.unwrap();

        let order = store
            .insert_order(NewOrder {
                customer_id: customer.id,
                total_price: Decimal::new(1000, 2),
                status: None,
                order_date: None,
            })
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.order_date, order.created_at);
    }

    #[tokio::test]
    async fn test_order_requires_customer() {
        let store = MemoryStore::new();

        let result = store
            .insert_order(NewOrder {
                customer_id: 42,
                total_price: Decimal::ZERO,
                status: None,
                order_date: None,
            })
            .await;

        assert!(matches!(
            result,
            Err(StoreError::MissingReference { entity: "customer", id: 42 })
        ));
    }

    #[tokio::test]
    async fn test_order_item_requires_order_and_product() {
        let store = MemoryStore::new();
        let customer = store.insert_customer(new_customer("a@example.com")).await.unwrap();
        let order = store
            .insert_order(NewOrder {
                customer_id: customer.id,
                total_price: Decimal::ZERO,
                status: None,
                order_date: None,
            })
            .await
            .unwrap();

        let missing_order = store
            .insert_order_item(NewOrderItem {
                order_id: 99,
                product_id: 1,
                quantity: 1,
                unit_price: Decimal::ONE,
            })
            .await;
        assert!(matches!(
            missing_order,
            Err(StoreError::MissingReference { entity: "order", .. })
        ));

        let missing_product = store
            .insert_order_item(NewOrderItem {
                order_id: order.id,
                product_id: 7,
                quantity: 1,
                unit_price: Decimal::ONE,
            })
            .await;
        assert!(matches!(
            missing_product,
            Err(StoreError::MissingReference { entity: "product", id: 7 })
        ));
    }

    #[tokio::test]
    async fn test_same_date_orders_fall_back_to_id_descending() {
        let store = MemoryStore::new();
        let customer = store.insert_customer(new_customer("a@example.com")).await.unwrap();
        let product = store
            .insert_product(NewProduct {
                name: "Widget".to_string(),
                description: None,
                price: Decimal::ONE,
            })
            .await
            .unwrap();
        let same_day = NaiveDate::from_ymd_opt(2024, 5, 5).and_then(|d| d.and_hms_opt(12, 0, 0));

        let mut order_ids = Vec::new();
        for _ in 0..2 {
            let order = store
                .insert_order(NewOrder {
                    customer_id: customer.id,
                    total_price: Decimal::ONE,
                    status: None,
                    order_date: same_day,
                })
                .await
                .unwrap();
            store
                .insert_order_item(NewOrderItem {
                    order_id: order.id,
                    product_id: product.id,
                    quantity: 1,
                    unit_price: Decimal::ONE,
                })
                .await
                .unwrap();
            order_ids.push(order.id);
        }

        let rows = store.customer_order_lines(customer.id).await.unwrap();
        let seen: Vec<i32> = rows.iter().map(|r| r.order_id).collect();
        assert_eq!(seen, vec![order_ids[1], order_ids[0]]);
    }

    #[tokio::test]
    async fn test_demo_data_is_consistent() {
        let store = MemoryStore::with_demo_data().await.unwrap();

        let demo = store
            .find_customer_by_email("demo@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(demo.password_hash, "demo123");

        let rows = store.customer_order_lines(demo.id).await.unwrap();
        assert_eq!(rows.len(), 4);
        // Newest demo order comes first
        assert_eq!(rows[0].status, OrderStatus::Pending);
        assert_eq!(rows[0].product_name, "USB-C Cable");
    }
}
