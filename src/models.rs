use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::order::OrderStatus;

// ============================================================================
// Stored Records
// One struct per table row
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, FromRow)]
pub struct Customer {
    pub id: i32,
    pub email: String,
    pub name: String,
    /// Stored credential. Compared verbatim at login, never sent to clients.
    // Withheld from the authenticateCustomer response on purpose: the login
    // payload carries identity fields only, unlike the raw table row.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, FromRow)]
pub struct Order {
    pub id: i32,
    pub customer_id: i32,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub order_date: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, FromRow)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
}

// ============================================================================
// Insert Payloads
// ============================================================================

#[derive(Clone, Debug)]
pub struct NewCustomer {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

#[derive(Clone, Debug)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

#[derive(Clone, Debug)]
pub struct NewOrder {
    pub customer_id: i32,
    pub total_price: Decimal,
    /// Defaults to `pending`
    pub status: Option<OrderStatus>,
    /// Defaults to the insertion time
    pub order_date: Option<NaiveDateTime>,
}

#[derive(Clone, Debug)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
}

// ============================================================================
// Join Rows
// Flat results of orders ⋈ order_items ⋈ products
// ============================================================================

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct OrderLineRow {
    pub order_id: i32,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub order_date: NaiveDateTime,
    pub item_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub product_name: String,
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct OrderItemRow {
    pub item_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub product_name: String,
}

// ============================================================================
// Client-facing Views
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderWithDetails {
    pub id: i32,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub order_date: NaiveDateTime,
    pub order_items: Vec<OrderItemDetail>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderItemDetail {
    pub id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

// ============================================================================
// Procedure Inputs
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CustomerLoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct GetCustomerOrdersInput {
    pub customer_id: i32,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GetOrderByIdInput {
    pub order_id: i32,
    pub customer_id: i32,
}
