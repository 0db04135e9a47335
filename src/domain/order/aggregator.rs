use std::collections::HashMap;

use crate::models::{Order, OrderItemDetail, OrderItemRow, OrderLineRow, OrderWithDetails};
use crate::store::{Store, StoreError};

// ============================================================================
// Order Aggregator
// ============================================================================
//
// Reshapes flat join rows (orders ⋈ order_items ⋈ products) into nested
// order views. The store decides row order; grouping preserves it.
//
// ============================================================================

/// Group flat order lines into one `OrderWithDetails` per order.
///
/// Orders appear in the order their first line was seen, and items keep
/// their row order. Order-level fields are taken from the first line.
pub fn group_order_lines(rows: Vec<OrderLineRow>) -> Vec<OrderWithDetails> {
    let mut orders: Vec<OrderWithDetails> = Vec::new();
    let mut positions: HashMap<i32, usize> = HashMap::new();

    for row in rows {
        let position = *positions.entry(row.order_id).or_insert_with(|| {
            orders.push(OrderWithDetails {
                id: row.order_id,
                total_price: row.total_price,
                status: row.status,
                order_date: row.order_date,
                order_items: Vec::new(),
            });
            orders.len() - 1
        });

        orders[position].order_items.push(OrderItemDetail {
            id: row.item_id,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
        });
    }

    orders
}

/// Attach item lines to an already-loaded order.
pub fn assemble_order(order: Order, items: Vec<OrderItemRow>) -> OrderWithDetails {
    OrderWithDetails {
        id: order.id,
        total_price: order.total_price,
        status: order.status,
        order_date: order.order_date,
        order_items: items
            .into_iter()
            .map(|item| OrderItemDetail {
                id: item.item_id,
                product_name: item.product_name,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect(),
    }
}

/// All orders of a customer with their items, newest first.
pub async fn get_customer_orders(
    store: &dyn Store,
    customer_id: i32,
) -> Result<Vec<OrderWithDetails>, StoreError> {
    let rows = store.customer_order_lines(customer_id).await.map_err(|e| {
        tracing::error!(customer_id, error = %e, "Failed to fetch customer orders");
        e
    })?;

    let row_count = rows.len();
    let orders = group_order_lines(rows);

    tracing::debug!(
        customer_id,
        rows = row_count,
        orders = orders.len(),
        "Aggregated customer orders"
    );

    Ok(orders)
}

/// A single order, only if it belongs to `customer_id`.
pub async fn get_order_by_id(
    store: &dyn Store,
    order_id: i32,
    customer_id: i32,
) -> Result<Option<OrderWithDetails>, StoreError> {
    let log_failure = |e: StoreError| {
        tracing::error!(order_id, customer_id, error = %e, "Get order by ID failed");
        e
    };

    let Some(order) = store
        .find_customer_order(order_id, customer_id)
        .await
        .map_err(log_failure)?
    else {
        tracing::debug!(order_id, customer_id, "Order not found for customer");
        return Ok(None);
    };

    let items = store.order_item_lines(order_id).await.map_err(log_failure)?;

    Ok(Some(assemble_order(order, items)))
}

// ============================================================================
// Unit Tests
// ============================================================================
