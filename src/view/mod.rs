use rust_decimal::Decimal;

use crate::models::{Customer, OrderWithDetails};

// ============================================================================
// Terminal View
// ============================================================================
//
// The customer's order screen: a welcome header, one card per order with a
// status badge and line items, and an empty state when there is nothing to
// show.
//
// ============================================================================

const RULE: &str = "────────────────────────────────────────────────────────";

pub fn render_login_failure() -> String {
    "Invalid email or password. Please try again.".to_string()
}

pub fn render_header(customer: &Customer, order_count: usize) -> String {
    let noun = if order_count == 1 { "order" } else { "orders" };
    format!(
        "🛒 Order Management\nWelcome, {} <{}> · {} {}",
        customer.name, customer.email, order_count, noun
    )
}

fn money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

pub fn render_order_card(order: &OrderWithDetails) -> String {
    let mut lines = vec![
        RULE.to_string(),
        format!(
            "📦 Order #{}    {} {}    {}",
            order.id,
            order.status.icon(),
            order.status.label(),
            money(order.total_price)
        ),
        format!("Placed on {}", order.order_date.format("%A, %B %-d, %Y")),
        String::new(),
        "🛍️ Items Ordered:".to_string(),
    ];

    lines.extend(order.order_items.iter().map(|item| {
        let subtotal = item.unit_price * Decimal::from(item.quantity);
        format!(
            "  {} — Quantity: {} × {} each    {}",
            item.product_name,
            item.quantity,
            money(item.unit_price),
            money(subtotal)
        )
    }));

    if order.order_items.len() > 1 {
        lines.push(format!("  Order Total: {}", money(order.total_price)));
    }
    lines.push(RULE.to_string());

    lines.join("\n")
}

pub fn render_orders(orders: &[OrderWithDetails]) -> String {
    if orders.is_empty() {
        return "📭 No orders yet\nWhen you place an order it will show up here.".to_string();
    }

    orders
        .iter()
        .map(render_order_card)
        .collect::<Vec<_>>()
        .join("\n\n")
}
