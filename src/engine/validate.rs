//! Item and operation validation.
//!
//! Rules run in a fixed order and every violation is collected, so callers
//! can report the full list in one response instead of failing one rule at
//! a time.

use crate::domain::cart::Cart;
use crate::domain::ops::{CartOperation, ItemPayload};

fn missing(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Validate a candidate item. An empty result means valid.
pub fn validate_item(item: &ItemPayload) -> Vec<String> {
    let mut violations = Vec::new();
    if missing(&item.product_id) {
        violations.push("productId is required".to_string());
    }
    if missing(&item.title) {
        violations.push("title is required".to_string());
    }
    match item.price {
        None => violations.push("price is required".to_string()),
        Some(price) if price <= 0 => violations.push("price must be greater than zero".to_string()),
        _ => {}
    }
    if missing(&item.unit) {
        violations.push("unit is required".to_string());
    }
    match item.quantity {
        None => violations.push("quantity is required".to_string()),
        Some(quantity) if quantity < 1 => {
            violations.push("quantity must be at least 1".to_string());
        }
        _ => {}
    }
    // The minimum refines an already-valid quantity.
    if let (Some(minimum), Some(quantity)) = (item.minimum_order_quantity, item.quantity) {
        if quantity >= 1 && quantity < minimum {
            violations.push(format!(
                "quantity {quantity} is below the minimum order quantity {minimum}"
            ));
        }
    }
    violations
}

/// Validate one operation against a frozen cart state. Existence checks use
/// the cart exactly as passed in, never a running simulation.
pub fn validate_operation(op: &CartOperation, cart: &Cart) -> Vec<String> {
    match op {
        CartOperation::Add { item, quantity } => {
            validate_item(&item.clone().with_quantity(*quantity))
        }
        CartOperation::Update { product_id, quantity } => {
            let mut violations = Vec::new();
            let existing = cart.item(product_id);
            if existing.is_none() {
                violations.push(format!("item {product_id} not found in cart"));
            }
            if *quantity < 1 {
                violations.push("quantity must be at least 1".to_string());
            } else if let Some(existing) = existing {
                if *quantity < existing.minimum_order_quantity {
                    violations.push(format!(
                        "quantity {} is below the minimum order quantity {} for {}",
                        quantity, existing.minimum_order_quantity, product_id
                    ));
                }
            }
            violations
        }
        CartOperation::Remove { product_id } => {
            if cart.contains(product_id) {
                vec![]
            } else {
                vec![format!("item {product_id} not found in cart")]
            }
        }
    }
}
