//! Batch processor.
//!
//! Every operation is validated against the pre-batch cart before anything
//! mutates; a single violation rejects the whole batch. Application then
//! runs against a working copy and the new state is handed back for one
//! persist, so a failure at any point leaves the pre-batch cart untouched.
//!
//! Existence checks deliberately use the frozen pre-batch state: a batch
//! cannot add a product and then update it in the same call. Two adds for
//! the same new product both validate, and the second merges during
//! application.

use crate::domain::cart::{Cart, MergeOutcome};
use crate::domain::ops::CartOperation;
use crate::error::{BatchViolation, CartError};

use super::validate::validate_operation;

/// Validate all operations in input order against the frozen cart,
/// collecting every violation with its 1-based operation index.
pub fn validate_batch(cart: &Cart, operations: &[CartOperation]) -> Vec<BatchViolation> {
    let mut violations = Vec::new();
    for (index, op) in operations.iter().enumerate() {
        for message in validate_operation(op, cart) {
            violations.push(BatchViolation { operation: index + 1, message });
        }
    }
    violations
}

/// Run a batch. Returns the post-batch cart and one result line per
/// operation; the input cart is never mutated.
pub fn apply_batch(
    cart: &Cart,
    operations: Vec<CartOperation>,
) -> Result<(Cart, Vec<String>), CartError> {
    let violations = validate_batch(cart, &operations);
    if !violations.is_empty() {
        return Err(CartError::BatchRejected { violations });
    }

    let mut working = cart.clone();
    let mut results = Vec::with_capacity(operations.len());
    for (index, op) in operations.into_iter().enumerate() {
        let line = apply_operation(&mut working, op).map_err(|source| CartError::BatchFailed {
            operation: index + 1,
            reason: source.to_string(),
        })?;
        results.push(line);
    }
    working.recalculate();
    Ok((working, results))
}

fn apply_operation(cart: &mut Cart, op: CartOperation) -> Result<String, CartError> {
    match op {
        CartOperation::Add { item, quantity } => {
            let item = item.with_quantity(quantity);
            let label = item.label();
            match cart.merge_item(item.into_cart_item())? {
                MergeOutcome::Merged { previous, added, total } => {
                    Ok(format!("Merged {label}: {previous} + {added} = {total}"))
                }
                MergeOutcome::Added { quantity } => Ok(format!("Added {label}: {quantity}")),
            }
        }
        CartOperation::Update { product_id, quantity } => {
            let label = cart
                .item(&product_id)
                .map(|i| i.title.clone())
                .unwrap_or_else(|| product_id.clone());
            let previous = cart.update_quantity(&product_id, quantity)?;
            Ok(format!("Updated {label}: {previous} → {quantity}"))
        }
        CartOperation::Remove { product_id } => {
            let removed = cart.remove_item(&product_id)?;
            Ok(format!("Removed {}", removed.title))
        }
    }
}
