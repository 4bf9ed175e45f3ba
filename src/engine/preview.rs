//! Merge preview.
//!
//! Pure computation of what a multi-add would do. Matching follows the same
//! product-id rule as the merge engine, applied in input order, so
//! duplicates inside the incoming list merge with each other.

use std::collections::HashSet;

use crate::domain::cart::Cart;
use crate::domain::ops::{ItemPayload, MergePreview};

pub fn preview_merge(cart: Option<&Cart>, incoming: &[ItemPayload]) -> MergePreview {
    let mut present: HashSet<String> = cart
        .map(|c| c.items.iter().map(|i| i.product_id.clone()).collect())
        .unwrap_or_default();

    let mut preview = MergePreview {
        resulting_line_count: cart.map_or(0, Cart::line_count),
        ..Default::default()
    };
    for item in incoming {
        preview.quantity_increase += item.quantity.unwrap_or(0).max(0);
        let product_id = item.product_id.clone().unwrap_or_default();
        if present.contains(&product_id) {
            preview.would_merge += 1;
        } else {
            preview.would_add += 1;
            preview.resulting_line_count += 1;
            present.insert(product_id);
        }
    }
    preview
}
