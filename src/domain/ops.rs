//! Operation payloads and reports.
//!
//! The batch surface dispatches on a `type` tag; each variant carries only
//! the fields its kind needs, so malformed shapes fail at the boundary
//! instead of deep inside the engine.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::cart::{CartItem, SellerRef};

/// Candidate line item as submitted by a caller. Presence of the required
/// fields is a validation rule, not a parse failure, so everything the
/// validator checks is optional here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemPayload {
    pub product_id: Option<String>,
    pub title: Option<String>,
    pub price: Option<i64>,
    pub unit: Option<String>,
    pub quantity: Option<i64>,
    pub minimum_order_quantity: Option<i64>,
    pub image: Option<String>,
    pub seller: Option<SellerRef>,
    pub category: Option<String>,
}

impl ItemPayload {
    /// Fold a request-level quantity into the payload; the single-add and
    /// batch surfaces carry quantity next to the snapshot.
    pub fn with_quantity(mut self, quantity: Option<i64>) -> Self {
        if quantity.is_some() {
            self.quantity = quantity;
        }
        self
    }

    /// Human label for result lines and logs.
    pub fn label(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.product_id.clone())
            .unwrap_or_else(|| "item".to_string())
    }

    /// Build the cart line, stamped now. Only call after validation passed.
    pub fn into_cart_item(self) -> CartItem {
        CartItem {
            product_id: self.product_id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            unit: self.unit.unwrap_or_default(),
            quantity: self.quantity.unwrap_or(1),
            minimum_order_quantity: self.minimum_order_quantity.unwrap_or(1),
            image: self.image,
            seller: self.seller,
            category: self.category,
            added_at: Utc::now(),
        }
    }
}

impl From<&CartItem> for ItemPayload {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: Some(item.product_id.clone()),
            title: Some(item.title.clone()),
            price: Some(item.price),
            unit: Some(item.unit.clone()),
            quantity: Some(item.quantity),
            minimum_order_quantity: Some(item.minimum_order_quantity),
            image: item.image.clone(),
            seller: item.seller.clone(),
            category: item.category.clone(),
        }
    }
}

/// One entry in a batch request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CartOperation {
    #[serde(rename_all = "camelCase")]
    Add {
        item: ItemPayload,
        #[serde(default)]
        quantity: Option<i64>,
    },
    #[serde(rename_all = "camelCase")]
    Update { product_id: String, quantity: i64 },
    #[serde(rename_all = "camelCase")]
    Remove { product_id: String },
}

impl CartOperation {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Update { .. } => "update",
            Self::Remove { .. } => "remove",
        }
    }
}

/// Counts reported by the add-multiple surface.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMultipleReport {
    pub merged: usize,
    pub added: usize,
}

/// Read-only summary of what a multi-add would do.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePreview {
    pub would_merge: usize,
    pub would_add: usize,
    pub resulting_line_count: usize,
    pub quantity_increase: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_wire_format() {
        let op: CartOperation = serde_json::from_str(
            r#"{"type":"update","productId":"P1","quantity":4}"#,
        )
        .unwrap();
        assert!(matches!(op, CartOperation::Update { ref product_id, quantity: 4 } if product_id == "P1"));

        let op: CartOperation = serde_json::from_str(
            r#"{"type":"add","item":{"productId":"P2","title":"Maize","price":120,"unit":"kg"},"quantity":2}"#,
        )
        .unwrap();
        assert_eq!(op.kind(), "add");
    }

    #[test]
    fn test_request_quantity_overrides_snapshot() {
        let payload = ItemPayload {
            product_id: Some("P1".into()),
            quantity: Some(1),
            ..Default::default()
        };
        assert_eq!(payload.clone().with_quantity(Some(4)).quantity, Some(4));
        assert_eq!(payload.with_quantity(None).quantity, Some(1));
    }

    #[test]
    fn test_into_cart_item_defaults_minimum() {
        let payload = ItemPayload {
            product_id: Some("P1".into()),
            title: Some("Rice".into()),
            price: Some(90),
            unit: Some("kg".into()),
            quantity: Some(3),
            ..Default::default()
        };
        let item = payload.into_cart_item();
        assert_eq!(item.minimum_order_quantity, 1);
        assert_eq!(item.quantity, 3);
    }
}
