//! Cart Aggregate
//!
//! One denormalized document per user identity. All mutations go through
//! the methods here so the derived totals stay consistent with the item
//! list before anything is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CartError;

/// Flat delivery charge (minor units) whenever the cart holds items.
pub const DELIVERY_CHARGE: i64 = 300;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerRef {
    pub seller_id: String,
    pub name: String,
}

/// One product line with its price snapshot. The price is frozen at
/// add-time and never re-read from the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub title: String,
    pub price: i64,
    pub unit: String,
    pub quantity: i64,
    #[serde(default = "default_minimum_order_quantity")]
    pub minimum_order_quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<SellerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub added_at: DateTime<Utc>,
}

fn default_minimum_order_quantity() -> i64 {
    1
}

impl CartItem {
    pub fn line_total(&self) -> i64 {
        self.price.saturating_mul(self.quantity)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: Uuid,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub items: Vec<CartItem>,
    pub total_items: i64,
    pub subtotal: i64,
    pub delivery_charge: i64,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How an incoming item landed in the cart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Quantities were combined into an existing line for the same product.
    Merged { previous: i64, added: i64, total: i64 },
    /// A new line was appended.
    Added { quantity: i64 },
}

impl Cart {
    pub fn empty(user_id: impl Into<String>, email: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.into(),
            email,
            items: vec![],
            total_items: 0,
            subtotal: 0,
            delivery_charge: 0,
            total_amount: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn item(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.item(product_id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Merge an incoming item by product identity: combine quantities into
    /// an existing line, or append a new one. A combined quantity below the
    /// line's minimum order quantity is rejected without mutating anything;
    /// that can only happen when the minimum was raised out of band.
    pub fn merge_item(&mut self, incoming: CartItem) -> Result<MergeOutcome, CartError> {
        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == incoming.product_id) {
            let total = existing.quantity.saturating_add(incoming.quantity);
            if total < existing.minimum_order_quantity {
                return Err(CartError::validation(format!(
                    "quantity {} is below the minimum order quantity {} for {}",
                    total, existing.minimum_order_quantity, existing.product_id
                )));
            }
            let previous = existing.quantity;
            existing.quantity = total;
            self.recalculate();
            Ok(MergeOutcome::Merged { previous, added: incoming.quantity, total })
        } else {
            let quantity = incoming.quantity;
            self.items.push(incoming);
            self.recalculate();
            Ok(MergeOutcome::Added { quantity })
        }
    }

    /// Replace the quantity of an existing line. Returns the previous
    /// quantity. Partial removal goes through here; `remove_item` always
    /// drops the whole line.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> Result<i64, CartError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| CartError::ItemNotFound(product_id.to_string()))?;
        if quantity < 1 {
            return Err(CartError::validation("quantity must be at least 1"));
        }
        if quantity < item.minimum_order_quantity {
            return Err(CartError::validation(format!(
                "quantity {} is below the minimum order quantity {} for {}",
                quantity, item.minimum_order_quantity, product_id
            )));
        }
        let previous = item.quantity;
        item.quantity = quantity;
        self.recalculate();
        Ok(previous)
    }

    pub fn remove_item(&mut self, product_id: &str) -> Result<CartItem, CartError> {
        let position = self
            .items
            .iter()
            .position(|i| i.product_id == product_id)
            .ok_or_else(|| CartError::ItemNotFound(product_id.to_string()))?;
        let removed = self.items.remove(position);
        self.recalculate();
        Ok(removed)
    }

    /// Empty the cart. Idempotent; resets the delivery charge to zero.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recalculate();
    }

    /// Recompute the derived totals from the item list.
    pub fn recalculate(&mut self) {
        self.total_items = self.items.iter().map(|i| i.quantity).sum();
        self.subtotal = self.items.iter().map(CartItem::line_total).sum();
        self.delivery_charge = if self.items.is_empty() { 0 } else { DELIVERY_CHARGE };
        self.total_amount = self.subtotal + self.delivery_charge;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn item(product_id: &str, price: i64, quantity: i64) -> CartItem {
        CartItem {
            product_id: product_id.into(),
            title: format!("{product_id} produce"),
            price,
            unit: "kg".into(),
            quantity,
            minimum_order_quantity: 1,
            image: None,
            seller: Some(SellerRef { seller_id: "S1".into(), name: "Green Farm".into() }),
            category: None,
            added_at: Utc::now(),
        }
    }

    fn assert_invariants(cart: &Cart) {
        assert_eq!(cart.total_items, cart.items.iter().map(|i| i.quantity).sum::<i64>());
        assert_eq!(cart.subtotal, cart.items.iter().map(CartItem::line_total).sum::<i64>());
        assert_eq!(cart.total_amount, cart.subtotal + cart.delivery_charge);
        assert_eq!(cart.delivery_charge, if cart.items.is_empty() { 0 } else { DELIVERY_CHARGE });
    }

    #[test]
    fn test_merge_combines_quantities() {
        let mut cart = Cart::empty("U1", None);
        cart.merge_item(item("P1", 100, 2)).unwrap();
        let outcome = cart.merge_item(item("P1", 100, 3)).unwrap();
        assert_eq!(outcome, MergeOutcome::Merged { previous: 2, added: 3, total: 5 });
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.subtotal, 500);
        assert_invariants(&cart);
    }

    #[test]
    fn test_merge_appends_new_line() {
        let mut cart = Cart::empty("U1", None);
        cart.merge_item(item("P1", 100, 2)).unwrap();
        let outcome = cart.merge_item(item("P2", 50, 1)).unwrap();
        assert_eq!(outcome, MergeOutcome::Added { quantity: 1 });
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.total_items, 3);
        assert_invariants(&cart);
    }

    #[test]
    fn test_merge_never_changes_price() {
        let mut cart = Cart::empty("U1", None);
        cart.merge_item(item("P1", 100, 2)).unwrap();
        let mut repriced = item("P1", 250, 1);
        repriced.title = "renamed".into();
        cart.merge_item(repriced).unwrap();
        assert_eq!(cart.items[0].price, 100);
        assert_eq!(cart.items[0].title, "P1 produce");
        assert_eq!(cart.subtotal, 300);
    }

    #[test]
    fn test_merge_below_minimum_is_rejected_without_mutation() {
        let mut cart = Cart::empty("U1", None);
        let mut existing = item("P1", 100, 2);
        existing.minimum_order_quantity = 10; // raised out of band
        cart.items.push(existing);
        cart.recalculate();

        let err = cart.merge_item(item("P1", 100, 3)).unwrap_err();
        assert!(matches!(err, CartError::Validation { .. }));
        assert_eq!(cart.items[0].quantity, 2);
        assert_invariants(&cart);
    }

    #[test]
    fn test_update_quantity_rules() {
        let mut cart = Cart::empty("U1", None);
        let mut line = item("P1", 100, 5);
        line.minimum_order_quantity = 3;
        cart.merge_item(line).unwrap();

        assert!(matches!(cart.update_quantity("P9", 4), Err(CartError::ItemNotFound(_))));
        assert!(matches!(cart.update_quantity("P1", 0), Err(CartError::Validation { .. })));
        assert!(matches!(cart.update_quantity("P1", 2), Err(CartError::Validation { .. })));
        assert_eq!(cart.items[0].quantity, 5); // rejected updates leave the line alone

        let previous = cart.update_quantity("P1", 4).unwrap();
        assert_eq!(previous, 5);
        assert_eq!(cart.items[0].quantity, 4);
        assert_invariants(&cart);
    }

    #[test]
    fn test_remove_drops_whole_line() {
        let mut cart = Cart::empty("U1", None);
        cart.merge_item(item("P1", 100, 2)).unwrap();
        cart.merge_item(item("P2", 50, 1)).unwrap();

        let removed = cart.remove_item("P1").unwrap();
        assert_eq!(removed.product_id, "P1");
        assert_eq!(cart.line_count(), 1);
        assert!(matches!(cart.remove_item("P1"), Err(CartError::ItemNotFound(_))));
        assert_invariants(&cart);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cart = Cart::empty("U1", None);
        cart.clear();
        assert_eq!(cart.total_amount, 0);
        assert_eq!(cart.delivery_charge, 0);

        cart.merge_item(item("P1", 100, 2)).unwrap();
        assert_eq!(cart.delivery_charge, DELIVERY_CHARGE);
        cart.clear();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal, 0);
        assert_eq!(cart.delivery_charge, 0);
        assert_eq!(cart.total_amount, 0);
    }
}
