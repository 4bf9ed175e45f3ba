//! In-memory cart store, used by tests and the storeless dev mode.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::cart::Cart;
use crate::error::CartError;

use super::CartStore;

#[derive(Default)]
pub struct MemoryCartStore {
    carts: RwLock<HashMap<String, Cart>>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn load(&self, user_id: &str) -> Result<Option<Cart>, CartError> {
        Ok(self.carts.read().await.get(user_id).cloned())
    }

    async fn save(&self, mut cart: Cart) -> Result<Cart, CartError> {
        cart.recalculate();
        self.carts
            .write()
            .await
            .insert(cart.user_id.clone(), cart.clone());
        Ok(cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::tests::item;
    use crate::domain::cart::DELIVERY_CHARGE;

    #[tokio::test]
    async fn test_save_recomputes_aggregates_before_writing() {
        let store = MemoryCartStore::new();
        let mut cart = Cart::empty("U1", None);
        cart.items.push(item("P1", 100, 2));
        // aggregates deliberately stale

        let saved = store.save(cart).await.unwrap();
        assert_eq!(saved.total_items, 2);
        assert_eq!(saved.subtotal, 200);
        assert_eq!(saved.total_amount, 200 + DELIVERY_CHARGE);

        let loaded = store.load("U1").await.unwrap().unwrap();
        assert_eq!(loaded, saved);
    }

    #[tokio::test]
    async fn test_load_unknown_user_is_none() {
        let store = MemoryCartStore::new();
        assert!(store.load("nobody").await.unwrap().is_none());
    }
}
