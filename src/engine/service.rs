//! Cart operations over a store.
//!
//! Each method loads the owner's document, runs the validators, mutates
//! through the aggregate, and persists once. Side notifications go out
//! best-effort after the write and never fail the request.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::cart::{Cart, MergeOutcome};
use crate::domain::events::{CartEvent, CART_EVENTS_SUBJECT};
use crate::domain::ops::{AddMultipleReport, CartOperation, ItemPayload, MergePreview};
use crate::error::CartError;
use crate::store::CartStore;

use super::{batch, preview, validate};

pub struct CartService {
    store: Arc<dyn CartStore>,
    nats: Option<async_nats::Client>,
}

impl CartService {
    pub fn new(store: Arc<dyn CartStore>, nats: Option<async_nats::Client>) -> Self {
        Self { store, nats }
    }

    /// Load the owner's cart, or a fresh empty one if none exists yet.
    /// Nothing is persisted until the first mutation.
    pub async fn get_cart(&self, user_id: &str) -> Result<Cart, CartError> {
        Ok(self
            .store
            .load(user_id)
            .await?
            .unwrap_or_else(|| Cart::empty(user_id, None)))
    }

    pub async fn add_item(
        &self,
        user_id: &str,
        email: Option<&str>,
        item: ItemPayload,
        quantity: Option<i64>,
    ) -> Result<(Cart, MergeOutcome), CartError> {
        let item = item.with_quantity(quantity);
        let violations = validate::validate_item(&item);
        if !violations.is_empty() {
            return Err(CartError::Validation { violations });
        }

        let mut cart = self.load_or_empty(user_id, email).await?;
        let outcome = cart.merge_item(item.into_cart_item())?;
        let cart = self.store.save(cart).await?;
        info!(user_id, lines = cart.line_count(), "item added to cart");
        self.notify(CartEvent::updated(&cart)).await;
        Ok((cart, outcome))
    }

    /// Add several items in input order, merging by product identity.
    /// Any invalid entry rejects the whole request.
    pub async fn add_items(
        &self,
        user_id: &str,
        email: Option<&str>,
        items: Vec<ItemPayload>,
    ) -> Result<(Cart, AddMultipleReport), CartError> {
        let mut violations = Vec::new();
        for (index, item) in items.iter().enumerate() {
            for message in validate::validate_item(item) {
                violations.push(format!("item {}: {}", index + 1, message));
            }
        }
        if !violations.is_empty() {
            return Err(CartError::Validation { violations });
        }

        let mut cart = self.load_or_empty(user_id, email).await?;
        let mut report = AddMultipleReport::default();
        for item in items {
            match cart.merge_item(item.into_cart_item())? {
                MergeOutcome::Merged { .. } => report.merged += 1,
                MergeOutcome::Added { .. } => report.added += 1,
            }
        }
        let cart = self.store.save(cart).await?;
        info!(user_id, merged = report.merged, added = report.added, "items added to cart");
        self.notify(CartEvent::updated(&cart)).await;
        Ok((cart, report))
    }

    pub async fn update_item(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> Result<Cart, CartError> {
        let mut cart = self.load_existing(user_id).await?;
        cart.update_quantity(product_id, quantity)?;
        let cart = self.store.save(cart).await?;
        info!(user_id, product_id, quantity, "cart item updated");
        self.notify(CartEvent::updated(&cart)).await;
        Ok(cart)
    }

    pub async fn remove_item(&self, user_id: &str, product_id: &str) -> Result<Cart, CartError> {
        let mut cart = self.load_existing(user_id).await?;
        cart.remove_item(product_id)?;
        let cart = self.store.save(cart).await?;
        info!(user_id, product_id, "cart item removed");
        self.notify(CartEvent::updated(&cart)).await;
        Ok(cart)
    }

    /// Empty the cart. Succeeds even when the owner has no cart yet.
    pub async fn clear(&self, user_id: &str) -> Result<Cart, CartError> {
        let mut cart = self.load_or_empty(user_id, None).await?;
        cart.clear();
        let cart = self.store.save(cart).await?;
        info!(user_id, "cart cleared");
        self.notify(CartEvent::cleared(&cart)).await;
        Ok(cart)
    }

    /// Run an ordered operation list atomically: validate everything
    /// against the cart as loaded, apply to a working copy, persist once.
    pub async fn batch_update(
        &self,
        user_id: &str,
        operations: Vec<CartOperation>,
    ) -> Result<(Cart, Vec<String>), CartError> {
        let cart = self.load_or_empty(user_id, None).await?;
        let (working, results) = batch::apply_batch(&cart, operations)?;
        let cart = self.store.save(working).await?;
        info!(user_id, operations = results.len(), "batch update applied");
        self.notify(CartEvent::updated(&cart)).await;
        Ok((cart, results))
    }

    /// Compute what a multi-add would do without touching the cart.
    pub async fn preview_merge(
        &self,
        user_id: &str,
        items: Vec<ItemPayload>,
    ) -> Result<MergePreview, CartError> {
        let cart = self.store.load(user_id).await?;
        Ok(preview::preview_merge(cart.as_ref(), &items))
    }

    async fn load_or_empty(&self, user_id: &str, email: Option<&str>) -> Result<Cart, CartError> {
        match self.store.load(user_id).await? {
            Some(mut cart) => {
                if cart.email.is_none() {
                    cart.email = email.map(str::to_string);
                }
                Ok(cart)
            }
            None => Ok(Cart::empty(user_id, email.map(str::to_string))),
        }
    }

    async fn load_existing(&self, user_id: &str) -> Result<Cart, CartError> {
        self.store
            .load(user_id)
            .await?
            .ok_or_else(|| CartError::CartNotFound(user_id.to_string()))
    }

    async fn notify(&self, event: CartEvent) {
        let Some(client) = &self.nats else {
            debug!("no event bus configured, skipping cart notification");
            return;
        };
        match serde_json::to_vec(&event) {
            Ok(payload) => {
                if let Err(err) = client.publish(CART_EVENTS_SUBJECT, payload.into()).await {
                    warn!(%err, "cart event publish failed");
                }
            }
            Err(err) => warn!(%err, "cart event serialization failed"),
        }
    }
}
