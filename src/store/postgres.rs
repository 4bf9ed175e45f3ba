//! Postgres-backed cart store.
//!
//! One row per user; the item list lives in a JSONB column so the cart
//! stays a single document and the upsert is a single statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::cart::{Cart, CartItem};
use crate::error::CartError;

use super::CartStore;

pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CartRow {
    id: Uuid,
    user_id: String,
    email: Option<String>,
    items: serde_json::Value,
    total_items: i64,
    subtotal: i64,
    delivery_charge: i64,
    total_amount: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CartRow {
    fn into_cart(self) -> Result<Cart, CartError> {
        let items: Vec<CartItem> = serde_json::from_value(self.items)
            .map_err(|e| CartError::Storage(format!("corrupt cart document: {e}")))?;
        Ok(Cart {
            id: self.id,
            user_id: self.user_id,
            email: self.email,
            items,
            total_items: self.total_items,
            subtotal: self.subtotal,
            delivery_charge: self.delivery_charge,
            total_amount: self.total_amount,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn load(&self, user_id: &str) -> Result<Option<Cart>, CartError> {
        let row = sqlx::query_as::<_, CartRow>("SELECT * FROM carts WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CartError::Storage(e.to_string()))?;
        row.map(CartRow::into_cart).transpose()
    }

    async fn save(&self, mut cart: Cart) -> Result<Cart, CartError> {
        cart.recalculate();
        let items = serde_json::to_value(&cart.items)
            .map_err(|e| CartError::Storage(e.to_string()))?;
        let row = sqlx::query_as::<_, CartRow>(
            "INSERT INTO carts (id, user_id, email, items, total_items, subtotal, delivery_charge, total_amount, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 email = COALESCE(EXCLUDED.email, carts.email), \
                 items = EXCLUDED.items, \
                 total_items = EXCLUDED.total_items, \
                 subtotal = EXCLUDED.subtotal, \
                 delivery_charge = EXCLUDED.delivery_charge, \
                 total_amount = EXCLUDED.total_amount, \
                 updated_at = EXCLUDED.updated_at \
             RETURNING *",
        )
        .bind(cart.id)
        .bind(&cart.user_id)
        .bind(&cart.email)
        .bind(items)
        .bind(cart.total_items)
        .bind(cart.subtotal)
        .bind(cart.delivery_charge)
        .bind(cart.total_amount)
        .bind(cart.created_at)
        .bind(cart.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CartError::Storage(e.to_string()))?;
        row.into_cart()
    }
}
