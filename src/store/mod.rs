//! Cart persistence.

mod memory;
mod postgres;

pub use memory::MemoryCartStore;
pub use postgres::PgCartStore;

use async_trait::async_trait;

use crate::domain::cart::Cart;
use crate::error::CartError;

/// Load/save contract for the per-user cart document.
///
/// `save` upserts by user identity and recomputes the derived totals as
/// part of the write, so callers never observe a document whose aggregates
/// disagree with its item list.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn load(&self, user_id: &str) -> Result<Option<Cart>, CartError>;
    async fn save(&self, cart: Cart) -> Result<Cart, CartError>;
}
