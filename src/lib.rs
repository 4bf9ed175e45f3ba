//! AgroConnect Cart Service
//!
//! Shopping-cart consistency and batch-mutation engine for the AgroConnect
//! marketplace.
//!
//! ## Features
//! - Denormalized per-user cart document with derived totals
//! - Merge-on-add by product identity, price frozen at add-time
//! - Minimum-order-quantity enforcement
//! - Atomic multi-operation batch endpoint (validate-all-first)
//! - Read-only merge preview

pub mod domain;
pub mod engine;
pub mod error;
pub mod http;
pub mod store;

pub use domain::cart::{Cart, CartItem, SellerRef, DELIVERY_CHARGE};
pub use error::{CartError, Result};
