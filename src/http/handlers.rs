//! Request handlers and response envelopes.
//!
//! The caller's identity in path/body is trusted here; ownership and role
//! checks happen upstream at the gateway.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::cart::{Cart, MergeOutcome};
use crate::domain::ops::{CartOperation, ItemPayload, MergePreview};
use crate::error::CartError;

use super::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "healthy", "service": "agroconnect-cart"}))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub cart: Cart,
}

impl CartEnvelope {
    fn new(message: impl Into<String>, cart: Cart) -> Self {
        Self { success: true, message: Some(message.into()), cart }
    }
}

fn checked<R: Validate>(req: R) -> Result<R, CartError> {
    req.validate().map_err(|errors| CartError::Validation {
        violations: errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| errs.iter().map(move |e| format!("{field} is invalid ({})", e.code)))
            .collect(),
    })?;
    Ok(req)
}

pub async fn get_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<CartEnvelope>, CartError> {
    let cart = state.cart.get_cart(&user_id).await?;
    Ok(Json(CartEnvelope { success: true, message: None, cart }))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub user_id: String,
    #[validate(email)]
    pub email: Option<String>,
    pub item: ItemPayload,
    pub quantity: Option<i64>,
}

pub async fn add_item(
    State(state): State<AppState>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartEnvelope>, CartError> {
    let req = checked(req)?;
    let (cart, outcome) = state
        .cart
        .add_item(&req.user_id, req.email.as_deref(), req.item, req.quantity)
        .await?;
    let message = match outcome {
        MergeOutcome::Merged { total, .. } => format!("Item quantity updated to {total}"),
        MergeOutcome::Added { .. } => "Item added to cart".to_string(),
    };
    Ok(Json(CartEnvelope::new(message, cart)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddMultipleRequest {
    pub user_id: String,
    #[validate(email)]
    pub email: Option<String>,
    pub items: Vec<ItemPayload>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMultipleEnvelope {
    pub success: bool,
    pub message: String,
    pub merged: usize,
    pub added: usize,
    pub cart: Cart,
}

pub async fn add_multiple(
    State(state): State<AppState>,
    Json(req): Json<AddMultipleRequest>,
) -> Result<Json<AddMultipleEnvelope>, CartError> {
    let req = checked(req)?;
    let (cart, report) = state
        .cart
        .add_items(&req.user_id, req.email.as_deref(), req.items)
        .await?;
    Ok(Json(AddMultipleEnvelope {
        success: true,
        message: format!("{} items added, {} merged", report.added, report.merged),
        merged: report.merged,
        added: report.added,
        cart,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub user_id: String,
    pub product_id: String,
    pub quantity: i64,
}

pub async fn update_item(
    State(state): State<AppState>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<CartEnvelope>, CartError> {
    let cart = state
        .cart
        .update_item(&req.user_id, &req.product_id, req.quantity)
        .await?;
    Ok(Json(CartEnvelope::new("Cart item updated successfully", cart)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemRequest {
    pub user_id: String,
    pub product_id: String,
}

pub async fn remove_item(
    State(state): State<AppState>,
    Json(req): Json<RemoveItemRequest>,
) -> Result<Json<CartEnvelope>, CartError> {
    let cart = state.cart.remove_item(&req.user_id, &req.product_id).await?;
    Ok(Json(CartEnvelope::new("Item removed from cart", cart)))
}

pub async fn clear_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<CartEnvelope>, CartError> {
    let cart = state.cart.clear(&user_id).await?;
    Ok(Json(CartEnvelope::new("Cart cleared successfully", cart)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateRequest {
    pub user_id: String,
    pub operations: Vec<CartOperation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEnvelope {
    pub success: bool,
    pub message: String,
    pub results: Vec<String>,
    pub cart: Cart,
}

pub async fn batch_update(
    State(state): State<AppState>,
    Json(req): Json<BatchUpdateRequest>,
) -> Result<Json<BatchEnvelope>, CartError> {
    let (cart, results) = state.cart.batch_update(&req.user_id, req.operations).await?;
    Ok(Json(BatchEnvelope {
        success: true,
        message: format!("{} operations applied", results.len()),
        results,
        cart,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewMergeRequest {
    pub user_id: String,
    pub items: Vec<ItemPayload>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEnvelope {
    pub success: bool,
    pub preview: MergePreview,
}

pub async fn preview_merge(
    State(state): State<AppState>,
    Json(req): Json<PreviewMergeRequest>,
) -> Result<Json<PreviewEnvelope>, CartError> {
    let preview = state.cart.preview_merge(&req.user_id, req.items).await?;
    Ok(Json(PreviewEnvelope { success: true, preview }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_wire_shape() {
        let cart = Cart::empty("U1", None);
        let body = serde_json::to_value(CartEnvelope::new("Cart saved successfully", cart)).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["cart"]["totalItems"], 0);
        assert_eq!(body["cart"]["deliveryCharge"], 0);
        assert_eq!(body["cart"]["totalAmount"], 0);
    }

    #[test]
    fn test_email_format_is_validated() {
        let req = AddItemRequest {
            user_id: "U1".into(),
            email: Some("not-an-email".into()),
            item: ItemPayload::default(),
            quantity: None,
        };
        let err = checked(req).unwrap_err();
        assert!(matches!(err, CartError::Validation { .. }));
    }
}
