//! Error types for the cart service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A rule violated by one operation of a batch, tagged with the operation's
/// 1-based position in the request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchViolation {
    pub operation: usize,
    pub message: String,
}

impl fmt::Display for BatchViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation {}: {}", self.operation, self.message)
    }
}

#[derive(Error, Debug)]
pub enum CartError {
    /// Input failed one or more business rules; every violation is listed.
    #[error("validation failed: {}", .violations.join("; "))]
    Validation { violations: Vec<String> },

    #[error("cart not found for {0}")]
    CartNotFound(String),

    #[error("item {0} not found in cart")]
    ItemNotFound(String),

    /// The batch was rejected before any state changed.
    #[error("batch rejected: {}", .violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    BatchRejected { violations: Vec<BatchViolation> },

    /// A batch operation failed after validation passed; nothing was persisted.
    #[error("batch operation {operation} failed: {reason}")]
    BatchFailed { operation: usize, reason: String },

    #[error("storage error: {0}")]
    Storage(String),
}

impl CartError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            violations: vec![message.into()],
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::BatchRejected { .. } => StatusCode::BAD_REQUEST,
            Self::CartNotFound(_) | Self::ItemNotFound(_) => StatusCode::NOT_FOUND,
            Self::BatchFailed { .. } | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CartError {
    fn into_response(self) -> Response {
        let errors = match &self {
            Self::Validation { violations } => violations.clone(),
            Self::BatchRejected { violations } => {
                violations.iter().map(ToString::to_string).collect()
            }
            _ => vec![],
        };
        let body = serde_json::json!({
            "success": false,
            "message": self.to_string(),
            "errors": errors,
        });
        (self.status(), Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_every_rule() {
        let err = CartError::Validation {
            violations: vec!["title is required".into(), "unit is required".into()],
        };
        assert_eq!(
            err.to_string(),
            "validation failed: title is required; unit is required"
        );
    }

    #[test]
    fn test_batch_violation_carries_operation_index() {
        let violation = BatchViolation {
            operation: 3,
            message: "item P9 not found in cart".into(),
        };
        assert_eq!(violation.to_string(), "operation 3: item P9 not found in cart");
    }
}
