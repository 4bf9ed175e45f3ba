//! Domain events
//!
//! Published to NATS as best-effort side notifications for the order and
//! analytics collaborators. Publishing never blocks or fails a mutation.

use serde::{Deserialize, Serialize};

use super::cart::Cart;

pub const CART_EVENTS_SUBJECT: &str = "agroconnect.cart.events";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CartEvent {
    #[serde(rename_all = "camelCase")]
    Updated {
        user_id: String,
        total_items: i64,
        total_amount: i64,
    },
    #[serde(rename_all = "camelCase")]
    Cleared { user_id: String },
}

impl CartEvent {
    pub fn updated(cart: &Cart) -> Self {
        Self::Updated {
            user_id: cart.user_id.clone(),
            total_items: cart.total_items,
            total_amount: cart.total_amount,
        }
    }

    pub fn cleared(cart: &Cart) -> Self {
        Self::Cleared { user_id: cart.user_id.clone() }
    }
}
