//! Response-shape normalization boundary.
//!
//! Observed backend versions disagree on whether payloads arrive flat
//! (`{ cart, message }`) or wrapped under a top-level `data` key
//! (`{ data: { cart, message } }`). Every accepted shape is converted to
//! the canonical types here, in one place, so call sites never repeat
//! ad hoc shape checks.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::types::{Address, Cart, Category, Order, Product};

// =============================================================================
// Canonical Envelopes
// =============================================================================

/// Success payload of every cart endpoint: the full updated cart.
#[derive(Debug, Clone, Deserialize)]
pub struct CartEnvelope {
    /// Complete authoritative cart snapshot.
    pub cart: Cart,
    /// Human-readable outcome message, when the backend sends one.
    #[serde(default)]
    pub message: Option<String>,
}

/// Success payload of every wishlist endpoint: the full updated list.
#[derive(Debug, Clone, Deserialize)]
pub struct WishlistEnvelope {
    /// Complete authoritative wishlist snapshot.
    pub wishlist: Vec<Product>,
    /// Human-readable outcome message, when the backend sends one.
    #[serde(default)]
    pub message: Option<String>,
}

/// Success payload of address mutations: the full updated address book.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressBookEnvelope {
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Success payload of the category listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryListEnvelope {
    pub categories: Vec<Category>,
}

/// Success payload of the order listing.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderListEnvelope {
    pub orders: Vec<Order>,
}

/// Success payload of order placement.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderEnvelope {
    pub order: Order,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Normalization
// =============================================================================

/// Convert a raw response body into a canonical type, unwrapping an
/// optional top-level `data` object first.
///
/// # Errors
///
/// Returns `ApiError::Parse` if the (unwrapped) body does not match `T`.
pub fn normalize<T: DeserializeOwned>(mut body: Value) -> Result<T, ApiError> {
    if let Some(object) = body.as_object_mut()
        && object.get("data").is_some_and(Value::is_object)
        && let Some(data) = object.remove("data")
    {
        body = data;
    }

    serde_json::from_value(body).map_err(ApiError::Parse)
}

/// Pull the server's error message out of a failure body, accepting the
/// same flat and `data`-wrapped shapes as success payloads.
#[must_use]
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    let message = value
        .get("message")
        .or_else(|| value.get("data").and_then(|data| data.get("message")))?;

    message.as_str().map(str::to_owned)
}
