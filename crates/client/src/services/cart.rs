//! Cart state service.
//!
//! Single source of truth for "what is in the cart right now", and the
//! only component permitted to call cart-mutating endpoints. Mutations
//! are all-or-nothing: either the full server snapshot replaces local
//! state, or nothing changes. The local cart can therefore never diverge
//! from the server's view after a failed or partial update.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use tracing::{instrument, warn};
use verdant_core::ProductId;

use crate::api::{CartEnvelope, CommerceBackend};
use crate::error::ApiError;
use crate::services::MutationOutcome;
use crate::types::Cart;

const ADDED: &str = "Item added to cart";
const UPDATED: &str = "Cart updated";
const REMOVED: &str = "Item removed from cart";
const FAILED_ADD: &str = "Failed to add item to cart";
const FAILED_UPDATE: &str = "Failed to update cart";
const FAILED_REMOVE: &str = "Failed to remove item from cart";

/// Owns the in-memory mirror of the user's cart.
///
/// `None` means "unknown or never fetched" and is indistinguishable from
/// an empty cart in derived values.
pub struct CartService<B> {
    backend: Arc<B>,
    cart: Mutex<Option<Cart>>,
}

impl<B: CommerceBackend> CartService<B> {
    /// Create a service over the given backend, with no snapshot yet.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            cart: Mutex::new(None),
        }
    }

    /// Fetch the initial cart snapshot.
    ///
    /// On failure the state stays unknown/empty; the failure is logged
    /// and not surfaced, and there is no automatic retry.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        match self.backend.fetch_cart().await {
            Ok(envelope) => *self.lock() = Some(envelope.cart),
            Err(e) => warn!("Failed to fetch cart: {e}"),
        }
    }

    /// Add `quantity` of a product to the cart.
    ///
    /// The backend validates that the product exists and is in stock.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_item(&self, product_id: &ProductId, quantity: u32) -> MutationOutcome {
        let result = self.backend.add_to_cart(product_id, quantity).await;
        self.apply(result, ADDED, FAILED_ADD)
    }

    /// Set the quantity of an existing cart line.
    ///
    /// `quantity` is signed; callers map non-positive values to
    /// [`Self::remove_item`] (see `Storefront::set_quantity`). The service
    /// itself forwards the value unchanged.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_quantity(&self, product_id: &ProductId, quantity: i64) -> MutationOutcome {
        let result = self.backend.update_cart_item(product_id, quantity).await;
        self.apply(result, UPDATED, FAILED_UPDATE)
    }

    /// Remove a cart line regardless of its quantity.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_item(&self, product_id: &ProductId) -> MutationOutcome {
        let result = self.backend.remove_from_cart(product_id).await;
        self.apply(result, REMOVED, FAILED_REMOVE)
    }

    /// A copy of the current snapshot for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Option<Cart> {
        self.lock().clone()
    }

    /// Sum of all line quantities, recomputed on demand (badge count).
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.lock().as_ref().map_or(0, Cart::total_quantity)
    }

    /// Sum of line price x quantity at current (discounted) prices.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lock().as_ref().map_or(Decimal::ZERO, Cart::subtotal)
    }

    /// Replace-on-success, untouched-on-failure. Each path has its own
    /// fallback wording; a success must never read as a failure.
    fn apply(
        &self,
        result: Result<CartEnvelope, ApiError>,
        success_fallback: &str,
        failure_fallback: &str,
    ) -> MutationOutcome {
        match result {
            Ok(envelope) => {
                *self.lock() = Some(envelope.cart);
                MutationOutcome::succeeded(envelope.message, success_fallback)
            }
            Err(e) => MutationOutcome::failed(&e, failure_fallback),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Cart>> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
