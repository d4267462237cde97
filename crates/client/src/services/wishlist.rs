//! Wishlist state service.
//!
//! Same snapshot-replace-on-success / untouched-on-failure discipline as
//! the cart service, restricted to membership: no quantities, a product
//! appears at most once. Membership checks are O(1) against an ID set
//! rebuilt on every snapshot replacement.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{instrument, warn};
use verdant_core::ProductId;

use crate::api::{CommerceBackend, WishlistEnvelope};
use crate::error::ApiError;
use crate::services::MutationOutcome;
use crate::types::Product;

const ADDED: &str = "Item added to wishlist";
const REMOVED: &str = "Item removed from wishlist";
const FAILED_ADD: &str = "Failed to add item to wishlist";
const FAILED_REMOVE: &str = "Failed to remove item from wishlist";

#[derive(Default)]
struct WishlistState {
    items: Vec<Product>,
    ids: HashSet<ProductId>,
}

impl WishlistState {
    fn replace(&mut self, items: Vec<Product>) {
        self.ids = items.iter().map(|product| product.id.clone()).collect();
        self.items = items;
    }
}

/// Owns the in-memory mirror of the user's wishlist.
pub struct WishlistService<B> {
    backend: Arc<B>,
    state: Mutex<WishlistState>,
}

impl<B: CommerceBackend> WishlistService<B> {
    /// Create a service over the given backend, with an empty list.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: Mutex::new(WishlistState::default()),
        }
    }

    /// Fetch the initial wishlist snapshot.
    ///
    /// On failure the list stays empty; the failure is logged and not
    /// surfaced, and there is no automatic retry.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        match self.backend.fetch_wishlist().await {
            Ok(envelope) => self.lock().replace(envelope.wishlist),
            Err(e) => warn!("Failed to fetch wishlist: {e}"),
        }
    }

    /// Add a product to the wishlist.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_item(&self, product_id: &ProductId) -> MutationOutcome {
        let result = self.backend.add_to_wishlist(product_id).await;
        self.apply(result, ADDED, FAILED_ADD)
    }

    /// Remove a product from the wishlist.
    ///
    /// Removing a non-member is a no-op the backend answers with the
    /// unchanged list.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_item(&self, product_id: &ProductId) -> MutationOutcome {
        let result = self.backend.remove_from_wishlist(product_id).await;
        self.apply(result, REMOVED, FAILED_REMOVE)
    }

    /// O(1) membership test against the current snapshot.
    #[must_use]
    pub fn is_member(&self, product_id: &ProductId) -> bool {
        self.lock().ids.contains(product_id)
    }

    /// A copy of the current snapshot for rendering.
    #[must_use]
    pub fn items(&self) -> Vec<Product> {
        self.lock().items.clone()
    }

    /// Number of wishlisted products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Whether the wishlist is empty (or never fetched).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Replace-on-success, untouched-on-failure. Each path has its own
    /// fallback wording; a success must never read as a failure.
    fn apply(
        &self,
        result: Result<WishlistEnvelope, ApiError>,
        success_fallback: &str,
        failure_fallback: &str,
    ) -> MutationOutcome {
        match result {
            Ok(envelope) => {
                self.lock().replace(envelope.wishlist);
                MutationOutcome::succeeded(envelope.message, success_fallback)
            }
            Err(e) => MutationOutcome::failed(&e, failure_fallback),
        }
    }

    fn lock(&self) -> MutexGuard<'_, WishlistState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
