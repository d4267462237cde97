//! The storefront handle: services constructed once, passed by reference.
//!
//! The original design exposed cart/wishlist/notification state through
//! ambient global providers. Here a [`Storefront`] is built explicitly at
//! application start and handed to whatever needs it, which makes
//! ownership and testability explicit. It also hosts the operations that
//! span both state services (move-to-cart / move-to-wishlist).

use std::sync::Arc;

use tracing::instrument;
use verdant_core::ProductId;

use crate::api::{ApiClient, CommerceBackend};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::services::MutationOutcome;
use crate::services::cart::CartService;
use crate::services::notify::Notifier;
use crate::services::wishlist::WishlistService;
use crate::session::SessionId;

/// Error constructing a [`Storefront`].
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("session identity error: {0}")]
    Session(#[from] std::io::Error),
    #[error("API client error: {0}")]
    Api(#[from] ApiError),
}

/// Storefront state bundle shared across the presentation layer.
///
/// Owns the cart and wishlist services (one backend handle between them)
/// and the notification bus.
pub struct Storefront<B> {
    backend: Arc<B>,
    cart: CartService<B>,
    wishlist: WishlistService<B>,
    notifier: Notifier,
}

impl Storefront<ApiClient> {
    /// Build the production storefront: load-or-create the session
    /// identity, construct the API client, and wire the services.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be read or written, or
    /// if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, SetupError> {
        let session = SessionId::load_or_create(&config.session_file)?;
        let client = ApiClient::new(config, session)?;
        Ok(Self::with_backend(Arc::new(client)))
    }
}

impl<B: CommerceBackend> Storefront<B> {
    /// Wire the services over an arbitrary backend (mocks in tests).
    pub fn with_backend(backend: Arc<B>) -> Self {
        Self {
            cart: CartService::new(Arc::clone(&backend)),
            wishlist: WishlistService::new(Arc::clone(&backend)),
            notifier: Notifier::new(),
            backend,
        }
    }

    /// Fetch the initial cart and wishlist snapshots.
    ///
    /// Failures are logged by the services and not surfaced; state that
    /// could not be fetched stays empty.
    pub async fn initialize(&self) {
        tokio::join!(self.cart.initialize(), self.wishlist.initialize());
    }

    /// The cart state service.
    #[must_use]
    pub const fn cart(&self) -> &CartService<B> {
        &self.cart
    }

    /// The wishlist state service.
    #[must_use]
    pub const fn wishlist(&self) -> &WishlistService<B> {
        &self.wishlist
    }

    /// The notification bus.
    #[must_use]
    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// The shared backend handle.
    #[must_use]
    pub const fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Set a cart line's quantity, mapping non-positive values to removal.
    ///
    /// This is the caller-side policy the cart service deliberately does
    /// not own: quantity steppers count down to zero and expect the line
    /// to disappear.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn set_quantity(&self, product_id: &ProductId, quantity: i64) -> MutationOutcome {
        if quantity <= 0 {
            self.cart.remove_item(product_id).await
        } else {
            self.cart.update_quantity(product_id, quantity).await
        }
    }

    /// Move a product from the wishlist into the cart.
    ///
    /// Two-phase and not atomic: add to the cart first, then remove from
    /// the wishlist only if the add succeeded. If the removal fails the
    /// item is present in both collections and the returned outcome is
    /// the removal failure; the ordering guarantees the item is never
    /// lost entirely.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn move_to_cart(&self, product_id: &ProductId) -> MutationOutcome {
        let added = self.cart.add_item(product_id, 1).await;
        if !added.success {
            return added;
        }
        self.wishlist.remove_item(product_id).await
    }

    /// Move a product from the cart into the wishlist.
    ///
    /// Same two-phase contract as [`Self::move_to_cart`], in the other
    /// direction: add-then-remove, never remove-then-add.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn move_to_wishlist(&self, product_id: &ProductId) -> MutationOutcome {
        let added = self.wishlist.add_item(product_id).await;
        if !added.success {
            return added;
        }
        self.cart.remove_item(product_id).await
    }
}
