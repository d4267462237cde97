//! Test harness for the Verdant storefront client.
//!
//! Provides [`MockBackend`], an in-memory implementation of
//! [`CommerceBackend`] with the same contract as the real backend: every
//! mutating call answers with the full updated collection, never a delta.
//! Failures are injected per operation with [`MockBackend::fail_next`] to
//! exercise the untouched-on-failure discipline of the state services.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use verdant_client::api::{CartEnvelope, CommerceBackend, WishlistEnvelope};
use verdant_client::error::ApiError;
use verdant_client::types::{Cart, CartLine, Product};
use verdant_core::{Price, ProductId};

/// Operations a failure can be injected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    FetchCart,
    AddToCart,
    UpdateCartItem,
    RemoveFromCart,
    FetchWishlist,
    AddToWishlist,
    RemoveFromWishlist,
}

#[derive(Default)]
struct MockState {
    products: HashMap<ProductId, Product>,
    cart: Cart,
    wishlist: Vec<Product>,
    failures: HashMap<MockOp, (u16, String)>,
    omit_messages: bool,
}

/// In-memory storefront backend for tests.
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a product known to the backend catalog.
    pub fn seed_product(&self, product: Product) {
        let mut state = self.lock();
        state.products.insert(product.id.clone(), product);
    }

    /// Put an already-seeded product on the wishlist.
    ///
    /// # Panics
    ///
    /// Panics if the product was not seeded first.
    pub fn seed_wishlist(&self, product_id: &ProductId) {
        let mut state = self.lock();
        let product = state
            .products
            .get(product_id)
            .expect("seed the product before wishlisting it")
            .clone();
        if !state.wishlist.iter().any(|p| p.id == *product_id) {
            state.wishlist.push(product);
        }
    }

    /// Answer success responses without a human-readable message, as some
    /// backend versions do.
    pub fn omit_success_messages(&self) {
        self.lock().omit_messages = true;
    }

    /// Fail the next call to `op` with the given status and message.
    pub fn fail_next(&self, op: MockOp, status: u16, message: &str) {
        self.lock().failures.insert(op, (status, message.to_string()));
    }

    /// Deep copy of the server-side cart, for deep-equal assertions.
    #[must_use]
    pub fn cart_snapshot(&self) -> Cart {
        self.lock().cart.clone()
    }

    /// Deep copy of the server-side wishlist.
    #[must_use]
    pub fn wishlist_snapshot(&self) -> Vec<Product> {
        self.lock().wishlist.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_failure(state: &mut MockState, op: MockOp) -> Result<(), ApiError> {
        if let Some((status, message)) = state.failures.remove(&op) {
            return Err(ApiError::Status {
                status,
                message: Some(message),
            });
        }
        Ok(())
    }

    fn cart_envelope(state: &MockState, message: &str) -> CartEnvelope {
        CartEnvelope {
            cart: state.cart.clone(),
            message: (!state.omit_messages).then(|| message.to_string()),
        }
    }

    fn wishlist_envelope(state: &MockState, message: &str) -> WishlistEnvelope {
        WishlistEnvelope {
            wishlist: state.wishlist.clone(),
            message: (!state.omit_messages).then(|| message.to_string()),
        }
    }
}

impl CommerceBackend for MockBackend {
    async fn fetch_cart(&self) -> Result<CartEnvelope, ApiError> {
        let mut state = self.lock();
        Self::check_failure(&mut state, MockOp::FetchCart)?;
        Ok(CartEnvelope {
            cart: state.cart.clone(),
            message: None,
        })
    }

    async fn add_to_cart(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartEnvelope, ApiError> {
        let mut state = self.lock();
        Self::check_failure(&mut state, MockOp::AddToCart)?;

        if quantity == 0 {
            return Err(ApiError::Status {
                status: 400,
                message: Some("Quantity must be at least 1".to_string()),
            });
        }

        let Some(product) = state.products.get(product_id).cloned() else {
            return Err(ApiError::Status {
                status: 404,
                message: Some("Product not found".to_string()),
            });
        };

        if let Some(line) = state
            .cart
            .items
            .iter_mut()
            .find(|line| line.product.id == *product_id && line.size.is_none())
        {
            line.quantity += i64::from(quantity);
        } else {
            state.cart.items.push(CartLine {
                product,
                quantity: i64::from(quantity),
                size: None,
            });
        }

        Ok(Self::cart_envelope(&state, "Item added to cart"))
    }

    async fn update_cart_item(
        &self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<CartEnvelope, ApiError> {
        let mut state = self.lock();
        Self::check_failure(&mut state, MockOp::UpdateCartItem)?;

        if !state
            .cart
            .items
            .iter()
            .any(|line| line.product.id == *product_id)
        {
            return Err(ApiError::Status {
                status: 404,
                message: Some("Item not in cart".to_string()),
            });
        }

        if quantity <= 0 {
            state.cart.items.retain(|line| line.product.id != *product_id);
        } else if let Some(line) = state
            .cart
            .items
            .iter_mut()
            .find(|line| line.product.id == *product_id)
        {
            line.quantity = quantity;
        }

        Ok(Self::cart_envelope(&state, "Cart updated"))
    }

    async fn remove_from_cart(&self, product_id: &ProductId) -> Result<CartEnvelope, ApiError> {
        let mut state = self.lock();
        Self::check_failure(&mut state, MockOp::RemoveFromCart)?;

        state.cart.items.retain(|line| line.product.id != *product_id);
        Ok(Self::cart_envelope(&state, "Item removed from cart"))
    }

    async fn fetch_wishlist(&self) -> Result<WishlistEnvelope, ApiError> {
        let mut state = self.lock();
        Self::check_failure(&mut state, MockOp::FetchWishlist)?;
        Ok(WishlistEnvelope {
            wishlist: state.wishlist.clone(),
            message: None,
        })
    }

    async fn add_to_wishlist(&self, product_id: &ProductId) -> Result<WishlistEnvelope, ApiError> {
        let mut state = self.lock();
        Self::check_failure(&mut state, MockOp::AddToWishlist)?;

        let Some(product) = state.products.get(product_id).cloned() else {
            return Err(ApiError::Status {
                status: 404,
                message: Some("Product not found".to_string()),
            });
        };

        if !state.wishlist.iter().any(|p| p.id == *product_id) {
            state.wishlist.push(product);
        }

        Ok(Self::wishlist_envelope(&state, "Item added to wishlist"))
    }

    async fn remove_from_wishlist(
        &self,
        product_id: &ProductId,
    ) -> Result<WishlistEnvelope, ApiError> {
        let mut state = self.lock();
        Self::check_failure(&mut state, MockOp::RemoveFromWishlist)?;

        state.wishlist.retain(|p| p.id != *product_id);
        Ok(Self::wishlist_envelope(&state, "Item removed from wishlist"))
    }
}

/// Build a minimal in-stock product for tests.
#[must_use]
pub fn product(id: &str, price_units: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        price: Price::from_units(price_units),
        original_price: None,
        image: format!("/images/{id}.jpg"),
        category: None,
        count_in_stock: 25,
        rating: 4.2,
        num_reviews: 7,
        discount: None,
    }
}

/// Initialize tracing output for tests (first caller wins).
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_test_writer()
            .try_init();
    });
}
