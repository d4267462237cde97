//! REST client for the storefront backend.
//!
//! Uses `reqwest` for HTTP. Catalog reads are cached with `moka`
//! (5-minute TTL by default); cart and wishlist are never cached because
//! they are mutable state the services mirror directly.
//!
//! The cart/wishlist call contract lives in [`CommerceBackend`] so the
//! state services can be driven by a mock in tests; [`ApiClient`] is the
//! production implementation.

mod cache;
pub mod envelope;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use tracing::{debug, instrument};
use url::Url;
use verdant_core::{AddressId, OrderId, ProductId};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::{SESSION_HEADER, SessionId};
use crate::types::{
    Address, AddressInput, Category, NewOrder, Order, Product, ProductPage, ProductQuery,
};

use cache::CacheValue;
pub use envelope::{
    AddressBookEnvelope, CartEnvelope, CategoryListEnvelope, OrderEnvelope, OrderListEnvelope,
    WishlistEnvelope,
};

// =============================================================================
// CommerceBackend
// =============================================================================

/// The fixed call contract the cart and wishlist services issue against
/// the backend.
///
/// Every mutating response embeds the full updated collection, never a
/// delta; the replace-whole-snapshot design of the services depends on it.
#[allow(async_fn_in_trait)]
pub trait CommerceBackend: Send + Sync {
    /// Fetch the current cart snapshot.
    async fn fetch_cart(&self) -> Result<CartEnvelope, ApiError>;

    /// Add a product to the cart.
    async fn add_to_cart(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartEnvelope, ApiError>;

    /// Set the quantity of a cart line.
    async fn update_cart_item(
        &self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<CartEnvelope, ApiError>;

    /// Remove a cart line regardless of quantity.
    async fn remove_from_cart(&self, product_id: &ProductId) -> Result<CartEnvelope, ApiError>;

    /// Fetch the current wishlist snapshot.
    async fn fetch_wishlist(&self) -> Result<WishlistEnvelope, ApiError>;

    /// Add a product to the wishlist.
    async fn add_to_wishlist(&self, product_id: &ProductId) -> Result<WishlistEnvelope, ApiError>;

    /// Remove a product from the wishlist.
    async fn remove_from_wishlist(
        &self,
        product_id: &ProductId,
    ) -> Result<WishlistEnvelope, ApiError>;
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Verdant storefront REST API.
///
/// Cheaply cloneable; every request carries the session identity header
/// and, when configured, a bearer token.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<secrecy::SecretString>,
    session: SessionId,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: SessionId) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ApiError::Http)?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        // A trailing slash keeps Url::join from replacing any path prefix
        // the deployment mounts the API under.
        let mut base_url = config.api_url.clone();
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                api_token: config.api_token.clone(),
                session,
                cache,
            }),
        })
    }

    /// Build a request with the session identity and auth headers attached.
    fn builder(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.inner.base_url.join(path)?;

        let mut request = self
            .inner
            .client
            .request(method, url)
            .header(SESSION_HEADER, self.inner.session.as_str());

        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        Ok(request)
    }

    /// Send a request and convert the response through the normalization
    /// boundary.
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(ApiError::from_transport)?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let text = response.text().await.map_err(ApiError::from_transport)?;

        if !status.is_success() {
            debug!(status = %status, "backend returned error status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: envelope::extract_error_message(&text),
            });
        }

        let body: Value = serde_json::from_str(&text)?;
        envelope::normalize(body)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.builder(Method::GET, path)?).await
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &Value,
    ) -> Result<T, ApiError> {
        self.execute(self.builder(method, path)?.json(body)).await
    }

    // =========================================================================
    // Catalog Methods (cached)
    // =========================================================================

    /// Get a paginated product listing.
    ///
    /// Search queries bypass the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let cache_key = format!(
            "products:{}:{}",
            query.page.unwrap_or(1),
            query.category.as_deref().unwrap_or("")
        );

        if !query.is_search()
            && let Some(CacheValue::Products(page)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let request = self.builder(Method::GET, "api/products")?.query(query);
        let page: ProductPage = self.execute(request).await?;

        if !query.is_search() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(page.clone()))
                .await;
        }

        Ok(page)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.get(&format!("api/products/{product_id}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get all product categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<Category>, ApiError> {
        let cache_key = "categories".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let envelope: CategoryListEnvelope = self.get("api/categories").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(envelope.categories.clone()))
            .await;

        Ok(envelope.categories)
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    // =========================================================================
    // Address Methods
    // =========================================================================

    /// Get the saved address book.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_addresses(&self) -> Result<Vec<Address>, ApiError> {
        let envelope: AddressBookEnvelope = self.get("api/addresses").await?;
        Ok(envelope.addresses)
    }

    /// Add an address; the response embeds the full updated address book.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the request fails.
    #[instrument(skip(self, address))]
    pub async fn add_address(&self, address: &AddressInput) -> Result<AddressBookEnvelope, ApiError> {
        let body = serde_json::to_value(address)?;
        self.send_json(Method::POST, "api/addresses/add", &body).await
    }

    /// Update an address; the response embeds the full updated address book.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is unknown or the request fails.
    #[instrument(skip(self, address), fields(address_id = %address_id))]
    pub async fn update_address(
        &self,
        address_id: &AddressId,
        address: &AddressInput,
    ) -> Result<AddressBookEnvelope, ApiError> {
        let body = serde_json::to_value(address)?;
        self.send_json(Method::PUT, &format!("api/addresses/{address_id}"), &body)
            .await
    }

    /// Delete an address; the response embeds the full updated address book.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(address_id = %address_id))]
    pub async fn delete_address(
        &self,
        address_id: &AddressId,
    ) -> Result<AddressBookEnvelope, ApiError> {
        self.execute(self.builder(Method::DELETE, &format!("api/addresses/{address_id}"))?)
            .await
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Get the order history for this session.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_orders(&self) -> Result<Vec<Order>, ApiError> {
        let envelope: OrderListEnvelope = self.get("api/orders").await?;
        Ok(envelope.orders)
    }

    /// Get a single order by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: &OrderId) -> Result<Order, ApiError> {
        self.get(&format!("api/orders/{order_id}")).await
    }

    /// Place an order from the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty, the address is unknown, or
    /// the request fails.
    #[instrument(skip(self, order))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<OrderEnvelope, ApiError> {
        let body = serde_json::to_value(order)?;
        self.send_json(Method::POST, "api/orders", &body).await
    }
}

// =============================================================================
// Cart / Wishlist Contract (not cached - mutable state)
// =============================================================================

impl CommerceBackend for ApiClient {
    async fn fetch_cart(&self) -> Result<CartEnvelope, ApiError> {
        self.get("api/cart").await
    }

    async fn add_to_cart(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartEnvelope, ApiError> {
        let body = json!({ "productId": product_id, "quantity": quantity });
        self.send_json(Method::POST, "api/cart/add", &body).await
    }

    async fn update_cart_item(
        &self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<CartEnvelope, ApiError> {
        let body = json!({ "productId": product_id, "quantity": quantity });
        self.send_json(Method::PUT, "api/cart/update", &body).await
    }

    async fn remove_from_cart(&self, product_id: &ProductId) -> Result<CartEnvelope, ApiError> {
        self.execute(self.builder(Method::DELETE, &format!("api/cart/remove/{product_id}"))?)
            .await
    }

    async fn fetch_wishlist(&self) -> Result<WishlistEnvelope, ApiError> {
        self.get("api/wishlist").await
    }

    async fn add_to_wishlist(&self, product_id: &ProductId) -> Result<WishlistEnvelope, ApiError> {
        let body = json!({ "productId": product_id });
        self.send_json(Method::POST, "api/wishlist/add", &body).await
    }

    async fn remove_from_wishlist(
        &self,
        product_id: &ProductId,
    ) -> Result<WishlistEnvelope, ApiError> {
        self.execute(self.builder(Method::DELETE, &format!("api/wishlist/remove/{product_id}"))?)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn test_config(base: &str) -> ClientConfig {
        ClientConfig {
            api_url: Url::parse(base).unwrap(),
            api_token: None,
            session_file: PathBuf::from(".verdant-session"),
            request_timeout: Duration::from_secs(5),
            catalog_cache_ttl: Duration::from_secs(300),
        }
    }

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let client = ApiClient::new(
            &test_config("https://api.verdantmarket.dev"),
            SessionId::load_or_create(&std::env::temp_dir().join("verdant-api-test-session"))
                .unwrap(),
        )
        .unwrap();

        let url = client.inner.base_url.join("api/cart").unwrap();
        assert_eq!(url.as_str(), "https://api.verdantmarket.dev/api/cart");
    }

    #[test]
    fn test_base_url_path_prefix_preserved() {
        let client = ApiClient::new(
            &test_config("https://shop.example.com/backend"),
            SessionId::load_or_create(&std::env::temp_dir().join("verdant-api-test-session"))
                .unwrap(),
        )
        .unwrap();

        let url = client.inner.base_url.join("api/cart").unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/backend/api/cart");
    }

    #[test]
    fn test_product_query_becomes_query_string() {
        let client = ApiClient::new(
            &test_config("https://api.verdantmarket.dev"),
            SessionId::load_or_create(&std::env::temp_dir().join("verdant-api-test-session"))
                .unwrap(),
        )
        .unwrap();

        let query = ProductQuery {
            keyword: Some("mug".to_string()),
            category: None,
            page: Some(2),
        };
        let request = client
            .builder(Method::GET, "api/products")
            .unwrap()
            .query(&query)
            .build()
            .unwrap();

        assert_eq!(request.url().query(), Some("keyword=mug&page=2"));
    }
}
