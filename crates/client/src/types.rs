//! Domain types for the storefront backend.
//!
//! These mirror the backend's JSON shapes (camelCase field names, Mongo-style
//! `_id` identifiers). Products embedded in cart and wishlist responses are
//! read-only snapshots owned by the server; the client never mutates them,
//! only requests membership or quantity changes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use verdant_core::{AddressId, CategoryId, OrderId, Price, ProductId};

// =============================================================================
// Catalog Types
// =============================================================================

/// A product as embedded in catalog, cart, and wishlist responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current price, after any discount.
    pub price: Price,
    /// Pre-discount price, if the product is on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Primary image URL.
    pub image: String,
    /// Category name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Units in stock.
    #[serde(default)]
    pub count_in_stock: i64,
    /// Average review rating.
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews behind the rating.
    #[serde(default)]
    pub num_reviews: i64,
    /// Discount percentage, if on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u32>,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category ID.
    #[serde(rename = "_id")]
    pub id: CategoryId,
    /// Display name.
    pub name: String,
}

/// One page of a paginated product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    /// Products in this page.
    pub products: Vec<Product>,
    /// Current page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: i64,
    /// Total page count.
    #[serde(default = "default_page")]
    pub pages: i64,
}

const fn default_page() -> i64 {
    1
}

/// Query parameters for product listings.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    /// Free-text search keyword.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Restrict to a category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Page number (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
}

impl ProductQuery {
    /// Whether the query has a search component (never cached).
    #[must_use]
    pub const fn is_search(&self) -> bool {
        self.keyword.is_some()
    }
}

// =============================================================================
// Cart Types
// =============================================================================

/// A line item in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product snapshot.
    pub product: Product,
    /// Quantity, at least 1 in server-returned snapshots.
    pub quantity: i64,
    /// Selected size, for sized products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl CartLine {
    /// Line total using the current (possibly discounted) price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.times(self.quantity)
    }
}

/// A shopping cart snapshot.
///
/// The server enforces at most one line per (product, size) pair; the client
/// treats the fetched cart as ground truth and never merges locally.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in server-defined order.
    #[serde(default)]
    pub items: Vec<CartLine>,
}

impl Cart {
    /// Sum of all line quantities (badge count).
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Sum of line totals at the current price of each line.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartLine::line_total).sum()
    }
}

// =============================================================================
// Address Types
// =============================================================================

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Address ID.
    #[serde(rename = "_id")]
    pub id: AddressId,
    /// Recipient name.
    pub full_name: String,
    /// Contact phone number.
    pub phone: String,
    /// Street address.
    pub street: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Postal code.
    pub postal_code: String,
    /// Country.
    pub country: String,
    /// Whether this is the default delivery address.
    #[serde(default)]
    pub is_default: bool,
}

/// Payload for creating or updating an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

// =============================================================================
// Order Types
// =============================================================================

/// A line item captured on a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Product snapshot at order time.
    pub product: Product,
    /// Ordered quantity.
    pub quantity: i64,
    /// Unit price at order time.
    pub price: Price,
    /// Selected size, for sized products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order ID.
    #[serde(rename = "_id")]
    pub id: OrderId,
    /// Ordered items.
    #[serde(default)]
    pub items: Vec<OrderLine>,
    /// Delivery address snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
    /// Order total.
    pub total: Price,
    /// Server-side order status (e.g., "pending", "shipped").
    pub status: String,
    /// Placement timestamp.
    pub created_at: DateTime<Utc>,
}

/// Payload for placing an order from the current cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Address to deliver to.
    pub address_id: AddressId,
}
