//! Cache value variants for catalog reads.

use crate::types::{Category, Product, ProductPage};

/// Values stored in the catalog cache.
///
/// One cache holds all catalog read results; the enum keeps entry sizes
/// uniform and lets hit checks pattern-match the expected variant.
#[derive(Debug, Clone)]
pub enum CacheValue {
    /// A single product.
    Product(Box<Product>),
    /// A page of products.
    Products(ProductPage),
    /// The full category list.
    Categories(Vec<Category>),
}
