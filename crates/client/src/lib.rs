//! Verdant storefront synchronization client.
//!
//! This crate owns the client-side mirror of a shopper's cart and wishlist
//! and the short-lived notifications produced by mutating them. The remote
//! REST backend is always the source of truth: every successful mutation
//! replaces the whole local snapshot with the collection the server sends
//! back, and a failed mutation leaves local state untouched.
//!
//! # Architecture
//!
//! - [`api::ApiClient`] - `reqwest`-backed REST client (catalog reads cached
//!   via `moka`, cart/wishlist never cached)
//! - [`api::CommerceBackend`] - the call contract the services depend on;
//!   swap in a mock for tests
//! - [`services`] - cart and wishlist state services plus the notification bus
//! - [`state::Storefront`] - constructs the services once and hands them out
//!   by reference (no ambient singletons)
//!
//! # Example
//!
//! ```rust,ignore
//! use verdant_client::{ClientConfig, Storefront};
//! use verdant_core::ProductId;
//!
//! let config = ClientConfig::from_env()?;
//! let store = Storefront::new(&config)?;
//! store.initialize().await;
//!
//! let outcome = store.cart().add_item(&ProductId::new("64f1c2"), 1).await;
//! store.notifier().report(&outcome);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod state;
pub mod types;

pub use api::{ApiClient, CommerceBackend};
pub use config::ClientConfig;
pub use error::ApiError;
pub use services::{MutationOutcome, cart::CartService, notify::Notifier, wishlist::WishlistService};
pub use session::SessionId;
pub use state::Storefront;
