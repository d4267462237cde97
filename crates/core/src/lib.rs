//! Verdant Core - Shared types library.
//!
//! This crate provides common types used across Verdant Market components:
//! - `client` - Storefront synchronization client (cart, wishlist, notifications)
//! - `integration-tests` - Mock-backend test harness
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
