//! State services for the storefront client.
//!
//! # Services
//!
//! - `cart` - authoritative local mirror of the cart
//! - `wishlist` - authoritative local mirror of the wishlist
//! - `notify` - short-lived, self-expiring status messages
//!
//! Every mutating service operation resolves to a [`MutationOutcome`]
//! instead of raising, so the presentation layer never needs error
//! handling for ordinary failures.

pub mod cart;
pub mod notify;
pub mod wishlist;

use crate::error::ApiError;
use notify::Severity;

/// Result descriptor of a mutating operation.
///
/// Drives notifications: the presentation layer forwards outcomes to the
/// [`notify::Notifier`] unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Whether the mutation was applied server-side.
    pub success: bool,
    /// Message to show the user.
    pub message: String,
}

impl MutationOutcome {
    /// Successful outcome, preferring the server's message.
    pub(crate) fn succeeded(message: Option<String>, fallback: &str) -> Self {
        Self {
            success: true,
            message: message.unwrap_or_else(|| fallback.to_string()),
        }
    }

    /// Failed outcome. A server-reported message is surfaced verbatim;
    /// transport and shape errors fall back to the per-operation generic.
    pub(crate) fn failed(error: &ApiError, fallback: &str) -> Self {
        Self {
            success: false,
            message: error
                .server_message()
                .unwrap_or(fallback)
                .to_string(),
        }
    }

    /// Notification severity for this outcome.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        if self.success {
            Severity::Success
        } else {
            Severity::Danger
        }
    }
}
