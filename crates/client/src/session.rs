//! Session identity for anonymous cart/wishlist association.
//!
//! The backend keys anonymous carts and wishlists on an opaque string the
//! client generates once and then reuses for the life of the installation.
//! The identity is persisted to a file; it is read-only after creation and
//! shared by every outbound request via the `x-session-id` header.

use std::io;
use std::path::Path;

use uuid::Uuid;

/// Header name the identity travels under.
pub const SESSION_HEADER: &str = "x-session-id";

/// An opaque, generated-once session identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    /// Load the persisted identity, or generate and persist a new one.
    ///
    /// The identity file holds the bare string. A file that exists but is
    /// empty (or whitespace) is treated as absent and overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    pub fn load_or_create(path: &Path) -> io::Result<Self> {
        if let Ok(contents) = std::fs::read_to_string(path) {
            let trimmed = contents.trim();
            if !trimmed.is_empty() {
                return Ok(Self(trimmed.to_string()));
            }
        }

        let id = format!("sess_{}", Uuid::new_v4().simple());
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &id)?;
        tracing::debug!(path = %path.display(), "generated new session identity");

        Ok(Self(id))
    }

    /// The identity as a header value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
