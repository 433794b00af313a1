//! Participant lookup and mention formatting.

use thiserror::Error;

/// Lookup of a participant failed downstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown user {user_id}: {reason}")]
pub struct DirectoryError {
    pub user_id: String,
    pub reason: String,
}

/// Mention tag for a user ID, as chat clients render it.
pub fn mention_tag(user_id: &str) -> String {
    format!("<@{}>", user_id)
}

/// Resolves stored participant IDs to mentions.
///
/// Transports that must fetch the user before addressing them implement this
/// with a real lookup; failures surface to the player as an internal error.
pub trait UserDirectory {
    fn mention(&self, user_id: &str) -> Result<String, DirectoryError>;
}

/// Formats mentions directly from IDs without any lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagDirectory;

impl UserDirectory for TagDirectory {
    fn mention(&self, user_id: &str) -> Result<String, DirectoryError> {
        Ok(mention_tag(user_id))
    }
}
