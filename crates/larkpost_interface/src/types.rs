//! Shared value types for collaborator traits.

use serde::{Deserialize, Serialize};

/// Platform-specific post identifier.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[display("{}", _0)]
pub struct PostId(pub String);

impl PostId {
    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
