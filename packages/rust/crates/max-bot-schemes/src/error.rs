//! Decode errors for update and attachment envelopes.

use thiserror::Error;

/// Failure to turn a raw JSON envelope into a typed value.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The `update_type` discriminator names no known update variant.
    #[error("unknown update type: {0}")]
    UnknownUpdateType(String),

    /// Invalid JSON, a missing discriminator, or a payload that does not fit
    /// the variant its discriminator selected.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl DecodeError {
    /// The offending discriminator when the update type was not recognised.
    #[must_use]
    pub fn unknown_update_type(&self) -> Option<&str> {
        match self {
            Self::UnknownUpdateType(value) => Some(value),
            Self::Malformed(_) => None,
        }
    }
}
