//! Error types shared across crates.
//!
//! Two families matter to callers:
//! - [`ValidationError`]: the caller sent a malformed or incomplete request.
//! - [`ProducerError`]: result production failed for reasons internal to the server.
//!
//! Rate limiting lives in the server as an admission outcome, not here.

use std::time::Duration;

use thiserror::Error;

/// A request failed boundary validation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or empty.
    #[error("missing required field '{field}'")]
    MissingField {
        /// Wire name of the field (e.g. `businessQuery`).
        field: &'static str,
    },

    /// A field is present but its value is not accepted.
    #[error("invalid value for '{field}': {reason}")]
    InvalidField {
        /// Wire name of the field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The body could not be decoded at all.
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

impl ValidationError {
    /// Machine-readable code for the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::InvalidField { .. } => "INVALID_FIELD",
            Self::MalformedBody(_) => "MALFORMED_BODY",
        }
    }
}

/// Result production failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProducerError {
    /// The producer could not serve the request right now.
    #[error("producer unavailable: {0}")]
    Unavailable(String),

    /// Production exceeded its time bound.
    #[error("production timed out after {0:?}")]
    Timeout(Duration),

    /// The producer panicked while generating a result.
    #[error("producer panicked")]
    Panicked,
}
