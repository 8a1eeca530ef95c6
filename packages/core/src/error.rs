//! Error types for the adaptation core.

use crate::kind::ResourceKind;

/// Errors raised by the adaptation core and by its collaborators.
///
/// Lazy-loading paths never surface these to callers: identifiers and
/// relation accessors log them and degrade to "absent".
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A record could not be fetched from the record source.
    #[error("failed to load {kind} {id}: {message}")]
    Fetch {
        kind: ResourceKind,
        id: i64,
        message: String,
    },

    /// Field definitions for a resource kind could not be fetched.
    #[error("failed to load field definitions for {kind}: {message}")]
    FieldDefinitions { kind: ResourceKind, message: String },

    /// The resource kind has no field definition endpoint.
    #[error("{kind} has no field definitions")]
    NoFieldDefinitions { kind: ResourceKind },

    /// An operation an identifier cannot satisfy from its id or its record.
    #[error("{target} {id} does not support `{name}`")]
    Unsupported {
        name: String,
        id: i64,
        target: ResourceKind,
    },

    /// An integer operation on an identifier left the `i64` range.
    #[error("`{name}` of {target} {id} overflows")]
    Overflow {
        name: String,
        id: i64,
        target: ResourceKind,
    },

    /// A payload that is not shaped like a record.
    #[error("invalid payload: {message}")]
    InvalidPayload { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Error::InvalidPayload {
            message: message.into(),
        }
    }
}
