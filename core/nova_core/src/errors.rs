//! Domain error taxonomy shared by the core and the HTTP service.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An event, guest or user id that does not resolve.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Missing required field, bad column mapping, malformed value.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A uniqueness rule was violated (e.g. a registered email).
    #[error("Duplicate: {0}")]
    Duplicate(String),
}

impl Error {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
