//! Application-wide error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] nova_core::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Stored data error: {0}")]
    Corrupt(String),

    #[error("QR encoding error: {0}")]
    Qr(String),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::Domain(nova_core::Error::not_found(entity, id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Domain(nova_core::Error::validation(msg))
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Domain(nova_core::Error::Duplicate(msg.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Domain(nova_core::Error::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Domain(nova_core::Error::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Domain(nova_core::Error::Duplicate(_)) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
