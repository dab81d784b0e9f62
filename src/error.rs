// src/error.rs
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Failure kinds surfaced at the service boundary. Every variant renders as
/// `{ "success": false, "message": ... }`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    FetchFailed(String),

    #[error("{0}")]
    UpdateFailed(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),
}

impl ServiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::InvalidArgument(message.into())
    }

    /// Logs the storage failure and hides its details from the caller.
    pub fn fetch_failed(step: &str, err: StoreError) -> Self {
        log::error!("store error [{}]: {}", step, err);
        ServiceError::FetchFailed("Failed to fetch".into())
    }

    pub fn update_failed(step: &str, err: StoreError) -> Self {
        log::error!("store error [{}]: {}", step, err);
        ServiceError::UpdateFailed("Failed to update".into())
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        log::warn!("validation rejected payload: {}", errors);
        ServiceError::InvalidArgument(errors.to_string())
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": self.to_string(),
        }))
    }
}
