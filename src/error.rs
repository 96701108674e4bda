//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::store::StoreError;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match &self {
            AppError::Pricing(e @ PricingError::InvalidCountry(country)) => (
                StatusCode::BAD_REQUEST,
                "invalid_country",
                e.to_string(),
                Some(json!({ "country": country })),
            ),
            AppError::Pricing(e @ PricingError::InvalidInput { field, .. }) => (
                StatusCode::BAD_REQUEST,
                "invalid_input",
                e.to_string(),
                Some(json!({ "field": field })),
            ),
            AppError::Store(e @ StoreError::Duplicate { .. }) => {
                tracing::warn!("Rejected archive: {}", e);
                (StatusCode::CONFLICT, "duplicate_record", e.to_string(), None)
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "store_error",
                    "Failed to access the calculation archive".to_string(),
                    None,
                )
            }
        };

        let body = PricingErrorResponse {
            error_type: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
