//! API error type shared by the route handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use pricer_core::PricingError;
use pricer_models::payoff::PayoffError;
use serde::Serialize;
use thiserror::Error;

/// Errors a handler can return; always rendered as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input or a pricing failure caused by the request.
    #[error("{0}")]
    BadRequest(String),

    /// Failure unrelated to the request contents.
    #[error("{0}")]
    Internal(String),
}

/// JSON error body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PricingError> for ApiError {
    fn from(err: PricingError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<PayoffError> for ApiError {
    fn from(err: PayoffError) -> Self {
        ApiError::BadRequest(PricingError::from(err).to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("pricing task failed: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_error_maps_to_bad_request() {
        let err: ApiError = PricingError::invalid_parameter("spot", "must be positive, got -1").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "invalid spot: must be positive, got -1");
    }

    #[test]
    fn test_payoff_error_maps_to_bad_request() {
        let err: ApiError = PayoffError::Eval("division by zero".to_string()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("division by zero"));
    }

    #[test]
    fn test_internal_error_status() {
        let err = ApiError::Internal("boom".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
