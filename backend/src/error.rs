//! Error handling for the spraying advisory server
//!
//! Provides consistent JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{AdvisoryError, ForecastError};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    // Advisory errors
    #[error("Forecast unavailable: {message}")]
    ForecastUnavailable {
        message: String,
        cause: Option<ForecastError>,
    },

    // External service errors
    #[error("Weather service unavailable")]
    WeatherServiceUnavailable,

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl From<AdvisoryError> for AppError {
    fn from(err: AdvisoryError) -> Self {
        match err {
            AdvisoryError::InvalidInput { field, message } => AppError::Validation { field, message },
            AdvisoryError::ForecastUnavailable { message, source } => AppError::ForecastUnavailable {
                message,
                cause: source,
            },
        }
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::NotConfigured => AppError::WeatherServiceUnavailable,
            ForecastError::LocationNotFound => AppError::LocationNotFound(err.to_string()),
            ForecastError::Unavailable(_) | ForecastError::InvalidResponse(_) => {
                AppError::ExternalService(err.to_string())
            }
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
        }
    }
}

impl AppError {
    /// HTTP status and response body for this error
    pub fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            // A misconfigured source is an operator problem, not a missing forecast
            AppError::ForecastUnavailable {
                cause: Some(ForecastError::NotConfigured),
                message,
            } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail::new("WEATHER_SERVICE_UNAVAILABLE", message.clone()),
            ),
            AppError::ForecastUnavailable {
                cause: Some(ForecastError::Unavailable(_) | ForecastError::InvalidResponse(_)),
                message,
            } => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail::new("FORECAST_UNAVAILABLE", message.clone()),
            ),
            AppError::ForecastUnavailable { message, .. } => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("FORECAST_UNAVAILABLE", message.clone()),
            ),
            AppError::WeatherServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail::new(
                    "WEATHER_SERVICE_UNAVAILABLE",
                    "Weather service is temporarily unavailable",
                ),
            ),
            AppError::LocationNotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("LOCATION_NOT_FOUND", msg.clone()),
            ),
            AppError::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail::new("EXTERNAL_SERVICE_ERROR", format!("External service error: {}", msg)),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
