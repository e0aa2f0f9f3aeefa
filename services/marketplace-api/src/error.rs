//! Error types for the Marketplace API service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use hearth_billing_core::BillingError;
use hearth_booking_core::BookingError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error")]
    Database(#[from] hearth_db::DbError),

    #[error("{0}")]
    Booking(#[from] BookingError),

    #[error("{0}")]
    Billing(#[from] BillingError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Booking(e) => booking_status(e),
            Self::Billing(e) => billing_status(e),
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Booking(e) => booking_code(e),
            Self::Billing(e) => billing_code(e),
            Self::Database(_) => "INTERNAL_ERROR",
        }
    }
}

fn booking_status(e: &BookingError) -> StatusCode {
    match e {
        _ if e.is_not_found() => StatusCode::NOT_FOUND,
        _ if e.is_conflict() => StatusCode::CONFLICT,
        BookingError::Validation(_) => StatusCode::BAD_REQUEST,
        BookingError::Forbidden => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn booking_code(e: &BookingError) -> &'static str {
    match e {
        BookingError::BookingNotFound => "BOOKING_NOT_FOUND",
        BookingError::ServiceNotFound => "SERVICE_NOT_FOUND",
        BookingError::ProfileNotFound => "PROFILE_NOT_FOUND",
        BookingError::Validation(_) => "VALIDATION_ERROR",
        BookingError::Forbidden => "FORBIDDEN",
        BookingError::InvalidTransition { .. } => "INVALID_TRANSITION",
        BookingError::DuplicateBooking => "DUPLICATE_BOOKING",
        BookingError::Conflict => "CONFLICT",
        BookingError::FeedbackNotAllowed { .. } => "FEEDBACK_NOT_ALLOWED",
        BookingError::FeedbackAlreadySubmitted => "FEEDBACK_ALREADY_SUBMITTED",
        BookingError::Database(_) => "INTERNAL_ERROR",
    }
}

fn billing_status(e: &BillingError) -> StatusCode {
    match e {
        _ if e.is_not_found() => StatusCode::NOT_FOUND,
        _ if e.is_conflict() => StatusCode::CONFLICT,
        BillingError::Forbidden => StatusCode::FORBIDDEN,
        BillingError::UnknownPlan(_) => StatusCode::BAD_REQUEST,
        BillingError::WebhookError(_) => StatusCode::BAD_REQUEST,
        // The payment processor failed us, not the caller
        BillingError::ProviderError(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn billing_code(e: &BillingError) -> &'static str {
    match e {
        BillingError::BookingNotFound => "BOOKING_NOT_FOUND",
        BillingError::ServiceNotFound => "SERVICE_NOT_FOUND",
        BillingError::ProfileNotFound => "PROFILE_NOT_FOUND",
        BillingError::Forbidden => "FORBIDDEN",
        BillingError::NotAwaitingPayment { .. } => "NOT_AWAITING_PAYMENT",
        BillingError::SessionConflict => "SESSION_CONFLICT",
        BillingError::UnknownPlan(_) => "UNKNOWN_PLAN",
        BillingError::ProviderError(_) => "PROVIDER_ERROR",
        BillingError::WebhookError(_) => "WEBHOOK_ERROR",
        BillingError::Database(_) | BillingError::Internal(_) => "INTERNAL_ERROR",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log internal errors
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self, "Internal API error");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
