//! Shared handler utilities
//!
//! Common validation, metrics, and helper functions used across handlers.
//! Centralizing these ensures consistent limits and metrics.

use std::time::Instant;

use bigdecimal::{BigDecimal, Zero};

use crate::error::ApiError;

// ============================================================================
// Input Validation
// ============================================================================

/// Maximum length for service names
pub const MAX_NAME_LEN: usize = 120;

/// Maximum length for long user-provided text (descriptions, feedback)
pub const MAX_TEXT_LEN: usize = 2000;

/// Validate a required user-provided name field.
pub fn validate_name(value: &str, field_name: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{field_name} cannot be empty")));
    }
    if value.len() > MAX_NAME_LEN {
        return Err(ApiError::BadRequest(format!(
            "{field_name} too long (max {MAX_NAME_LEN} chars)"
        )));
    }
    Ok(())
}

/// Validate long-form text is within safe bounds.
pub fn validate_text(value: &str, field_name: &str) -> Result<(), ApiError> {
    if value.len() > MAX_TEXT_LEN {
        return Err(ApiError::BadRequest(format!(
            "{field_name} too long (max {MAX_TEXT_LEN} chars)"
        )));
    }
    Ok(())
}

/// Validate a listed price: non-negative, at most two decimal places.
pub fn validate_price(price: &BigDecimal) -> Result<(), ApiError> {
    if price < &BigDecimal::zero() {
        return Err(ApiError::BadRequest("Price cannot be negative".into()));
    }
    let (_, scale) = price.as_bigint_and_exponent();
    if scale > 2 {
        return Err(ApiError::BadRequest(
            "Price cannot have more than two decimal places".into(),
        ));
    }
    Ok(())
}

// ============================================================================
// Metrics Helpers
// ============================================================================

/// Record HTTP operation duration with result label.
///
/// Labels: operation, result (ok/err)
#[inline]
pub fn record_op_duration(operation: &'static str, start: Instant, success: bool) {
    let result = if success { "ok" } else { "err" };
    metrics::histogram!(
        "marketplace_operation_duration_seconds",
        "operation" => operation,
        "result" => result
    )
    .record(start.elapsed().as_secs_f64());
}

// ============================================================================
// Tests
// ============================================================================
