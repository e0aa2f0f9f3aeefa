//! Payment handlers

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use hearth_billing_core::PaymentsDue;
use hearth_types::BookingId;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::handlers::shared::record_op_duration;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub booking_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/payments/summary
///
/// All of the caller's bookings awaiting payment, quoted at their current
/// plan, with totals.
pub async fn payment_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<PaymentsDue>> {
    let start = Instant::now();

    let due = state.billing.payment_summary(user.user_id).await?;

    record_op_duration("payment_summary", start, true);

    Ok(Json(due))
}

/// POST /api/v1/payments/checkout
///
/// Create (or return) the checkout session for one booking. Repeat calls
/// hand back the session already recorded on the booking.
pub async fn booking_checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<Json<CheckoutResponse>> {
    let start = Instant::now();

    let session = state
        .billing
        .booking_checkout(BookingId::from(req.booking_id), user.user_id)
        .await?;

    metrics::counter!("marketplace_checkouts_created_total", "kind" => "booking").increment(1);
    record_op_duration("booking_checkout", start, true);

    Ok(Json(CheckoutResponse {
        session_id: session.session_id,
        url: session.url,
    }))
}
