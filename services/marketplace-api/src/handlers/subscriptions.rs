//! Subscription plan handlers

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::time::Instant;

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::handlers::payments::CheckoutResponse;
use crate::handlers::shared::record_op_duration;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlanCheckoutRequest {
    /// Purchasable plan id: `basic`, `premium`, `enterprise`, or `provider`
    pub plan_id: String,
}

/// POST /api/v1/subscriptions/checkout
///
/// Start a subscription purchase. The plan lands on the profile only after
/// the payment processor confirms via webhook.
pub async fn plan_checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<PlanCheckoutRequest>,
) -> ApiResult<Json<CheckoutResponse>> {
    let start = Instant::now();

    let session = state
        .billing
        .plan_checkout(user.user_id, &req.plan_id, user.email.as_deref())
        .await?;

    metrics::counter!("marketplace_checkouts_created_total", "kind" => "plan").increment(1);
    record_op_duration("plan_checkout", start, true);

    Ok(Json(CheckoutResponse {
        session_id: session.session_id,
        url: session.url,
    }))
}
