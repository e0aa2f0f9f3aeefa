//! Stripe webhook handler
//!
//! The single mutation path for two facts: a booking payment confirms the
//! `AWAITING_PAYMENT -> ACCEPTED` transition, and a plan purchase lands on
//! the buyer's profile. Stripe retries deliveries, so both paths must be
//! idempotent; the booking transition already is, and the plan write is a
//! same-value overwrite.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use std::time::Instant;

use hearth_billing_core::{BillingError, CheckoutSessionData, WebhookEventData};
use hearth_booking_core::{BookingAction, BookingActor, BookingError};
use hearth_types::{BookingId, UserId};

use crate::state::AppState;

/// POST /webhooks/stripe
///
/// Handle Stripe webhook events with signature verification.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let start = Instant::now();

    // Extract Stripe signature header
    let Some(sig_header) = headers.get("stripe-signature") else {
        tracing::warn!("Missing Stripe-Signature header");
        return StatusCode::BAD_REQUEST;
    };

    let Ok(signature) = sig_header.to_str() else {
        tracing::warn!("Invalid Stripe-Signature header encoding");
        return StatusCode::BAD_REQUEST;
    };

    // Verify before trusting anything in the body
    let event = match state.webhooks.verify_and_parse(&body, signature) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = ?e, "Webhook verification failed");
            metrics::counter!("marketplace_webhooks_processed_total", "status" => "rejected")
                .increment(1);
            return StatusCode::BAD_REQUEST;
        }
    };

    let result = match event.data {
        WebhookEventData::CheckoutSession(session) => {
            process_checkout_completed(&state, session).await
        }
        // Unknown events are acknowledged so Stripe stops retrying them
        WebhookEventData::Raw(_) => Ok(()),
    };

    match result {
        Ok(()) => {
            metrics::counter!("marketplace_webhooks_processed_total", "status" => "success")
                .increment(1);
            metrics::histogram!(
                "marketplace_operation_duration_seconds",
                "operation" => "process_webhook",
                "result" => "ok"
            )
            .record(start.elapsed().as_secs_f64());

            StatusCode::OK
        }
        Err(e) => {
            tracing::error!(error = %e, event_id = %event.id, "Webhook processing failed");
            metrics::counter!("marketplace_webhooks_processed_total", "status" => "error")
                .increment(1);

            // 4xx stops Stripe from retrying a payload that can never apply;
            // 5xx asks it to retry a transient failure.
            if e.permanent {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// A webhook processing failure, split by whether a retry could succeed
struct WebhookFailure {
    message: String,
    permanent: bool,
}

impl std::fmt::Display for WebhookFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

async fn process_checkout_completed(
    state: &AppState,
    session: CheckoutSessionData,
) -> Result<(), WebhookFailure> {
    if let Some(booking_id) = &session.booking_id {
        return confirm_booking_payment(state, booking_id).await;
    }

    if let (Some(user_id), Some(plan_id)) = (&session.user_id, &session.plan_id) {
        return apply_plan_purchase(state, user_id, plan_id).await;
    }

    tracing::warn!(session_id = %session.session_id, "Checkout session carries no known metadata");
    Err(WebhookFailure {
        message: "checkout session metadata missing".to_string(),
        permanent: true,
    })
}

async fn confirm_booking_payment(
    state: &AppState,
    booking_id: &str,
) -> Result<(), WebhookFailure> {
    let booking_id = BookingId::parse(booking_id).map_err(|_| WebhookFailure {
        message: format!("invalid bookingId metadata: {booking_id}"),
        permanent: true,
    })?;

    match state
        .bookings
        .transition(
            booking_id,
            BookingActor::PaymentCollaborator,
            BookingAction::PaymentCompleted,
        )
        .await
    {
        Ok(booking) => {
            tracing::info!(booking_id = %booking.id, status = %booking.status, "Booking payment confirmed");
            Ok(())
        }
        // A paid-for booking that no longer exists will not appear later
        Err(e @ BookingError::BookingNotFound) => Err(WebhookFailure {
            message: e.to_string(),
            permanent: true,
        }),
        Err(e) => Err(WebhookFailure {
            message: e.to_string(),
            permanent: false,
        }),
    }
}

async fn apply_plan_purchase(
    state: &AppState,
    user_id: &str,
    plan_id: &str,
) -> Result<(), WebhookFailure> {
    let user_id = UserId::parse(user_id).map_err(|_| WebhookFailure {
        message: format!("invalid userId metadata: {user_id}"),
        permanent: true,
    })?;

    match state.billing.apply_plan_purchase(user_id, plan_id).await {
        Ok(plan) => {
            tracing::info!(user_id = %user_id, plan = %plan, "Subscription plan applied");
            metrics::counter!("marketplace_plans_applied_total").increment(1);
            Ok(())
        }
        Err(e @ BillingError::UnknownPlan(_)) => Err(WebhookFailure {
            message: e.to_string(),
            permanent: true,
        }),
        Err(e) => Err(WebhookFailure {
            message: e.to_string(),
            permanent: false,
        }),
    }
}
