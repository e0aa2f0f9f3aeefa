//! Booking lifecycle handlers
//!
//! Every status change goes through `BookingService::transition`, which
//! re-checks the acting identity and the prior status atomically. Handlers
//! here only translate HTTP into (actor, action) pairs.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use hearth_booking_core::{BookingAction, BookingActor};
use hearth_types::{Booking, BookingId, Role, ServiceId};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthUser;
use crate::handlers::shared::{record_op_duration, validate_text};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub service_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub feedback: String,
    pub rating: i32,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    #[serde(flatten)]
    pub booking: Booking,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self { booking }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateBookingRequest>,
) -> ApiResult<Json<BookingResponse>> {
    let start = Instant::now();

    let booking = state
        .bookings
        .create_booking(user.user_id, ServiceId::from(req.service_id))
        .await?;

    metrics::counter!("marketplace_bookings_created_total").increment(1);
    record_op_duration("create_booking", start, true);

    Ok(Json(booking.into()))
}

/// GET /api/v1/bookings
///
/// Customers see the bookings they requested; providers see the bookings
/// made against their listings.
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<BookingResponse>>> {
    let start = Instant::now();

    let profile = state
        .repos
        .profiles
        .find_by_id(user.user_id.0)
        .await?
        .ok_or_else(|| ApiError::NotFound("profile".into()))?;

    let bookings = match profile.role().map_err(ApiError::Database)? {
        Role::Customer => state.bookings.list_for_customer(user.user_id).await?,
        Role::ServiceProvider | Role::Admin => {
            state.bookings.list_for_provider(user.user_id).await?
        }
    };

    record_op_duration("list_bookings", start, true);

    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/bookings/{id}/accept
pub async fn accept_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BookingResponse>> {
    apply_transition(state, user, id, BookingAction::Accept, "accept_booking").await
}

/// POST /api/v1/bookings/{id}/decline
pub async fn decline_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BookingResponse>> {
    apply_transition(state, user, id, BookingAction::Decline, "decline_booking").await
}

/// POST /api/v1/bookings/{id}/start
pub async fn start_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BookingResponse>> {
    apply_transition(state, user, id, BookingAction::StartWork, "start_booking").await
}

/// POST /api/v1/bookings/{id}/complete
pub async fn complete_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BookingResponse>> {
    apply_transition(state, user, id, BookingAction::EndWork, "complete_booking").await
}

/// POST /api/v1/bookings/{id}/feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<FeedbackRequest>,
) -> ApiResult<Json<BookingResponse>> {
    let start = Instant::now();

    validate_text(&req.feedback, "feedback")?;

    let booking = state
        .bookings
        .submit_feedback(BookingId::from(id), user.user_id, &req.feedback, req.rating)
        .await?;

    metrics::counter!("marketplace_feedback_submitted_total").increment(1);
    record_op_duration("submit_feedback", start, true);

    Ok(Json(booking.into()))
}

/// All four provider lifecycle endpoints share this shape
async fn apply_transition(
    state: AppState,
    user: AuthUser,
    id: Uuid,
    action: BookingAction,
    operation: &'static str,
) -> ApiResult<Json<BookingResponse>> {
    let start = Instant::now();

    let booking = state
        .bookings
        .transition(
            BookingId::from(id),
            BookingActor::Provider(user.user_id),
            action,
        )
        .await?;

    metrics::counter!("marketplace_booking_transitions_total", "action" => operation).increment(1);
    record_op_duration(operation, start, true);

    Ok(Json(booking.into()))
}
