//! Booking service
//!
//! Orchestrates the state machine over the repositories. Each operation is
//! at most one conditional write; a zero-row result is reported as a
//! conflict, never retried blindly.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use hearth_db::{ActorPredicate, CreateBooking, Repositories, TransitionCommand};
use hearth_types::{Booking, BookingId, BookingStatus, Role, ServiceId, UserId};

use crate::error::BookingError;
use crate::events::{BookingEvent, BookingEventKind, BookingEventPublisher};
use crate::feedback::validate_feedback;
use crate::transition::{plan_transition, BookingAction, BookingActor, Stamp};

/// Booking service
pub struct BookingService {
    repos: Repositories,
    publisher: Arc<dyn BookingEventPublisher>,
}

impl BookingService {
    /// Create a new booking service
    pub fn new(repos: Repositories, publisher: Arc<dyn BookingEventPublisher>) -> Self {
        Self { repos, publisher }
    }

    /// Create a booking request against a service
    ///
    /// The caller must hold the customer role; the booking starts in
    /// `PENDING`. A second active booking for the same (customer, service)
    /// pair is rejected as a conflict, not silently created.
    #[instrument(skip(self))]
    pub async fn create_booking(
        &self,
        customer: UserId,
        service_id: ServiceId,
    ) -> Result<Booking, BookingError> {
        let profile = self
            .repos
            .profiles
            .find_by_id(customer.0)
            .await?
            .ok_or(BookingError::ProfileNotFound)?;

        if profile.role()? != Role::Customer {
            return Err(BookingError::Forbidden);
        }

        let service = self
            .repos
            .services
            .find_by_id(service_id.0)
            .await?
            .ok_or(BookingError::ServiceNotFound)?;

        let row = self
            .repos
            .bookings
            .create_if_no_active(CreateBooking {
                id: BookingId::new().0,
                customer_id: customer.0,
                provider_id: service.created_by,
                service_id: service.id,
            })
            .await?
            .ok_or(BookingError::DuplicateBooking)?;

        let booking = row.to_domain()?;
        info!(booking_id = %booking.id, service_id = %service_id, "Booking created");

        self.publish(&booking, BookingEventKind::Created).await;

        Ok(booking)
    }

    /// Apply a lifecycle transition
    ///
    /// Validates the (status, actor, action) combination in pure code, then
    /// applies it as one conditional update keyed on the expected prior
    /// status and the actor's identity column. A webhook retry of
    /// `PaymentCompleted` against a booking that already moved on is a safe
    /// no-op.
    #[instrument(skip(self))]
    pub async fn transition(
        &self,
        booking_id: BookingId,
        actor: BookingActor,
        action: BookingAction,
    ) -> Result<Booking, BookingError> {
        let row = self
            .repos
            .bookings
            .find_by_id(booking_id.0)
            .await?
            .ok_or(BookingError::BookingNotFound)?;

        let status = row.status()?;

        // Idempotent webhook retries: payment already applied, nothing to do.
        if action == BookingAction::PaymentCompleted
            && actor == BookingActor::PaymentCollaborator
            && matches!(
                status,
                BookingStatus::Accepted | BookingStatus::InProgress | BookingStatus::Completed
            )
        {
            info!(booking_id = %booking_id, %status, "Payment confirmation replayed; no-op");
            return row.to_domain().map_err(Into::into);
        }

        // The actor's id must match the booking row, not just carry the
        // right role. The conditional update re-checks this atomically.
        let predicate = match actor {
            BookingActor::Customer(id) => {
                if row.customer_id != id.0 {
                    return Err(BookingError::Forbidden);
                }
                ActorPredicate::Customer(id.0)
            }
            BookingActor::Provider(id) => {
                if row.provider_id != id.0 {
                    return Err(BookingError::Forbidden);
                }
                ActorPredicate::Provider(id.0)
            }
            BookingActor::PaymentCollaborator => ActorPredicate::Unconditional,
        };

        let plan = plan_transition(status, &actor, action)?;

        let now = Utc::now();
        let cmd = TransitionCommand {
            booking_id: booking_id.0,
            expected: plan.expected,
            next: plan.next,
            actor: predicate,
            set_started_at: matches!(plan.stamp, Stamp::StartedAt).then_some(now),
            set_ended_at: matches!(plan.stamp, Stamp::EndedAt).then_some(now),
        };

        if !self.repos.bookings.apply_transition(&cmd).await? {
            // Someone else moved the booking between our read and our write.
            let current = self
                .repos
                .bookings
                .find_by_id(booking_id.0)
                .await?
                .ok_or(BookingError::BookingNotFound)?;

            // A replayed payment confirmation that lost the race to an
            // earlier delivery still ends in the right state.
            if action == BookingAction::PaymentCompleted
                && current.status()? == BookingStatus::Accepted
            {
                return current.to_domain().map_err(Into::into);
            }

            warn!(booking_id = %booking_id, ?action, "Transition lost a concurrent race");
            return Err(BookingError::Conflict);
        }

        let updated = self
            .repos
            .bookings
            .find_by_id(booking_id.0)
            .await?
            .ok_or(BookingError::BookingNotFound)?
            .to_domain()?;

        info!(booking_id = %booking_id, from = %status, to = %updated.status, "Booking transitioned");

        self.publish(
            &updated,
            BookingEventKind::StatusChanged { to: updated.status },
        )
        .await;

        Ok(updated)
    }

    /// Attach feedback and a rating to a completed booking
    ///
    /// Allowed exactly once, only by the booking's customer, only while the
    /// booking is `COMPLETED`. The status itself does not change.
    #[instrument(skip(self, text))]
    pub async fn submit_feedback(
        &self,
        booking_id: BookingId,
        customer: UserId,
        text: &str,
        rating: i32,
    ) -> Result<Booking, BookingError> {
        validate_feedback(text, rating)?;

        let row = self
            .repos
            .bookings
            .find_by_id(booking_id.0)
            .await?
            .ok_or(BookingError::BookingNotFound)?;

        if row.customer_id != customer.0 {
            return Err(BookingError::Forbidden);
        }

        let status = row.status()?;
        if status != BookingStatus::Completed {
            return Err(BookingError::FeedbackNotAllowed { status });
        }

        if row.feedback.is_some() || row.rating.is_some() {
            return Err(BookingError::FeedbackAlreadySubmitted);
        }

        // Guarded on feedback/rating still being NULL, so a concurrent
        // double submit cannot overwrite the first one.
        if !self
            .repos
            .bookings
            .set_feedback(booking_id.0, customer.0, text.trim(), rating)
            .await?
        {
            return Err(BookingError::FeedbackAlreadySubmitted);
        }

        let updated = self
            .repos
            .bookings
            .find_by_id(booking_id.0)
            .await?
            .ok_or(BookingError::BookingNotFound)?
            .to_domain()?;

        info!(booking_id = %booking_id, rating, "Feedback submitted");

        self.publish(&updated, BookingEventKind::FeedbackSubmitted)
            .await;

        Ok(updated)
    }

    /// All bookings where the user is the customer
    pub async fn list_for_customer(&self, customer: UserId) -> Result<Vec<Booking>, BookingError> {
        let rows = self.repos.bookings.list_by_customer(customer.0).await?;
        rows.iter()
            .map(|r| r.to_domain().map_err(Into::into))
            .collect()
    }

    /// All bookings where the user is the provider
    pub async fn list_for_provider(&self, provider: UserId) -> Result<Vec<Booking>, BookingError> {
        let rows = self.repos.bookings.list_by_provider(provider.0).await?;
        rows.iter()
            .map(|r| r.to_domain().map_err(Into::into))
            .collect()
    }

    async fn publish(&self, booking: &Booking, kind: BookingEventKind) {
        self.publisher
            .publish(BookingEvent {
                booking_id: booking.id,
                customer_id: booking.customer_id,
                provider_id: booking.provider_id,
                kind,
            })
            .await;
    }
}
