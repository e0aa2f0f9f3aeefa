//! Booking service tests over in-memory repositories
//!
//! Drives the full service logic, including the conditional-write outcomes
//! the Postgres layer reports, without a database.

mod common;

use std::sync::Arc;

use uuid::Uuid;

use hearth_booking_core::{
    BookingAction, BookingActor, BookingError, BookingService, NoopPublisher,
};
use hearth_db::{Repositories, ServiceRepository};
use hearth_types::{BookingId, BookingStatus, Role, ServiceId, SubscriptionPlan, UserId};

use common::mock_repos::{MockBookingRepository, MockProfileRepository, MockServiceRepository};

struct Harness {
    bookings: Arc<MockBookingRepository>,
    profiles: Arc<MockProfileRepository>,
    services: Arc<MockServiceRepository>,
    svc: BookingService,
    customer: Uuid,
    provider: Uuid,
    service_id: Uuid,
}

fn harness() -> Harness {
    let bookings = Arc::new(MockBookingRepository::new());
    let profiles = Arc::new(MockProfileRepository::new());
    let services = Arc::new(MockServiceRepository::new());

    let repos = Repositories::from_parts(
        bookings.clone(),
        profiles.clone(),
        services.clone(),
    );
    let svc = BookingService::new(repos, Arc::new(NoopPublisher));

    let customer = Uuid::new_v4();
    let provider = Uuid::new_v4();
    let service_id = Uuid::new_v4();
    profiles.insert_profile(
        customer,
        Role::Customer.as_str(),
        SubscriptionPlan::None.as_str(),
    );
    profiles.insert_profile(
        provider,
        Role::ServiceProvider.as_str(),
        SubscriptionPlan::Provider.as_str(),
    );
    services.insert_service(service_id, provider, "100.00");

    Harness {
        bookings,
        profiles,
        services,
        svc,
        customer,
        provider,
        service_id,
    }
}

impl Harness {
    /// Insert a booking row directly in the given status
    fn seed_booking(&self, status: BookingStatus) -> BookingId {
        let row = MockBookingRepository::booking_row(
            self.customer,
            self.provider,
            self.service_id,
            status,
        );
        let id = row.id;
        self.bookings.insert_row(row);
        BookingId(id)
    }
}

#[tokio::test]
async fn full_lifecycle_happy_path() {
    let h = harness();

    let booking = h
        .svc
        .create_booking(UserId(h.customer), ServiceId(h.service_id))
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);

    let booking = h
        .svc
        .transition(
            booking.id,
            BookingActor::Provider(UserId(h.provider)),
            BookingAction::Accept,
        )
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::AwaitingPayment);

    let booking = h
        .svc
        .transition(
            booking.id,
            BookingActor::PaymentCollaborator,
            BookingAction::PaymentCompleted,
        )
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Accepted);

    let booking = h
        .svc
        .transition(
            booking.id,
            BookingActor::Provider(UserId(h.provider)),
            BookingAction::StartWork,
        )
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::InProgress);
    assert!(booking.started_at.is_some());

    let booking = h
        .svc
        .transition(
            booking.id,
            BookingActor::Provider(UserId(h.provider)),
            BookingAction::EndWork,
        )
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Completed);
    assert!(booking.ended_at.is_some());

    let booking = h
        .svc
        .submit_feedback(booking.id, UserId(h.customer), "Great work", 5)
        .await
        .unwrap();
    assert_eq!(booking.feedback.as_deref(), Some("Great work"));
    assert_eq!(booking.rating, Some(5));
}

#[tokio::test]
async fn second_active_booking_for_same_service_is_rejected() {
    let h = harness();

    h.svc
        .create_booking(UserId(h.customer), ServiceId(h.service_id))
        .await
        .unwrap();

    let err = h
        .svc
        .create_booking(UserId(h.customer), ServiceId(h.service_id))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::DuplicateBooking));
}

#[tokio::test]
async fn provider_role_cannot_create_bookings() {
    let h = harness();

    let err = h
        .svc
        .create_booking(UserId(h.provider), ServiceId(h.service_id))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Forbidden));
}

#[tokio::test]
async fn replayed_payment_confirmation_is_a_no_op() {
    let h = harness();
    let id = h.seed_booking(BookingStatus::Accepted);

    // First delivery already applied; the retry must succeed without
    // changing anything.
    let booking = h
        .svc
        .transition(
            id,
            BookingActor::PaymentCollaborator,
            BookingAction::PaymentCompleted,
        )
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Accepted);

    // Still harmless after the provider has moved the booking further on.
    h.svc
        .transition(
            id,
            BookingActor::Provider(UserId(h.provider)),
            BookingAction::StartWork,
        )
        .await
        .unwrap();
    let booking = h
        .svc
        .transition(
            id,
            BookingActor::PaymentCollaborator,
            BookingAction::PaymentCompleted,
        )
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::InProgress);
}

#[tokio::test]
async fn payment_confirmation_losing_a_race_still_lands_accepted() {
    let h = harness();
    let id = h.seed_booking(BookingStatus::AwaitingPayment);

    // A concurrent delivery confirms the payment between our read and our
    // conditional write; the losing retry must still report success.
    h.bookings.confirm_payment_before_next_write(id.0);

    let booking = h
        .svc
        .transition(
            id,
            BookingActor::PaymentCollaborator,
            BookingAction::PaymentCompleted,
        )
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Accepted);
}

#[tokio::test]
async fn transition_by_the_wrong_provider_is_forbidden() {
    let h = harness();
    let id = h.seed_booking(BookingStatus::Pending);

    let other_provider = Uuid::new_v4();
    h.profiles.insert_profile(
        other_provider,
        Role::ServiceProvider.as_str(),
        SubscriptionPlan::Provider.as_str(),
    );

    let err = h
        .svc
        .transition(
            id,
            BookingActor::Provider(UserId(other_provider)),
            BookingAction::Accept,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Forbidden));
}

#[tokio::test]
async fn feedback_requires_a_completed_booking() {
    let h = harness();
    let id = h.seed_booking(BookingStatus::InProgress);

    let err = h
        .svc
        .submit_feedback(id, UserId(h.customer), "Too early", 4)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BookingError::FeedbackNotAllowed {
            status: BookingStatus::InProgress
        }
    ));
}

#[tokio::test]
async fn feedback_is_written_at_most_once() {
    let h = harness();
    let id = h.seed_booking(BookingStatus::Completed);

    h.svc
        .submit_feedback(id, UserId(h.customer), "Spotless", 5)
        .await
        .unwrap();

    let err = h
        .svc
        .submit_feedback(id, UserId(h.customer), "Changed my mind", 2)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::FeedbackAlreadySubmitted));

    // The first submission is untouched.
    let booking = h.svc.list_for_customer(UserId(h.customer)).await.unwrap();
    assert_eq!(booking[0].feedback.as_deref(), Some("Spotless"));
    assert_eq!(booking[0].rating, Some(5));
}

#[tokio::test]
async fn feedback_losing_a_concurrent_submit_is_rejected() {
    let h = harness();
    let id = h.seed_booking(BookingStatus::Completed);

    // Another submission lands between our read and our conditional write.
    h.bookings.attach_feedback_before_next_write(id.0);

    let err = h
        .svc
        .submit_feedback(id, UserId(h.customer), "Second in line", 3)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::FeedbackAlreadySubmitted));
}

#[tokio::test]
async fn listings_split_by_role_side() {
    let h = harness();
    h.seed_booking(BookingStatus::Pending);

    let as_customer = h.svc.list_for_customer(UserId(h.customer)).await.unwrap();
    assert_eq!(as_customer.len(), 1);

    let as_provider = h.svc.list_for_provider(UserId(h.provider)).await.unwrap();
    assert_eq!(as_provider.len(), 1);

    let stranger = h.svc.list_for_customer(UserId(Uuid::new_v4())).await.unwrap();
    assert!(stranger.is_empty());

    let service = h.services.find_by_id(h.service_id).await.unwrap().unwrap();
    assert_eq!(service.created_by, h.provider);
}
