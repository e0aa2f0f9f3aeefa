//! Repository traits
//!
//! Define async repository interfaces for database operations. Every booking
//! mutation is a single conditional write keyed on the expected prior state,
//! so two concurrent actions can never both succeed.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use hearth_types::BookingStatus;

use crate::error::DbResult;
use crate::models::*;

/// Identity predicate attached to a conditional booking update
///
/// Transitions re-verify the acting identity against the booking row itself;
/// the webhook transition carries no actor column because the payment
/// collaborator is authenticated by its signature, not a row reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorPredicate {
    /// `customer_id` must equal this id
    Customer(Uuid),
    /// `provider_id` must equal this id
    Provider(Uuid),
    /// No identity column predicate (payment webhook)
    Unconditional,
}

/// One atomic conditional status update
#[derive(Debug, Clone)]
pub struct TransitionCommand {
    pub booking_id: Uuid,
    /// Status the row must still hold for the update to apply
    pub expected: BookingStatus,
    pub next: BookingStatus,
    pub actor: ActorPredicate,
    pub set_started_at: Option<DateTime<Utc>>,
    pub set_ended_at: Option<DateTime<Utc>>,
}

/// Create booking input
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
}

/// Booking repository trait
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Find a booking by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<BookingRow>>;

    /// Insert a new `PENDING` booking unless the customer already has an
    /// active booking for the same service. Returns `None` on the duplicate.
    async fn create_if_no_active(&self, booking: CreateBooking) -> DbResult<Option<BookingRow>>;

    /// Apply a transition as one conditional update. Returns `false` when
    /// zero rows matched (stale status or wrong actor).
    async fn apply_transition(&self, cmd: &TransitionCommand) -> DbResult<bool>;

    /// Attach feedback and rating, only while `COMPLETED`, only for the
    /// owning customer, and only if neither is already set.
    async fn set_feedback(
        &self,
        id: Uuid,
        customer_id: Uuid,
        feedback: &str,
        rating: i32,
    ) -> DbResult<bool>;

    /// Record the checkout session for a booking, only while
    /// `AWAITING_PAYMENT` and only if no session is recorded yet.
    async fn claim_checkout_session(
        &self,
        id: Uuid,
        session_id: &str,
        checkout_url: &str,
    ) -> DbResult<bool>;

    /// All bookings for a customer
    async fn list_by_customer(&self, customer_id: Uuid) -> DbResult<Vec<BookingRow>>;

    /// All bookings for a provider
    async fn list_by_provider(&self, provider_id: Uuid) -> DbResult<Vec<BookingRow>>;

    /// Customer bookings in a given status (payment summaries)
    async fn list_by_customer_and_status(
        &self,
        customer_id: Uuid,
        status: BookingStatus,
    ) -> DbResult<Vec<BookingRow>>;
}

/// Create profile input
#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub id: Uuid,
    pub full_name: String,
    pub role: String,
}

/// Profile repository trait
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find a profile by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ProfileRow>>;

    /// Create a new profile (plan defaults to `NONE`)
    async fn create(&self, profile: CreateProfile) -> DbResult<ProfileRow>;

    /// Update the profile role
    async fn update_role(&self, id: Uuid, role: &str) -> DbResult<()>;

    /// Overwrite the subscription plan (last-write-wins, webhook only)
    async fn update_plan(&self, id: Uuid, plan: &str) -> DbResult<()>;
}

/// Create service listing input
#[derive(Debug, Clone)]
pub struct CreateService {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub created_by: Uuid,
    pub image_url: Option<String>,
}

/// Service listing repository trait
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Find a service by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ServiceRow>>;

    /// Create a new service listing
    async fn create(&self, service: CreateService) -> DbResult<ServiceRow>;

    /// List services, newest first
    async fn list(&self, limit: i64, offset: i64) -> DbResult<Vec<ServiceRow>>;

    /// List services created by a provider
    async fn list_by_provider(&self, provider_id: Uuid) -> DbResult<Vec<ServiceRow>>;
}
