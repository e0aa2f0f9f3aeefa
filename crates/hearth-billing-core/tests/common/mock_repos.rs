//! Mock repositories and payment provider for testing
//!
//! In-memory implementations with the same conditional-write semantics as
//! the Postgres layer. The claim helper lets a test stand in for a
//! concurrent checkout request winning the session claim.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use hearth_billing_core::{BillingError, CheckoutSession, PaymentProvider};
use hearth_db::{
    ActorPredicate, BookingRepository, BookingRow, CreateBooking, CreateProfile, CreateService,
    DbResult, ProfileRepository, ProfileRow, ServiceRepository, ServiceRow, TransitionCommand,
};
use hearth_types::{BookingId, BookingStatus, UserId};

/// In-memory booking repository for testing
#[derive(Default, Clone)]
pub struct MockBookingRepository {
    rows: Arc<DashMap<Uuid, BookingRow>>,
    claim_before_write: Arc<DashMap<Uuid, (String, String)>>,
}

impl MockBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a booking row directly
    pub fn insert_row(&self, row: BookingRow) {
        self.rows.insert(row.id, row);
    }

    /// Build a booking row in the given status
    pub fn booking_row(
        customer_id: Uuid,
        provider_id: Uuid,
        service_id: Uuid,
        status: BookingStatus,
    ) -> BookingRow {
        BookingRow {
            id: Uuid::new_v4(),
            customer_id,
            provider_id,
            service_id,
            status: status.as_str().to_string(),
            started_at: None,
            ended_at: None,
            feedback: None,
            rating: None,
            checkout_session_id: None,
            checkout_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Record this session on the booking just before the next claim, as a
    /// concurrent checkout request would
    pub fn claim_session_before_next_write(&self, id: Uuid, session_id: &str, url: &str) {
        self.claim_before_write
            .insert(id, (session_id.to_string(), url.to_string()));
    }
}

#[async_trait]
impl BookingRepository for MockBookingRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<BookingRow>> {
        Ok(self.rows.get(&id).map(|r| r.value().clone()))
    }

    async fn create_if_no_active(&self, booking: CreateBooking) -> DbResult<Option<BookingRow>> {
        let duplicate = self.rows.iter().any(|r| {
            r.customer_id == booking.customer_id
                && r.service_id == booking.service_id
                && matches!(r.status.as_str(), "PENDING" | "ACCEPTED")
        });
        if duplicate {
            return Ok(None);
        }

        let row = BookingRow {
            id: booking.id,
            customer_id: booking.customer_id,
            provider_id: booking.provider_id,
            service_id: booking.service_id,
            status: BookingStatus::Pending.as_str().to_string(),
            started_at: None,
            ended_at: None,
            feedback: None,
            rating: None,
            checkout_session_id: None,
            checkout_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.rows.insert(row.id, row.clone());
        Ok(Some(row))
    }

    async fn apply_transition(&self, cmd: &TransitionCommand) -> DbResult<bool> {
        let Some(mut row) = self.rows.get_mut(&cmd.booking_id) else {
            return Ok(false);
        };

        if row.status != cmd.expected.as_str() {
            return Ok(false);
        }
        match cmd.actor {
            ActorPredicate::Customer(id) if row.customer_id != id => return Ok(false),
            ActorPredicate::Provider(id) if row.provider_id != id => return Ok(false),
            _ => {}
        }

        row.status = cmd.next.as_str().to_string();
        if let Some(t) = cmd.set_started_at {
            row.started_at = Some(t);
        }
        if let Some(t) = cmd.set_ended_at {
            row.ended_at = Some(t);
        }
        row.updated_at = Utc::now();
        Ok(true)
    }

    async fn set_feedback(
        &self,
        id: Uuid,
        customer_id: Uuid,
        feedback: &str,
        rating: i32,
    ) -> DbResult<bool> {
        let Some(mut row) = self.rows.get_mut(&id) else {
            return Ok(false);
        };

        if row.customer_id != customer_id
            || row.status != BookingStatus::Completed.as_str()
            || row.feedback.is_some()
            || row.rating.is_some()
        {
            return Ok(false);
        }

        row.feedback = Some(feedback.to_string());
        row.rating = Some(rating);
        Ok(true)
    }

    async fn claim_checkout_session(
        &self,
        id: Uuid,
        session_id: &str,
        checkout_url: &str,
    ) -> DbResult<bool> {
        if let Some((_, (other_session, other_url))) = self.claim_before_write.remove(&id) {
            if let Some(mut row) = self.rows.get_mut(&id) {
                row.checkout_session_id = Some(other_session);
                row.checkout_url = Some(other_url);
            }
        }

        let Some(mut row) = self.rows.get_mut(&id) else {
            return Ok(false);
        };

        if row.status != BookingStatus::AwaitingPayment.as_str()
            || row.checkout_session_id.is_some()
        {
            return Ok(false);
        }

        row.checkout_session_id = Some(session_id.to_string());
        row.checkout_url = Some(checkout_url.to_string());
        row.updated_at = Utc::now();
        Ok(true)
    }

    async fn list_by_customer(&self, customer_id: Uuid) -> DbResult<Vec<BookingRow>> {
        let mut rows: Vec<BookingRow> = self
            .rows
            .iter()
            .filter(|r| r.customer_id == customer_id)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_by_provider(&self, provider_id: Uuid) -> DbResult<Vec<BookingRow>> {
        let mut rows: Vec<BookingRow> = self
            .rows
            .iter()
            .filter(|r| r.provider_id == provider_id)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_by_customer_and_status(
        &self,
        customer_id: Uuid,
        status: BookingStatus,
    ) -> DbResult<Vec<BookingRow>> {
        let mut rows: Vec<BookingRow> = self
            .rows
            .iter()
            .filter(|r| r.customer_id == customer_id && r.status == status.as_str())
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

/// In-memory profile repository for testing
#[derive(Default, Clone)]
pub struct MockProfileRepository {
    rows: Arc<DashMap<Uuid, ProfileRow>>,
}

impl MockProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a profile with the given role and plan
    pub fn insert_profile(&self, id: Uuid, role: &str, plan: &str) {
        self.rows.insert(
            id,
            ProfileRow {
                id,
                full_name: format!("Test User {id}"),
                role: role.to_string(),
                subscription_plan: plan.to_string(),
                created_at: Utc::now(),
            },
        );
    }
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ProfileRow>> {
        Ok(self.rows.get(&id).map(|r| r.value().clone()))
    }

    async fn create(&self, profile: CreateProfile) -> DbResult<ProfileRow> {
        let row = ProfileRow {
            id: profile.id,
            full_name: profile.full_name,
            role: profile.role,
            subscription_plan: "NONE".to_string(),
            created_at: Utc::now(),
        };
        self.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_role(&self, id: Uuid, role: &str) -> DbResult<()> {
        if let Some(mut row) = self.rows.get_mut(&id) {
            row.role = role.to_string();
        }
        Ok(())
    }

    async fn update_plan(&self, id: Uuid, plan: &str) -> DbResult<()> {
        if let Some(mut row) = self.rows.get_mut(&id) {
            row.subscription_plan = plan.to_string();
        }
        Ok(())
    }
}

/// In-memory service listing repository for testing
#[derive(Default, Clone)]
pub struct MockServiceRepository {
    rows: Arc<DashMap<Uuid, ServiceRow>>,
}

impl MockServiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a listing with the given provider and price
    pub fn insert_service(&self, id: Uuid, created_by: Uuid, price: &str) -> ServiceRow {
        let row = ServiceRow {
            id,
            name: "Window washing".to_string(),
            description: "All exterior windows".to_string(),
            price: price.parse().expect("valid decimal"),
            created_by,
            image_url: None,
            created_at: Utc::now(),
        };
        self.rows.insert(id, row.clone());
        row
    }
}

#[async_trait]
impl ServiceRepository for MockServiceRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ServiceRow>> {
        Ok(self.rows.get(&id).map(|r| r.value().clone()))
    }

    async fn create(&self, service: CreateService) -> DbResult<ServiceRow> {
        let row = ServiceRow {
            id: service.id,
            name: service.name,
            description: service.description,
            price: service.price,
            created_by: service.created_by,
            image_url: service.image_url,
            created_at: Utc::now(),
        };
        self.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list(&self, limit: i64, offset: i64) -> DbResult<Vec<ServiceRow>> {
        let mut rows: Vec<ServiceRow> = self.rows.iter().map(|r| r.value().clone()).collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn list_by_provider(&self, provider_id: Uuid) -> DbResult<Vec<ServiceRow>> {
        let mut rows: Vec<ServiceRow> = self
            .rows
            .iter()
            .filter(|r| r.created_by == provider_id)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

/// Payment provider that mints predictable sessions and records what it
/// was asked to charge
#[derive(Default)]
pub struct MockPaymentProvider {
    minted: AtomicUsize,
    last_amount_cents: Mutex<Option<i64>>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many sessions were created
    pub fn sessions_minted(&self) -> usize {
        self.minted.load(Ordering::SeqCst)
    }

    /// The amount of the most recent booking checkout
    pub fn last_amount_cents(&self) -> Option<i64> {
        *self.last_amount_cents.lock().unwrap()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_booking_checkout(
        &self,
        amount_cents: i64,
        _service_name: &str,
        _booking_id: BookingId,
        _success_url: &str,
        _cancel_url: &str,
    ) -> Result<CheckoutSession, BillingError> {
        let n = self.minted.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_amount_cents.lock().unwrap() = Some(amount_cents);
        Ok(CheckoutSession {
            session_id: format!("cs_test_{n}"),
            url: format!("https://checkout.example.com/cs_test_{n}"),
        })
    }

    async fn create_plan_checkout(
        &self,
        price_id: &str,
        _customer_email: Option<&str>,
        _user_id: UserId,
        _plan_id: &str,
        _success_url: &str,
        _cancel_url: &str,
    ) -> Result<CheckoutSession, BillingError> {
        let n = self.minted.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(CheckoutSession {
            session_id: format!("cs_sub_{n}_{price_id}"),
            url: format!("https://checkout.example.com/cs_sub_{n}"),
        })
    }
}
