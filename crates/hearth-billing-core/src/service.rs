//! Billing service orchestration
//!
//! Checkout-session creation for bookings and plans, the outstanding-payment
//! summary, and plan application from confirmed purchases. The discount used
//! for a charge is always read from the profile row at session-creation time.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use hearth_db::{BookingRow, Repositories};
use hearth_types::{BookingId, BookingStatus, ServiceId, SubscriptionPlan, UserId};

use crate::config::BillingConfig;
use crate::error::BillingError;
use crate::pricing::{self, PaymentSummary, Quote};
use crate::provider::{CheckoutSession, PaymentProvider};

/// One outstanding booking payment
#[derive(Debug, Clone, Serialize)]
pub struct PaymentDue {
    /// Booking awaiting payment
    pub booking_id: BookingId,
    /// Booked service
    pub service_id: ServiceId,
    /// Service name for display
    pub service_name: String,
    /// Price with the customer's current plan discount applied
    #[serde(flatten)]
    pub quote: Quote,
}

/// All outstanding payments for a customer
#[derive(Debug, Clone, Serialize)]
pub struct PaymentsDue {
    pub items: Vec<PaymentDue>,
    pub summary: PaymentSummary,
}

/// Billing service
#[derive(Clone)]
pub struct BillingService {
    repos: Repositories,
    provider: Arc<dyn PaymentProvider>,
    config: BillingConfig,
}

impl BillingService {
    /// Create a new billing service
    pub fn new(
        repos: Repositories,
        provider: Arc<dyn PaymentProvider>,
        config: BillingConfig,
    ) -> Self {
        Self {
            repos,
            provider,
            config,
        }
    }

    /// Create (or return the already-recorded) checkout session for a booking
    ///
    /// Only the booking's customer may pay, and only while the booking is
    /// `AWAITING_PAYMENT`; once the booking has moved on, even a recorded
    /// session is no longer handed out. The charge amount is recomputed here from the
    /// current service price and the customer's stored plan; nothing
    /// price-shaped is accepted from the caller.
    #[instrument(skip(self))]
    pub async fn booking_checkout(
        &self,
        booking_id: BookingId,
        customer_id: UserId,
    ) -> Result<CheckoutSession, BillingError> {
        let row = self
            .repos
            .bookings
            .find_by_id(booking_id.0)
            .await?
            .ok_or(BillingError::BookingNotFound)?;

        if row.customer_id != customer_id.0 {
            warn!(booking_id = %booking_id, "Checkout attempted by non-owner");
            return Err(BillingError::Forbidden);
        }

        let status = row.status()?;
        if status != BookingStatus::AwaitingPayment {
            return Err(BillingError::NotAwaitingPayment { status });
        }

        // Still payable: a session recorded by an earlier request is handed
        // back instead of minting a second chargeable one.
        if let Some(existing) = recorded_session(&row) {
            return Ok(existing);
        }

        let service = self
            .repos
            .services
            .find_by_id(row.service_id)
            .await?
            .ok_or(BillingError::ServiceNotFound)?;

        let profile = self
            .repos
            .profiles
            .find_by_id(customer_id.0)
            .await?
            .ok_or(BillingError::ProfileNotFound)?;
        let plan = profile.plan()?;

        let quote = pricing::quote(&service.price, plan);
        let amount_cents = pricing::charge_amount_cents(&quote);

        let session = self
            .provider
            .create_booking_checkout(
                amount_cents,
                &service.name,
                booking_id,
                &self.config.booking_success_url,
                &self.config.booking_cancel_url,
            )
            .await?;

        let claimed = self
            .repos
            .bookings
            .claim_checkout_session(booking_id.0, &session.session_id, &session.url)
            .await?;

        if !claimed {
            // A concurrent request won the claim; hand back its session.
            let row = self
                .repos
                .bookings
                .find_by_id(booking_id.0)
                .await?
                .ok_or(BillingError::BookingNotFound)?;
            return recorded_session(&row).ok_or(BillingError::SessionConflict);
        }

        info!(
            booking_id = %booking_id,
            amount_cents,
            plan = %plan,
            "Created booking checkout session"
        );

        Ok(session)
    }

    /// Create a subscription checkout session for a plan purchase
    #[instrument(skip(self, customer_email))]
    pub async fn plan_checkout(
        &self,
        user_id: UserId,
        plan_id: &str,
        customer_email: Option<&str>,
    ) -> Result<CheckoutSession, BillingError> {
        let plan = SubscriptionPlan::from_plan_id(plan_id)
            .map_err(|_| BillingError::UnknownPlan(plan_id.to_string()))?;

        let price_id = self
            .config
            .get_price_id(plan)
            .ok_or_else(|| BillingError::Internal(format!("no price configured for plan {plan}")))?
            .to_string();

        let session = self
            .provider
            .create_plan_checkout(
                &price_id,
                customer_email,
                user_id,
                plan_id,
                &self.config.plan_success_url,
                &self.config.plan_cancel_url,
            )
            .await?;

        info!(user_id = %user_id, plan = %plan, "Created plan checkout session");

        Ok(session)
    }

    /// Outstanding payments for a customer, quoted at their current plan
    #[instrument(skip(self))]
    pub async fn payment_summary(&self, customer_id: UserId) -> Result<PaymentsDue, BillingError> {
        let profile = self
            .repos
            .profiles
            .find_by_id(customer_id.0)
            .await?
            .ok_or(BillingError::ProfileNotFound)?;
        let plan = profile.plan()?;

        let rows = self
            .repos
            .bookings
            .list_by_customer_and_status(customer_id.0, BookingStatus::AwaitingPayment)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let service = self
                .repos
                .services
                .find_by_id(row.service_id)
                .await?
                .ok_or(BillingError::ServiceNotFound)?;

            items.push(PaymentDue {
                booking_id: row.id.into(),
                service_id: row.service_id.into(),
                service_name: service.name,
                quote: pricing::quote(&service.price, plan),
            });
        }

        let summary = pricing::summarize(items.iter().map(|item| &item.quote));

        Ok(PaymentsDue { items, summary })
    }

    /// Apply a confirmed plan purchase to a profile
    ///
    /// Called from the payment webhook only. Last write wins; webhook
    /// retries are harmless overwrites with the same value.
    #[instrument(skip(self))]
    pub async fn apply_plan_purchase(
        &self,
        user_id: UserId,
        plan_id: &str,
    ) -> Result<SubscriptionPlan, BillingError> {
        let plan = SubscriptionPlan::from_plan_id(plan_id)
            .map_err(|_| BillingError::UnknownPlan(plan_id.to_string()))?;

        self.repos
            .profiles
            .update_plan(user_id.0, plan.as_str())
            .await?;

        info!(user_id = %user_id, plan = %plan, "Applied plan purchase");

        Ok(plan)
    }
}

/// The checkout session already recorded on a booking row, if any
fn recorded_session(row: &BookingRow) -> Option<CheckoutSession> {
    match (&row.checkout_session_id, &row.checkout_url) {
        (Some(session_id), Some(url)) => Some(CheckoutSession {
            session_id: session_id.clone(),
            url: url.clone(),
        }),
        _ => None,
    }
}
