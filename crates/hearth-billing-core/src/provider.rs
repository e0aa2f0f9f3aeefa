//! Payment provider abstraction

use async_trait::async_trait;

use hearth_types::{BookingId, UserId};

use crate::BillingError;

/// A created checkout session
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    /// Processor-side session ID
    pub session_id: String,
    /// Hosted checkout URL to redirect the customer to
    pub url: String,
}

/// Payment provider trait
///
/// Abstracts payment processing to allow different providers (Stripe, etc.)
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a one-off payment checkout session for a booking
    ///
    /// `amount_cents` is the server-computed charge in minor units; the
    /// booking id travels in session metadata so the webhook can apply the
    /// payment-completion transition.
    async fn create_booking_checkout(
        &self,
        amount_cents: i64,
        service_name: &str,
        booking_id: BookingId,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, BillingError>;

    /// Create a subscription checkout session for a plan purchase
    async fn create_plan_checkout(
        &self,
        price_id: &str,
        customer_email: Option<&str>,
        user_id: UserId,
        plan_id: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, BillingError>;
}
