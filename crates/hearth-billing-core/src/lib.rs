//! Hearth Billing Core - Payments business logic
//!
//! Pricing, Stripe checkout-session creation, and webhook verification.
//! The pricing function here is the only discount computation in the
//! system: the on-screen quote and the authoritative charge both come from
//! `pricing::quote`, so a client can never supply its own discount.
//!
//! # Example
//!
//! ```rust,ignore
//! use hearth_billing_core::{BillingConfig, BillingService, StripeProvider};
//!
//! let config = BillingConfig::new("sk_test_...", "whsec_...");
//! let provider = StripeProvider::new(config.clone());
//! let billing = BillingService::new(repos, Arc::new(provider), config);
//!
//! // Checkout for an accepted booking awaiting payment
//! let session = billing.booking_checkout(booking_id, customer_id).await?;
//! ```

pub mod config;
pub mod error;
pub mod pricing;
pub mod provider;
pub mod service;
pub mod stripe;
pub mod webhook;

pub use config::BillingConfig;
pub use error::BillingError;
pub use pricing::{charge_amount_cents, quote, summarize, PaymentSummary, Quote};
pub use provider::{CheckoutSession, PaymentProvider};
pub use service::{BillingService, PaymentDue, PaymentsDue};
pub use stripe::StripeProvider;
pub use webhook::{
    CheckoutSessionData, WebhookEvent, WebhookEventData, WebhookEventType, WebhookHandler,
};
