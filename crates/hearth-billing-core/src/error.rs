//! Billing errors

use hearth_types::BookingStatus;
use thiserror::Error;

/// Billing errors
#[derive(Error, Debug)]
pub enum BillingError {
    /// Booking not found
    #[error("booking not found")]
    BookingNotFound,

    /// Service not found
    #[error("service not found")]
    ServiceNotFound,

    /// Profile not found
    #[error("profile not found")]
    ProfileNotFound,

    /// Actor is not the booking's customer (or lacks the customer role)
    #[error("not permitted to pay for this booking")]
    Forbidden,

    /// Checkout requires the booking to be awaiting payment
    #[error("booking is not awaiting payment (status {status})")]
    NotAwaitingPayment {
        /// Observed status
        status: BookingStatus,
    },

    /// A concurrent request claimed the checkout session first
    #[error("checkout session already created for this booking")]
    SessionConflict,

    /// Unknown purchasable plan id
    #[error("unknown plan: {0}")]
    UnknownPlan(String),

    /// Payment provider error
    #[error("provider error: {0}")]
    ProviderError(String),

    /// Webhook verification or processing error
    #[error("webhook error: {0}")]
    WebhookError(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] hearth_db::DbError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl BillingError {
    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BookingNotFound | Self::ServiceNotFound | Self::ProfileNotFound
        )
    }

    /// Check if this is a precondition/conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::NotAwaitingPayment { .. } | Self::SessionConflict
        )
    }

    /// Check if this is a provider error
    pub fn is_provider_error(&self) -> bool {
        matches!(self, Self::ProviderError(_))
    }
}
