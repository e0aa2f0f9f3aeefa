//! Application state for the Marketplace API service.

use std::sync::Arc;

use hearth_billing_core::{BillingService, WebhookHandler};
use hearth_booking_core::BookingService;
use hearth_db::{DbPool, Repositories};

use crate::config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Booking lifecycle service
    pub bookings: Arc<BookingService>,
    /// Billing service (pricing, checkout sessions, plan purchases)
    pub billing: Arc<BillingService>,
    /// Stripe webhook verification
    pub webhooks: WebhookHandler,
    /// Database repositories (for direct reads)
    pub repos: Repositories,
    /// Database pool (readiness checks)
    pub pool: DbPool,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        bookings: BookingService,
        billing: BillingService,
        webhooks: WebhookHandler,
        repos: Repositories,
        pool: DbPool,
        config: Config,
    ) -> Self {
        Self {
            bookings: Arc::new(bookings),
            billing: Arc::new(billing),
            webhooks,
            repos,
            pool,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
