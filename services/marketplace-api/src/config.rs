//! Configuration for the Marketplace API service.

use std::time::Duration;

use hearth_billing_core::BillingConfig;
use hearth_types::SubscriptionPlan;

/// Marketplace API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,
    /// Database URL
    pub database_url: String,
    /// Billing core configuration
    pub billing: BillingConfig,
    /// HMAC secret for verifying bearer tokens
    pub auth_jwt_secret: String,
    /// Request timeout
    pub request_timeout: Duration,
    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Database
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        // Server port
        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Stripe configuration
        let stripe_secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| ConfigError::Missing("STRIPE_SECRET_KEY"))?;

        let stripe_webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .map_err(|_| ConfigError::Missing("STRIPE_WEBHOOK_SECRET"))?;

        // Checkout redirect URLs derive from the app base URL
        let app_base_url = std::env::var("APP_BASE_URL")
            .unwrap_or_else(|_| "https://app.example.com".to_string());

        // Auth
        let auth_jwt_secret = std::env::var("AUTH_JWT_SECRET")
            .map_err(|_| ConfigError::Missing("AUTH_JWT_SECRET"))?;

        // Request timeout
        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?;

        // Metrics
        let metrics_enabled = std::env::var("METRICS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        // Build billing config; plans without a configured price ID simply
        // cannot be purchased through this deployment.
        let mut billing = BillingConfig::new(&stripe_secret_key, &stripe_webhook_secret)
            .with_base_url(&app_base_url);

        for (plan, var) in [
            (SubscriptionPlan::Basic, "STRIPE_PRICE_BASIC"),
            (SubscriptionPlan::Premium, "STRIPE_PRICE_PREMIUM"),
            (SubscriptionPlan::Enterprise, "STRIPE_PRICE_ENTERPRISE"),
            (SubscriptionPlan::Provider, "STRIPE_PRICE_PROVIDER"),
        ] {
            if let Ok(price_id) = std::env::var(var) {
                billing = billing.with_price(plan, price_id);
            }
        }

        Ok(Self {
            http_port,
            database_url,
            billing,
            auth_jwt_secret,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
