//! Billing configuration

use std::collections::HashMap;

use hearth_types::SubscriptionPlan;

/// Billing service configuration
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Stripe secret key
    pub stripe_secret_key: String,
    /// Stripe webhook secret
    pub stripe_webhook_secret: String,
    /// Map of purchasable plans to Stripe price IDs
    pub price_ids: HashMap<SubscriptionPlan, String>,
    /// Charge currency (ISO code, lowercase, e.g. "usd")
    pub currency: String,
    /// Success URL for booking checkout
    pub booking_success_url: String,
    /// Cancel URL for booking checkout
    pub booking_cancel_url: String,
    /// Success URL for plan checkout
    pub plan_success_url: String,
    /// Cancel URL for plan checkout
    pub plan_cancel_url: String,
}

impl BillingConfig {
    /// Create a new billing config
    pub fn new(
        stripe_secret_key: impl Into<String>,
        stripe_webhook_secret: impl Into<String>,
    ) -> Self {
        Self {
            stripe_secret_key: stripe_secret_key.into(),
            stripe_webhook_secret: stripe_webhook_secret.into(),
            price_ids: HashMap::new(),
            currency: "usd".to_string(),
            booking_success_url: "https://app.example.com/success".to_string(),
            booking_cancel_url: "https://app.example.com/cancel".to_string(),
            plan_success_url: "https://app.example.com/subscription/success".to_string(),
            plan_cancel_url: "https://app.example.com/subscription/cancel".to_string(),
        }
    }

    /// Set the Stripe price ID for a plan
    pub fn with_price(mut self, plan: SubscriptionPlan, price_id: impl Into<String>) -> Self {
        self.price_ids.insert(plan, price_id.into());
        self
    }

    /// Set checkout URLs from the application base URL
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.booking_success_url = format!("{base}/success");
        self.booking_cancel_url = format!("{base}/cancel");
        self.plan_success_url = format!("{base}/subscription/success");
        self.plan_cancel_url = format!("{base}/subscription/cancel");
        self
    }

    /// Get the Stripe price ID for a plan
    pub fn get_price_id(&self, plan: SubscriptionPlan) -> Option<&str> {
        self.price_ids.get(&plan).map(String::as_str)
    }
}
