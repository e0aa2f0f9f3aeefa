//! Subscription plan types

use serde::{Deserialize, Serialize};

/// Customer subscription plan
///
/// The plan determines the discount applied at checkout. Discounts are
/// meaningful only for customer-role profiles; `Provider` and `None` both
/// yield zero discount regardless of role. The plan is mutated exclusively
/// by the payment webhook on a confirmed subscription purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionPlan {
    /// No subscription - full price
    None,
    /// Basic plan - 10% off bookings
    Basic,
    /// Premium plan - 20% off bookings
    Premium,
    /// Enterprise plan - 30% off bookings
    Enterprise,
    /// Provider-side plan - no booking discount
    Provider,
}

impl SubscriptionPlan {
    /// Get the discount for this plan as a whole percentage
    pub const fn discount_percent(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Basic => 10,
            Self::Premium => 20,
            Self::Enterprise => 30,
            Self::Provider => 0,
        }
    }

    /// Database / wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Basic => "BASIC",
            Self::Premium => "PREMIUM",
            Self::Enterprise => "ENTERPRISE",
            Self::Provider => "PROVIDER",
        }
    }

    /// Map a checkout `planId` metadata value (`basic`, `premium`,
    /// `enterprise`, `provider`) to a plan. Unknown ids are rejected so an
    /// unexpected webhook payload never grants a plan.
    pub fn from_plan_id(plan_id: &str) -> Result<Self, PlanParseError> {
        match plan_id {
            "basic" => Ok(Self::Basic),
            "premium" => Ok(Self::Premium),
            "enterprise" => Ok(Self::Enterprise),
            "provider" => Ok(Self::Provider),
            _ => Err(PlanParseError(plan_id.to_string())),
        }
    }
}

impl Default for SubscriptionPlan {
    fn default() -> Self {
        Self::None
    }
}

impl std::fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionPlan {
    type Err = PlanParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Self::None),
            "BASIC" => Ok(Self::Basic),
            "PREMIUM" => Ok(Self::Premium),
            "ENTERPRISE" => Ok(Self::Enterprise),
            "PROVIDER" => Ok(Self::Provider),
            _ => Err(PlanParseError(s.to_string())),
        }
    }
}

/// Error parsing a subscription plan string
#[derive(Debug, Clone)]
pub struct PlanParseError(pub String);

impl std::fmt::Display for PlanParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid subscription plan: {}", self.0)
    }
}

impl std::error::Error for PlanParseError {}
