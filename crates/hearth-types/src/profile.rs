//! Profile types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Role, SubscriptionPlan, UserId};

/// Customer or provider account record
///
/// The id is shared with the identity provider's user id; the profile row
/// carries the marketplace-side attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Profile ID (= identity-provider user id)
    pub id: UserId,
    /// Display name
    pub full_name: String,
    /// Account role
    pub role: Role,
    /// Current subscription plan; defaults to `NONE`
    pub subscription_plan: SubscriptionPlan,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
}
