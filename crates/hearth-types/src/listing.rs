//! Service listing types

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ServiceId, UserId};

/// A service offered by a provider
///
/// `price` is the undiscounted unit price in the platform currency. Prices
/// are not versioned; the value read at checkout-session creation is the
/// value charged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceListing {
    /// Service ID
    pub id: ServiceId,
    /// Service name
    pub name: String,
    /// Service description
    pub description: String,
    /// Undiscounted unit price (non-negative decimal)
    pub price: BigDecimal,
    /// Provider who created the listing
    pub created_by: UserId,
    /// Public image URL in the external object store
    pub image_url: Option<String>,
    /// When the listing was created
    pub created_at: DateTime<Utc>,
}
