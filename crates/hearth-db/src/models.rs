//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.
//! Status, role, and plan columns are stored as text and parsed into their
//! closed enums at this boundary; a row that no longer parses is surfaced
//! as a corrupt-row error instead of propagating free text.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use hearth_types::{
    Booking, BookingStatus, Profile, Role, ServiceListing, SubscriptionPlan,
};

use crate::error::DbError;

/// Booking row from the database
#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub feedback: Option<String>,
    pub rating: Option<i32>,
    pub checkout_session_id: Option<String>,
    pub checkout_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingRow {
    /// Parse the stored status into the closed enum
    pub fn status(&self) -> Result<BookingStatus, DbError> {
        self.status
            .parse()
            .map_err(|_| DbError::CorruptRow(format!("booking status {:?}", self.status)))
    }

    /// Convert to the domain booking
    pub fn to_domain(&self) -> Result<Booking, DbError> {
        Ok(Booking {
            id: self.id.into(),
            customer_id: self.customer_id.into(),
            provider_id: self.provider_id.into(),
            service_id: self.service_id.into(),
            status: self.status()?,
            started_at: self.started_at,
            ended_at: self.ended_at,
            feedback: self.feedback.clone(),
            rating: self.rating,
            created_at: self.created_at,
        })
    }
}

/// Profile row from the database
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub full_name: String,
    pub role: String,
    pub subscription_plan: String,
    pub created_at: DateTime<Utc>,
}

impl ProfileRow {
    /// Parse the stored role into the closed enum
    pub fn role(&self) -> Result<Role, DbError> {
        self.role
            .parse()
            .map_err(|_| DbError::CorruptRow(format!("profile role {:?}", self.role)))
    }

    /// Parse the stored subscription plan into the closed enum
    pub fn plan(&self) -> Result<SubscriptionPlan, DbError> {
        self.subscription_plan.parse().map_err(|_| {
            DbError::CorruptRow(format!("subscription plan {:?}", self.subscription_plan))
        })
    }

    /// Convert to the domain profile
    pub fn to_domain(&self) -> Result<Profile, DbError> {
        Ok(Profile {
            id: self.id.into(),
            full_name: self.full_name.clone(),
            role: self.role()?,
            subscription_plan: self.plan()?,
            created_at: self.created_at,
        })
    }
}

/// Service listing row from the database
#[derive(Debug, Clone, FromRow)]
pub struct ServiceRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub created_by: Uuid,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ServiceRow {
    /// Convert to the domain listing
    pub fn to_domain(&self) -> ServiceListing {
        ServiceListing {
            id: self.id.into(),
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price.clone(),
            created_by: self.created_by.into(),
            image_url: self.image_url.clone(),
            created_at: self.created_at,
        }
    }
}
