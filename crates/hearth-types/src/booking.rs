//! Booking lifecycle types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BookingId, ServiceId, UserId};

/// Booking lifecycle status
///
/// Status only ever moves forward along
/// `PENDING -> AWAITING_PAYMENT -> ACCEPTED -> IN_PROGRESS -> COMPLETED`
/// or `PENDING -> DECLINED`. Unknown strings are rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Customer has requested the service; provider has not responded
    Pending,
    /// Provider accepted; customer owes payment
    AwaitingPayment,
    /// Payment confirmed; work may begin
    Accepted,
    /// Provider declined the request (terminal)
    Declined,
    /// Provider has started the work
    InProgress,
    /// Work finished; feedback may be attached
    Completed,
    /// Reserved: no transition produces this status
    Cancelled,
}

impl BookingStatus {
    /// Database / wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::AwaitingPayment => "AWAITING_PAYMENT",
            Self::Accepted => "ACCEPTED",
            Self::Declined => "DECLINED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Whether the booking counts as active for duplicate-request checks
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }

    /// Whether no further status change is possible
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Declined | Self::Completed | Self::Cancelled)
    }

    /// Position along the forward payment path, used to recognise webhook
    /// retries that arrive after the booking already moved on
    pub const fn order(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::AwaitingPayment => 1,
            Self::Accepted => 2,
            Self::InProgress => 3,
            Self::Completed => 4,
            // Terminal side branches sit outside the forward path
            Self::Declined | Self::Cancelled => u8::MAX,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "AWAITING_PAYMENT" => Ok(Self::AwaitingPayment),
            "ACCEPTED" => Ok(Self::Accepted),
            "DECLINED" => Ok(Self::Declined),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}

/// Error parsing a booking status string
#[derive(Debug, Clone)]
pub struct StatusParseError(pub String);

impl std::fmt::Display for StatusParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid booking status: {}", self.0)
    }
}

impl std::error::Error for StatusParseError {}

/// One customer's request for one provider's service, tracked through its
/// lifecycle. Never deleted in normal flow; only its status moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Booking ID
    pub id: BookingId,
    /// Customer who requested the service
    pub customer_id: UserId,
    /// Provider who owns the service
    pub provider_id: UserId,
    /// Service being booked
    pub service_id: ServiceId,
    /// Current lifecycle status
    pub status: BookingStatus,
    /// Set when the provider starts work
    pub started_at: Option<DateTime<Utc>>,
    /// Set when the provider ends work
    pub ended_at: Option<DateTime<Utc>>,
    /// Customer feedback text, set at most once after completion
    pub feedback: Option<String>,
    /// Customer rating 1-5, set together with feedback
    pub rating: Option<i32>,
    /// When the booking was created
    pub created_at: DateTime<Utc>,
}
