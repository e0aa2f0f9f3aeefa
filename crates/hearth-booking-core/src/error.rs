//! Booking errors

use hearth_types::BookingStatus;
use thiserror::Error;

use crate::transition::BookingAction;

/// Booking errors
#[derive(Error, Debug)]
pub enum BookingError {
    /// Booking not found
    #[error("booking not found")]
    BookingNotFound,

    /// Service not found
    #[error("service not found")]
    ServiceNotFound,

    /// Profile not found
    #[error("profile not found")]
    ProfileNotFound,

    /// Malformed or missing input, rejected before touching storage
    #[error("validation failed: {0}")]
    Validation(String),

    /// Actor is not the designated party for the attempted operation
    #[error("actor is not permitted to perform this action")]
    Forbidden,

    /// Booking is not in the expected prior state for the action
    #[error("cannot {action} a booking in status {status}")]
    InvalidTransition {
        /// Observed status
        status: BookingStatus,
        /// Attempted action
        action: BookingAction,
    },

    /// The customer already has an active booking for this service
    #[error("an active booking for this service already exists")]
    DuplicateBooking,

    /// The conditional update matched zero rows: a concurrent action won
    #[error("booking changed concurrently; re-fetch and retry")]
    Conflict,

    /// Feedback can only be attached to a completed booking
    #[error("cannot submit feedback for a booking in status {status}")]
    FeedbackNotAllowed {
        /// Observed status
        status: BookingStatus,
    },

    /// Feedback was already submitted for this booking
    #[error("feedback has already been submitted")]
    FeedbackAlreadySubmitted,

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] hearth_db::DbError),
}

impl BookingError {
    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BookingNotFound | Self::ServiceNotFound | Self::ProfileNotFound
        )
    }

    /// Check if this is a precondition/conflict error the caller can resolve
    /// by re-fetching
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. }
                | Self::DuplicateBooking
                | Self::Conflict
                | Self::FeedbackNotAllowed { .. }
                | Self::FeedbackAlreadySubmitted
        )
    }
}
