//! The booking state machine
//!
//! `plan_transition` is the single source of truth for which (status, actor,
//! action) combinations are legal. It is pure: it decides, and the repository
//! applies the decision as one conditional update. Nothing else in the
//! system writes a booking status.

use hearth_types::{BookingStatus, UserId};

use crate::error::BookingError;

/// Action attempted against a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    /// Provider accepts the pending request
    Accept,
    /// Provider declines the pending request
    Decline,
    /// Payment collaborator confirms checkout completion
    PaymentCompleted,
    /// Provider starts the work
    StartWork,
    /// Provider ends the work
    EndWork,
}

impl std::fmt::Display for BookingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Accept => "accept",
            Self::Decline => "decline",
            Self::PaymentCompleted => "confirm payment for",
            Self::StartWork => "start work on",
            Self::EndWork => "end work on",
        };
        f.write_str(s)
    }
}

/// Who is attempting the action
///
/// Identity comes from the identity provider (or the verified webhook), never
/// from the request body; the id here is re-verified against the booking row
/// by the conditional update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingActor {
    /// The booking's customer
    Customer(UserId),
    /// The provider who owns the booking's service
    Provider(UserId),
    /// The payment webhook, authenticated by its signature
    PaymentCollaborator,
}

/// Timestamp side effect of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    /// No timestamp is written
    None,
    /// `started_at = now`
    StartedAt,
    /// `ended_at = now`
    EndedAt,
}

/// A validated transition, ready to be applied conditionally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    /// Status the row must still hold when the update runs
    pub expected: BookingStatus,
    /// Status the booking moves to
    pub next: BookingStatus,
    /// Timestamp side effect
    pub stamp: Stamp,
}

/// Validate a (status, actor, action) combination
///
/// Wrong actor kind fails with `Forbidden` before the status is even
/// considered; wrong status fails with `InvalidTransition`. The machine never
/// moves backward and never skips a state.
pub fn plan_transition(
    status: BookingStatus,
    actor: &BookingActor,
    action: BookingAction,
) -> Result<TransitionPlan, BookingError> {
    // Each action has exactly one legal actor kind and one legal source state.
    let (required_from, next, stamp) = match (action, actor) {
        (BookingAction::Accept, BookingActor::Provider(_)) => (
            BookingStatus::Pending,
            BookingStatus::AwaitingPayment,
            Stamp::None,
        ),
        (BookingAction::Decline, BookingActor::Provider(_)) => {
            (BookingStatus::Pending, BookingStatus::Declined, Stamp::None)
        }
        (BookingAction::PaymentCompleted, BookingActor::PaymentCollaborator) => (
            BookingStatus::AwaitingPayment,
            BookingStatus::Accepted,
            Stamp::None,
        ),
        (BookingAction::StartWork, BookingActor::Provider(_)) => (
            BookingStatus::Accepted,
            BookingStatus::InProgress,
            Stamp::StartedAt,
        ),
        (BookingAction::EndWork, BookingActor::Provider(_)) => (
            BookingStatus::InProgress,
            BookingStatus::Completed,
            Stamp::EndedAt,
        ),
        _ => return Err(BookingError::Forbidden),
    };

    if status != required_from {
        return Err(BookingError::InvalidTransition { status, action });
    }

    Ok(TransitionPlan {
        expected: required_from,
        next,
        stamp,
    })
}
