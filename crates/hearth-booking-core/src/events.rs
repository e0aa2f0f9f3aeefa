//! Booking event fan-out
//!
//! Events feed the realtime notification layer shown in customer/provider
//! UIs. Delivery is fire-and-forget and at-least-once; nothing here is
//! load-bearing for correctness, so publish failures are logged and dropped.

use async_trait::async_trait;

use hearth_types::{BookingId, BookingStatus, UserId};

/// What happened to the booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingEventKind {
    /// A new request was created
    Created,
    /// Status moved forward
    StatusChanged {
        /// New status
        to: BookingStatus,
    },
    /// Customer attached feedback
    FeedbackSubmitted,
}

/// A booking change pushed to interested UIs
#[derive(Debug, Clone)]
pub struct BookingEvent {
    pub booking_id: BookingId,
    pub customer_id: UserId,
    pub provider_id: UserId,
    pub kind: BookingEventKind,
}

/// Sink for booking events
///
/// Implementations must be safe to call on every mutation; they may drop,
/// duplicate, or delay events without violating any booking invariant.
#[async_trait]
pub trait BookingEventPublisher: Send + Sync {
    /// Publish an event. Infallible by contract: implementations swallow
    /// and log their own delivery errors.
    async fn publish(&self, event: BookingEvent);
}

/// Publisher that discards all events
pub struct NoopPublisher;

#[async_trait]
impl BookingEventPublisher for NoopPublisher {
    async fn publish(&self, _event: BookingEvent) {}
}
