//! Hearth Booking Core - Booking lifecycle logic
//!
//! The booking state machine and the service that applies it. Transitions are
//! validated in pure code (`plan_transition`) and applied as single atomic
//! conditional updates through `hearth-db`, so concurrent conflicting actions
//! resolve to exactly one winner.
//!
//! # Example
//!
//! ```rust,ignore
//! use hearth_booking_core::{BookingAction, BookingActor, BookingService};
//!
//! let bookings = BookingService::new(repos, publisher);
//!
//! // Provider accepts a pending request
//! let booking = bookings
//!     .transition(booking_id, BookingActor::Provider(provider_id), BookingAction::Accept)
//!     .await?;
//! ```

pub mod error;
pub mod events;
pub mod feedback;
pub mod service;
pub mod transition;

pub use error::BookingError;
pub use events::{BookingEvent, BookingEventKind, BookingEventPublisher, NoopPublisher};
pub use feedback::validate_feedback;
pub use service::BookingService;
pub use transition::{plan_transition, BookingAction, BookingActor, Stamp, TransitionPlan};
