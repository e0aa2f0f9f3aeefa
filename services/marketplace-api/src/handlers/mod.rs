//! REST API handlers

pub mod bookings;
pub mod health;
pub mod payments;
pub mod profiles;
pub mod services;
pub mod shared;
pub mod subscriptions;
pub mod webhook;

pub use bookings::*;
pub use health::*;
pub use payments::*;
pub use profiles::*;
pub use services::*;
pub use subscriptions::*;
pub use webhook::*;
