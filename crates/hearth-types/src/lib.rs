//! Hearth Types - Shared domain types
//!
//! This crate contains domain types used across hearth services:
//! - Identities for users, bookings, and service listings
//! - Account roles and subscription plans
//! - The booking lifecycle status enumeration

pub mod booking;
pub mod id;
pub mod listing;
pub mod plan;
pub mod profile;
pub mod role;

pub use booking::*;
pub use id::*;
pub use listing::*;
pub use plan::*;
pub use profile::*;
pub use role::*;
