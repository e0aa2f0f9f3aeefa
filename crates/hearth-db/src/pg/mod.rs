//! PostgreSQL repository implementations

mod booking;
mod profile;
mod service;

pub use booking::PgBookingRepository;
pub use profile::PgProfileRepository;
pub use service::PgServiceRepository;

use std::sync::Arc;

use crate::repo::{BookingRepository, ProfileRepository, ServiceRepository};
use crate::DbPool;

/// All repositories bundled together
///
/// Holds trait objects, so services built on the bundle run unchanged
/// against in-memory repositories in tests.
#[derive(Clone)]
pub struct Repositories {
    pub bookings: Arc<dyn BookingRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub services: Arc<dyn ServiceRepository>,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            bookings: Arc::new(PgBookingRepository::new(pool.clone())),
            profiles: Arc::new(PgProfileRepository::new(pool.clone())),
            services: Arc::new(PgServiceRepository::new(pool)),
        }
    }

    /// Assemble a bundle from individual repository implementations
    pub fn from_parts(
        bookings: Arc<dyn BookingRepository>,
        profiles: Arc<dyn ProfileRepository>,
        services: Arc<dyn ServiceRepository>,
    ) -> Self {
        Self {
            bookings,
            profiles,
            services,
        }
    }
}
