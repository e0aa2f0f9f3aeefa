//! Hearth DB - Database abstractions
//!
//! SQLx-based database layer for hearth services.
//!
//! # Example
//!
//! ```rust,ignore
//! use hearth_db::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/hearth").await?;
//! let repos = Repositories::new(pool);
//!
//! // Use repositories
//! let booking = repos.bookings.find_by_id(booking_id).await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, DbPool};
pub use repo::*;
