//! PostgreSQL booking repository implementation
//!
//! Every mutation here is a single conditional statement; callers learn
//! about lost races from the zero-rows result, never from partial state.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use hearth_types::BookingStatus;

use crate::error::{is_active_booking_conflict, DbResult};
use crate::models::BookingRow;
use crate::repo::{ActorPredicate, BookingRepository, CreateBooking, TransitionCommand};

const BOOKING_COLUMNS: &str = "id, customer_id, provider_id, service_id, status, \
     started_at, ended_at, feedback, rating, checkout_session_id, checkout_url, \
     created_at, updated_at";

/// PostgreSQL booking repository
#[derive(Clone)]
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    /// Create a new booking repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<BookingRow>> {
        let booking = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM service_bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn create_if_no_active(&self, booking: CreateBooking) -> DbResult<Option<BookingRow>> {
        // The anti-join makes the duplicate check and the insert one atomic
        // statement; a concurrent request for the same (customer, service)
        // pair cannot slip a second active row in between.
        let result = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            INSERT INTO service_bookings (id, customer_id, provider_id, service_id, status)
            SELECT $1, $2, $3, $4, 'PENDING'
            WHERE NOT EXISTS (
                SELECT 1 FROM service_bookings
                WHERE customer_id = $2
                  AND service_id = $4
                  AND status IN ('PENDING', 'ACCEPTED')
            )
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking.id)
        .bind(booking.customer_id)
        .bind(booking.provider_id)
        .bind(booking.service_id)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row),
            // Under READ COMMITTED two inserts can both pass the anti-join;
            // the loser trips the partial unique index and is a duplicate,
            // not a storage failure.
            Err(e) if is_active_booking_conflict(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn apply_transition(&self, cmd: &TransitionCommand) -> DbResult<bool> {
        let base = r#"
            UPDATE service_bookings
            SET status = $1,
                started_at = COALESCE($2, started_at),
                ended_at = COALESCE($3, ended_at),
                updated_at = NOW()
            WHERE id = $4 AND status = $5
        "#;

        let query = match cmd.actor {
            ActorPredicate::Customer(_) => format!("{base} AND customer_id = $6"),
            ActorPredicate::Provider(_) => format!("{base} AND provider_id = $6"),
            ActorPredicate::Unconditional => base.to_string(),
        };

        let mut q = sqlx::query(&query)
            .bind(cmd.next.as_str())
            .bind(cmd.set_started_at)
            .bind(cmd.set_ended_at)
            .bind(cmd.booking_id)
            .bind(cmd.expected.as_str());

        match cmd.actor {
            ActorPredicate::Customer(id) | ActorPredicate::Provider(id) => {
                q = q.bind(id);
            }
            ActorPredicate::Unconditional => {}
        }

        let result = q.execute(&self.pool).await?;

        Ok(result.rows_affected() == 1)
    }

    async fn set_feedback(
        &self,
        id: Uuid,
        customer_id: Uuid,
        feedback: &str,
        rating: i32,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE service_bookings
            SET feedback = $1, rating = $2, updated_at = NOW()
            WHERE id = $3
              AND customer_id = $4
              AND status = 'COMPLETED'
              AND feedback IS NULL
              AND rating IS NULL
            "#,
        )
        .bind(feedback)
        .bind(rating)
        .bind(id)
        .bind(customer_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn claim_checkout_session(
        &self,
        id: Uuid,
        session_id: &str,
        checkout_url: &str,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE service_bookings
            SET checkout_session_id = $1, checkout_url = $2, updated_at = NOW()
            WHERE id = $3
              AND status = 'AWAITING_PAYMENT'
              AND checkout_session_id IS NULL
            "#,
        )
        .bind(session_id)
        .bind(checkout_url)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_by_customer(&self, customer_id: Uuid) -> DbResult<Vec<BookingRow>> {
        let bookings = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM service_bookings \
             WHERE customer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn list_by_provider(&self, provider_id: Uuid) -> DbResult<Vec<BookingRow>> {
        let bookings = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM service_bookings \
             WHERE provider_id = $1 ORDER BY created_at DESC"
        ))
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn list_by_customer_and_status(
        &self,
        customer_id: Uuid,
        status: BookingStatus,
    ) -> DbResult<Vec<BookingRow>> {
        let bookings = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM service_bookings \
             WHERE customer_id = $1 AND status = $2 ORDER BY created_at DESC"
        ))
        .bind(customer_id)
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }
}
