//! PostgreSQL profile repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::ProfileRow;
use crate::repo::{CreateProfile, ProfileRepository};

/// PostgreSQL profile repository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    /// Create a new profile repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ProfileRow>> {
        let profile = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, full_name, role, subscription_plan, created_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn create(&self, profile: CreateProfile) -> DbResult<ProfileRow> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (id, full_name, role)
            VALUES ($1, $2, $3)
            RETURNING id, full_name, role, subscription_plan, created_at
            "#,
        )
        .bind(profile.id)
        .bind(&profile.full_name)
        .bind(&profile.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_role(&self, id: Uuid, role: &str) -> DbResult<()> {
        sqlx::query("UPDATE profiles SET role = $1 WHERE id = $2")
            .bind(role)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_plan(&self, id: Uuid, plan: &str) -> DbResult<()> {
        sqlx::query("UPDATE profiles SET subscription_plan = $1 WHERE id = $2")
            .bind(plan)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
