//! PostgreSQL service listing repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::ServiceRow;
use crate::repo::{CreateService, ServiceRepository};

/// PostgreSQL service listing repository
#[derive(Clone)]
pub struct PgServiceRepository {
    pool: PgPool,
}

impl PgServiceRepository {
    /// Create a new service repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for PgServiceRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ServiceRow>> {
        let service = sqlx::query_as::<_, ServiceRow>(
            r#"
            SELECT id, name, description, price, created_by, image_url, created_at
            FROM services
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    async fn create(&self, service: CreateService) -> DbResult<ServiceRow> {
        let row = sqlx::query_as::<_, ServiceRow>(
            r#"
            INSERT INTO services (id, name, description, price, created_by, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, price, created_by, image_url, created_at
            "#,
        )
        .bind(service.id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(&service.price)
        .bind(service.created_by)
        .bind(&service.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self, limit: i64, offset: i64) -> DbResult<Vec<ServiceRow>> {
        let services = sqlx::query_as::<_, ServiceRow>(
            r#"
            SELECT id, name, description, price, created_by, image_url, created_at
            FROM services
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    async fn list_by_provider(&self, provider_id: Uuid) -> DbResult<Vec<ServiceRow>> {
        let services = sqlx::query_as::<_, ServiceRow>(
            r#"
            SELECT id, name, description, price, created_by, image_url, created_at
            FROM services
            WHERE created_by = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }
}
