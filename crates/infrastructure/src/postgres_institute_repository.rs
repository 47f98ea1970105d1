//! PostgreSQL-backed institute repository.

use async_trait::async_trait;
use sqlx::PgPool;

use pratibha_application::{InstituteRecord, InstituteRepository};
use pratibha_core::{AppError, AppResult, InstituteId};

/// PostgreSQL implementation of the institute repository port.
#[derive(Clone)]
pub struct PostgresInstituteRepository {
    pool: PgPool,
}

impl PostgresInstituteRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InstituteRepository for PostgresInstituteRepository {
    async fn create(&self, name: &str) -> AppResult<InstituteId> {
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO institutes (name)
            VALUES ($1)
            RETURNING id
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create institute: {error}")))?;

        Ok(InstituteId::from_uuid(id))
    }

    async fn find(&self, institute_id: InstituteId) -> AppResult<Option<InstituteRecord>> {
        let row = sqlx::query_as::<_, InstituteRow>(
            r#"
            SELECT id, name, created_at
            FROM institutes
            WHERE id = $1
            "#,
        )
        .bind(institute_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find institute: {error}")))?;

        Ok(row.map(InstituteRecord::from))
    }

    async fn rename(&self, institute_id: InstituteId, name: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE institutes
            SET name = $2
            WHERE id = $1
            "#,
        )
        .bind(institute_id.as_uuid())
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to rename institute: {error}")))?;

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InstituteRow {
    id: uuid::Uuid,
    name: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<InstituteRow> for InstituteRecord {
    fn from(row: InstituteRow) -> Self {
        Self {
            id: InstituteId::from_uuid(row.id),
            name: row.name,
            created_at: row.created_at,
        }
    }
}
