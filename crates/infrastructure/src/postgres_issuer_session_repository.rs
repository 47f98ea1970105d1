//! PostgreSQL-backed issuer approval session repository.
//!
//! Expiry is enforced at lookup (`expires_at > now()`); rows left behind by
//! expired sessions are garbage, not reachable state.

use async_trait::async_trait;
use sqlx::PgPool;

use pratibha_application::{IssuerSessionRecord, IssuerSessionRepository};
use pratibha_core::{AppError, AppResult};

/// PostgreSQL implementation of the issuer session repository port.
#[derive(Clone)]
pub struct PostgresIssuerSessionRepository {
    pool: PgPool,
}

impl PostgresIssuerSessionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Deletes expired sessions. Intended for periodic cleanup.
    pub async fn cleanup_expired(&self) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM issuer_approval_sessions
            WHERE expires_at <= now()
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to cleanup issuer sessions: {error}"))
        })?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl IssuerSessionRepository for PostgresIssuerSessionRepository {
    async fn create(
        &self,
        activity_id: uuid::Uuid,
        issuer_email: &str,
        token_hash: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<uuid::Uuid> {
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO issuer_approval_sessions (activity_id, issuer_email, token_hash, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(activity_id)
        .bind(issuer_email)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to create issuer session: {error}"))
        })?;

        Ok(id)
    }

    async fn find_valid(&self, token_hash: &str) -> AppResult<Option<IssuerSessionRecord>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, activity_id, issuer_email, expires_at
            FROM issuer_approval_sessions
            WHERE token_hash = $1
              AND expires_at > now()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find issuer session: {error}")))?;

        Ok(row.map(IssuerSessionRecord::from))
    }

    async fn delete(&self, session_id: uuid::Uuid) -> AppResult<()> {
        sqlx::query(
            r#"
            DELETE FROM issuer_approval_sessions
            WHERE id = $1
            "#,
        )
        .bind(session_id)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete issuer session: {error}"))
        })?;

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: uuid::Uuid,
    activity_id: uuid::Uuid,
    issuer_email: String,
    expires_at: chrono::DateTime<chrono::Utc>,
}

impl From<SessionRow> for IssuerSessionRecord {
    fn from(row: SessionRow) -> Self {
        Self {
            id: row.id,
            activity_id: row.activity_id,
            issuer_email: row.issuer_email,
            expires_at: row.expires_at,
        }
    }
}
