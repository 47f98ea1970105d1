//! PostgreSQL-backed email token repository.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;

use pratibha_application::{EmailTokenRecord, EmailTokenRepository};
use pratibha_core::{AppError, AppResult};
use pratibha_domain::{EmailTokenPurpose, UserId};

/// PostgreSQL implementation of the email token repository port.
#[derive(Clone)]
pub struct PostgresEmailTokenRepository {
    pool: PgPool,
}

impl PostgresEmailTokenRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmailTokenRepository for PostgresEmailTokenRepository {
    async fn create_token(
        &self,
        user_id: UserId,
        email: &str,
        token_hash: &str,
        purpose: EmailTokenPurpose,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<uuid::Uuid> {
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO email_tokens (user_id, email, token_hash, purpose, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(email)
        .bind(token_hash)
        .bind(purpose.as_str())
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create email token: {error}")))?;

        Ok(id)
    }

    async fn consume_valid_token(
        &self,
        token_hash: &str,
        purpose: EmailTokenPurpose,
    ) -> AppResult<Option<EmailTokenRecord>> {
        // Single UPDATE: under concurrent submissions only one caller
        // observes used_at IS NULL, enforcing single use.
        let row = sqlx::query_as::<_, TokenRow>(
            r#"
            UPDATE email_tokens
            SET used_at = now()
            WHERE token_hash = $1
              AND purpose = $2
              AND used_at IS NULL
              AND expires_at > now()
            RETURNING id, user_id, email, token_hash, purpose, expires_at, used_at
            "#,
        )
        .bind(token_hash)
        .bind(purpose.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to consume email token: {error}")))?;

        row.map(EmailTokenRecord::try_from).transpose()
    }

    async fn invalidate_tokens_for_user(
        &self,
        user_id: UserId,
        purpose: EmailTokenPurpose,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE email_tokens
            SET used_at = now()
            WHERE user_id = $1
              AND purpose = $2
              AND used_at IS NULL
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(purpose.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to invalidate tokens: {error}")))?;

        Ok(())
    }

    async fn count_recent_tokens(
        &self,
        email: &str,
        purpose: EmailTokenPurpose,
        since: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM email_tokens
            WHERE LOWER(email) = LOWER($1)
              AND purpose = $2
              AND created_at >= $3
            "#,
        )
        .bind(email)
        .bind(purpose.as_str())
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count recent tokens: {error}")))?;

        Ok(count)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TokenRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    email: String,
    token_hash: String,
    purpose: String,
    expires_at: chrono::DateTime<chrono::Utc>,
    used_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl TryFrom<TokenRow> for EmailTokenRecord {
    type Error = AppError;

    fn try_from(row: TokenRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            email: row.email,
            token_hash: row.token_hash,
            purpose: EmailTokenPurpose::from_str(&row.purpose)?,
            expires_at: row.expires_at,
            used_at: row.used_at,
        })
    }
}
