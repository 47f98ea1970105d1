//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::PgPool;

use pratibha_application::{UserRecord, UserRepository};
use pratibha_core::{AppError, AppResult, InstituteId, UserRole};
use pratibha_domain::UserId;

/// Consecutive failed logins before an account lock.
const LOCKOUT_THRESHOLD: i32 = 5;

/// Minutes an account stays locked after hitting the threshold.
const LOCKOUT_MINUTES: i32 = 15;

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, email_verified, password_hash, role, institute_id,
                   display_name, failed_login_count, locked_until
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by email: {error}")))?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, email_verified, password_hash, role, institute_id,
                   display_name, failed_login_count, locked_until
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by id: {error}")))?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
        role: UserRole,
        institute_id: InstituteId,
        email_verified: bool,
    ) -> AppResult<UserId> {
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO users (email, password_hash, display_name, role, institute_id, email_verified)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .bind(role.as_str())
        .bind(institute_id.as_uuid())
        .bind(email_verified)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                AppError::Validation("an account with this email already exists".to_owned())
            } else {
                AppError::Internal(format!("failed to create user: {error}"))
            }
        })?;

        Ok(UserId::from_uuid(id))
    }

    async fn overwrite_pending_registration(
        &self,
        user_id: UserId,
        password_hash: &str,
        display_name: &str,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2,
                display_name = $3,
                failed_login_count = 0,
                locked_until = NULL,
                updated_at = now()
            WHERE id = $1
              AND email_verified = FALSE
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(password_hash)
        .bind(display_name)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to overwrite pending registration: {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "cannot overwrite a verified account".to_owned(),
            ));
        }

        Ok(())
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update password: {error}")))?;

        Ok(())
    }

    async fn record_failed_login(&self, user_id: UserId) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET failed_login_count = failed_login_count + 1,
                locked_until = CASE
                    WHEN failed_login_count + 1 >= $2
                    THEN now() + make_interval(mins => $3)
                    ELSE locked_until
                END,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(LOCKOUT_THRESHOLD)
        .bind(f64::from(LOCKOUT_MINUTES))
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to record failed login: {error}")))?;

        Ok(())
    }

    async fn reset_failed_logins(&self, user_id: UserId) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET failed_login_count = 0, locked_until = NULL, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to reset failed logins: {error}")))?;

        Ok(())
    }

    async fn mark_email_verified(&self, user_id: UserId) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET email_verified = TRUE, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to mark email verified: {error}")))?;

        Ok(())
    }

    async fn delete(&self, user_id: UserId) -> AppResult<()> {
        sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete user: {error}")))?;

        Ok(())
    }
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(database_error) = error {
        return database_error.code().as_deref() == Some("23505");
    }

    false
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    email: String,
    email_verified: bool,
    password_hash: String,
    role: String,
    institute_id: uuid::Uuid,
    display_name: String,
    failed_login_count: i32,
    locked_until: Option<chrono::DateTime<chrono::Utc>>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            email: row.email,
            email_verified: row.email_verified,
            password_hash: row.password_hash,
            role: UserRole::parse(&row.role)?,
            institute_id: InstituteId::from_uuid(row.institute_id),
            display_name: row.display_name,
            failed_login_count: row.failed_login_count,
            locked_until: row.locked_until,
        })
    }
}
