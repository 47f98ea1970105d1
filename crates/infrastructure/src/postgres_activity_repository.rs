//! PostgreSQL-backed activity repository.

use async_trait::async_trait;
use sqlx::PgPool;

use pratibha_application::{ActivityRecord, ActivityRepository, NewActivity};
use pratibha_core::{AppError, AppResult, InstituteId};
use pratibha_domain::{ActivityStatus, ActivityType};

use crate::postgres_user_repository::is_unique_violation;

/// PostgreSQL implementation of the activity repository port.
#[derive(Clone)]
pub struct PostgresActivityRepository {
    pool: PgPool,
}

impl PostgresActivityRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for PostgresActivityRepository {
    async fn insert(&self, activity: NewActivity) -> AppResult<uuid::Uuid> {
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO activities (
                institute_id, student_id, faculty_id, title, description,
                attachment_link, credential_id, status, activity_type,
                issuer_verification_required
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(activity.institute_id.as_uuid())
        .bind(activity.student_id)
        .bind(activity.faculty_id)
        .bind(&activity.title)
        .bind(&activity.description)
        .bind(&activity.attachment_link)
        .bind(activity.credential_id.as_str())
        .bind(ActivityStatus::Pending.as_str())
        .bind(activity.activity_type.as_str())
        .bind(activity.issuer_verification_required)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                AppError::Validation(
                    "an activity with this credential id already exists".to_owned(),
                )
            } else {
                AppError::Internal(format!("failed to insert activity: {error}"))
            }
        })?;

        Ok(id)
    }

    async fn find(&self, activity_id: uuid::Uuid) -> AppResult<Option<ActivityRecord>> {
        let row = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT id, institute_id, student_id, faculty_id, title, description,
                   attachment_link, credential_id, status, activity_type, remarks,
                   issuer_verification_required, issuer_verified, created_at, updated_at
            FROM activities
            WHERE id = $1
            "#,
        )
        .bind(activity_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find activity: {error}")))?;

        row.map(ActivityRecord::try_from).transpose()
    }

    async fn list_for_institute(
        &self,
        institute_id: InstituteId,
        status: Option<ActivityStatus>,
    ) -> AppResult<Vec<ActivityRecord>> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT id, institute_id, student_id, faculty_id, title, description,
                   attachment_link, credential_id, status, activity_type, remarks,
                   issuer_verification_required, issuer_verified, created_at, updated_at
            FROM activities
            WHERE institute_id = $1
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(institute_id.as_uuid())
        .bind(status.map(|status| status.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list activities: {error}")))?;

        rows.into_iter().map(ActivityRecord::try_from).collect()
    }

    async fn list_for_student(
        &self,
        student_id: uuid::Uuid,
    ) -> AppResult<Vec<ActivityRecord>> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT id, institute_id, student_id, faculty_id, title, description,
                   attachment_link, credential_id, status, activity_type, remarks,
                   issuer_verification_required, issuer_verified, created_at, updated_at
            FROM activities
            WHERE student_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list student activities: {error}"))
        })?;

        rows.into_iter().map(ActivityRecord::try_from).collect()
    }

    async fn apply_decision(
        &self,
        activity_id: uuid::Uuid,
        status: ActivityStatus,
        remarks: Option<&str>,
    ) -> AppResult<()> {
        // Deliberately unconditional: re-decisions are allowed and concurrent
        // decisions resolve last-write-wins.
        let result = sqlx::query(
            r#"
            UPDATE activities
            SET status = $2, remarks = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(activity_id)
        .bind(status.as_str())
        .bind(remarks)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to apply decision: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("activity not found".to_owned()));
        }

        Ok(())
    }

    async fn mark_issuer_verified(&self, activity_id: uuid::Uuid) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE activities
            SET issuer_verified = TRUE, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(activity_id)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to mark issuer verified: {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("activity not found".to_owned()));
        }

        Ok(())
    }

    async fn count_by_status(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Vec<(ActivityStatus, i64)>> {
        let rows = sqlx::query_as::<_, CountRow>(
            r#"
            SELECT status AS label, COUNT(*) AS count
            FROM activities
            WHERE institute_id = $1
            GROUP BY status
            "#,
        )
        .bind(institute_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count by status: {error}")))?;

        rows.into_iter()
            .map(|row| Ok((ActivityStatus::parse(&row.label)?, row.count)))
            .collect()
    }

    async fn count_by_type(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Vec<(ActivityType, i64)>> {
        let rows = sqlx::query_as::<_, CountRow>(
            r#"
            SELECT activity_type AS label, COUNT(*) AS count
            FROM activities
            WHERE institute_id = $1
            GROUP BY activity_type
            "#,
        )
        .bind(institute_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count by type: {error}")))?;

        rows.into_iter()
            .map(|row| Ok((ActivityType::parse(&row.label)?, row.count)))
            .collect()
    }

    async fn count_pending_by_type(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Vec<(ActivityType, i64)>> {
        let rows = sqlx::query_as::<_, CountRow>(
            r#"
            SELECT activity_type AS label, COUNT(*) AS count
            FROM activities
            WHERE institute_id = $1
              AND status = $2
            GROUP BY activity_type
            "#,
        )
        .bind(institute_id.as_uuid())
        .bind(ActivityStatus::Pending.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to count pending by type: {error}"))
        })?;

        rows.into_iter()
            .map(|row| Ok((ActivityType::parse(&row.label)?, row.count)))
            .collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ActivityRow {
    id: uuid::Uuid,
    institute_id: uuid::Uuid,
    student_id: uuid::Uuid,
    faculty_id: uuid::Uuid,
    title: String,
    description: String,
    attachment_link: Option<String>,
    credential_id: String,
    status: String,
    activity_type: String,
    remarks: Option<String>,
    issuer_verification_required: bool,
    issuer_verified: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct CountRow {
    label: String,
    count: i64,
}

impl TryFrom<ActivityRow> for ActivityRecord {
    type Error = AppError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            institute_id: InstituteId::from_uuid(row.institute_id),
            student_id: row.student_id,
            faculty_id: row.faculty_id,
            title: row.title,
            description: row.description,
            attachment_link: row.attachment_link,
            credential_id: row.credential_id,
            status: ActivityStatus::parse(&row.status)?,
            activity_type: ActivityType::parse(&row.activity_type)?,
            remarks: row.remarks,
            issuer_verification_required: row.issuer_verification_required,
            issuer_verified: row.issuer_verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
