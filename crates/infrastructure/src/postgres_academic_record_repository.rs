//! PostgreSQL-backed attendance and grade repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use pratibha_application::{AcademicRecordRepository, AttendanceEntry, GradeEntry};
use pratibha_core::{AppError, AppResult, InstituteId};

/// PostgreSQL implementation of the academic record repository port.
#[derive(Clone)]
pub struct PostgresAcademicRecordRepository {
    pool: PgPool,
}

impl PostgresAcademicRecordRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AcademicRecordRepository for PostgresAcademicRecordRepository {
    async fn record_attendance(
        &self,
        institute_id: InstituteId,
        course_id: uuid::Uuid,
        recorded_by: uuid::Uuid,
        date: NaiveDate,
        entries: &[AttendanceEntry],
    ) -> AppResult<()> {
        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO attendance_records
                    (institute_id, student_id, course_id, recorded_by, session_date, present)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (student_id, course_id, session_date)
                DO UPDATE SET present = EXCLUDED.present, recorded_by = EXCLUDED.recorded_by
                "#,
            )
            .bind(institute_id.as_uuid())
            .bind(entry.student_id)
            .bind(course_id)
            .bind(recorded_by)
            .bind(date)
            .bind(entry.present)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to record attendance: {error}"))
            })?;
        }

        Ok(())
    }

    async fn attendance_counts(&self, student_id: uuid::Uuid) -> AppResult<(i64, i64)> {
        let row = sqlx::query_as::<_, AttendanceCountRow>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE present) AS present,
                COUNT(*) AS total
            FROM attendance_records
            WHERE student_id = $1
            "#,
        )
        .bind(student_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to count attendance: {error}"))
        })?;

        Ok((row.present, row.total))
    }

    async fn record_grades(
        &self,
        institute_id: InstituteId,
        course_id: uuid::Uuid,
        recorded_by: uuid::Uuid,
        semester: i16,
        entries: &[GradeEntry],
    ) -> AppResult<()> {
        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO grade_records
                    (institute_id, student_id, course_id, recorded_by, semester, credits, grade_point)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (student_id, course_id, semester)
                DO UPDATE SET credits = EXCLUDED.credits,
                              grade_point = EXCLUDED.grade_point,
                              recorded_by = EXCLUDED.recorded_by
                "#,
            )
            .bind(institute_id.as_uuid())
            .bind(entry.student_id)
            .bind(course_id)
            .bind(recorded_by)
            .bind(semester)
            .bind(entry.credits)
            .bind(entry.grade_point)
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to record grade: {error}")))?;
        }

        Ok(())
    }

    async fn grade_rows(&self, student_id: uuid::Uuid) -> AppResult<Vec<(i16, f64)>> {
        let rows = sqlx::query_as::<_, GradeRow>(
            r#"
            SELECT credits, grade_point
            FROM grade_records
            WHERE student_id = $1
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list grades: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| (row.credits, row.grade_point))
            .collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AttendanceCountRow {
    present: i64,
    total: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct GradeRow {
    credits: i16,
    grade_point: f64,
}
