//! PostgreSQL-backed catalog repository for departments and courses.

use async_trait::async_trait;
use sqlx::PgPool;

use pratibha_application::{CatalogRepository, CourseRecord, DepartmentRecord};
use pratibha_core::{AppError, AppResult, InstituteId};

use crate::postgres_user_repository::is_unique_violation;

/// PostgreSQL implementation of the catalog repository port.
#[derive(Clone)]
pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn create_department(
        &self,
        institute_id: InstituteId,
        name: &str,
    ) -> AppResult<uuid::Uuid> {
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO departments (institute_id, name)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(institute_id.as_uuid())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                AppError::Conflict(format!("department '{name}' already exists"))
            } else {
                AppError::Internal(format!("failed to create department: {error}"))
            }
        })?;

        Ok(id)
    }

    async fn list_departments(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Vec<DepartmentRecord>> {
        let rows = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, institute_id, name
            FROM departments
            WHERE institute_id = $1
            ORDER BY name
            "#,
        )
        .bind(institute_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list departments: {error}")))?;

        Ok(rows.into_iter().map(DepartmentRecord::from).collect())
    }

    async fn find_department(
        &self,
        department_id: uuid::Uuid,
    ) -> AppResult<Option<DepartmentRecord>> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, institute_id, name
            FROM departments
            WHERE id = $1
            "#,
        )
        .bind(department_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find department: {error}")))?;

        Ok(row.map(DepartmentRecord::from))
    }

    async fn delete_department(
        &self,
        institute_id: InstituteId,
        department_id: uuid::Uuid,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM departments
            WHERE id = $1 AND institute_id = $2
            "#,
        )
        .bind(department_id)
        .bind(institute_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                AppError::Conflict("department still has courses or faculty".to_owned())
            } else {
                AppError::Internal(format!("failed to delete department: {error}"))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("department not found".to_owned()));
        }

        Ok(())
    }

    async fn create_course(
        &self,
        institute_id: InstituteId,
        department_id: uuid::Uuid,
        name: &str,
        code: &str,
    ) -> AppResult<uuid::Uuid> {
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO courses (institute_id, department_id, name, code)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(institute_id.as_uuid())
        .bind(department_id)
        .bind(name)
        .bind(code)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                AppError::Conflict(format!("course code '{code}' already exists"))
            } else {
                AppError::Internal(format!("failed to create course: {error}"))
            }
        })?;

        Ok(id)
    }

    async fn list_courses(&self, institute_id: InstituteId) -> AppResult<Vec<CourseRecord>> {
        let rows = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT id, institute_id, department_id, name, code
            FROM courses
            WHERE institute_id = $1
            ORDER BY code
            "#,
        )
        .bind(institute_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list courses: {error}")))?;

        Ok(rows.into_iter().map(CourseRecord::from).collect())
    }

    async fn find_course(&self, course_id: uuid::Uuid) -> AppResult<Option<CourseRecord>> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT id, institute_id, department_id, name, code
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find course: {error}")))?;

        Ok(row.map(CourseRecord::from))
    }

    async fn delete_course(
        &self,
        institute_id: InstituteId,
        course_id: uuid::Uuid,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM courses
            WHERE id = $1 AND institute_id = $2
            "#,
        )
        .bind(course_id)
        .bind(institute_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                AppError::Conflict("course still has enrolled students".to_owned())
            } else {
                AppError::Internal(format!("failed to delete course: {error}"))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("course not found".to_owned()));
        }

        Ok(())
    }
}

fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(database_error) = error {
        return database_error.code().as_deref() == Some("23503");
    }

    false
}

#[derive(Debug, sqlx::FromRow)]
struct DepartmentRow {
    id: uuid::Uuid,
    institute_id: uuid::Uuid,
    name: String,
}

impl From<DepartmentRow> for DepartmentRecord {
    fn from(row: DepartmentRow) -> Self {
        Self {
            id: row.id,
            institute_id: InstituteId::from_uuid(row.institute_id),
            name: row.name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: uuid::Uuid,
    institute_id: uuid::Uuid,
    department_id: uuid::Uuid,
    name: String,
    code: String,
}

impl From<CourseRow> for CourseRecord {
    fn from(row: CourseRow) -> Self {
        Self {
            id: row.id,
            institute_id: InstituteId::from_uuid(row.institute_id),
            department_id: row.department_id,
            name: row.name,
            code: row.code,
        }
    }
}
