//! PostgreSQL-backed roster repository for faculty and students.
//!
//! Display names and emails live on the backing `users` rows; every read
//! joins them in so callers get a complete roster record.

use async_trait::async_trait;
use sqlx::PgPool;

use pratibha_application::{
    FacultyRecord, NewFaculty, NewStudent, PeopleCounts, RosterRepository, StudentMatch,
    StudentRecord,
};
use pratibha_core::{AppError, AppResult, InstituteId};
use pratibha_domain::UserId;

/// PostgreSQL implementation of the roster repository port.
#[derive(Clone)]
pub struct PostgresRosterRepository {
    pool: PgPool,
}

impl PostgresRosterRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const FACULTY_SELECT: &str = r#"
    SELECT f.id, f.institute_id, f.user_id, u.display_name, u.email,
           f.department_id, f.designation
    FROM faculty f
    JOIN users u ON u.id = f.user_id
"#;

const STUDENT_SELECT: &str = r#"
    SELECT s.id, s.institute_id, s.user_id, u.display_name, u.email,
           s.course_id, s.roll_number, s.aadhar
    FROM students s
    JOIN users u ON u.id = s.user_id
"#;

#[async_trait]
impl RosterRepository for PostgresRosterRepository {
    async fn create_faculty(&self, faculty: NewFaculty) -> AppResult<uuid::Uuid> {
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO faculty (institute_id, user_id, department_id, designation)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(faculty.institute_id.as_uuid())
        .bind(faculty.user_id.as_uuid())
        .bind(faculty.department_id)
        .bind(&faculty.designation)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create faculty: {error}")))?;

        Ok(id)
    }

    async fn list_faculty(&self, institute_id: InstituteId) -> AppResult<Vec<FacultyRecord>> {
        let query = format!("{FACULTY_SELECT} WHERE f.institute_id = $1 ORDER BY u.display_name");
        let rows = sqlx::query_as::<_, FacultyRow>(&query)
            .bind(institute_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list faculty: {error}")))?;

        Ok(rows.into_iter().map(FacultyRecord::from).collect())
    }

    async fn find_faculty(&self, faculty_id: uuid::Uuid) -> AppResult<Option<FacultyRecord>> {
        let query = format!("{FACULTY_SELECT} WHERE f.id = $1");
        let row = sqlx::query_as::<_, FacultyRow>(&query)
            .bind(faculty_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find faculty: {error}")))?;

        Ok(row.map(FacultyRecord::from))
    }

    async fn remove_faculty(
        &self,
        institute_id: InstituteId,
        faculty_id: uuid::Uuid,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM faculty
            WHERE id = $1 AND institute_id = $2
            "#,
        )
        .bind(faculty_id)
        .bind(institute_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                AppError::Conflict(
                    "faculty member is still assigned to activities".to_owned(),
                )
            } else {
                AppError::Internal(format!("failed to remove faculty: {error}"))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("faculty member not found".to_owned()));
        }

        Ok(())
    }

    async fn create_student(&self, student: NewStudent) -> AppResult<uuid::Uuid> {
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO students (institute_id, user_id, course_id, roll_number, aadhar)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(student.institute_id.as_uuid())
        .bind(student.user_id.as_uuid())
        .bind(student.course_id)
        .bind(&student.roll_number)
        .bind(student.aadhar.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create student: {error}")))?;

        Ok(id)
    }

    async fn list_students(&self, institute_id: InstituteId) -> AppResult<Vec<StudentRecord>> {
        let query = format!("{STUDENT_SELECT} WHERE s.institute_id = $1 ORDER BY s.roll_number");
        let rows = sqlx::query_as::<_, StudentRow>(&query)
            .bind(institute_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list students: {error}")))?;

        Ok(rows.into_iter().map(StudentRecord::from).collect())
    }

    async fn find_student(&self, student_id: uuid::Uuid) -> AppResult<Option<StudentRecord>> {
        let query = format!("{STUDENT_SELECT} WHERE s.id = $1");
        let row = sqlx::query_as::<_, StudentRow>(&query)
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find student: {error}")))?;

        Ok(row.map(StudentRecord::from))
    }

    async fn find_student_by_user(&self, user_id: UserId) -> AppResult<Option<StudentRecord>> {
        let query = format!("{STUDENT_SELECT} WHERE s.user_id = $1");
        let row = sqlx::query_as::<_, StudentRow>(&query)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to find student by user: {error}"))
            })?;

        Ok(row.map(StudentRecord::from))
    }

    async fn find_faculty_by_user(&self, user_id: UserId) -> AppResult<Option<FacultyRecord>> {
        let query = format!("{FACULTY_SELECT} WHERE f.user_id = $1");
        let row = sqlx::query_as::<_, FacultyRow>(&query)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to find faculty by user: {error}"))
            })?;

        Ok(row.map(FacultyRecord::from))
    }

    async fn remove_student(
        &self,
        institute_id: InstituteId,
        student_id: uuid::Uuid,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM students
            WHERE id = $1 AND institute_id = $2
            "#,
        )
        .bind(student_id)
        .bind(institute_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to remove student: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("student not found".to_owned()));
        }

        Ok(())
    }

    async fn find_students_by_aadhar(&self, aadhar: &str) -> AppResult<Vec<StudentMatch>> {
        let rows = sqlx::query_as::<_, StudentMatchRow>(
            r#"
            SELECT s.id, s.institute_id, s.user_id, u.display_name, u.email,
                   s.course_id, s.roll_number, s.aadhar, i.name AS institute_name
            FROM students s
            JOIN users u ON u.id = s.user_id
            JOIN institutes i ON i.id = s.institute_id
            WHERE s.aadhar = $1
            ORDER BY i.name, s.roll_number
            "#,
        )
        .bind(aadhar)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to search students by aadhar: {error}"))
        })?;

        Ok(rows.into_iter().map(StudentMatch::from).collect())
    }

    async fn count_people(&self, institute_id: InstituteId) -> AppResult<PeopleCounts> {
        let row = sqlx::query_as::<_, PeopleRow>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM faculty WHERE institute_id = $1) AS faculty,
                (SELECT COUNT(*) FROM students WHERE institute_id = $1) AS students
            "#,
        )
        .bind(institute_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count people: {error}")))?;

        Ok(PeopleCounts {
            faculty: row.faculty,
            students: row.students,
        })
    }
}

fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(database_error) = error {
        return database_error.code().as_deref() == Some("23503");
    }

    false
}

#[derive(Debug, sqlx::FromRow)]
struct FacultyRow {
    id: uuid::Uuid,
    institute_id: uuid::Uuid,
    user_id: uuid::Uuid,
    display_name: String,
    email: String,
    department_id: uuid::Uuid,
    designation: String,
}

impl From<FacultyRow> for FacultyRecord {
    fn from(row: FacultyRow) -> Self {
        Self {
            id: row.id,
            institute_id: InstituteId::from_uuid(row.institute_id),
            user_id: UserId::from_uuid(row.user_id),
            display_name: row.display_name,
            email: row.email,
            department_id: row.department_id,
            designation: row.designation,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StudentRow {
    id: uuid::Uuid,
    institute_id: uuid::Uuid,
    user_id: uuid::Uuid,
    display_name: String,
    email: String,
    course_id: uuid::Uuid,
    roll_number: String,
    aadhar: String,
}

impl From<StudentRow> for StudentRecord {
    fn from(row: StudentRow) -> Self {
        Self {
            id: row.id,
            institute_id: InstituteId::from_uuid(row.institute_id),
            user_id: UserId::from_uuid(row.user_id),
            display_name: row.display_name,
            email: row.email,
            course_id: row.course_id,
            roll_number: row.roll_number,
            aadhar: row.aadhar,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StudentMatchRow {
    id: uuid::Uuid,
    institute_id: uuid::Uuid,
    user_id: uuid::Uuid,
    display_name: String,
    email: String,
    course_id: uuid::Uuid,
    roll_number: String,
    aadhar: String,
    institute_name: String,
}

impl From<StudentMatchRow> for StudentMatch {
    fn from(row: StudentMatchRow) -> Self {
        Self {
            student: StudentRecord {
                id: row.id,
                institute_id: InstituteId::from_uuid(row.institute_id),
                user_id: UserId::from_uuid(row.user_id),
                display_name: row.display_name,
                email: row.email,
                course_id: row.course_id,
                roll_number: row.roll_number,
                aadhar: row.aadhar,
            },
            institute_name: row.institute_name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PeopleRow {
    faculty: i64,
    students: i64,
}
