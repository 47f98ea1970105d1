//! Institute catalog management: departments and courses.

use std::sync::Arc;

use async_trait::async_trait;

use pratibha_core::{AppError, AppResult, InstituteId, NonEmptyString};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Department record as persisted in the database.
#[derive(Debug, Clone)]
pub struct DepartmentRecord {
    /// Unique department identifier.
    pub id: uuid::Uuid,
    /// Owning institute.
    pub institute_id: InstituteId,
    /// Department name, unique per institute.
    pub name: String,
}

/// Course record as persisted in the database.
#[derive(Debug, Clone)]
pub struct CourseRecord {
    /// Unique course identifier.
    pub id: uuid::Uuid,
    /// Owning institute.
    pub institute_id: InstituteId,
    /// Department offering the course.
    pub department_id: uuid::Uuid,
    /// Course name.
    pub name: String,
    /// Course code, unique per institute.
    pub code: String,
}

/// Repository port for catalog persistence.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Creates a department. Fails with a conflict on a duplicate name.
    async fn create_department(
        &self,
        institute_id: InstituteId,
        name: &str,
    ) -> AppResult<uuid::Uuid>;

    /// Lists an institute's departments by name.
    async fn list_departments(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Vec<DepartmentRecord>>;

    /// Finds a department by its identifier.
    async fn find_department(
        &self,
        department_id: uuid::Uuid,
    ) -> AppResult<Option<DepartmentRecord>>;

    /// Deletes a department. Fails with a conflict while courses reference it.
    async fn delete_department(
        &self,
        institute_id: InstituteId,
        department_id: uuid::Uuid,
    ) -> AppResult<()>;

    /// Creates a course. Fails with a conflict on a duplicate code.
    async fn create_course(
        &self,
        institute_id: InstituteId,
        department_id: uuid::Uuid,
        name: &str,
        code: &str,
    ) -> AppResult<uuid::Uuid>;

    /// Lists an institute's courses by code.
    async fn list_courses(&self, institute_id: InstituteId) -> AppResult<Vec<CourseRecord>>;

    /// Finds a course by its identifier.
    async fn find_course(&self, course_id: uuid::Uuid) -> AppResult<Option<CourseRecord>>;

    /// Deletes a course. Fails with a conflict while students reference it.
    async fn delete_course(
        &self,
        institute_id: InstituteId,
        course_id: uuid::Uuid,
    ) -> AppResult<()>;
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Parameters for course creation.
#[derive(Debug, Clone)]
pub struct CreateCourseInput {
    /// Department offering the course.
    pub department_id: uuid::Uuid,
    /// Course name.
    pub name: String,
    /// Course code, unique per institute.
    pub code: String,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for institute catalog management.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    /// Creates a new catalog service.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    /// Creates a department in the caller's institute.
    pub async fn create_department(
        &self,
        institute_id: InstituteId,
        name: &str,
    ) -> AppResult<uuid::Uuid> {
        let name = NonEmptyString::new(name)?;
        self.catalog
            .create_department(institute_id, name.as_str().trim())
            .await
    }

    /// Lists the caller's departments.
    pub async fn list_departments(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Vec<DepartmentRecord>> {
        self.catalog.list_departments(institute_id).await
    }

    /// Deletes a department of the caller's institute.
    pub async fn delete_department(
        &self,
        institute_id: InstituteId,
        department_id: uuid::Uuid,
    ) -> AppResult<()> {
        self.catalog
            .delete_department(institute_id, department_id)
            .await
    }

    /// Creates a course under one of the caller's departments.
    pub async fn create_course(
        &self,
        institute_id: InstituteId,
        input: CreateCourseInput,
    ) -> AppResult<uuid::Uuid> {
        let name = NonEmptyString::new(&input.name)?;
        let code = NonEmptyString::new(&input.code)?;

        let department = self
            .catalog
            .find_department(input.department_id)
            .await?
            .filter(|department| department.institute_id == institute_id)
            .ok_or_else(|| AppError::NotFound("department not found".to_owned()))?;

        self.catalog
            .create_course(
                institute_id,
                department.id,
                name.as_str().trim(),
                code.as_str().trim(),
            )
            .await
    }

    /// Lists the caller's courses.
    pub async fn list_courses(&self, institute_id: InstituteId) -> AppResult<Vec<CourseRecord>> {
        self.catalog.list_courses(institute_id).await
    }

    /// Deletes a course of the caller's institute.
    pub async fn delete_course(
        &self,
        institute_id: InstituteId,
        course_id: uuid::Uuid,
    ) -> AppResult<()> {
        self.catalog.delete_course(institute_id, course_id).await
    }

    /// Finds a course, constrained to the caller's institute.
    pub async fn find_course(
        &self,
        institute_id: InstituteId,
        course_id: uuid::Uuid,
    ) -> AppResult<Option<CourseRecord>> {
        Ok(self
            .catalog
            .find_course(course_id)
            .await?
            .filter(|course| course.institute_id == institute_id))
    }
}
