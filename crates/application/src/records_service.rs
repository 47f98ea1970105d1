//! Attendance and grade recording, and per-student academic summaries.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use pratibha_core::{AppError, AppResult, InstituteId};
use pratibha_domain::{GradePoint, attendance_percentage, cumulative_gpa, validate_semester};

use crate::catalog_service::CatalogRepository;
use crate::roster_service::RosterRepository;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// One student's attendance mark for a course session.
#[derive(Debug, Clone)]
pub struct AttendanceEntry {
    /// Student being marked.
    pub student_id: uuid::Uuid,
    /// Whether the student was present.
    pub present: bool,
}

/// One student's grade for a course in a semester.
#[derive(Debug, Clone)]
pub struct GradeEntry {
    /// Student being graded.
    pub student_id: uuid::Uuid,
    /// Credits the course carries.
    pub credits: i16,
    /// Grade point on the 10-point scale.
    pub grade_point: f64,
}

/// Repository port for attendance and grade persistence.
#[async_trait]
pub trait AcademicRecordRepository: Send + Sync {
    /// Records attendance marks for a course session.
    ///
    /// Upserts per `(student, course, date)`: re-recording a session
    /// replaces the earlier marks.
    async fn record_attendance(
        &self,
        institute_id: InstituteId,
        course_id: uuid::Uuid,
        recorded_by: uuid::Uuid,
        date: NaiveDate,
        entries: &[AttendanceEntry],
    ) -> AppResult<()>;

    /// Returns `(present, total)` session counts for a student.
    async fn attendance_counts(&self, student_id: uuid::Uuid) -> AppResult<(i64, i64)>;

    /// Records grades for a course and semester.
    ///
    /// Upserts per `(student, course, semester)`.
    async fn record_grades(
        &self,
        institute_id: InstituteId,
        course_id: uuid::Uuid,
        recorded_by: uuid::Uuid,
        semester: i16,
        entries: &[GradeEntry],
    ) -> AppResult<()>;

    /// Returns `(credits, grade_point)` rows for a student.
    async fn grade_rows(&self, student_id: uuid::Uuid) -> AppResult<Vec<(i16, f64)>>;
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// A student's aggregate academic summary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StudentAcademicSummary {
    /// Attendance percentage, absent when no sessions are recorded.
    pub attendance_percentage: Option<f64>,
    /// Credit-weighted CGPA, absent when no grades are recorded.
    pub cgpa: Option<f64>,
}

/// Application service for academic record keeping.
#[derive(Clone)]
pub struct RecordsService {
    records: Arc<dyn AcademicRecordRepository>,
    roster: Arc<dyn RosterRepository>,
    catalog: Arc<dyn CatalogRepository>,
}

impl RecordsService {
    /// Creates a new records service.
    #[must_use]
    pub fn new(
        records: Arc<dyn AcademicRecordRepository>,
        roster: Arc<dyn RosterRepository>,
        catalog: Arc<dyn CatalogRepository>,
    ) -> Self {
        Self {
            records,
            roster,
            catalog,
        }
    }

    /// Records attendance marks for one course session.
    pub async fn record_attendance(
        &self,
        institute_id: InstituteId,
        course_id: uuid::Uuid,
        recorded_by: uuid::Uuid,
        date: NaiveDate,
        entries: Vec<AttendanceEntry>,
    ) -> AppResult<()> {
        if entries.is_empty() {
            return Err(AppError::Validation(
                "at least one attendance entry is required".to_owned(),
            ));
        }

        self.guard_course(institute_id, course_id).await?;
        self.guard_students(institute_id, entries.iter().map(|entry| entry.student_id))
            .await?;

        self.records
            .record_attendance(institute_id, course_id, recorded_by, date, &entries)
            .await
    }

    /// Records grades for a course and semester.
    pub async fn record_grades(
        &self,
        institute_id: InstituteId,
        course_id: uuid::Uuid,
        recorded_by: uuid::Uuid,
        semester: i16,
        entries: Vec<GradeEntry>,
    ) -> AppResult<()> {
        if entries.is_empty() {
            return Err(AppError::Validation(
                "at least one grade entry is required".to_owned(),
            ));
        }

        validate_semester(semester)?;
        for entry in &entries {
            GradePoint::new(entry.grade_point)?;
            if !(1..=10).contains(&entry.credits) {
                return Err(AppError::Validation(
                    "credits must be between 1 and 10".to_owned(),
                ));
            }
        }

        self.guard_course(institute_id, course_id).await?;
        self.guard_students(institute_id, entries.iter().map(|entry| entry.student_id))
            .await?;

        self.records
            .record_grades(institute_id, course_id, recorded_by, semester, &entries)
            .await
    }

    /// Returns a student's attendance percentage and CGPA.
    ///
    /// The two lookups are independent and run concurrently.
    pub async fn student_summary(
        &self,
        student_id: uuid::Uuid,
    ) -> AppResult<StudentAcademicSummary> {
        let ((present, total), grades) = tokio::try_join!(
            self.records.attendance_counts(student_id),
            self.records.grade_rows(student_id),
        )?;

        let grade_entries = grades
            .into_iter()
            .map(|(credits, grade_point)| GradePoint::new(grade_point).map(|gp| (credits, gp)))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(StudentAcademicSummary {
            attendance_percentage: attendance_percentage(present, total),
            cgpa: cumulative_gpa(&grade_entries),
        })
    }

    async fn guard_course(
        &self,
        institute_id: InstituteId,
        course_id: uuid::Uuid,
    ) -> AppResult<()> {
        self.catalog
            .find_course(course_id)
            .await?
            .filter(|course| course.institute_id == institute_id)
            .ok_or_else(|| AppError::NotFound("course not found".to_owned()))?;
        Ok(())
    }

    async fn guard_students(
        &self,
        institute_id: InstituteId,
        student_ids: impl Iterator<Item = uuid::Uuid>,
    ) -> AppResult<()> {
        for student_id in student_ids {
            self.roster
                .find_student(student_id)
                .await?
                .filter(|student| student.institute_id == institute_id)
                .ok_or_else(|| {
                    AppError::Validation(format!("unknown student '{student_id}' in entries"))
                })?;
        }
        Ok(())
    }
}
