//! Cross-institute Aadhar search.
//!
//! A 12-digit Aadhar number fans out to every matching student across all
//! institutes. For each student the attendance, grade, and activity lookups
//! are independent and run concurrently; results are grouped per institute.
//! The whole surface is read-only with no transactional guarantees.

use std::sync::Arc;

use pratibha_core::{AppResult, InstituteId};
use pratibha_domain::{
    AadharNumber, ActivityType, GradePoint, attendance_percentage, cumulative_gpa,
};

use crate::activity_service::ActivityRepository;
use crate::records_service::AcademicRecordRepository;
use crate::roster_service::{RosterRepository, StudentMatch};

/// One activity as shown on the public search surface.
///
/// Statuses are relabeled for external readers: `Approved` becomes
/// "Validated", `Rejected` "Un-validated", and `Pending` "Un-Looked".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicActivityEntry {
    /// Activity title.
    pub title: String,
    /// Activity category.
    pub activity_type: ActivityType,
    /// Public status label.
    pub status_label: String,
    /// Whether the issuer confirmed the credential.
    pub issuer_verified: bool,
}

/// One matched student with their academic summary.
#[derive(Debug, Clone)]
pub struct StudentSearchEntry {
    /// Roster identifier of the student.
    pub student_id: uuid::Uuid,
    /// Display name.
    pub display_name: String,
    /// Roll number within the course.
    pub roll_number: String,
    /// Attendance percentage, absent when no sessions are recorded.
    pub attendance_percentage: Option<f64>,
    /// Credit-weighted CGPA, absent when no grades are recorded.
    pub cgpa: Option<f64>,
    /// The student's activities with public status labels.
    pub activities: Vec<PublicActivityEntry>,
}

/// Matched students of one institute.
#[derive(Debug, Clone)]
pub struct InstituteSearchGroup {
    /// The institute.
    pub institute_id: InstituteId,
    /// Institute display name.
    pub institute_name: String,
    /// Matched students enrolled here.
    pub students: Vec<StudentSearchEntry>,
}

/// Complete response of an Aadhar search, grouped by institute.
#[derive(Debug, Clone, Default)]
pub struct PersonSearchResult {
    /// One group per distinct institute with at least one match.
    pub institutes: Vec<InstituteSearchGroup>,
}

/// Application service for the public Aadhar search.
#[derive(Clone)]
pub struct SearchService {
    roster: Arc<dyn RosterRepository>,
    records: Arc<dyn AcademicRecordRepository>,
    activities: Arc<dyn ActivityRepository>,
}

impl SearchService {
    /// Creates a new search service.
    #[must_use]
    pub fn new(
        roster: Arc<dyn RosterRepository>,
        records: Arc<dyn AcademicRecordRepository>,
        activities: Arc<dyn ActivityRepository>,
    ) -> Self {
        Self {
            roster,
            records,
            activities,
        }
    }

    /// Finds every record held under an Aadhar number, grouped by institute.
    pub async fn search(&self, aadhar: &AadharNumber) -> AppResult<PersonSearchResult> {
        let matches = self.roster.find_students_by_aadhar(aadhar.as_str()).await?;

        let mut result = PersonSearchResult::default();
        for matched in matches {
            let entry = self.student_entry(&matched).await?;
            let group = Self::group_for(&mut result, &matched);
            group.students.push(entry);
        }

        Ok(result)
    }

    async fn student_entry(&self, matched: &StudentMatch) -> AppResult<StudentSearchEntry> {
        let student_id = matched.student.id;

        // Independent per-student lookups, fanned out concurrently.
        let ((present, total), grades, activities) = tokio::try_join!(
            self.records.attendance_counts(student_id),
            self.records.grade_rows(student_id),
            self.activities.list_for_student(student_id),
        )?;

        let grade_entries = grades
            .into_iter()
            .map(|(credits, grade_point)| GradePoint::new(grade_point).map(|gp| (credits, gp)))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(StudentSearchEntry {
            student_id,
            display_name: matched.student.display_name.clone(),
            roll_number: matched.student.roll_number.clone(),
            attendance_percentage: attendance_percentage(present, total),
            cgpa: cumulative_gpa(&grade_entries),
            activities: activities
                .into_iter()
                .map(|activity| PublicActivityEntry {
                    title: activity.title,
                    activity_type: activity.activity_type,
                    status_label: activity.status.public_label().to_owned(),
                    issuer_verified: activity.issuer_verified,
                })
                .collect(),
        })
    }

    fn group_for<'result>(
        result: &'result mut PersonSearchResult,
        matched: &StudentMatch,
    ) -> &'result mut InstituteSearchGroup {
        let institute_id = matched.student.institute_id;
        let position = result
            .institutes
            .iter()
            .position(|group| group.institute_id == institute_id);

        match position {
            Some(index) => &mut result.institutes[index],
            None => {
                result.institutes.push(InstituteSearchGroup {
                    institute_id,
                    institute_name: matched.institute_name.clone(),
                    students: Vec::new(),
                });
                let last = result.institutes.len() - 1;
                &mut result.institutes[last]
            }
        }
    }
}
