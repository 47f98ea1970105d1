use serde::{Deserialize, Serialize};
use ts_rs::TS;

use pratibha_application::{ActivityCounts, FacultyRecord, PeopleCounts, StudentRecord};

/// Incoming payload for faculty provisioning.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct CreateFacultyRequest {
    pub display_name: String,
    pub email: String,
    pub department_id: uuid::Uuid,
    pub designation: String,
}

/// Incoming payload for student provisioning.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct CreateStudentRequest {
    pub display_name: String,
    pub email: String,
    pub course_id: uuid::Uuid,
    pub roll_number: String,
    pub aadhar: String,
}

/// API representation of a faculty member.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct FacultyResponse {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub department_id: String,
    pub designation: String,
}

impl From<FacultyRecord> for FacultyResponse {
    fn from(record: FacultyRecord) -> Self {
        Self {
            id: record.id.to_string(),
            display_name: record.display_name,
            email: record.email,
            department_id: record.department_id.to_string(),
            designation: record.designation,
        }
    }
}

/// API representation of a student.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct StudentResponse {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub course_id: String,
    pub roll_number: String,
    pub aadhar: String,
}

impl From<StudentRecord> for StudentResponse {
    fn from(record: StudentRecord) -> Self {
        Self {
            id: record.id.to_string(),
            display_name: record.display_name,
            email: record.email,
            course_id: record.course_id.to_string(),
            roll_number: record.roll_number,
            aadhar: record.aadhar,
        }
    }
}

/// Institute dashboard rollup: headcounts plus activity counts.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct AdminOverviewResponse {
    pub faculty: i64,
    pub students: i64,
    pub activities_total: i64,
    pub activities_pending: i64,
    pub activities_approved: i64,
    pub activities_rejected: i64,
    pub activities_curricular: i64,
    pub activities_co_curricular: i64,
    pub activities_extra_curricular: i64,
}

impl AdminOverviewResponse {
    /// Combines the two service rollups into one payload.
    pub fn from_counts(people: PeopleCounts, activities: ActivityCounts) -> Self {
        Self {
            faculty: people.faculty,
            students: people.students,
            activities_total: activities.total,
            activities_pending: activities.pending,
            activities_approved: activities.approved,
            activities_rejected: activities.rejected,
            activities_curricular: activities.curricular,
            activities_co_curricular: activities.co_curricular,
            activities_extra_curricular: activities.extra_curricular,
        }
    }
}
