use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::ActivityResponse;

/// One student's attendance mark in a recording request.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct AttendanceEntryRequest {
    pub student_id: uuid::Uuid,
    pub present: bool,
}

/// Incoming payload for recording a course session's attendance.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct RecordAttendanceRequest {
    pub course_id: uuid::Uuid,
    /// Session date, `YYYY-MM-DD`.
    pub date: chrono::NaiveDate,
    pub entries: Vec<AttendanceEntryRequest>,
}

/// One student's grade in a recording request.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct GradeEntryRequest {
    pub student_id: uuid::Uuid,
    pub credits: i16,
    pub grade_point: f64,
}

/// Incoming payload for recording grades.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct RecordGradesRequest {
    pub course_id: uuid::Uuid,
    pub semester: i16,
    pub entries: Vec<GradeEntryRequest>,
}

/// A student's own records: summary plus activities.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct StudentRecordsResponse {
    pub attendance_percentage: Option<f64>,
    pub cgpa: Option<f64>,
    pub activities: Vec<ActivityResponse>,
}
