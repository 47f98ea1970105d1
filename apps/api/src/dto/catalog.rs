use serde::{Deserialize, Serialize};
use ts_rs::TS;

use pratibha_application::{CourseRecord, DepartmentRecord};

/// Incoming payload for department creation.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct CreateDepartmentRequest {
    pub name: String,
}

/// Incoming payload for course creation.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct CreateCourseRequest {
    pub department_id: uuid::Uuid,
    pub name: String,
    pub code: String,
}

/// API representation of a department.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct DepartmentResponse {
    pub id: String,
    pub name: String,
}

impl From<DepartmentRecord> for DepartmentResponse {
    fn from(record: DepartmentRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name,
        }
    }
}

/// API representation of a course.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct CourseResponse {
    pub id: String,
    pub department_id: String,
    pub name: String,
    pub code: String,
}

impl From<CourseRecord> for CourseResponse {
    fn from(record: CourseRecord) -> Self {
        Self {
            id: record.id.to_string(),
            department_id: record.department_id.to_string(),
            name: record.name,
            code: record.code,
        }
    }
}
