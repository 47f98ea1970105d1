use serde::{Deserialize, Serialize};
use ts_rs::TS;

use pratibha_application::{ActivityRecord, PendingCounts};

/// Incoming payload for a student activity submission.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct SubmitActivityRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// One of `curricular`, `co_curricular`, `extra_curricular`.
    pub activity_type: String,
    pub credential_id: String,
    /// Faculty member the submission is addressed to.
    pub applied_to: uuid::Uuid,
    pub attachment_link: Option<String>,
    /// Required when `activity_type` is `extra_curricular`.
    pub issuer_email: Option<String>,
}

/// Incoming payload for a faculty validation decision.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct ValidateActivityRequest {
    /// One of `approved`, `rejected`.
    pub status: String,
    /// Required when rejecting.
    pub remarks: Option<String>,
}

/// API representation of an activity.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ActivityResponse {
    pub id: String,
    pub student_id: String,
    pub faculty_id: String,
    pub title: String,
    pub description: String,
    pub attachment_link: Option<String>,
    pub credential_id: String,
    pub status: String,
    pub activity_type: String,
    pub remarks: Option<String>,
    pub issuer_verification_required: bool,
    pub issuer_verified: bool,
    pub created_at: String,
}

impl From<ActivityRecord> for ActivityResponse {
    fn from(record: ActivityRecord) -> Self {
        Self {
            id: record.id.to_string(),
            student_id: record.student_id.to_string(),
            faculty_id: record.faculty_id.to_string(),
            title: record.title,
            description: record.description,
            attachment_link: record.attachment_link,
            credential_id: record.credential_id,
            status: record.status.as_str().to_owned(),
            activity_type: record.activity_type.as_str().to_owned(),
            remarks: record.remarks,
            issuer_verification_required: record.issuer_verification_required,
            issuer_verified: record.issuer_verified,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Pending-validation queue sizes for the faculty dashboard.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct PendingCountsResponse {
    pub total: i64,
    pub curricular: i64,
    pub co_curricular: i64,
    pub extra_curricular: i64,
}

impl From<PendingCounts> for PendingCountsResponse {
    fn from(counts: PendingCounts) -> Self {
        Self {
            total: counts.total,
            curricular: counts.curricular,
            co_curricular: counts.co_curricular,
            extra_curricular: counts.extra_curricular,
        }
    }
}
