//! Activity submission, faculty validation, and issuer verification.
//!
//! The workflow: a student submits an activity (status `Pending`); a faculty
//! member of the owning institute decides `Approved` or `Rejected` (remarks
//! mandatory on rejection, re-decision permitted, last write wins); for
//! Extra-Curricular submissions an emailed, time-boxed, single-use session
//! lets the credential's issuer independently confirm the credential ID.

use std::sync::Arc;

use async_trait::async_trait;

use pratibha_core::{AppResult, InstituteId};
use pratibha_domain::{ActivityStatus, ActivityType, CredentialId};

use crate::mailer::EmailService;
use crate::roster_service::RosterRepository;

mod issuer;
mod reports;
mod submit;
mod validate;

#[cfg(test)]
mod tests;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Activity record as persisted in the database.
#[derive(Debug, Clone)]
pub struct ActivityRecord {
    /// Unique activity identifier.
    pub id: uuid::Uuid,
    /// Owning institute.
    pub institute_id: InstituteId,
    /// Submitting student.
    pub student_id: uuid::Uuid,
    /// Faculty member the submission was addressed to (informational).
    pub faculty_id: uuid::Uuid,
    /// Activity title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Link to supporting material, if any.
    pub attachment_link: Option<String>,
    /// Globally unique external credential identifier.
    pub credential_id: String,
    /// Current validation status.
    pub status: ActivityStatus,
    /// Activity category.
    pub activity_type: ActivityType,
    /// Faculty remarks from the latest decision.
    pub remarks: Option<String>,
    /// Whether the submission requested issuer verification.
    pub issuer_verification_required: bool,
    /// Whether the issuer confirmed the credential.
    pub issuer_verified: bool,
    /// Submission timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last mutation timestamp.
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Insert payload for a new activity.
#[derive(Debug, Clone)]
pub struct NewActivity {
    /// Owning institute.
    pub institute_id: InstituteId,
    /// Submitting student.
    pub student_id: uuid::Uuid,
    /// Faculty member addressed by the submission.
    pub faculty_id: uuid::Uuid,
    /// Activity title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Link to supporting material, if any.
    pub attachment_link: Option<String>,
    /// Validated credential identifier.
    pub credential_id: CredentialId,
    /// Activity category.
    pub activity_type: ActivityType,
    /// Whether issuer verification applies to this submission.
    pub issuer_verification_required: bool,
}

/// Repository port for activity persistence.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Inserts a new activity with status `Pending`.
    ///
    /// Fails with a validation error when the credential ID is already taken
    /// by any activity of any institute.
    async fn insert(&self, activity: NewActivity) -> AppResult<uuid::Uuid>;

    /// Finds an activity by its identifier.
    async fn find(&self, activity_id: uuid::Uuid) -> AppResult<Option<ActivityRecord>>;

    /// Lists an institute's activities, optionally filtered by status,
    /// newest first.
    async fn list_for_institute(
        &self,
        institute_id: InstituteId,
        status: Option<ActivityStatus>,
    ) -> AppResult<Vec<ActivityRecord>>;

    /// Lists a student's activities, newest first.
    async fn list_for_student(&self, student_id: uuid::Uuid) -> AppResult<Vec<ActivityRecord>>;

    /// Applies a validation decision: sets status and replaces remarks.
    async fn apply_decision(
        &self,
        activity_id: uuid::Uuid,
        status: ActivityStatus,
        remarks: Option<&str>,
    ) -> AppResult<()>;

    /// Marks the activity's credential as issuer-verified.
    async fn mark_issuer_verified(&self, activity_id: uuid::Uuid) -> AppResult<()>;

    /// Counts an institute's activities per status.
    async fn count_by_status(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Vec<(ActivityStatus, i64)>>;

    /// Counts an institute's activities per type.
    async fn count_by_type(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Vec<(ActivityType, i64)>>;

    /// Counts an institute's `Pending` activities per type.
    async fn count_pending_by_type(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Vec<(ActivityType, i64)>>;
}

/// Issuer approval session record as persisted in the database.
#[derive(Debug, Clone)]
pub struct IssuerSessionRecord {
    /// Unique session identifier.
    pub id: uuid::Uuid,
    /// Activity awaiting issuer confirmation.
    pub activity_id: uuid::Uuid,
    /// Email the verification link was sent to.
    pub issuer_email: String,
    /// Expiration timestamp (five days after issuance).
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Repository port for issuer approval sessions.
///
/// Expiry is enforced at lookup: `find_valid` never returns a session whose
/// `expires_at` has passed, mirroring TTL-index deletion semantics.
#[async_trait]
pub trait IssuerSessionRepository: Send + Sync {
    /// Stores a new session keyed by the token hash.
    async fn create(
        &self,
        activity_id: uuid::Uuid,
        issuer_email: &str,
        token_hash: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<uuid::Uuid>;

    /// Finds a live (unexpired) session by its token hash.
    async fn find_valid(&self, token_hash: &str) -> AppResult<Option<IssuerSessionRecord>>;

    /// Deletes a session (successful verification consumes it).
    async fn delete(&self, session_id: uuid::Uuid) -> AppResult<()>;
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for the activity validation workflow.
#[derive(Clone)]
pub struct ActivityService {
    activity_repository: Arc<dyn ActivityRepository>,
    issuer_sessions: Arc<dyn IssuerSessionRepository>,
    roster: Arc<dyn RosterRepository>,
    email_service: Arc<dyn EmailService>,
    frontend_url: String,
}

impl ActivityService {
    /// Creates a new activity service.
    #[must_use]
    pub fn new(
        activity_repository: Arc<dyn ActivityRepository>,
        issuer_sessions: Arc<dyn IssuerSessionRepository>,
        roster: Arc<dyn RosterRepository>,
        email_service: Arc<dyn EmailService>,
        frontend_url: String,
    ) -> Self {
        Self {
            activity_repository,
            issuer_sessions,
            roster,
            email_service,
            frontend_url,
        }
    }

    /// Lists an institute's activities, optionally filtered by status.
    pub async fn list_for_institute(
        &self,
        institute_id: InstituteId,
        status: Option<ActivityStatus>,
    ) -> AppResult<Vec<ActivityRecord>> {
        self.activity_repository
            .list_for_institute(institute_id, status)
            .await
    }

    /// Lists a student's activities.
    pub async fn list_for_student(
        &self,
        student_id: uuid::Uuid,
    ) -> AppResult<Vec<ActivityRecord>> {
        self.activity_repository.list_for_student(student_id).await
    }
}

pub use issuer::IssuerSessionView;
pub use reports::{ActivityCounts, PendingCounts};
pub use submit::SubmitActivityInput;
