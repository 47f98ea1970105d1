//! In-memory activity and issuer session repositories.
//!
//! Back the API in development without a database and give the workflow's
//! storage invariants (global credential uniqueness, lookup-time session
//! expiry) a home for fast tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use pratibha_application::{
    ActivityRecord, ActivityRepository, IssuerSessionRecord, IssuerSessionRepository, NewActivity,
};
use pratibha_core::{AppError, AppResult, InstituteId};
use pratibha_domain::{ActivityStatus, ActivityType};

/// In-memory activity repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryActivityRepository {
    activities: RwLock<HashMap<Uuid, ActivityRecord>>,
}

impl InMemoryActivityRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            activities: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ActivityRepository for InMemoryActivityRepository {
    async fn insert(&self, activity: NewActivity) -> AppResult<Uuid> {
        let mut activities = self.activities.write().await;

        // Credential uniqueness is global, not per institute.
        if activities
            .values()
            .any(|existing| existing.credential_id == activity.credential_id.as_str())
        {
            return Err(AppError::Validation(
                "an activity with this credential id already exists".to_owned(),
            ));
        }

        let id = Uuid::new_v4();
        let now = chrono::Utc::now();
        activities.insert(
            id,
            ActivityRecord {
                id,
                institute_id: activity.institute_id,
                student_id: activity.student_id,
                faculty_id: activity.faculty_id,
                title: activity.title,
                description: activity.description,
                attachment_link: activity.attachment_link,
                credential_id: activity.credential_id.as_str().to_owned(),
                status: ActivityStatus::Pending,
                activity_type: activity.activity_type,
                remarks: None,
                issuer_verification_required: activity.issuer_verification_required,
                issuer_verified: false,
                created_at: now,
                updated_at: now,
            },
        );

        Ok(id)
    }

    async fn find(&self, activity_id: Uuid) -> AppResult<Option<ActivityRecord>> {
        Ok(self.activities.read().await.get(&activity_id).cloned())
    }

    async fn list_for_institute(
        &self,
        institute_id: InstituteId,
        status: Option<ActivityStatus>,
    ) -> AppResult<Vec<ActivityRecord>> {
        let activities = self.activities.read().await;

        let mut values: Vec<ActivityRecord> = activities
            .values()
            .filter(|activity| activity.institute_id == institute_id)
            .filter(|activity| status.is_none_or(|wanted| activity.status == wanted))
            .cloned()
            .collect();
        values.sort_by(|left, right| right.created_at.cmp(&left.created_at));

        Ok(values)
    }

    async fn list_for_student(&self, student_id: Uuid) -> AppResult<Vec<ActivityRecord>> {
        let activities = self.activities.read().await;

        let mut values: Vec<ActivityRecord> = activities
            .values()
            .filter(|activity| activity.student_id == student_id)
            .cloned()
            .collect();
        values.sort_by(|left, right| right.created_at.cmp(&left.created_at));

        Ok(values)
    }

    async fn apply_decision(
        &self,
        activity_id: Uuid,
        status: ActivityStatus,
        remarks: Option<&str>,
    ) -> AppResult<()> {
        let mut activities = self.activities.write().await;
        let activity = activities
            .get_mut(&activity_id)
            .ok_or_else(|| AppError::NotFound("activity not found".to_owned()))?;

        activity.status = status;
        activity.remarks = remarks.map(ToOwned::to_owned);
        activity.updated_at = chrono::Utc::now();

        Ok(())
    }

    async fn mark_issuer_verified(&self, activity_id: Uuid) -> AppResult<()> {
        let mut activities = self.activities.write().await;
        let activity = activities
            .get_mut(&activity_id)
            .ok_or_else(|| AppError::NotFound("activity not found".to_owned()))?;

        activity.issuer_verified = true;
        activity.updated_at = chrono::Utc::now();

        Ok(())
    }

    async fn count_by_status(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Vec<(ActivityStatus, i64)>> {
        let activities = self.activities.read().await;
        let mut counts: HashMap<ActivityStatus, i64> = HashMap::new();
        for activity in activities.values() {
            if activity.institute_id == institute_id {
                *counts.entry(activity.status).or_insert(0) += 1;
            }
        }

        Ok(counts.into_iter().collect())
    }

    async fn count_by_type(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Vec<(ActivityType, i64)>> {
        let activities = self.activities.read().await;
        let mut counts: HashMap<ActivityType, i64> = HashMap::new();
        for activity in activities.values() {
            if activity.institute_id == institute_id {
                *counts.entry(activity.activity_type).or_insert(0) += 1;
            }
        }

        Ok(counts.into_iter().collect())
    }

    async fn count_pending_by_type(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Vec<(ActivityType, i64)>> {
        let activities = self.activities.read().await;
        let mut counts: HashMap<ActivityType, i64> = HashMap::new();
        for activity in activities.values() {
            if activity.institute_id == institute_id && activity.status == ActivityStatus::Pending
            {
                *counts.entry(activity.activity_type).or_insert(0) += 1;
            }
        }

        Ok(counts.into_iter().collect())
    }
}

/// In-memory issuer session repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryIssuerSessionRepository {
    sessions: RwLock<HashMap<String, IssuerSessionRecord>>,
}

impl InMemoryIssuerSessionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl IssuerSessionRepository for InMemoryIssuerSessionRepository {
    async fn create(
        &self,
        activity_id: Uuid,
        issuer_email: &str,
        token_hash: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<Uuid> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(token_hash) {
            return Err(AppError::Conflict(
                "issuer session token collision".to_owned(),
            ));
        }

        let id = Uuid::new_v4();
        sessions.insert(
            token_hash.to_owned(),
            IssuerSessionRecord {
                id,
                activity_id,
                issuer_email: issuer_email.to_owned(),
                expires_at,
            },
        );

        Ok(id)
    }

    async fn find_valid(&self, token_hash: &str) -> AppResult<Option<IssuerSessionRecord>> {
        Ok(self
            .sessions
            .read()
            .await
            .get(token_hash)
            .filter(|session| session.expires_at > chrono::Utc::now())
            .cloned())
    }

    async fn delete(&self, session_id: Uuid) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .retain(|_, session| session.id != session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pratibha_core::InstituteId;
    use pratibha_domain::{ActivityStatus, ActivityType, CredentialId};

    use super::*;

    fn new_activity(credential: &str, institute_id: InstituteId) -> AppResult<NewActivity> {
        Ok(NewActivity {
            institute_id,
            student_id: Uuid::new_v4(),
            faculty_id: Uuid::new_v4(),
            title: "Workshop certificate".to_owned(),
            description: String::new(),
            attachment_link: None,
            credential_id: CredentialId::new(credential)?,
            activity_type: ActivityType::Curricular,
            issuer_verification_required: false,
        })
    }

    #[tokio::test]
    async fn duplicate_credential_is_rejected_across_institutes() -> AppResult<()> {
        let repository = InMemoryActivityRepository::new();

        repository
            .insert(new_activity("CERT-1", InstituteId::new())?)
            .await?;

        let duplicate = repository
            .insert(new_activity("CERT-1", InstituteId::new())?)
            .await;
        assert!(duplicate.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn decisions_replace_status_and_remarks() -> AppResult<()> {
        let repository = InMemoryActivityRepository::new();
        let institute_id = InstituteId::new();

        let id = repository.insert(new_activity("CERT-1", institute_id)?).await?;
        repository
            .apply_decision(id, ActivityStatus::Rejected, Some("blurry scan"))
            .await?;
        repository
            .apply_decision(id, ActivityStatus::Approved, None)
            .await?;

        let activity = repository.find(id).await?;
        assert!(activity.is_some());
        let activity = activity.unwrap_or_else(|| panic!("test"));
        assert_eq!(activity.status, ActivityStatus::Approved);
        assert_eq!(activity.remarks, None);

        Ok(())
    }

    #[tokio::test]
    async fn expired_sessions_are_not_found() -> AppResult<()> {
        let repository = InMemoryIssuerSessionRepository::new();

        repository
            .create(
                Uuid::new_v4(),
                "issuer@example.org",
                "hash-1",
                chrono::Utc::now() - chrono::Duration::minutes(1),
            )
            .await?;

        assert!(repository.find_valid("hash-1").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn live_sessions_are_found_until_deleted() -> AppResult<()> {
        let repository = InMemoryIssuerSessionRepository::new();

        let session_id = repository
            .create(
                Uuid::new_v4(),
                "issuer@example.org",
                "hash-1",
                chrono::Utc::now() + chrono::Duration::days(5),
            )
            .await?;

        assert!(repository.find_valid("hash-1").await?.is_some());

        repository.delete(session_id).await?;
        assert!(repository.find_valid("hash-1").await?.is_none());

        Ok(())
    }
}
