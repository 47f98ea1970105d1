use pratibha_core::AppError;
use pratibha_domain::{ActivityType, CredentialId};

use crate::token_crypto::hash_token;

use super::*;

/// What an issuer sees when opening their verification link.
///
/// Deliberately excludes the stored credential ID: the issuer proves
/// knowledge of it, the system never discloses it.
#[derive(Debug, Clone)]
pub struct IssuerSessionView {
    /// Title of the activity awaiting confirmation.
    pub activity_title: String,
    /// Category of the activity.
    pub activity_type: ActivityType,
    /// Display name of the submitting student.
    pub student_name: String,
    /// Email the link was addressed to.
    pub issuer_email: String,
    /// When the session expires.
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl ActivityService {
    /// Looks up a live issuer session by its raw token.
    ///
    /// Fails with `NotFound` when the token is unknown or the session has
    /// expired.
    pub async fn issuer_session(&self, raw_token: &str) -> AppResult<IssuerSessionView> {
        let (session, activity) = self.find_session_and_activity(raw_token).await?;

        let student = self
            .roster
            .find_student(activity.student_id)
            .await?
            .ok_or_else(|| AppError::Internal("activity references a removed student".to_owned()))?;

        Ok(IssuerSessionView {
            activity_title: activity.title,
            activity_type: activity.activity_type,
            student_name: student.display_name,
            issuer_email: session.issuer_email,
            expires_at: session.expires_at,
        })
    }

    /// Confirms a credential ID against a live issuer session.
    ///
    /// On a match the activity is marked issuer-verified and the session is
    /// consumed. On a mismatch the session stays usable until it expires.
    pub async fn verify_issuer(&self, raw_token: &str, credential_id: &str) -> AppResult<()> {
        let (session, activity) = self.find_session_and_activity(raw_token).await?;

        if !activity.activity_type.supports_issuer_verification() {
            return Err(AppError::Validation(
                "this activity does not support issuer verification".to_owned(),
            ));
        }

        let submitted = CredentialId::new(credential_id)?;
        if submitted.as_str() != activity.credential_id {
            return Err(AppError::Validation(
                "the credential id does not match our records".to_owned(),
            ));
        }

        self.activity_repository
            .mark_issuer_verified(activity.id)
            .await?;

        // Single use: a confirmed session cannot confirm twice.
        self.issuer_sessions.delete(session.id).await?;

        Ok(())
    }

    async fn find_session_and_activity(
        &self,
        raw_token: &str,
    ) -> AppResult<(IssuerSessionRecord, ActivityRecord)> {
        let token_hash = hash_token(raw_token);

        let session = self
            .issuer_sessions
            .find_valid(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("verification link is invalid or has expired".to_owned())
            })?;

        let activity = self
            .activity_repository
            .find(session.activity_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("the activity for this link no longer exists".to_owned())
            })?;

        Ok((session, activity))
    }
}
