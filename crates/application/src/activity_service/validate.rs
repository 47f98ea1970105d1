use pratibha_core::AppError;
use pratibha_domain::ValidationDecision;

use super::*;

impl ActivityService {
    /// Applies a faculty validation decision to an activity.
    ///
    /// Any faculty member of the owning institute may decide; the assigned
    /// approver is informational. A decided activity may be decided again --
    /// there is no terminal lock, and concurrent decisions resolve
    /// last-write-wins.
    pub async fn validate(
        &self,
        caller_institute: InstituteId,
        activity_id: uuid::Uuid,
        decision: ValidationDecision,
    ) -> AppResult<ActivityRecord> {
        let activity = self
            .activity_repository
            .find(activity_id)
            .await?
            .ok_or_else(|| AppError::NotFound("activity not found".to_owned()))?;

        if activity.institute_id != caller_institute {
            return Err(AppError::Forbidden(
                "activity belongs to a different institute".to_owned(),
            ));
        }

        self.activity_repository
            .apply_decision(activity_id, decision.status(), decision.remarks())
            .await?;

        self.activity_repository
            .find(activity_id)
            .await?
            .ok_or_else(|| AppError::Internal("activity vanished after decision".to_owned()))
    }
}
