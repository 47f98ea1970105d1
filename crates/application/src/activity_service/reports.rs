use super::*;

/// Institute-level activity rollup for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityCounts {
    /// Total number of activities.
    pub total: i64,
    /// Activities awaiting a decision.
    pub pending: i64,
    /// Approved activities.
    pub approved: i64,
    /// Rejected activities.
    pub rejected: i64,
    /// Curricular activities.
    pub curricular: i64,
    /// Co-Curricular activities.
    pub co_curricular: i64,
    /// Extra-Curricular activities.
    pub extra_curricular: i64,
}

/// Pending-validation queue sizes for the faculty dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingCounts {
    /// Total pending activities.
    pub total: i64,
    /// Pending Curricular activities.
    pub curricular: i64,
    /// Pending Co-Curricular activities.
    pub co_curricular: i64,
    /// Pending Extra-Curricular activities.
    pub extra_curricular: i64,
}

impl ActivityService {
    /// Returns status and type rollups for an institute's activities.
    pub async fn institute_overview(&self, institute_id: InstituteId) -> AppResult<ActivityCounts> {
        let (by_status, by_type) = tokio::try_join!(
            self.activity_repository.count_by_status(institute_id),
            self.activity_repository.count_by_type(institute_id),
        )?;

        let mut counts = ActivityCounts::default();
        for (status, count) in by_status {
            counts.total += count;
            match status {
                ActivityStatus::Pending => counts.pending = count,
                ActivityStatus::Approved => counts.approved = count,
                ActivityStatus::Rejected => counts.rejected = count,
            }
        }
        for (activity_type, count) in by_type {
            match activity_type {
                ActivityType::Curricular => counts.curricular = count,
                ActivityType::CoCurricular => counts.co_curricular = count,
                ActivityType::ExtraCurricular => counts.extra_curricular = count,
            }
        }

        Ok(counts)
    }

    /// Returns the pending-validation queue sizes for an institute.
    pub async fn pending_counts(&self, institute_id: InstituteId) -> AppResult<PendingCounts> {
        let by_type = self
            .activity_repository
            .count_pending_by_type(institute_id)
            .await?;

        let mut counts = PendingCounts::default();
        for (activity_type, count) in by_type {
            counts.total += count;
            match activity_type {
                ActivityType::Curricular => counts.curricular = count,
                ActivityType::CoCurricular => counts.co_curricular = count,
                ActivityType::ExtraCurricular => counts.extra_curricular = count,
            }
        }

        Ok(counts)
    }
}
