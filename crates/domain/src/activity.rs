//! Activity credential types and the validation state machine.
//!
//! An activity starts `Pending` and is moved to `Approved` or `Rejected` by a
//! faculty validation decision. Neither target state is terminal: a later
//! decision may overwrite an earlier one, with last-write-wins semantics.

use pratibha_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Lifetime of an issuer approval session before it expires.
pub const ISSUER_SESSION_LIFETIME_DAYS: i64 = 5;

/// Validation state of a submitted activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityStatus {
    /// Submitted, awaiting a faculty decision.
    Pending,
    /// Accepted by a faculty member.
    Approved,
    /// Declined by a faculty member; remarks are mandatory.
    Rejected,
}

impl ActivityStatus {
    /// Returns the storage string for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a storage string into a status.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(AppError::Validation(format!(
                "unknown activity status '{value}'"
            ))),
        }
    }

    /// Returns the label shown on the public search surface.
    #[must_use]
    pub fn public_label(&self) -> &'static str {
        match self {
            Self::Approved => "Validated",
            Self::Rejected => "Un-validated",
            Self::Pending => "Un-Looked",
        }
    }
}

/// Category of a submitted activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityType {
    /// Part of the formal curriculum.
    Curricular,
    /// Organized alongside the curriculum.
    CoCurricular,
    /// Outside the curriculum; supports issuer verification.
    ExtraCurricular,
}

impl ActivityType {
    /// Returns the storage string for this type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Curricular => "curricular",
            Self::CoCurricular => "co_curricular",
            Self::ExtraCurricular => "extra_curricular",
        }
    }

    /// Parses a storage string into a type.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "curricular" => Ok(Self::Curricular),
            "co_curricular" => Ok(Self::CoCurricular),
            "extra_curricular" => Ok(Self::ExtraCurricular),
            _ => Err(AppError::Validation(format!(
                "unknown activity type '{value}'"
            ))),
        }
    }

    /// Whether submissions of this type go through issuer verification.
    ///
    /// Only Extra-Curricular activities carry an issuer email and may ever
    /// have `issuer_verified` set.
    #[must_use]
    pub fn supports_issuer_verification(&self) -> bool {
        matches!(self, Self::ExtraCurricular)
    }
}

/// Validated external credential identifier.
///
/// Globally unique across all institutes; uniqueness is enforced by storage,
/// structure is enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialId(String);

impl CredentialId {
    /// Creates a validated credential identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "credential id must not be empty".to_owned(),
            ));
        }

        if trimmed.len() > 128 {
            return Err(AppError::Validation(
                "credential id must not exceed 128 characters".to_owned(),
            ));
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(AppError::Validation(
                "credential id must not contain whitespace".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the validated credential string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<CredentialId> for String {
    fn from(value: CredentialId) -> Self {
        value.0
    }
}

/// A faculty validation decision over a pending or previously decided activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDecision {
    status: ActivityStatus,
    remarks: Option<String>,
}

impl ValidationDecision {
    /// Creates a validated decision.
    ///
    /// The target status must be `Approved` or `Rejected`; a rejection must
    /// carry non-empty remarks.
    pub fn new(status: ActivityStatus, remarks: Option<String>) -> AppResult<Self> {
        if status == ActivityStatus::Pending {
            return Err(AppError::Validation(
                "a validation decision must approve or reject".to_owned(),
            ));
        }

        let remarks = remarks
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        if status == ActivityStatus::Rejected && remarks.is_none() {
            return Err(AppError::Validation(
                "remarks are required when rejecting an activity".to_owned(),
            ));
        }

        Ok(Self { status, remarks })
    }

    /// Returns the decided status.
    #[must_use]
    pub fn status(&self) -> ActivityStatus {
        self.status
    }

    /// Returns the decision remarks, if any.
    #[must_use]
    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn status_round_trips_through_storage_string() {
        for status in [
            ActivityStatus::Pending,
            ActivityStatus::Approved,
            ActivityStatus::Rejected,
        ] {
            assert_eq!(ActivityStatus::parse(status.as_str()).ok(), Some(status));
        }
    }

    #[test]
    fn public_labels_relabel_every_status() {
        assert_eq!(ActivityStatus::Approved.public_label(), "Validated");
        assert_eq!(ActivityStatus::Rejected.public_label(), "Un-validated");
        assert_eq!(ActivityStatus::Pending.public_label(), "Un-Looked");
    }

    #[test]
    fn only_extra_curricular_supports_issuer_verification() {
        assert!(ActivityType::ExtraCurricular.supports_issuer_verification());
        assert!(!ActivityType::Curricular.supports_issuer_verification());
        assert!(!ActivityType::CoCurricular.supports_issuer_verification());
    }

    #[test]
    fn decision_to_pending_is_rejected() {
        assert!(ValidationDecision::new(ActivityStatus::Pending, None).is_err());
    }

    #[test]
    fn rejection_without_remarks_is_rejected() {
        assert!(ValidationDecision::new(ActivityStatus::Rejected, None).is_err());
        assert!(ValidationDecision::new(ActivityStatus::Rejected, Some("  ".to_owned())).is_err());
    }

    #[test]
    fn rejection_with_remarks_is_accepted() {
        let decision =
            ValidationDecision::new(ActivityStatus::Rejected, Some("certificate blurry".to_owned()));
        assert!(decision.is_ok());
        assert_eq!(
            decision
                .unwrap_or_else(|_| panic!("test"))
                .remarks(),
            Some("certificate blurry")
        );
    }

    #[test]
    fn approval_without_remarks_is_accepted() {
        assert!(ValidationDecision::new(ActivityStatus::Approved, None).is_ok());
    }

    #[test]
    fn empty_credential_id_is_rejected() {
        assert!(CredentialId::new("   ").is_err());
    }

    #[test]
    fn credential_id_with_inner_whitespace_is_rejected() {
        assert!(CredentialId::new("CERT 2024").is_err());
    }

    #[test]
    fn credential_id_is_trimmed() {
        let credential = CredentialId::new("  NPTEL-24-0042  ");
        assert!(credential.is_ok());
        assert_eq!(
            credential.unwrap_or_else(|_| panic!("test")).as_str(),
            "NPTEL-24-0042"
        );
    }

    proptest! {
        #[test]
        fn wellformed_credential_ids_are_accepted(value in "[A-Za-z0-9_/-]{1,64}") {
            prop_assert!(CredentialId::new(value).is_ok());
        }
    }
}
