//! Student identity types.

use pratibha_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Validated 12-digit national identity number.
///
/// Not unique, neither globally nor per institute: the same person may be
/// enrolled at several institutes, which is exactly what the public search
/// surface fans out over.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AadharNumber(String);

impl AadharNumber {
    /// Creates a validated Aadhar number from a 12-digit string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.len() != 12 || !trimmed.chars().all(|character| character.is_ascii_digit()) {
            return Err(AppError::Validation(
                "aadhar number must be exactly 12 digits".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the validated digit string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<AadharNumber> for String {
    fn from(value: AadharNumber) -> Self {
        value.0
    }
}
