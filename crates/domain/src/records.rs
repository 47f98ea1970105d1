//! Academic record arithmetic: attendance percentages and grade aggregation.

use pratibha_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Highest semester a course can run to.
pub const MAX_SEMESTER: i16 = 12;

/// Validates a semester ordinal.
pub fn validate_semester(semester: i16) -> AppResult<()> {
    if !(1..=MAX_SEMESTER).contains(&semester) {
        return Err(AppError::Validation(format!(
            "semester must be between 1 and {MAX_SEMESTER}"
        )));
    }

    Ok(())
}

/// Grade point on the 10-point scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradePoint(f64);

impl GradePoint {
    /// Creates a validated grade point in `0.0..=10.0`.
    pub fn new(value: f64) -> AppResult<Self> {
        if !value.is_finite() || !(0.0..=10.0).contains(&value) {
            return Err(AppError::Validation(
                "grade point must be between 0 and 10".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the numeric grade point.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Attendance percentage over recorded sessions, rounded to two decimals.
///
/// A student with no recorded sessions has no percentage.
#[must_use]
pub fn attendance_percentage(present: i64, total: i64) -> Option<f64> {
    if total <= 0 {
        return None;
    }

    let ratio = present.clamp(0, total) as f64 / total as f64;
    Some((ratio * 10_000.0).round() / 100.0)
}

/// Credit-weighted cumulative grade point average, rounded to two decimals.
///
/// Entries are `(credits, grade_point)` pairs; entries with zero credits
/// contribute nothing. Returns `None` when no credits were earned.
#[must_use]
pub fn cumulative_gpa(entries: &[(i16, GradePoint)]) -> Option<f64> {
    let total_credits: i64 = entries.iter().map(|(credits, _)| i64::from(*credits)).sum();
    if total_credits <= 0 {
        return None;
    }

    let weighted: f64 = entries
        .iter()
        .map(|(credits, grade)| f64::from(*credits) * grade.value())
        .sum();

    Some((weighted / total_credits as f64 * 100.0).round() / 100.0)
}
