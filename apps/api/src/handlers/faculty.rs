//! Faculty surface: activity validation, attendance, and grades.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use pratibha_application::{AttendanceEntry, GradeEntry};
use pratibha_core::{AppError, UserIdentity};
use pratibha_domain::{ActivityStatus, ValidationDecision};
use serde::Deserialize;

use crate::auth::user_id_from_identity;
use crate::dto::{
    ActivityResponse, PendingCountsResponse, RecordAttendanceRequest, RecordGradesRequest,
    ValidateActivityRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ActivityListQuery {
    /// Optional status filter: `pending`, `approved`, or `rejected`.
    pub status: Option<String>,
}

pub async fn list_activities_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<ActivityListQuery>,
) -> ApiResult<Json<Vec<ActivityResponse>>> {
    let status = query
        .status
        .as_deref()
        .map(ActivityStatus::parse)
        .transpose()?;

    let activities = state
        .activity_service
        .list_for_institute(user.institute_id(), status)
        .await?
        .into_iter()
        .map(ActivityResponse::from)
        .collect();

    Ok(Json(activities))
}

pub async fn validate_activity_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(activity_id): Path<uuid::Uuid>,
    Json(payload): Json<ValidateActivityRequest>,
) -> ApiResult<Json<ActivityResponse>> {
    let status = ActivityStatus::parse(&payload.status)?;
    let decision = ValidationDecision::new(status, payload.remarks)?;

    let updated = state
        .activity_service
        .validate(user.institute_id(), activity_id, decision)
        .await?;

    Ok(Json(ActivityResponse::from(updated)))
}

pub async fn record_attendance_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<RecordAttendanceRequest>,
) -> ApiResult<StatusCode> {
    let recorded_by = caller_faculty_id(&state, &user).await?;

    let entries = payload
        .entries
        .into_iter()
        .map(|entry| AttendanceEntry {
            student_id: entry.student_id,
            present: entry.present,
        })
        .collect();

    state
        .records_service
        .record_attendance(
            user.institute_id(),
            payload.course_id,
            recorded_by,
            payload.date,
            entries,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn record_grades_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<RecordGradesRequest>,
) -> ApiResult<StatusCode> {
    let recorded_by = caller_faculty_id(&state, &user).await?;

    let entries = payload
        .entries
        .into_iter()
        .map(|entry| GradeEntry {
            student_id: entry.student_id,
            credits: entry.credits,
            grade_point: entry.grade_point,
        })
        .collect();

    state
        .records_service
        .record_grades(
            user.institute_id(),
            payload.course_id,
            recorded_by,
            payload.semester,
            entries,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn overview_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<PendingCountsResponse>> {
    let counts = state
        .activity_service
        .pending_counts(user.institute_id())
        .await?;

    Ok(Json(PendingCountsResponse::from(counts)))
}

async fn caller_faculty_id(state: &AppState, user: &UserIdentity) -> ApiResult<uuid::Uuid> {
    let user_id = user_id_from_identity(user)?;

    let faculty = state
        .roster_service
        .faculty_for_user(user_id)
        .await?
        .ok_or_else(|| {
            AppError::Forbidden("no faculty roster entry for this account".to_owned())
        })?;

    Ok(faculty.id)
}
