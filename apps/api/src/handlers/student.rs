//! Student surface: activity submission and own records.

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use pratibha_application::SubmitActivityInput;
use pratibha_core::{AppError, UserIdentity};
use pratibha_domain::ActivityType;

use crate::auth::user_id_from_identity;
use crate::dto::{ActivityResponse, StudentRecordsResponse, SubmitActivityRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn submit_activity_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SubmitActivityRequest>,
) -> ApiResult<(StatusCode, Json<ActivityResponse>)> {
    let student = caller_student(&state, &user).await?;
    let activity_type = ActivityType::parse(&payload.activity_type)?;

    let activity_id = state
        .activity_service
        .submit(SubmitActivityInput {
            institute_id: user.institute_id(),
            student_id: student.id,
            faculty_id: payload.applied_to,
            title: payload.title,
            description: payload.description,
            activity_type,
            credential_id: payload.credential_id,
            attachment_link: payload.attachment_link,
            issuer_email: payload.issuer_email,
        })
        .await?;

    let activities = state.activity_service.list_for_student(student.id).await?;
    let created = activities
        .into_iter()
        .find(|activity| activity.id == activity_id)
        .ok_or_else(|| AppError::Internal("submitted activity not found".to_owned()))?;

    Ok((StatusCode::CREATED, Json(ActivityResponse::from(created))))
}

pub async fn list_activities_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<ActivityResponse>>> {
    let student = caller_student(&state, &user).await?;

    let activities = state
        .activity_service
        .list_for_student(student.id)
        .await?
        .into_iter()
        .map(ActivityResponse::from)
        .collect();

    Ok(Json(activities))
}

pub async fn records_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<StudentRecordsResponse>> {
    let student = caller_student(&state, &user).await?;

    let (summary, activities) = tokio::try_join!(
        state.records_service.student_summary(student.id),
        state.activity_service.list_for_student(student.id),
    )?;

    Ok(Json(StudentRecordsResponse {
        attendance_percentage: summary.attendance_percentage,
        cgpa: summary.cgpa,
        activities: activities.into_iter().map(ActivityResponse::from).collect(),
    }))
}

async fn caller_student(
    state: &AppState,
    user: &UserIdentity,
) -> ApiResult<pratibha_application::StudentRecord> {
    let user_id = user_id_from_identity(user)?;

    state
        .roster_service
        .student_for_user(user_id)
        .await?
        .ok_or_else(|| {
            AppError::Forbidden("no student roster entry for this account".to_owned()).into()
        })
}
