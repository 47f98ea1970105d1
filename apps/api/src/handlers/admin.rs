//! Admin surface: catalog, roster, and the institute dashboard.

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use pratibha_application::{CreateCourseInput, CreateFacultyInput, CreateStudentInput};
use pratibha_core::{AppError, UserIdentity};

use crate::dto::{
    AdminOverviewResponse, CourseResponse, CreateCourseRequest, CreateDepartmentRequest,
    CreateFacultyRequest, CreateStudentRequest, DepartmentResponse, FacultyResponse,
    StudentResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_departments_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<DepartmentResponse>>> {
    let departments = state
        .catalog_service
        .list_departments(user.institute_id())
        .await?
        .into_iter()
        .map(DepartmentResponse::from)
        .collect();

    Ok(Json(departments))
}

pub async fn create_department_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateDepartmentRequest>,
) -> ApiResult<(StatusCode, Json<DepartmentResponse>)> {
    let department_id = state
        .catalog_service
        .create_department(user.institute_id(), &payload.name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DepartmentResponse {
            id: department_id.to_string(),
            name: payload.name.trim().to_owned(),
        }),
    ))
}

pub async fn delete_department_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(department_id): Path<uuid::Uuid>,
) -> ApiResult<StatusCode> {
    state
        .catalog_service
        .delete_department(user.institute_id(), department_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_courses_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<CourseResponse>>> {
    let courses = state
        .catalog_service
        .list_courses(user.institute_id())
        .await?
        .into_iter()
        .map(CourseResponse::from)
        .collect();

    Ok(Json(courses))
}

pub async fn create_course_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateCourseRequest>,
) -> ApiResult<StatusCode> {
    state
        .catalog_service
        .create_course(
            user.institute_id(),
            CreateCourseInput {
                department_id: payload.department_id,
                name: payload.name,
                code: payload.code,
            },
        )
        .await?;

    Ok(StatusCode::CREATED)
}

pub async fn delete_course_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(course_id): Path<uuid::Uuid>,
) -> ApiResult<StatusCode> {
    state
        .catalog_service
        .delete_course(user.institute_id(), course_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_faculty_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<FacultyResponse>>> {
    let faculty = state
        .roster_service
        .list_faculty(user.institute_id())
        .await?
        .into_iter()
        .map(FacultyResponse::from)
        .collect();

    Ok(Json(faculty))
}

pub async fn create_faculty_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateFacultyRequest>,
) -> ApiResult<StatusCode> {
    let institute = institute_name(&state, &user).await?;

    state
        .roster_service
        .create_faculty(
            user.institute_id(),
            &institute,
            CreateFacultyInput {
                display_name: payload.display_name,
                email: payload.email,
                department_id: payload.department_id,
                designation: payload.designation,
            },
        )
        .await?;

    Ok(StatusCode::CREATED)
}

pub async fn delete_faculty_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(faculty_id): Path<uuid::Uuid>,
) -> ApiResult<StatusCode> {
    state
        .roster_service
        .remove_faculty(user.institute_id(), faculty_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_students_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<StudentResponse>>> {
    let students = state
        .roster_service
        .list_students(user.institute_id())
        .await?
        .into_iter()
        .map(StudentResponse::from)
        .collect();

    Ok(Json(students))
}

pub async fn create_student_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateStudentRequest>,
) -> ApiResult<StatusCode> {
    let institute = institute_name(&state, &user).await?;

    state
        .roster_service
        .create_student(
            user.institute_id(),
            &institute,
            CreateStudentInput {
                display_name: payload.display_name,
                email: payload.email,
                course_id: payload.course_id,
                roll_number: payload.roll_number,
                aadhar: payload.aadhar,
            },
        )
        .await?;

    Ok(StatusCode::CREATED)
}

pub async fn delete_student_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(student_id): Path<uuid::Uuid>,
) -> ApiResult<StatusCode> {
    state
        .roster_service
        .remove_student(user.institute_id(), student_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn overview_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<AdminOverviewResponse>> {
    let institute_id = user.institute_id();

    let (people, activities) = tokio::try_join!(
        state.roster_service.people_counts(institute_id),
        state.activity_service.institute_overview(institute_id),
    )?;

    Ok(Json(AdminOverviewResponse::from_counts(people, activities)))
}

async fn institute_name(state: &AppState, user: &UserIdentity) -> ApiResult<String> {
    let institute = state
        .user_service
        .find_institute(user.institute_id())
        .await?
        .ok_or_else(|| AppError::Internal("session institute no longer exists".to_owned()))?;

    Ok(institute.name)
}
