use axum::Json;
use axum::extract::{Extension, State};
use axum::http::HeaderMap;
use axum::http::StatusCode;
use pratibha_application::{AuthOutcome, RegisterInstituteParams};
use pratibha_core::{AppError, UserIdentity};
use pratibha_domain::EmailTokenPurpose;
use tower_sessions::Session;
use tracing::info;

use crate::dto::{
    ChangePasswordRequest, ForgotPasswordRequest, GenericMessageResponse, LoginRequest,
    LoginResponse, RegisterRequest, ResetPasswordRequest, VerifyEmailRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::session_helpers::{client_ip, user_id_from_identity};
use super::{SESSION_CREATED_AT_KEY, SESSION_USER_KEY, verify_email_rate_rule};

/// POST /api/auth/register - Register an institute with its first admin.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Json<GenericMessageResponse>> {
    let registered = state
        .user_service
        .register_institute(RegisterInstituteParams {
            institute_name: payload.institute_name,
            display_name: payload.display_name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    // Covers both paths: a fresh registration and an overwritten pending one.
    state
        .email_token_service
        .send_email_verification(registered.user_id, &registered.email)
        .await?;

    Ok(Json(GenericMessageResponse {
        message: "a link to activate your account has been emailed to the address provided"
            .to_owned(),
    }))
}

/// POST /api/auth/verify-email - Verify email with token.
pub async fn verify_email_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<VerifyEmailRequest>,
) -> ApiResult<Json<GenericMessageResponse>> {
    let verify_rule = verify_email_rate_rule();
    state
        .rate_limit_service
        .check_rate_limit(
            &verify_rule,
            client_ip(&headers).as_deref().unwrap_or("unknown"),
        )
        .await?;

    let token_record = state
        .email_token_service
        .consume_token(&payload.token, EmailTokenPurpose::EmailVerification)
        .await?;

    state.user_service.confirm_email(token_record.user_id).await?;

    Ok(Json(GenericMessageResponse {
        message: "email address verified successfully".to_owned(),
    }))
}

/// POST /api/auth/login - Authenticate with email+password.
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let outcome = state
        .user_service
        .login(&payload.email, &payload.password)
        .await?;

    let user = match outcome {
        AuthOutcome::Authenticated(user) => user,
        AuthOutcome::Failed => {
            // Generic error message for all failure cases.
            return Err(AppError::Unauthorized("invalid email or password".to_owned()).into());
        }
    };

    let identity = UserIdentity::new(
        user.id.to_string(),
        user.display_name.clone(),
        Some(user.email.clone()),
        user.role,
        user.institute_id,
    );

    // OWASP Session Management: regenerate session ID on privilege change.
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    // OWASP Session Management: record absolute creation time.
    session
        .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })?;

    info!(subject = %user.id, role = user.role.as_str(), "login succeeded");

    Ok(Json(LoginResponse {
        status: "authenticated".to_owned(),
    }))
}

/// POST /api/auth/forgot-password - Request password reset email.
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<GenericMessageResponse>> {
    let user = state.user_service.find_by_email(&payload.email).await?;
    let user_id = user.map(|user| user.id);

    state
        .email_token_service
        .request_password_reset(&payload.email, user_id)
        .await?;

    // OWASP: always return generic success message.
    Ok(Json(GenericMessageResponse {
        message: "if that email address is in our database, we will send you an email to reset your password".to_owned(),
    }))
}

/// POST /api/auth/reset-password - Reset password with token.
pub async fn reset_password_handler(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<Json<GenericMessageResponse>> {
    let token_record = state
        .email_token_service
        .consume_token(&payload.token, EmailTokenPurpose::PasswordReset)
        .await?;

    state
        .user_service
        .reset_password(token_record.user_id, &payload.new_password)
        .await?;

    Ok(Json(GenericMessageResponse {
        message: "your password has been reset successfully".to_owned(),
    }))
}

/// PUT /api/auth/password - Change password (requires auth).
pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    let user_id = user_id_from_identity(&user)?;

    state
        .user_service
        .change_password(user_id, &payload.current_password, &payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
