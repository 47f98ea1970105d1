use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for institute registration.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct RegisterRequest {
    pub institute_name: String,
    pub display_name: String,
    pub email: String,
    pub password: String,
}

/// Incoming payload for email/password login.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Auth status response for the login flow.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct LoginResponse {
    pub status: String,
}

/// Incoming payload for email verification.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct VerifyEmailRequest {
    pub token: String,
}

/// Incoming payload for a password reset request.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Incoming payload for completing a password reset.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// Incoming payload for an authenticated password change.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct UserIdentityResponse {
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: String,
    pub institute_id: String,
}

impl From<pratibha_core::UserIdentity> for UserIdentityResponse {
    fn from(identity: pratibha_core::UserIdentity) -> Self {
        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
            role: identity.role().as_str().to_owned(),
            institute_id: identity.institute_id().to_string(),
        }
    }
}
