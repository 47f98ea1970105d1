use axum::http::HeaderMap;
use pratibha_core::{AppError, UserIdentity};
use pratibha_domain::UserId;
use uuid::Uuid;

/// Parses the roster-backing user ID out of a session identity.
pub(crate) fn user_id_from_identity(identity: &UserIdentity) -> Result<UserId, AppError> {
    let user_uuid = Uuid::parse_str(identity.subject())
        .map_err(|error| AppError::Internal(format!("invalid user subject: {error}")))?;

    Ok(UserId::from_uuid(user_uuid))
}

pub(super) fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}
