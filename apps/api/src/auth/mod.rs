use pratibha_application::RateLimitRule;

mod password;
mod session;
mod session_helpers;

pub use password::{
    change_password_handler, forgot_password_handler, login_handler, register_handler,
    reset_password_handler, verify_email_handler,
};
pub use session::{logout_handler, me_handler};
pub(crate) use session_helpers::user_id_from_identity;

pub const SESSION_USER_KEY: &str = "user_identity";
/// Absolute session creation timestamp for OWASP absolute timeout enforcement.
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";

pub(super) const VERIFY_EMAIL_RATE_RULE: (i32, i64) = (30, 60 * 60);

pub(super) fn verify_email_rate_rule() -> RateLimitRule {
    RateLimitRule::new(
        "verify_email",
        VERIFY_EMAIL_RATE_RULE.0,
        VERIFY_EMAIL_RATE_RULE.1,
    )
}
