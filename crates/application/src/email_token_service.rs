//! Email token management for signup verification and password resets.
//!
//! Tokens are cryptographically random, stored as SHA-256 hashes, single-use,
//! and time-limited per OWASP Forgot Password Cheat Sheet. Both purposes share
//! one record shape and one 10-minute lifetime.

use std::sync::Arc;

use async_trait::async_trait;

use pratibha_core::{AppError, AppResult};
use pratibha_domain::{EMAIL_TOKEN_LIFETIME_MINUTES, EmailTokenPurpose, UserId};

use crate::mailer::{EmailService, EmailTemplate};
use crate::token_crypto::{generate_token, hash_token};

/// Maximum password reset requests per email per hour.
pub const PASSWORD_RESET_HOURLY_LIMIT: i64 = 3;

/// Email token record as persisted in the database.
#[derive(Debug, Clone)]
pub struct EmailTokenRecord {
    /// Token identifier.
    pub id: uuid::Uuid,
    /// User the token belongs to.
    pub user_id: UserId,
    /// Email address the token was sent to.
    pub email: String,
    /// SHA-256 hash of the token value.
    pub token_hash: String,
    /// Purpose discriminator.
    pub purpose: EmailTokenPurpose,
    /// Expiration timestamp.
    pub expires_at: chrono::DateTime<chrono::Utc>,
    /// When the token was consumed, if ever.
    pub used_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Repository port for email token persistence.
#[async_trait]
pub trait EmailTokenRepository: Send + Sync {
    /// Stores a new email token.
    async fn create_token(
        &self,
        user_id: UserId,
        email: &str,
        token_hash: &str,
        purpose: EmailTokenPurpose,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<uuid::Uuid>;

    /// Atomically consumes a valid (unexpired, unused) token by its hash.
    ///
    /// Returns `None` when no live token matches; a matched token is marked
    /// used in the same operation, enforcing single use under concurrency.
    async fn consume_valid_token(
        &self,
        token_hash: &str,
        purpose: EmailTokenPurpose,
    ) -> AppResult<Option<EmailTokenRecord>>;

    /// Invalidates all unused tokens of a given purpose for a user.
    async fn invalidate_tokens_for_user(
        &self,
        user_id: UserId,
        purpose: EmailTokenPurpose,
    ) -> AppResult<()>;

    /// Counts tokens created in a time window for rate limiting.
    async fn count_recent_tokens(
        &self,
        email: &str,
        purpose: EmailTokenPurpose,
        since: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<i64>;
}

/// Application service for managing email tokens and related email flows.
#[derive(Clone)]
pub struct EmailTokenService {
    token_repository: Arc<dyn EmailTokenRepository>,
    email_service: Arc<dyn EmailService>,
    frontend_url: String,
}

impl EmailTokenService {
    /// Creates a new email token service.
    #[must_use]
    pub fn new(
        token_repository: Arc<dyn EmailTokenRepository>,
        email_service: Arc<dyn EmailService>,
        frontend_url: String,
    ) -> Self {
        Self {
            token_repository,
            email_service,
            frontend_url,
        }
    }

    /// Issues an email verification token and sends the verification email.
    ///
    /// Any earlier verification tokens for the user are invalidated, so a
    /// re-submitted pending registration always holds exactly one live token.
    pub async fn send_email_verification(&self, user_id: UserId, email: &str) -> AppResult<()> {
        self.token_repository
            .invalidate_tokens_for_user(user_id, EmailTokenPurpose::EmailVerification)
            .await?;

        let (raw_token, token_hash) = generate_token();
        let expires_at = self.token_expiry();

        self.token_repository
            .create_token(
                user_id,
                email,
                &token_hash,
                EmailTokenPurpose::EmailVerification,
                expires_at,
            )
            .await?;

        let verify_url = format!("{}/verify-email?token={}", self.frontend_url, raw_token);
        let template = EmailTemplate::VerifyEmail {
            verify_url: &verify_url,
        };

        self.email_service
            .send_email(email, &template.subject(), &template.text_body())
            .await?;

        Ok(())
    }

    /// Issues a password reset token and sends the reset email.
    ///
    /// Always returns `Ok(())` regardless of whether the email exists,
    /// per OWASP Forgot Password: "If that email is in our system, we will
    /// send you an email to reset your password."
    pub async fn request_password_reset(
        &self,
        email: &str,
        user_id: Option<UserId>,
    ) -> AppResult<()> {
        let one_hour_ago = chrono::Utc::now() - chrono::Duration::hours(1);
        let recent_count = self
            .token_repository
            .count_recent_tokens(email, EmailTokenPurpose::PasswordReset, one_hour_ago)
            .await?;

        if recent_count >= PASSWORD_RESET_HOURLY_LIMIT {
            // Silently succeed to prevent enumeration.
            return Ok(());
        }

        let Some(uid) = user_id else {
            // User not found -- silently succeed.
            return Ok(());
        };

        self.token_repository
            .invalidate_tokens_for_user(uid, EmailTokenPurpose::PasswordReset)
            .await?;

        let (raw_token, token_hash) = generate_token();
        let expires_at = self.token_expiry();

        self.token_repository
            .create_token(
                uid,
                email,
                &token_hash,
                EmailTokenPurpose::PasswordReset,
                expires_at,
            )
            .await?;

        let reset_url = format!("{}/reset-password?token={}", self.frontend_url, raw_token);
        let template = EmailTemplate::ResetPassword {
            reset_url: &reset_url,
        };

        self.email_service
            .send_email(email, &template.subject(), &template.text_body())
            .await?;

        Ok(())
    }

    /// Consumes a raw token of the given purpose, returning its record.
    ///
    /// Fails with `Unauthorized` when the token is unknown, expired, or
    /// already used.
    pub async fn consume_token(
        &self,
        raw_token: &str,
        purpose: EmailTokenPurpose,
    ) -> AppResult<EmailTokenRecord> {
        let token_hash = hash_token(raw_token);

        self.token_repository
            .consume_valid_token(&token_hash, purpose)
            .await?
            .ok_or_else(|| AppError::Unauthorized("invalid or expired token".to_owned()))
    }

    fn token_expiry(&self) -> chrono::DateTime<chrono::Utc> {
        chrono::Utc::now() + chrono::Duration::minutes(EMAIL_TOKEN_LIFETIME_MINUTES)
    }
}
