//! User management ports and application service.
//!
//! Owns account lifecycle operations: institute registration, authentication,
//! password changes, and account lockout. Follows OWASP guidelines for
//! generic error messages and constant-time responses.

use std::sync::Arc;

use async_trait::async_trait;

use pratibha_core::{AppError, AppResult, InstituteId, NonEmptyString, UserRole};
use pratibha_domain::{EmailAddress, UserId, validate_password};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// User record returned by repository queries.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Canonical email address.
    pub email: String,
    /// Whether the email address has been verified.
    pub email_verified: bool,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Role granted within the institute.
    pub role: UserRole,
    /// Owning institute.
    pub institute_id: InstituteId,
    /// Display name shown across the product.
    pub display_name: String,
    /// Number of consecutive failed login attempts.
    pub failed_login_count: i32,
    /// Account is locked until this time, if set.
    pub locked_until: Option<chrono::DateTime<chrono::Utc>>,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by their unique identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Creates a new user record. Returns the assigned user ID.
    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
        role: UserRole,
        institute_id: InstituteId,
        email_verified: bool,
    ) -> AppResult<UserId>;

    /// Replaces credentials and display name on an unverified account.
    ///
    /// Backs the signup-overwrite flow: a repeated signup against a pending
    /// (never verified) registration replaces it instead of conflicting.
    async fn overwrite_pending_registration(
        &self,
        user_id: UserId,
        password_hash: &str,
        display_name: &str,
    ) -> AppResult<()>;

    /// Updates the password hash for a user.
    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()>;

    /// Increments the failed login counter and optionally locks the account.
    async fn record_failed_login(&self, user_id: UserId) -> AppResult<()>;

    /// Resets the failed login counter and removes any account lock.
    async fn reset_failed_logins(&self, user_id: UserId) -> AppResult<()>;

    /// Marks the user's email as verified.
    async fn mark_email_verified(&self, user_id: UserId) -> AppResult<()>;

    /// Deletes a user account (roster removals).
    async fn delete(&self, user_id: UserId) -> AppResult<()>;
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    /// Must run in constant time regardless of validity.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Institute record returned by repository queries.
#[derive(Debug, Clone)]
pub struct InstituteRecord {
    /// Unique institute identifier.
    pub id: InstituteId,
    /// Institute display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Repository port for institute (tenant) persistence.
#[async_trait]
pub trait InstituteRepository: Send + Sync {
    /// Creates a new institute. Returns the assigned institute ID.
    async fn create(&self, name: &str) -> AppResult<InstituteId>;

    /// Finds an institute by its identifier.
    async fn find(&self, institute_id: InstituteId) -> AppResult<Option<InstituteRecord>>;

    /// Renames an institute (pending-registration overwrite).
    async fn rename(&self, institute_id: InstituteId, name: &str) -> AppResult<()>;
}

// ---------------------------------------------------------------------------
// Authentication outcome
// ---------------------------------------------------------------------------

/// Result of a login attempt.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Authentication succeeded. Session can be established.
    Authenticated(UserRecord),
    /// Authentication failed. Generic message prevents enumeration.
    Failed,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Parameters for institute admin registration.
pub struct RegisterInstituteParams {
    /// Name of the institute being registered.
    pub institute_name: String,
    /// Display name of the registering admin.
    pub display_name: String,
    /// Email address for the admin account.
    pub email: String,
    /// Plaintext password (validated against OWASP rules).
    pub password: String,
}

/// Outcome of a successful registration (new or overwritten pending).
#[derive(Debug, Clone)]
pub struct RegisteredAdmin {
    /// The admin account awaiting verification.
    pub user_id: UserId,
    /// Canonical email the verification token must be sent to.
    pub email: String,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for account authentication and institute registration.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    institute_repository: Arc<dyn InstituteRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        institute_repository: Arc<dyn InstituteRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            institute_repository,
            password_hasher,
        }
    }

    /// Registers an institute together with its first admin account.
    ///
    /// A fresh email creates the institute and an unverified admin. An email
    /// already held by a **verified** account fails. An email held by an
    /// **unverified** account overwrites that pending registration in place:
    /// new password, display name, and institute name, and the caller resends
    /// a verification token.
    pub async fn register_institute(
        &self,
        params: RegisterInstituteParams,
    ) -> AppResult<RegisteredAdmin> {
        let institute_name = NonEmptyString::new(&params.institute_name)?;
        let display_name = NonEmptyString::new(&params.display_name)?;
        let email_address = EmailAddress::new(&params.email)?;
        validate_password(&params.password)?;

        let existing = self
            .user_repository
            .find_by_email(email_address.as_str())
            .await?;

        match existing {
            Some(user) if user.email_verified => {
                // Still hash to keep response timing independent of the branch.
                let _ = self.password_hasher.hash_password(&params.password);
                Err(AppError::Validation(
                    "an account with this email already exists".to_owned(),
                ))
            }
            Some(user) => {
                let password_hash = self.password_hasher.hash_password(&params.password)?;
                self.user_repository
                    .overwrite_pending_registration(
                        user.id,
                        &password_hash,
                        display_name.as_str(),
                    )
                    .await?;
                self.institute_repository
                    .rename(user.institute_id, institute_name.as_str())
                    .await?;

                Ok(RegisteredAdmin {
                    user_id: user.id,
                    email: user.email,
                })
            }
            None => {
                let password_hash = self.password_hasher.hash_password(&params.password)?;
                let institute_id = self
                    .institute_repository
                    .create(institute_name.as_str())
                    .await?;
                let user_id = self
                    .user_repository
                    .create(
                        email_address.as_str(),
                        &password_hash,
                        display_name.as_str(),
                        UserRole::Admin,
                        institute_id,
                        false,
                    )
                    .await?;

                Ok(RegisteredAdmin {
                    user_id,
                    email: email_address.as_str().to_owned(),
                })
            }
        }
    }

    /// Authenticates a user with email and password.
    ///
    /// Returns `AuthOutcome::Failed` with a generic message for any failure
    /// (unknown email, wrong password, locked account, unverified email) to
    /// prevent enumeration.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let user = self.user_repository.find_by_email(email).await?;

        let Some(user) = user else {
            // OWASP: always hash to prevent timing attacks even when user not found.
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        if let Some(locked_until) = user.locked_until
            && chrono::Utc::now() < locked_until
        {
            // Still locked -- don't reveal this; just say failed.
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        }

        let password_valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)?;

        if !password_valid {
            self.user_repository.record_failed_login(user.id).await?;
            return Ok(AuthOutcome::Failed);
        }

        if !user.email_verified {
            // Credentials are right but the registration was never confirmed.
            return Ok(AuthOutcome::Failed);
        }

        self.user_repository.reset_failed_logins(user.id).await?;

        Ok(AuthOutcome::Authenticated(user))
    }

    /// Changes the password for an authenticated user.
    ///
    /// Requires the current password for verification (OWASP Authentication:
    /// change password feature).
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;

        let current_valid = self
            .password_hasher
            .verify_password(current_password, &user.password_hash)?;

        if !current_valid {
            return Err(AppError::Unauthorized(
                "current password is incorrect".to_owned(),
            ));
        }

        validate_password(new_password)?;

        let new_hash = self.password_hasher.hash_password(new_password)?;
        self.user_repository
            .update_password(user_id, &new_hash)
            .await
    }

    /// Resets a password from a consumed reset token and unlocks the account.
    pub async fn reset_password(&self, user_id: UserId, new_password: &str) -> AppResult<()> {
        validate_password(new_password)?;

        let new_hash = self.password_hasher.hash_password(new_password)?;
        self.user_repository
            .update_password(user_id, &new_hash)
            .await?;
        self.user_repository.reset_failed_logins(user_id).await
    }

    /// Marks a user's email verified after token consumption.
    pub async fn confirm_email(&self, user_id: UserId) -> AppResult<()> {
        self.user_repository.mark_email_verified(user_id).await
    }

    /// Returns a user record by ID, if it exists.
    pub async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.user_repository.find_by_id(user_id).await
    }

    /// Returns a user record by email, if it exists.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        self.user_repository.find_by_email(email).await
    }

    /// Returns the institute record for an identifier, if it exists.
    pub async fn find_institute(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Option<InstituteRecord>> {
        self.institute_repository.find(institute_id).await
    }
}

#[cfg(test)]
mod tests;
