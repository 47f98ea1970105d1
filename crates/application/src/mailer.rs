//! Outbound email port and message templates.
//!
//! Templates render to `(subject, text body)` pairs independently of the
//! delivery transport; infrastructure provides SMTP and console transports.

use async_trait::async_trait;

use pratibha_core::AppResult;

/// Port for sending emails. Infrastructure provides SMTP or console implementations.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Sends a plain-text email.
    async fn send_email(&self, to: &str, subject: &str, text_body: &str) -> AppResult<()>;
}

/// Transactional email templates.
#[derive(Debug, Clone)]
pub enum EmailTemplate<'a> {
    /// Signup email verification link.
    VerifyEmail {
        /// Link the recipient follows to verify their address.
        verify_url: &'a str,
    },
    /// Password reset link.
    ResetPassword {
        /// Link the recipient follows to set a new password.
        reset_url: &'a str,
    },
    /// Welcome mail for an admin-provisioned faculty account.
    FacultyWelcome {
        /// Institute the account belongs to.
        institute_name: &'a str,
        /// Login email of the new account.
        email: &'a str,
        /// Generated temporary password; must be changed after first login.
        temporary_password: &'a str,
        /// Login page link.
        login_url: &'a str,
    },
    /// Welcome mail for an admin-provisioned student account.
    StudentWelcome {
        /// Institute the account belongs to.
        institute_name: &'a str,
        /// Login email of the new account.
        email: &'a str,
        /// Generated temporary password; must be changed after first login.
        temporary_password: &'a str,
        /// Login page link.
        login_url: &'a str,
    },
    /// Verification request sent to the issuer of an Extra-Curricular credential.
    IssuerApproval {
        /// Display name of the student who submitted the activity.
        student_name: &'a str,
        /// Title of the submitted activity.
        activity_title: &'a str,
        /// Link to the issuer verification page.
        verify_url: &'a str,
    },
}

impl EmailTemplate<'_> {
    /// Returns the message subject line.
    #[must_use]
    pub fn subject(&self) -> String {
        match self {
            Self::VerifyEmail { .. } => "Verify your Pratibha Kosh email address".to_owned(),
            Self::ResetPassword { .. } => "Reset your Pratibha Kosh password".to_owned(),
            Self::FacultyWelcome { institute_name, .. } => {
                format!("Your faculty account at {institute_name}")
            }
            Self::StudentWelcome { institute_name, .. } => {
                format!("Your student account at {institute_name}")
            }
            Self::IssuerApproval { student_name, .. } => {
                format!("Credential verification request for {student_name}")
            }
        }
    }

    /// Renders the plain-text message body.
    #[must_use]
    pub fn text_body(&self) -> String {
        match self {
            Self::VerifyEmail { verify_url } => format!(
                "Welcome to Pratibha Kosh!\n\n\
                 Please verify your email address by clicking the link below:\n{verify_url}\n\n\
                 This link expires in 10 minutes."
            ),
            Self::ResetPassword { reset_url } => format!(
                "You requested a password reset.\n\n\
                 Click the link below to set a new password:\n{reset_url}\n\n\
                 This link expires in 10 minutes.\n\n\
                 If you did not request this, you can safely ignore this email."
            ),
            Self::FacultyWelcome {
                institute_name,
                email,
                temporary_password,
                login_url,
            } => format!(
                "A faculty account has been created for you at {institute_name}.\n\n\
                 Sign in at {login_url} with:\n\
                 Email: {email}\n\
                 Temporary password: {temporary_password}\n\n\
                 Please change this password after your first login."
            ),
            Self::StudentWelcome {
                institute_name,
                email,
                temporary_password,
                login_url,
            } => format!(
                "A student account has been created for you at {institute_name}.\n\n\
                 Sign in at {login_url} with:\n\
                 Email: {email}\n\
                 Temporary password: {temporary_password}\n\n\
                 Please change this password after your first login."
            ),
            Self::IssuerApproval {
                student_name,
                activity_title,
                verify_url,
            } => format!(
                "{student_name} has submitted \"{activity_title}\" on Pratibha Kosh and \
                 named your organization as its issuer.\n\n\
                 If you issued this credential, please confirm its credential ID at the \
                 link below:\n{verify_url}\n\n\
                 This link expires in 5 days. If you do not recognize this request, you \
                 can safely ignore this email."
            ),
        }
    }
}
