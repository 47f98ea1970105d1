use pratibha_core::{AppError, NonEmptyString};
use pratibha_domain::{
    ActivityType, CredentialId, EmailAddress, ISSUER_SESSION_LIFETIME_DAYS,
};

use crate::mailer::EmailTemplate;
use crate::token_crypto::generate_token;

use super::*;

/// Parameters for a student activity submission.
#[derive(Debug, Clone)]
pub struct SubmitActivityInput {
    /// Institute of the submitting student.
    pub institute_id: InstituteId,
    /// Submitting student.
    pub student_id: uuid::Uuid,
    /// Faculty member the submission is addressed to.
    pub faculty_id: uuid::Uuid,
    /// Activity title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Activity category.
    pub activity_type: ActivityType,
    /// External credential identifier; must be globally unique.
    pub credential_id: String,
    /// Link to supporting material, if any.
    pub attachment_link: Option<String>,
    /// Issuer email; required for Extra-Curricular, rejected otherwise.
    pub issuer_email: Option<String>,
}

impl ActivityService {
    /// Submits a new activity on behalf of a student.
    ///
    /// The activity is inserted with status `Pending`. For Extra-Curricular
    /// submissions an issuer approval session is created and a verification
    /// link is emailed to the issuer. If that email fails to send, the
    /// already-written records are kept and the error propagates -- there is
    /// no compensation.
    pub async fn submit(&self, input: SubmitActivityInput) -> AppResult<uuid::Uuid> {
        let title = NonEmptyString::new(&input.title)?;
        let credential_id = CredentialId::new(&input.credential_id)?;

        let issuer_email = match (&input.issuer_email, input.activity_type) {
            (Some(email), ActivityType::ExtraCurricular) => Some(EmailAddress::new(email)?),
            (None, ActivityType::ExtraCurricular) => {
                return Err(AppError::Validation(
                    "issuer email is required for extra-curricular activities".to_owned(),
                ));
            }
            (Some(_), _) => {
                return Err(AppError::Validation(
                    "issuer email only applies to extra-curricular activities".to_owned(),
                ));
            }
            (None, _) => None,
        };

        let student = self
            .roster
            .find_student(input.student_id)
            .await?
            .filter(|student| student.institute_id == input.institute_id)
            .ok_or_else(|| AppError::NotFound("student not found".to_owned()))?;

        let faculty = self
            .roster
            .find_faculty(input.faculty_id)
            .await?
            .filter(|faculty| faculty.institute_id == input.institute_id)
            .ok_or_else(|| {
                AppError::Validation("the selected faculty member does not exist".to_owned())
            })?;

        let activity_id = self
            .activity_repository
            .insert(NewActivity {
                institute_id: input.institute_id,
                student_id: student.id,
                faculty_id: faculty.id,
                title: title.as_str().to_owned(),
                description: input.description.trim().to_owned(),
                attachment_link: input
                    .attachment_link
                    .map(|link| link.trim().to_owned())
                    .filter(|link| !link.is_empty()),
                credential_id,
                activity_type: input.activity_type,
                issuer_verification_required: input
                    .activity_type
                    .supports_issuer_verification(),
            })
            .await?;

        if let Some(issuer_email) = issuer_email {
            let (raw_token, token_hash) = generate_token();
            let expires_at =
                chrono::Utc::now() + chrono::Duration::days(ISSUER_SESSION_LIFETIME_DAYS);

            self.issuer_sessions
                .create(activity_id, issuer_email.as_str(), &token_hash, expires_at)
                .await?;

            let verify_url = format!(
                "{}/issuer-verification?token={}",
                self.frontend_url, raw_token
            );
            let template = EmailTemplate::IssuerApproval {
                student_name: &student.display_name,
                activity_title: title.as_str(),
                verify_url: &verify_url,
            };

            self.email_service
                .send_email(
                    issuer_email.as_str(),
                    &template.subject(),
                    &template.text_body(),
                )
                .await?;
        }

        Ok(activity_id)
    }
}
