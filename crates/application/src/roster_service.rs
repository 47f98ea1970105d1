//! Faculty and student roster management.
//!
//! Admin-provisioned accounts: creating a faculty member or a student creates
//! the login account (verified, with a generated temporary password) and the
//! roster row together, then emails the credentials. A failed welcome email
//! leaves both records in place and propagates -- there is no compensation.

use std::sync::Arc;

use async_trait::async_trait;

use pratibha_core::{AppError, AppResult, InstituteId, NonEmptyString, UserRole};
use pratibha_domain::{AadharNumber, EmailAddress, UserId};

use crate::catalog_service::CatalogRepository;
use crate::mailer::{EmailService, EmailTemplate};
use crate::token_crypto::generate_temporary_password;
use crate::user_service::{PasswordHasher, UserRepository};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Faculty roster record.
#[derive(Debug, Clone)]
pub struct FacultyRecord {
    /// Unique faculty identifier.
    pub id: uuid::Uuid,
    /// Owning institute.
    pub institute_id: InstituteId,
    /// Login account backing this roster entry.
    pub user_id: UserId,
    /// Display name.
    pub display_name: String,
    /// Login email.
    pub email: String,
    /// Department the faculty member belongs to.
    pub department_id: uuid::Uuid,
    /// Designation, e.g. "Assistant Professor".
    pub designation: String,
}

/// Student roster record.
#[derive(Debug, Clone)]
pub struct StudentRecord {
    /// Unique student identifier.
    pub id: uuid::Uuid,
    /// Owning institute.
    pub institute_id: InstituteId,
    /// Login account backing this roster entry.
    pub user_id: UserId,
    /// Display name.
    pub display_name: String,
    /// Login email.
    pub email: String,
    /// Course the student is enrolled in.
    pub course_id: uuid::Uuid,
    /// Roll number within the course.
    pub roll_number: String,
    /// 12-digit national identity number; not unique across institutes.
    pub aadhar: String,
}

/// Insert payload for a faculty roster entry.
#[derive(Debug, Clone)]
pub struct NewFaculty {
    /// Owning institute.
    pub institute_id: InstituteId,
    /// Backing login account.
    pub user_id: UserId,
    /// Department the faculty member belongs to.
    pub department_id: uuid::Uuid,
    /// Designation.
    pub designation: String,
}

/// Insert payload for a student roster entry.
#[derive(Debug, Clone)]
pub struct NewStudent {
    /// Owning institute.
    pub institute_id: InstituteId,
    /// Backing login account.
    pub user_id: UserId,
    /// Course the student is enrolled in.
    pub course_id: uuid::Uuid,
    /// Roll number within the course.
    pub roll_number: String,
    /// Validated Aadhar number.
    pub aadhar: AadharNumber,
}

/// A student matched by a cross-institute Aadhar lookup.
#[derive(Debug, Clone)]
pub struct StudentMatch {
    /// The matched student.
    pub student: StudentRecord,
    /// Display name of the student's institute.
    pub institute_name: String,
}

/// Faculty and student headcounts for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeopleCounts {
    /// Number of faculty roster entries.
    pub faculty: i64,
    /// Number of student roster entries.
    pub students: i64,
}

/// Repository port for roster persistence.
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Inserts a faculty roster entry.
    async fn create_faculty(&self, faculty: NewFaculty) -> AppResult<uuid::Uuid>;

    /// Lists an institute's faculty by display name.
    async fn list_faculty(&self, institute_id: InstituteId) -> AppResult<Vec<FacultyRecord>>;

    /// Finds a faculty member by roster identifier.
    async fn find_faculty(&self, faculty_id: uuid::Uuid) -> AppResult<Option<FacultyRecord>>;

    /// Removes a faculty roster entry.
    async fn remove_faculty(
        &self,
        institute_id: InstituteId,
        faculty_id: uuid::Uuid,
    ) -> AppResult<()>;

    /// Inserts a student roster entry.
    async fn create_student(&self, student: NewStudent) -> AppResult<uuid::Uuid>;

    /// Lists an institute's students by roll number.
    async fn list_students(&self, institute_id: InstituteId) -> AppResult<Vec<StudentRecord>>;

    /// Finds a student by roster identifier.
    async fn find_student(&self, student_id: uuid::Uuid) -> AppResult<Option<StudentRecord>>;

    /// Finds the student roster entry backed by a login account.
    async fn find_student_by_user(&self, user_id: UserId) -> AppResult<Option<StudentRecord>>;

    /// Finds the faculty roster entry backed by a login account.
    async fn find_faculty_by_user(&self, user_id: UserId) -> AppResult<Option<FacultyRecord>>;

    /// Removes a student roster entry.
    async fn remove_student(
        &self,
        institute_id: InstituteId,
        student_id: uuid::Uuid,
    ) -> AppResult<()>;

    /// Finds every student sharing an Aadhar number, across institutes.
    async fn find_students_by_aadhar(&self, aadhar: &str) -> AppResult<Vec<StudentMatch>>;

    /// Counts an institute's faculty and students.
    async fn count_people(&self, institute_id: InstituteId) -> AppResult<PeopleCounts>;
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Parameters for faculty provisioning.
#[derive(Debug, Clone)]
pub struct CreateFacultyInput {
    /// Display name of the new faculty member.
    pub display_name: String,
    /// Login email for the new account.
    pub email: String,
    /// Department the faculty member belongs to.
    pub department_id: uuid::Uuid,
    /// Designation.
    pub designation: String,
}

/// Parameters for student provisioning.
#[derive(Debug, Clone)]
pub struct CreateStudentInput {
    /// Display name of the new student.
    pub display_name: String,
    /// Login email for the new account.
    pub email: String,
    /// Course the student enrolls in.
    pub course_id: uuid::Uuid,
    /// Roll number within the course.
    pub roll_number: String,
    /// 12-digit Aadhar number.
    pub aadhar: String,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for roster management.
#[derive(Clone)]
pub struct RosterService {
    roster: Arc<dyn RosterRepository>,
    catalog: Arc<dyn CatalogRepository>,
    users: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    email_service: Arc<dyn EmailService>,
    frontend_url: String,
}

impl RosterService {
    /// Creates a new roster service.
    #[must_use]
    pub fn new(
        roster: Arc<dyn RosterRepository>,
        catalog: Arc<dyn CatalogRepository>,
        users: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        email_service: Arc<dyn EmailService>,
        frontend_url: String,
    ) -> Self {
        Self {
            roster,
            catalog,
            users,
            password_hasher,
            email_service,
            frontend_url,
        }
    }

    /// Provisions a faculty account and roster entry, then emails the
    /// generated credentials.
    pub async fn create_faculty(
        &self,
        institute_id: InstituteId,
        institute_name: &str,
        input: CreateFacultyInput,
    ) -> AppResult<uuid::Uuid> {
        let display_name = NonEmptyString::new(&input.display_name)?;
        let designation = NonEmptyString::new(&input.designation)?;
        let email = EmailAddress::new(&input.email)?;

        self.catalog
            .find_department(input.department_id)
            .await?
            .filter(|department| department.institute_id == institute_id)
            .ok_or_else(|| AppError::NotFound("department not found".to_owned()))?;

        let user_id = self
            .provision_account(
                institute_id,
                institute_name,
                &email,
                display_name.as_str(),
                UserRole::Faculty,
            )
            .await?;

        self.roster
            .create_faculty(NewFaculty {
                institute_id,
                user_id,
                department_id: input.department_id,
                designation: designation.as_str().to_owned(),
            })
            .await
    }

    /// Provisions a student account and roster entry, then emails the
    /// generated credentials.
    pub async fn create_student(
        &self,
        institute_id: InstituteId,
        institute_name: &str,
        input: CreateStudentInput,
    ) -> AppResult<uuid::Uuid> {
        let display_name = NonEmptyString::new(&input.display_name)?;
        let roll_number = NonEmptyString::new(&input.roll_number)?;
        let email = EmailAddress::new(&input.email)?;
        let aadhar = AadharNumber::new(&input.aadhar)?;

        self.catalog
            .find_course(input.course_id)
            .await?
            .filter(|course| course.institute_id == institute_id)
            .ok_or_else(|| AppError::NotFound("course not found".to_owned()))?;

        let user_id = self
            .provision_account(
                institute_id,
                institute_name,
                &email,
                display_name.as_str(),
                UserRole::Student,
            )
            .await?;

        self.roster
            .create_student(NewStudent {
                institute_id,
                user_id,
                course_id: input.course_id,
                roll_number: roll_number.as_str().trim().to_owned(),
                aadhar,
            })
            .await
    }

    /// Lists an institute's faculty.
    pub async fn list_faculty(&self, institute_id: InstituteId) -> AppResult<Vec<FacultyRecord>> {
        self.roster.list_faculty(institute_id).await
    }

    /// Lists an institute's students.
    pub async fn list_students(&self, institute_id: InstituteId) -> AppResult<Vec<StudentRecord>> {
        self.roster.list_students(institute_id).await
    }

    /// Removes a faculty member and the backing login account.
    pub async fn remove_faculty(
        &self,
        institute_id: InstituteId,
        faculty_id: uuid::Uuid,
    ) -> AppResult<()> {
        let faculty = self
            .roster
            .find_faculty(faculty_id)
            .await?
            .filter(|faculty| faculty.institute_id == institute_id)
            .ok_or_else(|| AppError::NotFound("faculty member not found".to_owned()))?;

        self.roster.remove_faculty(institute_id, faculty_id).await?;
        self.users.delete(faculty.user_id).await
    }

    /// Removes a student and the backing login account.
    pub async fn remove_student(
        &self,
        institute_id: InstituteId,
        student_id: uuid::Uuid,
    ) -> AppResult<()> {
        let student = self
            .roster
            .find_student(student_id)
            .await?
            .filter(|student| student.institute_id == institute_id)
            .ok_or_else(|| AppError::NotFound("student not found".to_owned()))?;

        self.roster.remove_student(institute_id, student_id).await?;
        self.users.delete(student.user_id).await
    }

    /// Returns the student roster entry backed by a login account.
    pub async fn student_for_user(&self, user_id: UserId) -> AppResult<Option<StudentRecord>> {
        self.roster.find_student_by_user(user_id).await
    }

    /// Returns the faculty roster entry backed by a login account.
    pub async fn faculty_for_user(&self, user_id: UserId) -> AppResult<Option<FacultyRecord>> {
        self.roster.find_faculty_by_user(user_id).await
    }

    /// Returns an institute's headcounts.
    pub async fn people_counts(&self, institute_id: InstituteId) -> AppResult<PeopleCounts> {
        self.roster.count_people(institute_id).await
    }

    async fn provision_account(
        &self,
        institute_id: InstituteId,
        institute_name: &str,
        email: &EmailAddress,
        display_name: &str,
        role: UserRole,
    ) -> AppResult<UserId> {
        if self.users.find_by_email(email.as_str()).await?.is_some() {
            return Err(AppError::Validation(
                "an account with this email already exists".to_owned(),
            ));
        }

        let temporary_password = generate_temporary_password();
        let password_hash = self.password_hasher.hash_password(&temporary_password)?;

        // Admin vouches for the address; provisioned accounts skip verification.
        let user_id = self
            .users
            .create(
                email.as_str(),
                &password_hash,
                display_name,
                role,
                institute_id,
                true,
            )
            .await?;

        let login_url = format!("{}/login", self.frontend_url);
        let template = match role {
            UserRole::Faculty => EmailTemplate::FacultyWelcome {
                institute_name,
                email: email.as_str(),
                temporary_password: &temporary_password,
                login_url: &login_url,
            },
            _ => EmailTemplate::StudentWelcome {
                institute_name,
                email: email.as_str(),
                temporary_password: &temporary_password,
                login_url: &login_url,
            },
        };

        self.email_service
            .send_email(email.as_str(), &template.subject(), &template.text_body())
            .await?;

        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pratibha_core::{AppError, InstituteId};

    use crate::test_support::{
        CapturingEmailService, InMemoryCatalog, InMemoryInstitutes, InMemoryRoster, InMemoryUsers,
        PlainPasswordHasher,
    };
    use crate::user_service::UserRepository;

    use super::{CreateFacultyInput, CreateStudentInput, RosterService};

    struct Fixture {
        service: RosterService,
        users: Arc<InMemoryUsers>,
        email: Arc<CapturingEmailService>,
        institute_id: InstituteId,
        department_id: uuid::Uuid,
        course_id: uuid::Uuid,
    }

    async fn fixture() -> Fixture {
        let roster = InMemoryRoster::new();
        let catalog = InMemoryCatalog::new();
        let users = InMemoryUsers::new();
        let email = Arc::new(CapturingEmailService::default());
        let institutes = InMemoryInstitutes::new();

        let institute_id = institutes.seed("Model College").await;
        let department_id = catalog.seed_department(institute_id).await;
        let course_id = catalog.seed_course(institute_id).await;

        let service = RosterService::new(
            roster,
            catalog,
            users.clone(),
            Arc::new(PlainPasswordHasher),
            email.clone(),
            "http://localhost:3000".to_owned(),
        );

        Fixture {
            service,
            users,
            email,
            institute_id,
            department_id,
            course_id,
        }
    }

    #[tokio::test]
    async fn provisioning_faculty_creates_account_and_sends_credentials() {
        let fixture = fixture().await;

        let created = fixture
            .service
            .create_faculty(
                fixture.institute_id,
                "Model College",
                CreateFacultyInput {
                    display_name: "Prof Iyer".to_owned(),
                    email: "iyer@example.com".to_owned(),
                    department_id: fixture.department_id,
                    designation: "Assistant Professor".to_owned(),
                },
            )
            .await;
        assert!(created.is_ok());

        let user = fixture
            .users
            .find_by_email("iyer@example.com")
            .await
            .unwrap_or_else(|_| panic!("test"));
        assert!(user.is_some());
        assert!(user.unwrap_or_else(|| panic!("test")).email_verified);

        let sent = fixture.email.sent.lock().await;
        assert_eq!(sent.len(), 1);
        // The welcome mail carries the generated temporary password.
        assert!(sent[0].2.contains("Temporary password: "));
    }

    #[tokio::test]
    async fn provisioning_with_a_taken_email_fails() {
        let fixture = fixture().await;

        let input = CreateStudentInput {
            display_name: "Asha Rao".to_owned(),
            email: "asha@example.com".to_owned(),
            course_id: fixture.course_id,
            roll_number: "CS-42".to_owned(),
            aadhar: "123412341234".to_owned(),
        };

        let first = fixture
            .service
            .create_student(fixture.institute_id, "Model College", input.clone())
            .await;
        assert!(first.is_ok());

        let second = fixture
            .service
            .create_student(fixture.institute_id, "Model College", input)
            .await;
        assert!(matches!(second, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn student_with_a_malformed_aadhar_is_rejected() {
        let fixture = fixture().await;

        let result = fixture
            .service
            .create_student(
                fixture.institute_id,
                "Model College",
                CreateStudentInput {
                    display_name: "Asha Rao".to_owned(),
                    email: "asha@example.com".to_owned(),
                    course_id: fixture.course_id,
                    roll_number: "CS-42".to_owned(),
                    aadhar: "1234".to_owned(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn student_in_a_foreign_course_is_rejected() {
        let fixture = fixture().await;

        let result = fixture
            .service
            .create_student(
                fixture.institute_id,
                "Model College",
                CreateStudentInput {
                    display_name: "Asha Rao".to_owned(),
                    email: "asha@example.com".to_owned(),
                    course_id: uuid::Uuid::new_v4(),
                    roll_number: "CS-42".to_owned(),
                    aadhar: "123412341234".to_owned(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn removing_a_student_also_removes_the_account() {
        let fixture = fixture().await;

        let student_id = fixture
            .service
            .create_student(
                fixture.institute_id,
                "Model College",
                CreateStudentInput {
                    display_name: "Asha Rao".to_owned(),
                    email: "asha@example.com".to_owned(),
                    course_id: fixture.course_id,
                    roll_number: "CS-42".to_owned(),
                    aadhar: "123412341234".to_owned(),
                },
            )
            .await
            .unwrap_or_else(|_| panic!("test"));

        fixture
            .service
            .remove_student(fixture.institute_id, student_id)
            .await
            .unwrap_or_else(|_| panic!("test"));

        let user = fixture
            .users
            .find_by_email("asha@example.com")
            .await
            .unwrap_or_else(|_| panic!("test"));
        assert!(user.is_none());
    }
}
