//! Shared in-memory fakes for application service tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use pratibha_core::{AppError, AppResult, InstituteId, UserRole};
use pratibha_domain::UserId;

use crate::mailer::EmailService;
use crate::user_service::{
    InstituteRecord, InstituteRepository, PasswordHasher, UserRecord, UserRepository,
};

/// Password hasher whose hashes are trivially reversible for assertions.
pub(crate) struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

/// Email service that records every message instead of delivering it.
#[derive(Default)]
pub(crate) struct CapturingEmailService {
    pub(crate) sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl EmailService for CapturingEmailService {
    async fn send_email(&self, to: &str, subject: &str, text_body: &str) -> AppResult<()> {
        self.sent
            .lock()
            .await
            .push((to.to_owned(), subject.to_owned(), text_body.to_owned()));
        Ok(())
    }
}

/// In-memory user repository.
#[derive(Default)]
pub(crate) struct InMemoryUsers {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUsers {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) async fn get(&self, user_id: UserId) -> Option<UserRecord> {
        self.users.read().await.get(&user_id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let lowered = email.to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == lowered)
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
        role: UserRole,
        institute_id: InstituteId,
        email_verified: bool,
    ) -> AppResult<UserId> {
        let mut users = self.users.write().await;
        if users.values().any(|user| user.email == email) {
            return Err(AppError::Conflict(format!(
                "email '{email}' is already registered"
            )));
        }

        let user_id = UserId::new();
        users.insert(
            user_id,
            UserRecord {
                id: user_id,
                email: email.to_owned(),
                email_verified,
                password_hash: password_hash.to_owned(),
                role,
                institute_id,
                display_name: display_name.to_owned(),
                failed_login_count: 0,
                locked_until: None,
            },
        );

        Ok(user_id)
    }

    async fn overwrite_pending_registration(
        &self,
        user_id: UserId,
        password_hash: &str,
        display_name: &str,
    ) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;

        if user.email_verified {
            return Err(AppError::Conflict(
                "cannot overwrite a verified account".to_owned(),
            ));
        }

        user.password_hash = password_hash.to_owned();
        user.display_name = display_name.to_owned();
        Ok(())
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;
        user.password_hash = password_hash.to_owned();
        Ok(())
    }

    async fn record_failed_login(&self, user_id: UserId) -> AppResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&user_id) {
            user.failed_login_count += 1;
            if user.failed_login_count >= 5 {
                user.locked_until = Some(chrono::Utc::now() + chrono::Duration::minutes(15));
            }
        }
        Ok(())
    }

    async fn reset_failed_logins(&self, user_id: UserId) -> AppResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&user_id) {
            user.failed_login_count = 0;
            user.locked_until = None;
        }
        Ok(())
    }

    async fn mark_email_verified(&self, user_id: UserId) -> AppResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&user_id) {
            user.email_verified = true;
        }
        Ok(())
    }

    async fn delete(&self, user_id: UserId) -> AppResult<()> {
        self.users.write().await.remove(&user_id);
        Ok(())
    }
}

/// In-memory institute repository.
#[derive(Default)]
pub(crate) struct InMemoryInstitutes {
    institutes: RwLock<HashMap<InstituteId, InstituteRecord>>,
}

impl InMemoryInstitutes {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) async fn get(&self, institute_id: InstituteId) -> Option<InstituteRecord> {
        self.institutes.read().await.get(&institute_id).cloned()
    }

    pub(crate) async fn seed(&self, name: &str) -> InstituteId {
        let institute_id = InstituteId::new();
        self.institutes.write().await.insert(
            institute_id,
            InstituteRecord {
                id: institute_id,
                name: name.to_owned(),
                created_at: chrono::Utc::now(),
            },
        );
        institute_id
    }
}

#[async_trait]
impl InstituteRepository for InMemoryInstitutes {
    async fn create(&self, name: &str) -> AppResult<InstituteId> {
        Ok(self.seed(name).await)
    }

    async fn find(&self, institute_id: InstituteId) -> AppResult<Option<InstituteRecord>> {
        Ok(self.institutes.read().await.get(&institute_id).cloned())
    }

    async fn rename(&self, institute_id: InstituteId, name: &str) -> AppResult<()> {
        let mut institutes = self.institutes.write().await;
        let institute = institutes
            .get_mut(&institute_id)
            .ok_or_else(|| AppError::NotFound("institute not found".to_owned()))?;
        institute.name = name.to_owned();
        Ok(())
    }
}

use pratibha_domain::{ActivityStatus, ActivityType};

use crate::activity_service::{
    ActivityRecord, ActivityRepository, IssuerSessionRecord, IssuerSessionRepository, NewActivity,
};
use crate::catalog_service::{CatalogRepository, CourseRecord, DepartmentRecord};
use crate::records_service::{AcademicRecordRepository, AttendanceEntry, GradeEntry};
use crate::roster_service::{
    FacultyRecord, NewFaculty, NewStudent, PeopleCounts, RosterRepository, StudentMatch,
    StudentRecord,
};

/// In-memory activity repository enforcing credential uniqueness.
#[derive(Default)]
pub(crate) struct InMemoryActivities {
    activities: RwLock<Vec<ActivityRecord>>,
}

impl InMemoryActivities {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl ActivityRepository for InMemoryActivities {
    async fn insert(&self, activity: NewActivity) -> AppResult<uuid::Uuid> {
        let mut activities = self.activities.write().await;
        if activities
            .iter()
            .any(|existing| existing.credential_id == activity.credential_id.as_str())
        {
            return Err(AppError::Validation(
                "an activity with this credential id already exists".to_owned(),
            ));
        }

        let now = chrono::Utc::now();
        let id = uuid::Uuid::new_v4();
        activities.push(ActivityRecord {
            id,
            institute_id: activity.institute_id,
            student_id: activity.student_id,
            faculty_id: activity.faculty_id,
            title: activity.title,
            description: activity.description,
            attachment_link: activity.attachment_link,
            credential_id: activity.credential_id.as_str().to_owned(),
            status: ActivityStatus::Pending,
            activity_type: activity.activity_type,
            remarks: None,
            issuer_verification_required: activity.issuer_verification_required,
            issuer_verified: false,
            created_at: now,
            updated_at: now,
        });

        Ok(id)
    }

    async fn find(&self, activity_id: uuid::Uuid) -> AppResult<Option<ActivityRecord>> {
        Ok(self
            .activities
            .read()
            .await
            .iter()
            .find(|activity| activity.id == activity_id)
            .cloned())
    }

    async fn list_for_institute(
        &self,
        institute_id: InstituteId,
        status: Option<ActivityStatus>,
    ) -> AppResult<Vec<ActivityRecord>> {
        Ok(self
            .activities
            .read()
            .await
            .iter()
            .filter(|activity| activity.institute_id == institute_id)
            .filter(|activity| status.is_none_or(|wanted| activity.status == wanted))
            .cloned()
            .collect())
    }

    async fn list_for_student(
        &self,
        student_id: uuid::Uuid,
    ) -> AppResult<Vec<ActivityRecord>> {
        Ok(self
            .activities
            .read()
            .await
            .iter()
            .filter(|activity| activity.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn apply_decision(
        &self,
        activity_id: uuid::Uuid,
        status: ActivityStatus,
        remarks: Option<&str>,
    ) -> AppResult<()> {
        let mut activities = self.activities.write().await;
        let activity = activities
            .iter_mut()
            .find(|activity| activity.id == activity_id)
            .ok_or_else(|| AppError::NotFound("activity not found".to_owned()))?;

        activity.status = status;
        activity.remarks = remarks.map(ToOwned::to_owned);
        activity.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn mark_issuer_verified(&self, activity_id: uuid::Uuid) -> AppResult<()> {
        let mut activities = self.activities.write().await;
        let activity = activities
            .iter_mut()
            .find(|activity| activity.id == activity_id)
            .ok_or_else(|| AppError::NotFound("activity not found".to_owned()))?;

        activity.issuer_verified = true;
        activity.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn count_by_status(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Vec<(ActivityStatus, i64)>> {
        let activities = self.activities.read().await;
        let count_of = |wanted: ActivityStatus| {
            activities
                .iter()
                .filter(|activity| {
                    activity.institute_id == institute_id && activity.status == wanted
                })
                .count() as i64
        };

        Ok(vec![
            (ActivityStatus::Pending, count_of(ActivityStatus::Pending)),
            (ActivityStatus::Approved, count_of(ActivityStatus::Approved)),
            (ActivityStatus::Rejected, count_of(ActivityStatus::Rejected)),
        ])
    }

    async fn count_by_type(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Vec<(ActivityType, i64)>> {
        let activities = self.activities.read().await;
        let count_of = |wanted: ActivityType| {
            activities
                .iter()
                .filter(|activity| {
                    activity.institute_id == institute_id && activity.activity_type == wanted
                })
                .count() as i64
        };

        Ok(vec![
            (ActivityType::Curricular, count_of(ActivityType::Curricular)),
            (ActivityType::CoCurricular, count_of(ActivityType::CoCurricular)),
            (
                ActivityType::ExtraCurricular,
                count_of(ActivityType::ExtraCurricular),
            ),
        ])
    }

    async fn count_pending_by_type(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Vec<(ActivityType, i64)>> {
        let activities = self.activities.read().await;
        let count_of = |wanted: ActivityType| {
            activities
                .iter()
                .filter(|activity| {
                    activity.institute_id == institute_id
                        && activity.activity_type == wanted
                        && activity.status == ActivityStatus::Pending
                })
                .count() as i64
        };

        Ok(vec![
            (ActivityType::Curricular, count_of(ActivityType::Curricular)),
            (ActivityType::CoCurricular, count_of(ActivityType::CoCurricular)),
            (
                ActivityType::ExtraCurricular,
                count_of(ActivityType::ExtraCurricular),
            ),
        ])
    }
}

/// In-memory issuer session repository with lookup-time expiry.
#[derive(Default)]
pub(crate) struct InMemoryIssuerSessions {
    sessions: RwLock<Vec<(IssuerSessionRecord, String)>>,
}

impl InMemoryIssuerSessions {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) async fn all(&self) -> Vec<IssuerSessionRecord> {
        self.sessions
            .read()
            .await
            .iter()
            .map(|(record, _)| record.clone())
            .collect()
    }

    pub(crate) async fn expire_all(&self) {
        let mut sessions = self.sessions.write().await;
        for (record, _) in sessions.iter_mut() {
            record.expires_at = chrono::Utc::now() - chrono::Duration::minutes(1);
        }
    }
}

#[async_trait]
impl IssuerSessionRepository for InMemoryIssuerSessions {
    async fn create(
        &self,
        activity_id: uuid::Uuid,
        issuer_email: &str,
        token_hash: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<uuid::Uuid> {
        let id = uuid::Uuid::new_v4();
        self.sessions.write().await.push((
            IssuerSessionRecord {
                id,
                activity_id,
                issuer_email: issuer_email.to_owned(),
                expires_at,
            },
            token_hash.to_owned(),
        ));
        Ok(id)
    }

    async fn find_valid(&self, token_hash: &str) -> AppResult<Option<IssuerSessionRecord>> {
        Ok(self
            .sessions
            .read()
            .await
            .iter()
            .find(|(record, stored_hash)| {
                stored_hash == token_hash && record.expires_at > chrono::Utc::now()
            })
            .map(|(record, _)| record.clone()))
    }

    async fn delete(&self, session_id: uuid::Uuid) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .retain(|(record, _)| record.id != session_id);
        Ok(())
    }
}

/// In-memory roster repository with institute names for search grouping.
#[derive(Default)]
pub(crate) struct InMemoryRoster {
    faculty: RwLock<Vec<FacultyRecord>>,
    students: RwLock<Vec<StudentRecord>>,
    institute_names: RwLock<HashMap<InstituteId, String>>,
}

impl InMemoryRoster {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) async fn name_institute(&self, institute_id: InstituteId, name: &str) {
        self.institute_names
            .write()
            .await
            .insert(institute_id, name.to_owned());
    }

    pub(crate) async fn seed_faculty(
        &self,
        institute_id: InstituteId,
        display_name: &str,
    ) -> uuid::Uuid {
        let id = uuid::Uuid::new_v4();
        self.faculty.write().await.push(FacultyRecord {
            id,
            institute_id,
            user_id: UserId::new(),
            display_name: display_name.to_owned(),
            email: format!("{}@example.com", display_name.to_lowercase().replace(' ', ".")),
            department_id: uuid::Uuid::new_v4(),
            designation: "Assistant Professor".to_owned(),
        });
        id
    }

    pub(crate) async fn seed_student(
        &self,
        institute_id: InstituteId,
        display_name: &str,
        aadhar: &str,
    ) -> uuid::Uuid {
        let id = uuid::Uuid::new_v4();
        self.students.write().await.push(StudentRecord {
            id,
            institute_id,
            user_id: UserId::new(),
            display_name: display_name.to_owned(),
            email: format!("{}@example.com", display_name.to_lowercase().replace(' ', ".")),
            course_id: uuid::Uuid::new_v4(),
            roll_number: format!("R-{}", &id.to_string()[..8]),
            aadhar: aadhar.to_owned(),
        });
        id
    }
}

#[async_trait]
impl RosterRepository for InMemoryRoster {
    async fn create_faculty(&self, faculty: NewFaculty) -> AppResult<uuid::Uuid> {
        let id = uuid::Uuid::new_v4();
        self.faculty.write().await.push(FacultyRecord {
            id,
            institute_id: faculty.institute_id,
            user_id: faculty.user_id,
            display_name: String::new(),
            email: String::new(),
            department_id: faculty.department_id,
            designation: faculty.designation,
        });
        Ok(id)
    }

    async fn list_faculty(&self, institute_id: InstituteId) -> AppResult<Vec<FacultyRecord>> {
        Ok(self
            .faculty
            .read()
            .await
            .iter()
            .filter(|faculty| faculty.institute_id == institute_id)
            .cloned()
            .collect())
    }

    async fn find_faculty(&self, faculty_id: uuid::Uuid) -> AppResult<Option<FacultyRecord>> {
        Ok(self
            .faculty
            .read()
            .await
            .iter()
            .find(|faculty| faculty.id == faculty_id)
            .cloned())
    }

    async fn remove_faculty(
        &self,
        institute_id: InstituteId,
        faculty_id: uuid::Uuid,
    ) -> AppResult<()> {
        self.faculty
            .write()
            .await
            .retain(|faculty| !(faculty.id == faculty_id && faculty.institute_id == institute_id));
        Ok(())
    }

    async fn create_student(&self, student: NewStudent) -> AppResult<uuid::Uuid> {
        let id = uuid::Uuid::new_v4();
        self.students.write().await.push(StudentRecord {
            id,
            institute_id: student.institute_id,
            user_id: student.user_id,
            display_name: String::new(),
            email: String::new(),
            course_id: student.course_id,
            roll_number: student.roll_number,
            aadhar: student.aadhar.as_str().to_owned(),
        });
        Ok(id)
    }

    async fn list_students(&self, institute_id: InstituteId) -> AppResult<Vec<StudentRecord>> {
        Ok(self
            .students
            .read()
            .await
            .iter()
            .filter(|student| student.institute_id == institute_id)
            .cloned()
            .collect())
    }

    async fn find_student(&self, student_id: uuid::Uuid) -> AppResult<Option<StudentRecord>> {
        Ok(self
            .students
            .read()
            .await
            .iter()
            .find(|student| student.id == student_id)
            .cloned())
    }

    async fn find_student_by_user(&self, user_id: UserId) -> AppResult<Option<StudentRecord>> {
        Ok(self
            .students
            .read()
            .await
            .iter()
            .find(|student| student.user_id == user_id)
            .cloned())
    }

    async fn find_faculty_by_user(&self, user_id: UserId) -> AppResult<Option<FacultyRecord>> {
        Ok(self
            .faculty
            .read()
            .await
            .iter()
            .find(|faculty| faculty.user_id == user_id)
            .cloned())
    }

    async fn remove_student(
        &self,
        institute_id: InstituteId,
        student_id: uuid::Uuid,
    ) -> AppResult<()> {
        self.students
            .write()
            .await
            .retain(|student| !(student.id == student_id && student.institute_id == institute_id));
        Ok(())
    }

    async fn find_students_by_aadhar(&self, aadhar: &str) -> AppResult<Vec<StudentMatch>> {
        let names = self.institute_names.read().await;
        Ok(self
            .students
            .read()
            .await
            .iter()
            .filter(|student| student.aadhar == aadhar)
            .map(|student| StudentMatch {
                student: student.clone(),
                institute_name: names
                    .get(&student.institute_id)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect())
    }

    async fn count_people(&self, institute_id: InstituteId) -> AppResult<PeopleCounts> {
        Ok(PeopleCounts {
            faculty: self
                .faculty
                .read()
                .await
                .iter()
                .filter(|faculty| faculty.institute_id == institute_id)
                .count() as i64,
            students: self
                .students
                .read()
                .await
                .iter()
                .filter(|student| student.institute_id == institute_id)
                .count() as i64,
        })
    }
}

/// In-memory catalog repository.
#[derive(Default)]
pub(crate) struct InMemoryCatalog {
    departments: RwLock<Vec<DepartmentRecord>>,
    courses: RwLock<Vec<CourseRecord>>,
}

impl InMemoryCatalog {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) async fn seed_department(&self, institute_id: InstituteId) -> uuid::Uuid {
        let name = format!("Dept {}", uuid::Uuid::new_v4());
        self.create_department(institute_id, &name)
            .await
            .unwrap_or_default()
    }

    pub(crate) async fn seed_course(&self, institute_id: InstituteId) -> uuid::Uuid {
        let department_id = self.seed_department(institute_id).await;
        self.create_course(institute_id, department_id, "Computer Science", "CS-01")
            .await
            .unwrap_or_default()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn create_department(
        &self,
        institute_id: InstituteId,
        name: &str,
    ) -> AppResult<uuid::Uuid> {
        let mut departments = self.departments.write().await;
        if departments
            .iter()
            .any(|department| department.institute_id == institute_id && department.name == name)
        {
            return Err(AppError::Conflict(format!(
                "department '{name}' already exists"
            )));
        }

        let id = uuid::Uuid::new_v4();
        departments.push(DepartmentRecord {
            id,
            institute_id,
            name: name.to_owned(),
        });
        Ok(id)
    }

    async fn list_departments(
        &self,
        institute_id: InstituteId,
    ) -> AppResult<Vec<DepartmentRecord>> {
        Ok(self
            .departments
            .read()
            .await
            .iter()
            .filter(|department| department.institute_id == institute_id)
            .cloned()
            .collect())
    }

    async fn find_department(
        &self,
        department_id: uuid::Uuid,
    ) -> AppResult<Option<DepartmentRecord>> {
        Ok(self
            .departments
            .read()
            .await
            .iter()
            .find(|department| department.id == department_id)
            .cloned())
    }

    async fn delete_department(
        &self,
        institute_id: InstituteId,
        department_id: uuid::Uuid,
    ) -> AppResult<()> {
        if self
            .courses
            .read()
            .await
            .iter()
            .any(|course| course.department_id == department_id)
        {
            return Err(AppError::Conflict(
                "department still has courses".to_owned(),
            ));
        }

        self.departments.write().await.retain(|department| {
            !(department.id == department_id && department.institute_id == institute_id)
        });
        Ok(())
    }

    async fn create_course(
        &self,
        institute_id: InstituteId,
        department_id: uuid::Uuid,
        name: &str,
        code: &str,
    ) -> AppResult<uuid::Uuid> {
        let mut courses = self.courses.write().await;
        if courses
            .iter()
            .any(|course| course.institute_id == institute_id && course.code == code)
        {
            return Err(AppError::Conflict(format!(
                "course code '{code}' already exists"
            )));
        }

        let id = uuid::Uuid::new_v4();
        courses.push(CourseRecord {
            id,
            institute_id,
            department_id,
            name: name.to_owned(),
            code: code.to_owned(),
        });
        Ok(id)
    }

    async fn list_courses(&self, institute_id: InstituteId) -> AppResult<Vec<CourseRecord>> {
        Ok(self
            .courses
            .read()
            .await
            .iter()
            .filter(|course| course.institute_id == institute_id)
            .cloned()
            .collect())
    }

    async fn find_course(&self, course_id: uuid::Uuid) -> AppResult<Option<CourseRecord>> {
        Ok(self
            .courses
            .read()
            .await
            .iter()
            .find(|course| course.id == course_id)
            .cloned())
    }

    async fn delete_course(
        &self,
        institute_id: InstituteId,
        course_id: uuid::Uuid,
    ) -> AppResult<()> {
        self.courses
            .write()
            .await
            .retain(|course| !(course.id == course_id && course.institute_id == institute_id));
        Ok(())
    }
}

/// In-memory attendance and grade store.
#[derive(Default)]
pub(crate) struct InMemoryAcademicRecords {
    attendance: RwLock<HashMap<(uuid::Uuid, uuid::Uuid, chrono::NaiveDate), bool>>,
    grades: RwLock<HashMap<(uuid::Uuid, uuid::Uuid, i16), (i16, f64)>>,
}

impl InMemoryAcademicRecords {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl AcademicRecordRepository for InMemoryAcademicRecords {
    async fn record_attendance(
        &self,
        _institute_id: InstituteId,
        course_id: uuid::Uuid,
        _recorded_by: uuid::Uuid,
        date: chrono::NaiveDate,
        entries: &[AttendanceEntry],
    ) -> AppResult<()> {
        let mut attendance = self.attendance.write().await;
        for entry in entries {
            attendance.insert((entry.student_id, course_id, date), entry.present);
        }
        Ok(())
    }

    async fn attendance_counts(&self, student_id: uuid::Uuid) -> AppResult<(i64, i64)> {
        let attendance = self.attendance.read().await;
        let rows: Vec<bool> = attendance
            .iter()
            .filter(|((stored_student, _, _), _)| *stored_student == student_id)
            .map(|(_, present)| *present)
            .collect();

        let present = rows.iter().filter(|present| **present).count() as i64;
        Ok((present, rows.len() as i64))
    }

    async fn record_grades(
        &self,
        _institute_id: InstituteId,
        course_id: uuid::Uuid,
        _recorded_by: uuid::Uuid,
        semester: i16,
        entries: &[GradeEntry],
    ) -> AppResult<()> {
        let mut grades = self.grades.write().await;
        for entry in entries {
            grades.insert(
                (entry.student_id, course_id, semester),
                (entry.credits, entry.grade_point),
            );
        }
        Ok(())
    }

    async fn grade_rows(&self, student_id: uuid::Uuid) -> AppResult<Vec<(i16, f64)>> {
        Ok(self
            .grades
            .read()
            .await
            .iter()
            .filter(|((stored_student, _, _), _)| *stored_student == student_id)
            .map(|(_, row)| *row)
            .collect())
    }
}
