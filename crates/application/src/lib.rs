//! Application services and ports for Pratibha Kosh.
//!
//! Services own the workflow logic; all I/O happens behind `#[async_trait]`
//! repository and service ports implemented by the infrastructure crate.

#![forbid(unsafe_code)]

mod activity_service;
mod catalog_service;
mod email_token_service;
mod mailer;
mod rate_limit_service;
mod records_service;
mod roster_service;
mod search_service;
mod token_crypto;
mod user_service;

#[cfg(test)]
mod test_support;

pub use activity_service::{
    ActivityCounts, ActivityRecord, ActivityRepository, ActivityService, IssuerSessionRecord,
    IssuerSessionRepository, IssuerSessionView, NewActivity, PendingCounts, SubmitActivityInput,
};
pub use catalog_service::{
    CatalogRepository, CatalogService, CourseRecord, CreateCourseInput, DepartmentRecord,
};
pub use email_token_service::{
    EmailTokenRecord, EmailTokenRepository, EmailTokenService, PASSWORD_RESET_HOURLY_LIMIT,
};
pub use mailer::{EmailService, EmailTemplate};
pub use rate_limit_service::{AttemptInfo, RateLimitRepository, RateLimitRule, RateLimitService};
pub use records_service::{
    AcademicRecordRepository, AttendanceEntry, GradeEntry, RecordsService, StudentAcademicSummary,
};
pub use search_service::{
    InstituteSearchGroup, PersonSearchResult, PublicActivityEntry, SearchService,
    StudentSearchEntry,
};
pub use roster_service::{
    CreateFacultyInput, CreateStudentInput, FacultyRecord, NewFaculty, NewStudent, PeopleCounts,
    RosterRepository, RosterService, StudentMatch, StudentRecord,
};
pub use user_service::{
    AuthOutcome, InstituteRecord, InstituteRepository, PasswordHasher, RegisterInstituteParams,
    RegisteredAdmin, UserRecord, UserRepository, UserService,
};
