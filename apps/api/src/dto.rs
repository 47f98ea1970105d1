//! Typed request/response payloads for the HTTP API.
//!
//! Everything the client exchanges with the server is an explicit struct,
//! exported to TypeScript via `ts-rs`.

mod activities;
mod auth;
mod catalog;
mod common;
mod records;
mod roster;
mod search;

pub use activities::{
    ActivityResponse, PendingCountsResponse, SubmitActivityRequest, ValidateActivityRequest,
};
pub use auth::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest,
    ResetPasswordRequest, UserIdentityResponse, VerifyEmailRequest,
};
pub use catalog::{CourseResponse, CreateCourseRequest, CreateDepartmentRequest, DepartmentResponse};
pub use common::{GenericMessageResponse, HealthDependencyStatus, HealthResponse};
pub use records::{
    AttendanceEntryRequest, GradeEntryRequest, RecordAttendanceRequest, RecordGradesRequest,
    StudentRecordsResponse,
};
pub use roster::{
    AdminOverviewResponse, CreateFacultyRequest, CreateStudentRequest, FacultyResponse,
    StudentResponse,
};
pub use search::{
    IssuerSessionResponse, IssuerVerifyRequest, PublicActivityResponse, SearchInstituteResponse,
    SearchResponse, SearchStudentResponse,
};
