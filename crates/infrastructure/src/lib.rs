//! Infrastructure implementations of the application ports: PostgreSQL
//! repositories, password hashing, and email transports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod console_email_service;
mod in_memory_activity_repository;
mod postgres_academic_record_repository;
mod postgres_activity_repository;
mod postgres_catalog_repository;
mod postgres_email_token_repository;
mod postgres_institute_repository;
mod postgres_issuer_session_repository;
mod postgres_rate_limit_repository;
mod postgres_roster_repository;
mod postgres_user_repository;
mod smtp_email_service;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use console_email_service::ConsoleEmailService;
pub use in_memory_activity_repository::{
    InMemoryActivityRepository, InMemoryIssuerSessionRepository,
};
pub use postgres_academic_record_repository::PostgresAcademicRecordRepository;
pub use postgres_activity_repository::PostgresActivityRepository;
pub use postgres_catalog_repository::PostgresCatalogRepository;
pub use postgres_email_token_repository::PostgresEmailTokenRepository;
pub use postgres_institute_repository::PostgresInstituteRepository;
pub use postgres_issuer_session_repository::PostgresIssuerSessionRepository;
pub use postgres_rate_limit_repository::PostgresRateLimitRepository;
pub use postgres_roster_repository::PostgresRosterRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use smtp_email_service::{SmtpEmailConfig, SmtpEmailService};
