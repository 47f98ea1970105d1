//! Pratibha Kosh API composition root.

#![forbid(unsafe_code)]

mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post, put};
use pratibha_application::{
    ActivityService, CatalogService, EmailTokenService, EmailService, RateLimitRule,
    RateLimitService, RecordsService, RosterService, SearchService, UserService,
};
use pratibha_core::AppError;
use pratibha_infrastructure::{
    Argon2PasswordHasher, ConsoleEmailService, PostgresAcademicRecordRepository,
    PostgresActivityRepository, PostgresCatalogRepository, PostgresEmailTokenRepository,
    PostgresInstituteRepository, PostgresIssuerSessionRepository, PostgresRateLimitRepository,
    PostgresRosterRepository, PostgresUserRepository, SmtpEmailConfig, SmtpEmailService,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let database_url = required_env("DATABASE_URL")?;
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .unwrap_or_else(|_| "false".to_owned())
        .eq_ignore_ascii_case("true");

    let email_provider = env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "console".to_owned());

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let session_store = PostgresStore::new(pool.clone())
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;
    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(30)));

    let email_service: Arc<dyn EmailService> = match email_provider.as_str() {
        "smtp" => {
            let smtp_port = required_non_empty_env("SMTP_PORT")?
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid SMTP_PORT: {error}")))?;

            let smtp_config = SmtpEmailConfig {
                host: required_non_empty_env("SMTP_HOST")?,
                port: smtp_port,
                username: required_non_empty_env("SMTP_USERNAME")?,
                password: required_non_empty_env("SMTP_PASSWORD")?,
                from_address: required_non_empty_env("SMTP_FROM_ADDRESS")?,
            };
            Arc::new(SmtpEmailService::new(smtp_config))
        }
        "console" => Arc::new(ConsoleEmailService::new()),
        _ => {
            return Err(AppError::Validation(format!(
                "EMAIL_PROVIDER must be either 'console' or 'smtp', got '{email_provider}'"
            )));
        }
    };

    // Repositories.
    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let institute_repository = Arc::new(PostgresInstituteRepository::new(pool.clone()));
    let email_token_repository = Arc::new(PostgresEmailTokenRepository::new(pool.clone()));
    let catalog_repository = Arc::new(PostgresCatalogRepository::new(pool.clone()));
    let roster_repository = Arc::new(PostgresRosterRepository::new(pool.clone()));
    let activity_repository = Arc::new(PostgresActivityRepository::new(pool.clone()));
    let issuer_session_repository = Arc::new(PostgresIssuerSessionRepository::new(pool.clone()));
    let academic_record_repository =
        Arc::new(PostgresAcademicRecordRepository::new(pool.clone()));
    let rate_limit_repository = Arc::new(PostgresRateLimitRepository::new(pool.clone()));

    // Services.
    let password_hasher = Arc::new(Argon2PasswordHasher::new());
    let user_service = UserService::new(
        user_repository.clone(),
        institute_repository,
        password_hasher.clone(),
    );
    let email_token_service = EmailTokenService::new(
        email_token_repository,
        email_service.clone(),
        frontend_url.clone(),
    );
    let activity_service = ActivityService::new(
        activity_repository.clone(),
        issuer_session_repository,
        roster_repository.clone(),
        email_service.clone(),
        frontend_url.clone(),
    );
    let catalog_service = CatalogService::new(catalog_repository.clone());
    let roster_service = RosterService::new(
        roster_repository.clone(),
        catalog_repository.clone(),
        user_repository,
        password_hasher,
        email_service,
        frontend_url.clone(),
    );
    let records_service = RecordsService::new(
        academic_record_repository.clone(),
        roster_repository.clone(),
        catalog_repository,
    );
    let search_service = SearchService::new(
        roster_repository,
        academic_record_repository,
        activity_repository,
    );
    let rate_limit_service = RateLimitService::new(rate_limit_repository);

    let app_state = AppState {
        user_service,
        email_token_service,
        activity_service,
        catalog_service,
        roster_service,
        records_service,
        search_service,
        rate_limit_service,
        pool,
        frontend_url: frontend_url.clone(),
    };

    let admin_routes = Router::new()
        .route(
            "/api/admin/departments",
            get(handlers::admin::list_departments_handler)
                .post(handlers::admin::create_department_handler),
        )
        .route(
            "/api/admin/departments/{department_id}",
            delete(handlers::admin::delete_department_handler),
        )
        .route(
            "/api/admin/courses",
            get(handlers::admin::list_courses_handler)
                .post(handlers::admin::create_course_handler),
        )
        .route(
            "/api/admin/courses/{course_id}",
            delete(handlers::admin::delete_course_handler),
        )
        .route(
            "/api/admin/faculty",
            get(handlers::admin::list_faculty_handler)
                .post(handlers::admin::create_faculty_handler),
        )
        .route(
            "/api/admin/faculty/{faculty_id}",
            delete(handlers::admin::delete_faculty_handler),
        )
        .route(
            "/api/admin/students",
            get(handlers::admin::list_students_handler)
                .post(handlers::admin::create_student_handler),
        )
        .route(
            "/api/admin/students/{student_id}",
            delete(handlers::admin::delete_student_handler),
        )
        .route("/api/admin/overview", get(handlers::admin::overview_handler))
        .route_layer(from_fn(middleware::require_admin));

    let faculty_routes = Router::new()
        .route(
            "/api/faculty/activities",
            get(handlers::faculty::list_activities_handler),
        )
        .route(
            "/api/faculty/activities/{activity_id}/validate",
            post(handlers::faculty::validate_activity_handler),
        )
        .route(
            "/api/faculty/attendance",
            post(handlers::faculty::record_attendance_handler),
        )
        .route(
            "/api/faculty/grades",
            post(handlers::faculty::record_grades_handler),
        )
        .route(
            "/api/faculty/overview",
            get(handlers::faculty::overview_handler),
        )
        .route_layer(from_fn(middleware::require_faculty));

    let student_routes = Router::new()
        .route(
            "/api/student/activities",
            get(handlers::student::list_activities_handler)
                .post(handlers::student::submit_activity_handler),
        )
        .route(
            "/api/student/records",
            get(handlers::student::records_handler),
        )
        .route_layer(from_fn(middleware::require_student));

    let protected_routes = Router::new()
        .merge(admin_routes)
        .merge(faculty_routes)
        .merge(student_routes)
        .route("/api/auth/me", get(auth::me_handler))
        .route("/api/auth/password", put(auth::change_password_handler))
        .route_layer(from_fn(middleware::require_auth));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    // Rate limit rules (OWASP Credential Stuffing Prevention).
    // Login: 10 attempts per IP per 15 minutes.
    let login_rate_rule = RateLimitRule::new("login", 10, 15 * 60);
    // Registration: 5 attempts per IP per hour.
    let register_rate_rule = RateLimitRule::new("register", 5, 60 * 60);
    // Password reset: 5 attempts per IP per hour.
    let forgot_password_rate_rule = RateLimitRule::new("forgot_password", 5, 60 * 60);

    let login_routes = Router::new()
        .route("/api/auth/login", post(auth::login_handler))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::rate_limit,
        ))
        .layer(axum::Extension(login_rate_rule));

    let register_routes = Router::new()
        .route("/api/auth/register", post(auth::register_handler))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::rate_limit,
        ))
        .layer(axum::Extension(register_rate_rule));

    let forgot_password_routes = Router::new()
        .route(
            "/api/auth/forgot-password",
            post(auth::forgot_password_handler),
        )
        .route(
            "/api/auth/reset-password",
            post(auth::reset_password_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::rate_limit,
        ))
        .layer(axum::Extension(forgot_password_rate_rule));

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(login_routes)
        .merge(register_routes)
        .merge(forgot_password_routes)
        .route("/api/auth/verify-email", post(auth::verify_email_handler))
        .route("/api/auth/logout", post(auth::logout_handler))
        .route(
            "/api/open/issuer/session",
            get(handlers::open::issuer_session_handler),
        )
        .route(
            "/api/open/issuer/verify",
            post(handlers::open::issuer_verify_handler),
        )
        .route(
            "/api/open/search/{aadhar}",
            get(handlers::open::aadhar_search_handler),
        )
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "pratibha-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
