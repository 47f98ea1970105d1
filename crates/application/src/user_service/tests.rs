use std::sync::Arc;

use pratibha_core::AppError;

use crate::test_support::{InMemoryInstitutes, InMemoryUsers, PlainPasswordHasher};

use super::{AuthOutcome, RegisterInstituteParams, UserService};

fn params(email: &str) -> RegisterInstituteParams {
    RegisterInstituteParams {
        institute_name: "Model Engineering College".to_owned(),
        display_name: "Registrar".to_owned(),
        email: email.to_owned(),
        password: "a-long-enough-password".to_owned(),
    }
}

fn service(users: Arc<InMemoryUsers>, institutes: Arc<InMemoryInstitutes>) -> UserService {
    UserService::new(users, institutes, Arc::new(PlainPasswordHasher))
}

#[tokio::test]
async fn registration_creates_institute_and_unverified_admin() {
    let users = InMemoryUsers::new();
    let institutes = InMemoryInstitutes::new();
    let service = service(users.clone(), institutes.clone());

    let registered = service
        .register_institute(params("Registrar@Example.com"))
        .await;
    assert!(registered.is_ok());

    let registered = registered.unwrap_or_else(|_| panic!("test"));
    assert_eq!(registered.email, "registrar@example.com");

    let user = users.get(registered.user_id).await;
    assert!(user.is_some());
    let user = user.unwrap_or_else(|| panic!("test"));
    assert!(!user.email_verified);
    assert!(institutes.get(user.institute_id).await.is_some());
}

#[tokio::test]
async fn registration_with_verified_email_fails() {
    let users = InMemoryUsers::new();
    let institutes = InMemoryInstitutes::new();
    let service = service(users.clone(), institutes.clone());

    let registered = service
        .register_institute(params("registrar@example.com"))
        .await
        .unwrap_or_else(|_| panic!("test"));
    service
        .confirm_email(registered.user_id)
        .await
        .unwrap_or_else(|_| panic!("test"));

    let second = service.register_institute(params("registrar@example.com")).await;
    assert!(matches!(second, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn registration_with_unverified_email_overwrites_the_pending_one() {
    let users = InMemoryUsers::new();
    let institutes = InMemoryInstitutes::new();
    let service = service(users.clone(), institutes.clone());

    let first = service
        .register_institute(params("registrar@example.com"))
        .await
        .unwrap_or_else(|_| panic!("test"));

    let second = service
        .register_institute(RegisterInstituteParams {
            institute_name: "Renamed College".to_owned(),
            display_name: "New Registrar".to_owned(),
            email: "registrar@example.com".to_owned(),
            password: "another-long-password".to_owned(),
        })
        .await
        .unwrap_or_else(|_| panic!("test"));

    // Same pending account, replaced in place.
    assert_eq!(first.user_id, second.user_id);

    let user = users
        .get(second.user_id)
        .await
        .unwrap_or_else(|| panic!("test"));
    assert_eq!(user.display_name, "New Registrar");
    assert_eq!(user.password_hash, "hashed:another-long-password");
    assert!(!user.email_verified);

    let institute = institutes
        .get(user.institute_id)
        .await
        .unwrap_or_else(|| panic!("test"));
    assert_eq!(institute.name, "Renamed College");
}

#[tokio::test]
async fn login_with_unknown_email_fails_generically() {
    let service = service(InMemoryUsers::new(), InMemoryInstitutes::new());

    let outcome = service.login("nobody@example.com", "whatever-pass").await;
    assert!(matches!(outcome, Ok(AuthOutcome::Failed)));
}

#[tokio::test]
async fn login_before_verification_fails() {
    let users = InMemoryUsers::new();
    let institutes = InMemoryInstitutes::new();
    let service = service(users.clone(), institutes);

    service
        .register_institute(params("registrar@example.com"))
        .await
        .unwrap_or_else(|_| panic!("test"));

    let outcome = service
        .login("registrar@example.com", "a-long-enough-password")
        .await;
    assert!(matches!(outcome, Ok(AuthOutcome::Failed)));
}

#[tokio::test]
async fn login_after_verification_succeeds() {
    let users = InMemoryUsers::new();
    let institutes = InMemoryInstitutes::new();
    let service = service(users.clone(), institutes);

    let registered = service
        .register_institute(params("registrar@example.com"))
        .await
        .unwrap_or_else(|_| panic!("test"));
    service
        .confirm_email(registered.user_id)
        .await
        .unwrap_or_else(|_| panic!("test"));

    let outcome = service
        .login("registrar@example.com", "a-long-enough-password")
        .await;
    assert!(matches!(outcome, Ok(AuthOutcome::Authenticated(_))));
}

#[tokio::test]
async fn repeated_failures_lock_the_account() {
    let users = InMemoryUsers::new();
    let institutes = InMemoryInstitutes::new();
    let service = service(users.clone(), institutes);

    let registered = service
        .register_institute(params("registrar@example.com"))
        .await
        .unwrap_or_else(|_| panic!("test"));
    service
        .confirm_email(registered.user_id)
        .await
        .unwrap_or_else(|_| panic!("test"));

    for _ in 0..5 {
        let _ = service.login("registrar@example.com", "wrong-password-1").await;
    }

    let user = users
        .get(registered.user_id)
        .await
        .unwrap_or_else(|| panic!("test"));
    assert!(user.locked_until.is_some());

    // Correct credentials are refused while the lock holds.
    let outcome = service
        .login("registrar@example.com", "a-long-enough-password")
        .await;
    assert!(matches!(outcome, Ok(AuthOutcome::Failed)));
}

#[tokio::test]
async fn change_password_requires_the_current_one() {
    let users = InMemoryUsers::new();
    let institutes = InMemoryInstitutes::new();
    let service = service(users.clone(), institutes);

    let registered = service
        .register_institute(params("registrar@example.com"))
        .await
        .unwrap_or_else(|_| panic!("test"));

    let wrong = service
        .change_password(registered.user_id, "not-the-password", "brand-new-password")
        .await;
    assert!(matches!(wrong, Err(AppError::Unauthorized(_))));

    let right = service
        .change_password(
            registered.user_id,
            "a-long-enough-password",
            "brand-new-password",
        )
        .await;
    assert!(right.is_ok());
}
