use std::sync::Arc;

use pratibha_core::{AppError, InstituteId};
use pratibha_domain::{ActivityStatus, ActivityType, ValidationDecision};

use crate::test_support::{
    CapturingEmailService, InMemoryActivities, InMemoryIssuerSessions, InMemoryRoster,
};

use super::{ActivityService, SubmitActivityInput};

struct Fixture {
    service: ActivityService,
    sessions: Arc<InMemoryIssuerSessions>,
    email: Arc<CapturingEmailService>,
    institute_id: InstituteId,
    student_id: uuid::Uuid,
    faculty_id: uuid::Uuid,
}

async fn fixture() -> Fixture {
    let activities = InMemoryActivities::new();
    let sessions = InMemoryIssuerSessions::new();
    let roster = InMemoryRoster::new();
    let email = Arc::new(CapturingEmailService::default());

    let institute_id = InstituteId::new();
    let student_id = roster
        .seed_student(institute_id, "Asha Rao", "123412341234")
        .await;
    let faculty_id = roster.seed_faculty(institute_id, "Prof Iyer").await;

    let service = ActivityService::new(
        activities,
        sessions.clone(),
        roster,
        email.clone(),
        "http://localhost:3000".to_owned(),
    );

    Fixture {
        service,
        sessions,
        email,
        institute_id,
        student_id,
        faculty_id,
    }
}

fn submission(fixture: &Fixture, credential: &str) -> SubmitActivityInput {
    SubmitActivityInput {
        institute_id: fixture.institute_id,
        student_id: fixture.student_id,
        faculty_id: fixture.faculty_id,
        title: "Paper presentation".to_owned(),
        description: "Presented at the state symposium".to_owned(),
        activity_type: ActivityType::Curricular,
        credential_id: credential.to_owned(),
        attachment_link: None,
        issuer_email: None,
    }
}

fn extra_curricular(fixture: &Fixture, credential: &str) -> SubmitActivityInput {
    SubmitActivityInput {
        activity_type: ActivityType::ExtraCurricular,
        issuer_email: Some("registrar@issuer.example.org".to_owned()),
        title: "National Hackathon Finalist".to_owned(),
        ..submission(fixture, credential)
    }
}

#[tokio::test]
async fn curricular_submission_starts_pending_and_gets_approved() {
    let fixture = fixture().await;

    let activity_id = fixture
        .service
        .submit(submission(&fixture, "CERT-2024-001"))
        .await
        .unwrap_or_else(|_| panic!("test"));

    let listed = fixture
        .service
        .list_for_institute(fixture.institute_id, None)
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, ActivityStatus::Pending);
    // No issuer email, so no session and no mail.
    assert!(fixture.sessions.all().await.is_empty());
    assert!(fixture.email.sent.lock().await.is_empty());

    let decision =
        ValidationDecision::new(ActivityStatus::Approved, Some("well documented".to_owned()))
            .unwrap_or_else(|_| panic!("test"));
    let updated = fixture
        .service
        .validate(fixture.institute_id, activity_id, decision)
        .await
        .unwrap_or_else(|_| panic!("test"));

    assert_eq!(updated.status, ActivityStatus::Approved);
    assert_eq!(updated.remarks.as_deref(), Some("well documented"));
}

#[tokio::test]
async fn duplicate_credential_id_is_rejected() {
    let fixture = fixture().await;

    let first = fixture
        .service
        .submit(submission(&fixture, "CERT-2024-001"))
        .await;
    assert!(first.is_ok());

    let second = fixture
        .service
        .submit(SubmitActivityInput {
            title: "Another submission".to_owned(),
            ..submission(&fixture, "CERT-2024-001")
        })
        .await;
    assert!(matches!(second, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn extra_curricular_without_issuer_email_is_rejected() {
    let fixture = fixture().await;

    let result = fixture
        .service
        .submit(SubmitActivityInput {
            issuer_email: None,
            ..extra_curricular(&fixture, "EC-1")
        })
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn issuer_email_on_curricular_submission_is_rejected() {
    let fixture = fixture().await;

    let result = fixture
        .service
        .submit(SubmitActivityInput {
            issuer_email: Some("registrar@issuer.example.org".to_owned()),
            ..submission(&fixture, "CERT-2")
        })
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn extra_curricular_submission_spawns_a_five_day_session_and_mail() {
    let fixture = fixture().await;

    fixture
        .service
        .submit(extra_curricular(&fixture, "EC-2024-042"))
        .await
        .unwrap_or_else(|_| panic!("test"));

    let sessions = fixture.sessions.all().await;
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].issuer_email, "registrar@issuer.example.org");

    let lifetime = sessions[0].expires_at - chrono::Utc::now();
    assert!(lifetime > chrono::Duration::days(4));
    assert!(lifetime <= chrono::Duration::days(5));

    let sent = fixture.email.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "registrar@issuer.example.org");
    assert!(sent[0].2.contains("/issuer-verification?token="));
}

#[tokio::test]
async fn issuer_confirmation_marks_the_activity_verified_once() {
    let fixture = fixture().await;

    fixture
        .service
        .submit(extra_curricular(&fixture, "EC-2024-042"))
        .await
        .unwrap_or_else(|_| panic!("test"));

    let raw_token = token_from_mail(&fixture).await;

    let view = fixture
        .service
        .issuer_session(&raw_token)
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(view.student_name, "Asha Rao");
    assert_eq!(view.activity_title, "National Hackathon Finalist");

    // Wrong credential: refused, session survives.
    let mismatch = fixture.service.verify_issuer(&raw_token, "EC-WRONG").await;
    assert!(matches!(mismatch, Err(AppError::Validation(_))));
    assert_eq!(fixture.sessions.all().await.len(), 1);

    // Matching credential: verified, session consumed.
    fixture
        .service
        .verify_issuer(&raw_token, "EC-2024-042")
        .await
        .unwrap_or_else(|_| panic!("test"));

    let listed = fixture
        .service
        .list_for_student(fixture.student_id)
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert!(listed[0].issuer_verified);
    assert!(fixture.sessions.all().await.is_empty());

    // The consumed token cannot be replayed.
    let replay = fixture
        .service
        .verify_issuer(&raw_token, "EC-2024-042")
        .await;
    assert!(matches!(replay, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn expired_sessions_are_unreachable() {
    let fixture = fixture().await;

    fixture
        .service
        .submit(extra_curricular(&fixture, "EC-2024-042"))
        .await
        .unwrap_or_else(|_| panic!("test"));

    let raw_token = token_from_mail(&fixture).await;
    fixture.sessions.expire_all().await;

    let lookup = fixture.service.issuer_session(&raw_token).await;
    assert!(matches!(lookup, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn validation_from_another_institute_is_forbidden() {
    let fixture = fixture().await;

    let activity_id = fixture
        .service
        .submit(submission(&fixture, "CERT-2024-001"))
        .await
        .unwrap_or_else(|_| panic!("test"));

    let decision = ValidationDecision::new(ActivityStatus::Approved, None)
        .unwrap_or_else(|_| panic!("test"));
    let result = fixture
        .service
        .validate(InstituteId::new(), activity_id, decision)
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn a_decision_can_be_revised_later() {
    let fixture = fixture().await;

    let activity_id = fixture
        .service
        .submit(submission(&fixture, "CERT-2024-001"))
        .await
        .unwrap_or_else(|_| panic!("test"));

    let approve = ValidationDecision::new(ActivityStatus::Approved, None)
        .unwrap_or_else(|_| panic!("test"));
    fixture
        .service
        .validate(fixture.institute_id, activity_id, approve)
        .await
        .unwrap_or_else(|_| panic!("test"));

    let reject =
        ValidationDecision::new(ActivityStatus::Rejected, Some("wrong credential".to_owned()))
            .unwrap_or_else(|_| panic!("test"));
    let updated = fixture
        .service
        .validate(fixture.institute_id, activity_id, reject)
        .await
        .unwrap_or_else(|_| panic!("test"));

    assert_eq!(updated.status, ActivityStatus::Rejected);
    assert_eq!(updated.remarks.as_deref(), Some("wrong credential"));
}

#[tokio::test]
async fn overview_counts_statuses_and_types() {
    let fixture = fixture().await;

    fixture
        .service
        .submit(submission(&fixture, "CERT-1"))
        .await
        .unwrap_or_else(|_| panic!("test"));
    let second = fixture
        .service
        .submit(extra_curricular(&fixture, "EC-1"))
        .await
        .unwrap_or_else(|_| panic!("test"));

    let approve = ValidationDecision::new(ActivityStatus::Approved, None)
        .unwrap_or_else(|_| panic!("test"));
    fixture
        .service
        .validate(fixture.institute_id, second, approve)
        .await
        .unwrap_or_else(|_| panic!("test"));

    let counts = fixture
        .service
        .institute_overview(fixture.institute_id)
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(counts.total, 2);
    assert_eq!(counts.pending, 1);
    assert_eq!(counts.approved, 1);
    assert_eq!(counts.curricular, 1);
    assert_eq!(counts.extra_curricular, 1);

    let pending = fixture
        .service
        .pending_counts(fixture.institute_id)
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(pending.total, 1);
    assert_eq!(pending.curricular, 1);
    assert_eq!(pending.extra_curricular, 0);
}

/// Pulls the raw issuer token back out of the captured email body.
async fn token_from_mail(fixture: &Fixture) -> String {
    let sent = fixture.email.sent.lock().await;
    let body = &sent[sent.len() - 1].2;
    let marker = "?token=";
    let start = body.find(marker).map(|index| index + marker.len());
    let start = start.unwrap_or_else(|| panic!("no token in mail body"));
    body[start..]
        .chars()
        .take_while(|character| character.is_ascii_hexdigit())
        .collect()
}
