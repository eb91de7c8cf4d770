use std::cell::RefCell;

use serde_json::json;
use time::macros::datetime;
use users::http::testing::ScriptedTransport;
use users::{HttpResponse, MIN_PASSWORD_LEN, Method, MutationStatus};

use super::*;

fn filled_create() -> CreateUserForm {
    CreateUserForm {
        email: "ada@example.com".to_owned(),
        password: "secret1".to_owned(),
        ..CreateUserForm::default()
    }
}

fn user(name: Option<&str>, about: Option<&str>) -> User {
    User {
        id: "u1".to_owned(),
        name: name.map(str::to_owned),
        email: "ada@example.com".to_owned(),
        about: about.map(str::to_owned),
        created_at: datetime!(2024-01-01 0:00 UTC),
        updated_at: datetime!(2024-01-01 0:00 UTC),
    }
}

fn user_json() -> serde_json::Value {
    json!({
        "id": "u1",
        "email": "ada@example.com",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}

// =============================================================
// Create form
// =============================================================

#[test]
fn create_form_omits_empty_optional_fields() {
    let input = filled_create().validate().unwrap();
    assert_eq!(input.name, None);
    assert_eq!(input.about, None);
    assert_eq!(input.email, "ada@example.com");
}

#[test]
fn create_form_rejects_bad_email_and_short_password() {
    let form = CreateUserForm {
        email: "not-an-email".to_owned(),
        password: "abc".to_owned(),
        ..CreateUserForm::default()
    };
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.first("email"), Some(INVALID_EMAIL));
    assert_eq!(errors.first("password"), Some(PASSWORD_TOO_SHORT));
}

#[test]
fn password_rule_matches_api_minimum() {
    let mut form = filled_create();
    form.password = "x".repeat(MIN_PASSWORD_LEN);
    assert!(form.validate().is_ok());
    form.password = "x".repeat(MIN_PASSWORD_LEN - 1);
    assert!(form.validate().is_err());
}

#[test]
fn server_field_errors_replace_form_errors() {
    let mut form = filled_create();
    let mut fields = FieldErrors::default();
    fields.push("email", "already taken");
    form.show_error(&ApiError::Validation {
        status: 409,
        errors: fields,
    });
    assert_eq!(form.error_for("email").as_deref(), Some("already taken"));

    form.show_error(&ApiError::Transport("offline".to_owned()));
    assert_eq!(form.error_for("email"), None);
    assert!(form.errors.message.is_some());
}

// =============================================================
// Edit form
// =============================================================

#[test]
fn edit_form_sends_email_and_typed_fields() {
    let mut form = EditUserForm::from_user(&user(Some("Ada"), Some("Math")));
    form.about.clear();
    let input = form.validate().unwrap();
    assert_eq!(input.name.as_deref(), Some("Ada"));
    assert_eq!(input.about.as_deref(), Some(""));
    assert_eq!(input.email.as_deref(), Some("ada@example.com"));
    assert_eq!(input.password, None);
}

#[test]
fn edit_form_skips_fields_that_stay_absent() {
    let form = EditUserForm::from_user(&user(None, None));
    let input = form.validate().unwrap();
    assert_eq!(input.name, None);
    assert_eq!(input.about, None);
    assert_eq!(serde_json::to_value(&input).unwrap(), json!({ "email": "ada@example.com" }));
}

#[test]
fn edit_form_validates_password_only_when_given() {
    let mut form = EditUserForm::from_user(&user(None, None));
    form.password = "abc".to_owned();
    assert_eq!(form.validate().unwrap_err().first("password"), Some(PASSWORD_TOO_SHORT));
    form.password = "longenough".to_owned();
    assert_eq!(form.validate().unwrap().password.as_deref(), Some("longenough"));
}

// =============================================================
// Guarded submission
// =============================================================

#[tokio::test]
async fn double_create_submission_sends_one_request() {
    let queries = UserQueries::new(ScriptedTransport::new().with_delay(2));
    queries
        .api()
        .transport()
        .always(Method::Post, "/users", Ok(HttpResponse::json(201, &user_json())));
    let form = filled_create();

    let (first, second) = tokio::join!(submit_create(&queries, &form), submit_create(&queries, &form));

    assert!(matches!(first, SubmitOutcome::Done(_)));
    assert_eq!(second, SubmitOutcome::Busy);
    assert_eq!(queries.api().transport().count(Method::Post, "/users"), 1);
}

#[tokio::test]
async fn invalid_form_sends_nothing() {
    let queries = UserQueries::new(ScriptedTransport::new());
    let form = CreateUserForm::default();
    assert!(matches!(submit_create(&queries, &form).await, SubmitOutcome::Invalid(_)));
    assert!(queries.api().transport().requests().is_empty());
}

#[tokio::test]
async fn failed_edit_reports_error_and_marks_mutation() {
    let queries = UserQueries::new(ScriptedTransport::new());
    queries
        .api()
        .transport()
        .reply(Method::Put, "/users/u1", Ok(HttpResponse::empty(503)));
    let form = EditUserForm::from_user(&user(Some("Ada"), None));

    let outcome = submit_edit(&queries, "u1", &form).await;

    assert!(matches!(outcome, SubmitOutcome::Failed(ApiError::Server { status: 503, .. })));
    assert_eq!(queries.update_mutation().status(), MutationStatus::Error);
}

#[tokio::test]
async fn deleting_missing_user_is_done() {
    let queries = UserQueries::new(ScriptedTransport::new());
    queries
        .api()
        .transport()
        .reply(Method::Delete, "/users/u1", Ok(HttpResponse::empty(404)));
    assert_eq!(
        submit_delete(&queries, "u1").await,
        SubmitOutcome::Done(RemoveOutcome::AlreadyGone)
    );
}

#[tokio::test]
async fn create_status_is_reported_while_pending_and_after_success() {
    let queries = UserQueries::new(ScriptedTransport::new().with_delay(1));
    queries
        .api()
        .transport()
        .always(Method::Post, "/users", Ok(HttpResponse::json(201, &user_json())));
    let seen = RefCell::new(Vec::new());

    let outcome = with_status(
        queries.create_mutation(),
        submit_create(&queries, &filled_create()),
        |status| seen.borrow_mut().push(status),
    )
    .await;

    assert!(matches!(outcome, SubmitOutcome::Done(_)));
    assert_eq!(seen.into_inner(), vec![MutationStatus::Pending, MutationStatus::Idle]);
}

#[tokio::test]
async fn failed_update_status_holds_error_until_reset() {
    let queries = UserQueries::new(ScriptedTransport::new().with_delay(1));
    queries
        .api()
        .transport()
        .reply(Method::Put, "/users/u1", Ok(HttpResponse::empty(500)));
    let form = EditUserForm::from_user(&user(Some("Ada"), None));
    let seen = RefCell::new(Vec::new());

    let outcome = with_status(
        queries.update_mutation(),
        submit_edit(&queries, "u1", &form),
        |status| seen.borrow_mut().push(status),
    )
    .await;

    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert_eq!(seen.into_inner(), vec![MutationStatus::Pending, MutationStatus::Error]);
    queries.update_mutation().reset();
    assert_eq!(queries.update_mutation().status(), MutationStatus::Idle);
}

#[tokio::test]
async fn invalid_form_reports_idle_without_sending() {
    let queries = UserQueries::new(ScriptedTransport::new());
    let seen = RefCell::new(Vec::new());

    let outcome = with_status(
        queries.create_mutation(),
        submit_create(&queries, &CreateUserForm::default()),
        |status| seen.borrow_mut().push(status),
    )
    .await;

    assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
    assert_eq!(seen.into_inner(), vec![MutationStatus::Idle, MutationStatus::Idle]);
}
