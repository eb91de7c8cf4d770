use super::*;
use serde_json::json;

#[test]
fn payload_with_field_map_collects_messages() {
    let errors = FieldErrors::from_payload(
        422,
        &json!({ "errors": { "email": ["already taken"], "password": "too short" } }),
    );
    assert_eq!(errors.first("email"), Some("already taken"));
    assert_eq!(errors.first("password"), Some("too short"));
    assert_eq!(errors.message, None);
}

#[test]
fn payload_with_error_list_reads_field_aliases() {
    let errors = FieldErrors::from_payload(
        400,
        &json!({ "errors": [
            { "field": "email", "message": "invalid" },
            { "path": "password", "message": "min 6" },
            { "property": "name", "message": "too long" },
            { "message": "general failure" }
        ] }),
    );
    assert_eq!(errors.first("email"), Some("invalid"));
    assert_eq!(errors.first("password"), Some("min 6"));
    assert_eq!(errors.first("name"), Some("too long"));
    assert_eq!(errors.message.as_deref(), Some("general failure"));
}

#[test]
fn payload_with_message_array_is_joined() {
    let errors = FieldErrors::from_payload(400, &json!({ "message": ["email must be an email", "password too short"] }));
    assert!(errors.fields.is_empty());
    assert_eq!(errors.message.as_deref(), Some("email must be an email; password too short"));
}

#[test]
fn unrecognised_payload_falls_back_to_status_message() {
    let errors = FieldErrors::from_payload(409, &json!(null));
    assert_eq!(errors.message.as_deref(), Some("request rejected with status 409"));
}

#[test]
fn field_errors_display_lists_fields() {
    let mut errors = FieldErrors::default();
    errors.push("email", "taken");
    errors.push("email", "invalid");
    assert_eq!(errors.to_string(), "email: taken, invalid");
}

#[test]
fn api_error_helpers() {
    let not_found = ApiError::NotFound { path: "/users/x".to_owned() };
    assert!(not_found.is_not_found());
    assert!(not_found.field_errors().is_none());

    let mut fields = FieldErrors::default();
    fields.push("email", "taken");
    let validation = ApiError::Validation { status: 422, errors: fields };
    assert!(!validation.is_not_found());
    assert_eq!(validation.field_errors().and_then(|e| e.first("email")), Some("taken"));
    assert_eq!(validation.user_message(), "Please correct the highlighted fields.");
}

#[test]
fn api_error_display_includes_status() {
    let err = ApiError::Server { status: 503, message: "unavailable".to_owned() };
    assert_eq!(err.to_string(), "server error 503: unavailable");
}
