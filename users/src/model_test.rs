use super::*;
use serde_json::json;

fn sample_user_json() -> serde_json::Value {
    json!({
        "id": "u-1",
        "name": "Ada",
        "email": "ada@example.com",
        "about": "Analyst",
        "createdAt": "2024-03-01T10:15:00Z",
        "updatedAt": "2024-03-02T08:00:00.000Z"
    })
}

// =============================================================
// User
// =============================================================

#[test]
fn user_deserializes_camel_case_fields() {
    let user: User = serde_json::from_value(sample_user_json()).unwrap();
    assert_eq!(user.id, "u-1");
    assert_eq!(user.name.as_deref(), Some("Ada"));
    assert_eq!(user.about.as_deref(), Some("Analyst"));
    assert!(user.updated_at > user.created_at);
    assert!(user.check().is_ok());
}

#[test]
fn user_optional_fields_may_be_missing() {
    let user: User = serde_json::from_value(json!({
        "id": "u-2",
        "email": "b@example.com",
        "createdAt": "2024-03-01T10:15:00Z",
        "updatedAt": "2024-03-01T10:15:00Z"
    }))
    .unwrap();
    assert_eq!(user.name, None);
    assert_eq!(user.about, None);
    assert!(user.check().is_ok());
}

#[test]
fn user_without_email_fails_to_decode() {
    let result = serde_json::from_value::<User>(json!({
        "id": "u-3",
        "createdAt": "2024-03-01T10:15:00Z",
        "updatedAt": "2024-03-01T10:15:00Z"
    }));
    assert!(result.is_err());
}

#[test]
fn user_with_garbage_timestamp_fails_to_decode() {
    let mut value = sample_user_json();
    value["createdAt"] = json!("yesterday");
    assert!(serde_json::from_value::<User>(value).is_err());
}

#[test]
fn user_check_rejects_updated_before_created() {
    let mut value = sample_user_json();
    value["updatedAt"] = json!("2024-02-01T00:00:00Z");
    let user: User = serde_json::from_value(value).unwrap();
    assert!(matches!(user.check(), Err(ApiError::Decode(_))));
}

#[test]
fn user_check_rejects_blank_id() {
    let mut value = sample_user_json();
    value["id"] = json!("  ");
    let user: User = serde_json::from_value(value).unwrap();
    assert!(matches!(user.check(), Err(ApiError::Decode(_))));
}

// =============================================================
// Write payloads
// =============================================================

#[test]
fn create_input_omits_absent_optionals() {
    let input = CreateUserInput {
        name: None,
        email: "c@example.com".to_owned(),
        about: None,
        password: "secret1".to_owned(),
    };
    assert_eq!(
        serde_json::to_value(&input).unwrap(),
        json!({ "email": "c@example.com", "password": "secret1" })
    );
}

#[test]
fn update_input_serializes_only_defined_keys() {
    let input = UpdateUserInput {
        about: Some("new bio".to_owned()),
        ..UpdateUserInput::default()
    };
    let value = serde_json::to_value(&input).unwrap();
    assert_eq!(value, json!({ "about": "new bio" }));
    let object = value.as_object().unwrap();
    assert!(!object.contains_key("name"));
    assert!(!object.contains_key("email"));
    assert!(!object.contains_key("password"));
}

#[test]
fn update_input_keeps_empty_string_to_clear_field() {
    let input = UpdateUserInput {
        name: Some(String::new()),
        ..UpdateUserInput::default()
    };
    assert_eq!(serde_json::to_value(&input).unwrap(), json!({ "name": "" }));
}

#[test]
fn update_input_every_subset_serializes_exact_keys() {
    let keys = ["name", "email", "about", "password"];
    for mask in 0_u8..16 {
        let pick = |bit: u8| (mask & (1 << bit) != 0).then(|| format!("v{bit}"));
        let input = UpdateUserInput {
            name: pick(0),
            email: pick(1),
            about: pick(2),
            password: pick(3),
        };
        let value = serde_json::to_value(&input).unwrap();
        let object = value.as_object().unwrap();
        for (bit, key) in keys.iter().enumerate() {
            assert_eq!(object.contains_key(*key), mask & (1 << bit) != 0, "mask {mask:#06b} key {key}");
        }
        assert!(object.values().all(|v| !v.is_null()));
        assert_eq!(input.is_empty(), mask == 0);
    }
}

#[test]
fn list_envelope_unwraps_data() {
    let envelope: ListEnvelope<User> =
        serde_json::from_value(json!({ "data": [sample_user_json()] })).unwrap();
    assert_eq!(envelope.data.len(), 1);
    assert_eq!(envelope.data[0].email, "ada@example.com");
}
