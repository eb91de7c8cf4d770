//! End-to-end CRUD flow against an in-memory users backend.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{Value, json};
use users::{
    ApiError, CacheEvent, CreateUserInput, HttpRequest, HttpResponse, KeyFilter, MIN_PASSWORD_LEN, Method,
    RemoveOutcome, Transport, UpdateUserInput, UserQueries,
};

const NOW: &str = "2024-03-01T12:00:00Z";
const LATER: &str = "2024-03-02T08:30:00Z";

/// Minimal stand-in for the users REST service.
#[derive(Default)]
struct MemoryBackend {
    state: Mutex<BackendState>,
}

#[derive(Default)]
struct BackendState {
    users: BTreeMap<String, Value>,
    next_id: u32,
    requests: Vec<(Method, String)>,
}

impl MemoryBackend {
    fn requests(&self, method: Method) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.requests.iter().filter(|(m, _)| *m == method).count()
    }
}

fn validation(field: &str, message: &str) -> HttpResponse {
    HttpResponse::json(422, &json!({ "errors": { field: [message] } }))
}

fn email_taken(users: &BTreeMap<String, Value>, email: &str, except: Option<&str>) -> bool {
    users
        .iter()
        .any(|(id, user)| Some(id.as_str()) != except && user["email"] == email)
}

#[async_trait(?Send)]
impl Transport for MemoryBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.requests.push((request.method, request.path.clone()));
        let body = request.body.unwrap_or(Value::Null);
        let id = request.path.strip_prefix("/users/").map(str::to_owned);

        let response = match (request.method, id) {
            (Method::Get, None) => {
                let data: Vec<_> = state.users.values().cloned().collect();
                HttpResponse::json(200, &json!({ "data": data }))
            }
            (Method::Get, Some(id)) => match state.users.get(&id) {
                Some(user) => HttpResponse::json(200, user),
                None => HttpResponse::json(404, &json!({ "message": "User not found" })),
            },
            (Method::Post, None) => {
                let email = body["email"].as_str().unwrap_or_default().to_owned();
                let password = body["password"].as_str().unwrap_or_default();
                if password.chars().count() < MIN_PASSWORD_LEN {
                    validation("password", "too short")
                } else if email_taken(&state.users, &email, None) {
                    validation("email", "already taken")
                } else {
                    state.next_id += 1;
                    let id = format!("u{}", state.next_id);
                    let mut user = json!({
                        "id": id,
                        "email": email,
                        "createdAt": NOW,
                        "updatedAt": NOW,
                    });
                    for field in ["name", "about"] {
                        if let Some(value) = body.get(field) {
                            user[field] = value.clone();
                        }
                    }
                    state.users.insert(id, user.clone());
                    HttpResponse::json(201, &user)
                }
            }
            (Method::Put, Some(id)) => {
                let taken = body["email"]
                    .as_str()
                    .is_some_and(|email| email_taken(&state.users, email, Some(&id)));
                match state.users.get_mut(&id) {
                    None => HttpResponse::empty(404),
                    Some(_) if taken => validation("email", "already taken"),
                    Some(user) => {
                        for field in ["name", "email", "about"] {
                            if let Some(value) = body.get(field) {
                                user[field] = value.clone();
                            }
                        }
                        user["updatedAt"] = json!(LATER);
                        HttpResponse::json(200, user)
                    }
                }
            }
            (Method::Delete, Some(id)) => match state.users.remove(&id) {
                Some(_) => HttpResponse::empty(204),
                None => HttpResponse::empty(404),
            },
            _ => HttpResponse::new(405, "method not allowed"),
        };
        Ok(response)
    }
}

fn new_user(email: &str) -> CreateUserInput {
    CreateUserInput {
        name: Some("Ada".to_owned()),
        email: email.to_owned(),
        password: "hunter22".to_owned(),
        about: None,
    }
}

#[tokio::test]
async fn create_edit_delete_round_trip() {
    let queries = UserQueries::new(MemoryBackend::default());
    let mut events = queries.subscribe();

    assert!(queries.list().await.unwrap().is_empty());

    let created = queries.create(&new_user("ada@example.com")).await.unwrap();
    assert_eq!(created.name.as_deref(), Some("Ada"));
    assert_eq!(created.about, None);
    assert_eq!(
        events.try_recv().unwrap(),
        CacheEvent::Invalidated(KeyFilter::lists("users"))
    );

    let listed = queries.list().await.unwrap();
    assert_eq!(listed, vec![created.clone()]);

    let edit = UpdateUserInput {
        about: Some("Analyst".to_owned()),
        ..UpdateUserInput::default()
    };
    let updated = queries.update(&created.id, &edit).await.unwrap();
    assert_eq!(updated.about.as_deref(), Some("Analyst"));
    assert!(updated.updated_at > updated.created_at);
    assert_eq!(queries.get(&created.id).await.unwrap(), updated);

    assert_eq!(queries.remove(&created.id).await, Ok(RemoveOutcome::Deleted));
    assert_eq!(queries.remove(&created.id).await, Ok(RemoveOutcome::AlreadyGone));
    assert!(queries.list().await.unwrap().is_empty());
    assert_eq!(queries.api().transport().requests(Method::Get), 4);
}

#[tokio::test]
async fn server_side_validation_surfaces_field_errors() {
    let queries = UserQueries::new(MemoryBackend::default());
    queries.create(&new_user("dup@example.com")).await.unwrap();

    let duplicate = queries.create(&new_user("dup@example.com")).await.unwrap_err();
    let fields = duplicate.field_errors().unwrap();
    assert_eq!(fields.first("email"), Some("already taken"));

    let mut weak = new_user("weak@example.com");
    weak.password = "abc".to_owned();
    let short = queries.create(&weak).await.unwrap_err();
    assert!(matches!(short, ApiError::Validation { status: 422, .. }));
    assert_eq!(queries.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_user_reads_as_not_found() {
    let queries = UserQueries::new(MemoryBackend::default());
    let error = queries.get("nobody").await.unwrap_err();
    assert!(error.is_not_found());
    assert!(queries.api().remove("nobody").await.unwrap_err().is_not_found());
}
