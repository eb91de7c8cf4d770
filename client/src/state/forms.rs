//! Create/edit form state, local validation and guarded submission.
//!
//! DESIGN
//! ======
//! Forms hold raw input strings. `validate` checks them with `validator` rules
//! and produces the wire payload, so nothing reaches the API that the form
//! itself would reject. Server-side field errors land in the same
//! `FieldErrors` map as local ones and render through the same inline labels.
//!
//! ERROR HANDLING
//! ==============
//! Submissions never panic or bubble errors out of the view: every path ends in
//! a `SubmitOutcome`, and API failures are logged before they are returned.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use std::future::Future;

use users::mutation::MutationState;
use users::{
    ApiError, CreateUserInput, FieldErrors, MutationStatus, RemoveOutcome, Transport, UpdateUserInput, User, UserQueries,
};
use validator::{Validate, ValidationErrors};

pub const INVALID_EMAIL: &str = "Invalid email";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";

#[derive(Debug, Validate)]
struct CreateRules {
    #[validate(email(message = "Invalid email"))]
    email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    password: String,
}

#[derive(Debug, Validate)]
struct EditRules {
    #[validate(email(message = "Invalid email"))]
    email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    password: Option<String>,
}

fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::default();
    for (field, list) in errors.field_errors() {
        for error in list {
            let message = error
                .message
                .as_ref()
                .map_or_else(|| error.code.to_string(), ToString::to_string);
            out.push(field.to_string(), message);
        }
    }
    out
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() { None } else { Some(value.to_owned()) }
}

fn error_display(error: &ApiError) -> FieldErrors {
    match error.field_errors() {
        Some(fields) if !fields.is_empty() => fields.clone(),
        _ => FieldErrors {
            message: Some(error.user_message()),
            ..FieldErrors::default()
        },
    }
}

/// Inputs of the "New user" dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateUserForm {
    pub name: String,
    pub email: String,
    pub about: String,
    pub password: String,
    pub errors: FieldErrors,
}

impl CreateUserForm {
    /// Check the inputs and build the request body. Empty `name`/`about` are
    /// omitted.
    ///
    /// # Errors
    ///
    /// Field messages for an invalid email or a short password.
    pub fn validate(&self) -> Result<CreateUserInput, FieldErrors> {
        let rules = CreateRules {
            email: self.email.clone(),
            password: self.password.clone(),
        };
        rules.validate().map_err(|errors| field_errors(&errors))?;
        Ok(CreateUserInput {
            name: non_empty(&self.name),
            email: self.email.clone(),
            about: non_empty(&self.about),
            password: self.password.clone(),
        })
    }

    pub fn show_error(&mut self, error: &ApiError) {
        self.errors = error_display(error);
    }

    pub fn error_for(&self, field: &str) -> Option<String> {
        self.errors.first(field).map(str::to_owned)
    }
}

/// Inputs of the "Edit user" dialog, seeded from the record being edited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditUserForm {
    pub name: String,
    pub email: String,
    pub about: String,
    /// Blank means "keep the current password".
    pub password: String,
    pub errors: FieldErrors,
    had_name: bool,
    had_about: bool,
}

impl EditUserForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone().unwrap_or_default(),
            email: user.email.clone(),
            about: user.about.clone().unwrap_or_default(),
            password: String::new(),
            errors: FieldErrors::default(),
            had_name: user.name.is_some(),
            had_about: user.about.is_some(),
        }
    }

    /// Check the inputs and build the partial update.
    ///
    /// `name` and `about` are sent as typed, so clearing one sends `""`; a
    /// field the record never had and that is still blank is left out.
    /// `email` is always sent, `password` only when filled in.
    ///
    /// # Errors
    ///
    /// Field messages for an invalid email or a short password.
    pub fn validate(&self) -> Result<UpdateUserInput, FieldErrors> {
        let password = non_empty(&self.password);
        let rules = EditRules {
            email: self.email.clone(),
            password: password.clone(),
        };
        rules.validate().map_err(|errors| field_errors(&errors))?;
        Ok(UpdateUserInput {
            name: (self.had_name || !self.name.is_empty()).then(|| self.name.clone()),
            email: Some(self.email.clone()),
            about: (self.had_about || !self.about.is_empty()).then(|| self.about.clone()),
            password,
        })
    }

    pub fn show_error(&mut self, error: &ApiError) {
        self.errors = error_display(error);
    }

    pub fn error_for(&self, field: &str) -> Option<String> {
        self.errors.first(field).map(str::to_owned)
    }
}

/// How a guarded submission ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome<T> {
    /// The same mutation is still pending; nothing was sent.
    Busy,
    /// Local validation failed; nothing was sent.
    Invalid(FieldErrors),
    Failed(ApiError),
    Done(T),
}

/// Validate and create, refusing while a create is pending.
pub async fn submit_create<T: Transport>(queries: &UserQueries<T>, form: &CreateUserForm) -> SubmitOutcome<User> {
    if queries.create_mutation().is_pending() {
        return SubmitOutcome::Busy;
    }
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return SubmitOutcome::Invalid(errors),
    };
    match queries.create(&input).await {
        Ok(user) => SubmitOutcome::Done(user),
        Err(error) => {
            tracing::warn!(%error, "create user failed");
            SubmitOutcome::Failed(error)
        }
    }
}

/// Validate and update `id`, refusing while an update is pending.
pub async fn submit_edit<T: Transport>(queries: &UserQueries<T>, id: &str, form: &EditUserForm) -> SubmitOutcome<User> {
    if queries.update_mutation().is_pending() {
        return SubmitOutcome::Busy;
    }
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return SubmitOutcome::Invalid(errors),
    };
    match queries.update(id, &input).await {
        Ok(user) => SubmitOutcome::Done(user),
        Err(error) => {
            tracing::warn!(%id, %error, "update user failed");
            SubmitOutcome::Failed(error)
        }
    }
}

/// Delete `id` after the user confirmed, refusing while a delete is pending.
pub async fn submit_delete<T: Transport>(queries: &UserQueries<T>, id: &str) -> SubmitOutcome<RemoveOutcome> {
    if queries.remove_mutation().is_pending() {
        return SubmitOutcome::Busy;
    }
    match queries.remove(id).await {
        Ok(outcome) => SubmitOutcome::Done(outcome),
        Err(error) => {
            tracing::warn!(%id, %error, "delete user failed");
            SubmitOutcome::Failed(error)
        }
    }
}

/// Drive `submission` and report `mutation`'s status twice: right after the
/// first poll, once the call has begun, and again when it has finished.
pub async fn with_status<F: Future>(
    mutation: &MutationState,
    submission: F,
    report: impl Fn(MutationStatus),
) -> F::Output {
    let (outcome, ()) = futures::join!(submission, async { report(mutation.status()) });
    report(mutation.status());
    outcome
}
