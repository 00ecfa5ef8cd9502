//! Registration and engineer-edit form orchestrators

use validator::ValidateEmail;

use super::fields::{plain_field, text_field, trimmed};
use super::outcome::{FormResult, Validated, invalid_field_error, required_error};
use super::sanitize::FieldSanitizer;
use crate::db::models::UserUpdate;
use crate::db::repository::{RepoResult, UserRepository};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_USERNAME_LEN, MIN_PASSWORD_LEN,
    too_long_error,
};

const DUPLICATE_USERNAME: &str = "A user with that username already exists.";
const INVALID_EMAIL: &str = "Enter a valid email address.";
const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";

/// Raw registration submission
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RegisterPayload {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

/// Cleaned registration data. Name fields are escaped; the password is raw
/// and gets hashed by the handler.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Validate a registration submission. Only the name fields pass through the
/// sanitizer; credentials are never echoed back, so password outcomes carry
/// an empty value.
pub async fn validate_register(
    payload: &RegisterPayload,
    sanitizer: &FieldSanitizer<'_>,
    users: &UserRepository,
) -> RepoResult<Validated<ValidRegistration>> {
    let mut form = FormResult::new();

    let username = plain_field(&mut form, "username", &payload.username, MAX_USERNAME_LEN);
    if let Some(username) = &username
        && users.find_by_username(username).await?.is_some()
    {
        form.reject("username", username.clone(), DUPLICATE_USERNAME);
    }

    let first_name = text_field(
        &mut form,
        "first_name",
        &payload.first_name,
        MAX_NAME_LEN,
        sanitizer,
    );
    let last_name = text_field(
        &mut form,
        "last_name",
        &payload.last_name,
        MAX_NAME_LEN,
        sanitizer,
    );

    let email = plain_field(&mut form, "email", &payload.email, MAX_EMAIL_LEN);
    if let Some(email) = &email
        && !email.validate_email()
    {
        form.reject("email", email.clone(), INVALID_EMAIL);
    }

    let password = password_pair(&mut form, &payload.password, &payload.password_confirmation);

    if !form.accepted {
        return Ok(Validated::Rejected(form));
    }

    Ok(Validated::Accepted(ValidRegistration {
        username: username.unwrap_or_default(),
        first_name: first_name.unwrap_or_default(),
        last_name: last_name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        password: password.unwrap_or_default(),
    }))
}

fn password_pair(
    form: &mut FormResult,
    password: &Option<String>,
    confirmation: &Option<String>,
) -> Option<String> {
    let password = match password.as_deref().filter(|p| !p.is_empty()) {
        Some(p) => p.to_string(),
        None => {
            form.reject("password", "", required_error());
            return None;
        }
    };

    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        form.reject(
            "password",
            "",
            format!(
                "This password is too short. It must contain at least {} characters.",
                MIN_PASSWORD_LEN
            ),
        );
        return None;
    }
    if len > MAX_PASSWORD_LEN {
        form.reject("password", "", too_long_error("password", len, MAX_PASSWORD_LEN));
        return None;
    }

    match confirmation.as_deref().filter(|p| !p.is_empty()) {
        None => {
            form.reject("password_confirmation", "", required_error());
            None
        }
        Some(c) if c != password => {
            form.reject("password_confirmation", "", PASSWORD_MISMATCH);
            None
        }
        Some(_) => {
            form.accept("password", "");
            form.accept("password_confirmation", "");
            Some(password)
        }
    }
}

/// Raw admin edit submission for an engineer account
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UserEditPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
    pub is_on_call: Option<bool>,
}

/// Validate an admin edit. All fields are optional; omitted ones keep their
/// stored value. Name fields present in the submission still go through the
/// full sanitizer pipeline.
pub fn validate_user_edit(
    payload: &UserEditPayload,
    sanitizer: &FieldSanitizer<'_>,
) -> Validated<UserUpdate> {
    let mut form = FormResult::new();

    let first_name = optional_name(&mut form, "first_name", &payload.first_name, sanitizer);
    let last_name = optional_name(&mut form, "last_name", &payload.last_name, sanitizer);

    let email = trimmed(&payload.email);
    if let Some(email) = &email {
        if email.chars().count() > MAX_EMAIL_LEN {
            form.reject(
                "email",
                email.clone(),
                too_long_error("email", email.chars().count(), MAX_EMAIL_LEN),
            );
        } else if !email.validate_email() {
            form.reject("email", email.clone(), INVALID_EMAIL);
        } else {
            form.accept("email", email.clone());
        }
    }

    if !form.accepted {
        return Validated::Rejected(form);
    }

    Validated::Accepted(UserUpdate {
        first_name,
        last_name,
        email,
        is_admin: payload.is_admin,
        is_on_call: payload.is_on_call,
    })
}

fn optional_name(
    form: &mut FormResult,
    field: &str,
    raw: &Option<String>,
    sanitizer: &FieldSanitizer<'_>,
) -> Option<String> {
    let value = trimmed(raw)?;

    let len = value.chars().count();
    if len > MAX_NAME_LEN {
        form.reject(field, value, too_long_error(field, len, MAX_NAME_LEN));
        return None;
    }

    let out = sanitizer.sanitize_field(&value);
    if out.rejected {
        form.reject(field, out.value, invalid_field_error(field));
        return None;
    }

    form.accept(field, out.value.clone());
    Some(out.value)
}
