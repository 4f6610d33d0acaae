use serde::Deserialize;

use super::{is_email, present};
use crate::error::FieldErrors;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub fn validate_login(input: &LoginInput) -> Result<Credentials, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = present(&input.email).unwrap_or_default().to_lowercase();
    if email.is_empty() {
        errors.insert("email", "Email field is required".into());
    } else if !is_email(&email) {
        errors.insert("email", "Email is invalid".into());
    }

    let password = input.password.clone().unwrap_or_default();
    if password.is_empty() {
        errors.insert("password", "Password field is required".into());
    }

    if errors.is_empty() {
        Ok(Credentials { email, password })
    } else {
        Err(errors)
    }
}
