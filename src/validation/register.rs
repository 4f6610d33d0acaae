use serde::Deserialize;

use super::{is_email, length_between, present};
use crate::error::FieldErrors;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password2: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    /// Lower-cased
    pub email: String,
    pub password: String,
}

pub fn validate_register(input: &RegisterInput) -> Result<Registration, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = present(&input.name).unwrap_or_default();
    if name.is_empty() {
        errors.insert("name", "Name field is required".into());
    } else if !length_between(&name, 2, 30) {
        errors.insert("name", "Name must be between 2 and 30 characters".into());
    }

    let email = present(&input.email).unwrap_or_default().to_lowercase();
    if email.is_empty() {
        errors.insert("email", "Email field is required".into());
    } else if !is_email(&email) {
        errors.insert("email", "Email is invalid".into());
    }

    // Passwords are taken verbatim, surrounding whitespace included
    let password = input.password.clone().unwrap_or_default();
    if password.is_empty() {
        errors.insert("password", "Password field is required".into());
    } else if !length_between(&password, 6, 30) {
        errors.insert("password", "Password must be at least 6 characters".into());
    }

    let password2 = input.password2.clone().unwrap_or_default();
    if password2.is_empty() {
        errors.insert("password2", "Confirm Password field is required".into());
    } else if password2 != password {
        errors.insert("password2", "Passwords must match".into());
    }

    if errors.is_empty() {
        Ok(Registration {
            name,
            email,
            password,
        })
    } else {
        Err(errors)
    }
}
