//! Request-body validation.
//!
//! Each validator takes the raw, all-optional input a handler deserialized and
//! either produces the write-side shape the store expects, or a map of field
//! name to message that is returned to the client as a 400 body.

pub mod education;
pub mod experience;
pub mod login;
pub mod post;
pub mod profile;
pub mod register;

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

pub use education::{validate_education, EducationInput};
pub use experience::{validate_experience, ExperienceInput};
pub use login::{validate_login, Credentials, LoginInput};
pub use post::{validate_post, PostDraft, PostInput};
pub use profile::{validate_profile, ProfileInput};
pub use register::{validate_register, Registration, RegisterInput};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Trimmed value, or `None` when missing or blank.
pub fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Length check in characters, inclusive on both ends.
pub fn length_between(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Web URL check. A missing scheme is tolerated ("example.com").
pub fn is_url(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let candidate = if value.contains("://") {
        value.to_string()
    } else {
        format!("http://{}", value)
    };
    match url::Url::parse(&candidate) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https" | "ftp")
                && parsed.host_str().is_some_and(|host| host.contains('.'))
        }
        Err(_) => false,
    }
}

/// Calendar date in `YYYY-MM-DD` form, normalized.
pub fn parse_date(value: &str) -> Option<String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}
