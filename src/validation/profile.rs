use serde::Deserialize;

use super::{is_url, length_between, present};
use crate::db::models::{ProfileFields, Social};
use crate::error::FieldErrors;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileInput {
    pub handle: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub githubusername: Option<String>,
    /// Comma-separated
    pub skills: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

/// Split "rust, go ,sql" into trimmed, non-empty entries.
pub fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn check_url(errors: &mut FieldErrors, field: &'static str, value: &Option<String>) -> Option<String> {
    let value = present(value)?;
    if !is_url(&value) {
        errors.insert(field, "Not a valid URL".into());
    }
    Some(value)
}

pub fn validate_profile(input: &ProfileInput) -> Result<ProfileFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    let handle = present(&input.handle).unwrap_or_default();
    if handle.is_empty() {
        errors.insert("handle", "Profile handle is required".into());
    } else if !length_between(&handle, 2, 40) {
        errors.insert("handle", "Handle needs to be between 2 and 40 characters".into());
    }

    let status = present(&input.status).unwrap_or_default();
    if status.is_empty() {
        errors.insert("status", "Status field is required".into());
    }

    let skills = present(&input.skills)
        .map(|raw| split_skills(&raw))
        .unwrap_or_default();
    if skills.is_empty() {
        errors.insert("skills", "Skills field is required".into());
    }

    let website = check_url(&mut errors, "website", &input.website);
    let social = Social {
        youtube: check_url(&mut errors, "youtube", &input.youtube),
        twitter: check_url(&mut errors, "twitter", &input.twitter),
        facebook: check_url(&mut errors, "facebook", &input.facebook),
        linkedin: check_url(&mut errors, "linkedin", &input.linkedin),
        instagram: check_url(&mut errors, "instagram", &input.instagram),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ProfileFields {
        handle,
        status,
        skills,
        company: present(&input.company),
        website,
        location: present(&input.location),
        bio: present(&input.bio),
        githubusername: present(&input.githubusername),
        social,
    })
}
