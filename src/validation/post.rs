use serde::Deserialize;

use super::{length_between, present};
use crate::error::FieldErrors;

/// Body of a new post or comment.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostInput {
    pub text: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostDraft {
    pub text: String,
    /// Byline overrides; the author's own name/avatar apply when absent
    pub name: Option<String>,
    pub avatar: Option<String>,
}

pub fn validate_post(input: &PostInput) -> Result<PostDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let text = present(&input.text).unwrap_or_default();
    if text.is_empty() {
        errors.insert("text", "Text field is required".into());
    } else if !length_between(&text, 10, 300) {
        errors.insert("text", "Post must be between 10 and 300 characters".into());
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(PostDraft {
        text,
        name: present(&input.name),
        avatar: present(&input.avatar),
    })
}
