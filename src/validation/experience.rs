use serde::Deserialize;

use super::{parse_date, present};
use crate::db::models::NewExperience;
use crate::error::FieldErrors;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExperienceInput {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

/// Shared `from`/`to`/`current` rules for experience and education entries.
/// An ongoing entry has no end date.
pub(super) fn check_period(
    errors: &mut FieldErrors,
    from: &Option<String>,
    to: &Option<String>,
    current: bool,
) -> (String, Option<String>) {
    let from = match present(from) {
        None => {
            errors.insert("from", "From date field is required".into());
            String::new()
        }
        Some(raw) => parse_date(&raw).unwrap_or_else(|| {
            errors.insert("from", "From date must be a valid YYYY-MM-DD date".into());
            String::new()
        }),
    };

    let to = match present(to) {
        Some(_) if current => None,
        Some(raw) => match parse_date(&raw) {
            Some(date) => Some(date),
            None => {
                errors.insert("to", "To date must be a valid YYYY-MM-DD date".into());
                None
            }
        },
        None => None,
    };

    if let Some(end) = &to {
        // ISO dates order lexically
        if !from.is_empty() && end.as_str() < from.as_str() {
            errors.insert("to", "To date cannot be before the from date".into());
        }
    }

    (from, to)
}

pub fn validate_experience(input: &ExperienceInput) -> Result<NewExperience, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = present(&input.title).unwrap_or_default();
    if title.is_empty() {
        errors.insert("title", "Job title field is required".into());
    }

    let company = present(&input.company).unwrap_or_default();
    if company.is_empty() {
        errors.insert("company", "Company field is required".into());
    }

    let current = input.current.unwrap_or(false);
    let (from, to) = check_period(&mut errors, &input.from, &input.to, current);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewExperience {
        title,
        company,
        location: present(&input.location),
        from,
        to,
        current,
        description: present(&input.description),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ExperienceInput {
        ExperienceInput {
            title: Some("Engineer".into()),
            company: Some("Acme".into()),
            from: Some("2019-03-01".into()),
            to: Some("2021-06-30".into()),
            ..Default::default()
        }
    }

    #[test]
    fn valid_experience() {
        let exp = validate_experience(&input()).unwrap();
        assert_eq!(exp.from, "2019-03-01");
        assert_eq!(exp.to.as_deref(), Some("2021-06-30"));
        assert!(!exp.current);
    }

    #[test]
    fn current_job_drops_end_date() {
        let mut input = input();
        input.current = Some(true);
        let exp = validate_experience(&input).unwrap();
        assert!(exp.current);
        assert!(exp.to.is_none());
    }

    #[test]
    fn required_fields() {
        let errors = validate_experience(&ExperienceInput::default()).unwrap_err();
        assert_eq!(errors["title"], "Job title field is required");
        assert_eq!(errors["company"], "Company field is required");
        assert_eq!(errors["from"], "From date field is required");
    }

    #[test]
    fn malformed_and_inverted_dates() {
        let mut bad = input();
        bad.from = Some("March 2019".into());
        assert!(validate_experience(&bad).unwrap_err().contains_key("from"));

        let mut inverted = input();
        inverted.to = Some("2018-01-01".into());
        assert!(validate_experience(&inverted).unwrap_err().contains_key("to"));
    }
}
