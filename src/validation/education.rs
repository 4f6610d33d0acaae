use serde::Deserialize;

use super::experience::check_period;
use super::present;
use crate::db::models::NewEducation;
use crate::error::FieldErrors;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EducationInput {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub fieldofstudy: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

pub fn validate_education(input: &EducationInput) -> Result<NewEducation, FieldErrors> {
    let mut errors = FieldErrors::new();

    let school = present(&input.school).unwrap_or_default();
    if school.is_empty() {
        errors.insert("school", "School field is required".into());
    }

    let degree = present(&input.degree).unwrap_or_default();
    if degree.is_empty() {
        errors.insert("degree", "Degree field is required".into());
    }

    let fieldofstudy = present(&input.fieldofstudy).unwrap_or_default();
    if fieldofstudy.is_empty() {
        errors.insert("fieldofstudy", "Field of study field is required".into());
    }

    let current = input.current.unwrap_or(false);
    let (from, to) = check_period(&mut errors, &input.from, &input.to, current);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewEducation {
        school,
        degree,
        fieldofstudy,
        from,
        to,
        current,
        description: present(&input.description),
    })
}
