//! Questionnaire form. Reads the raw submission and cleans it into a `MoodSubmission`.
//!
//! Raw fields are accepted as text or numbers so the same cleaning path serves
//! the form-encoded page and the JSON API. Every failure is reported against
//! its field; nothing is persisted from here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const NOT_A_NUMBER_MESSAGE: &str = "Enter a whole number.";
pub const INVALID_VALUE_MESSAGE: &str = "Enter a valid value.";

/// Seed suggestions rendered under the interests field.
pub const INTEREST_SUGGESTIONS: &[&str] = &[
    "Hiking",
    "Water adventures",
    "Sight seeing",
    "Museums",
    "Try new foods",
    "Attend a concert/sporting event",
    "Visit a local market",
    "Shopping",
    "Photography/scenic spots",
    "Nightlife/bars",
    "Coffee shops/cafes",
    "Parks/nature",
    "Art galleries",
    "Historical sites",
    "Live music/theater",
    "Fitness/sports activities",
    "Wildlife/zoos/aquariums",
    "Beach activities",
];

/// A single raw field value. Form posts always yield `Text`; any other JSON
/// value (floats, booleans, arrays) lands in `Other` and fails cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl RawField {
    pub fn as_text(&self) -> String {
        match self {
            RawField::Number(n) => n.to_string(),
            RawField::Text(s) => s.clone(),
            RawField::Other(value) => value.to_string(),
        }
    }
}

/// The submission exactly as received, before any cleaning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoodFormInput {
    #[serde(default)]
    pub destination: Option<RawField>,
    #[serde(default)]
    pub adventurous: Option<RawField>,
    #[serde(default)]
    pub energy: Option<RawField>,
    #[serde(default)]
    pub what_do_you_enjoy: Option<RawField>,
}

/// A cleaned, validated questionnaire submission.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct MoodSubmission {
    #[validate(length(max = 200, message = "Ensure this value has at most 200 characters."))]
    pub destination: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Select a value between 1 and 5."))]
    pub adventurous: i32,
    #[validate(range(min = 1, max = 5, message = "Select a value between 1 and 5."))]
    pub energy: i32,
    #[validate(length(min = 1, message = "This field is required."))]
    pub what_do_you_enjoy: String,
}

/// Field name → error messages, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    /// Folds validator output in, skipping fields that already failed to parse.
    fn absorb(&mut self, errors: &ValidationErrors) {
        for (field, field_errors) in errors.field_errors() {
            let field = field.to_string();
            if self.has(&field) {
                continue;
            }
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                self.add(&field, message);
            }
        }
    }
}

impl MoodFormInput {
    /// Cleans and validates the raw input.
    pub fn clean(&self) -> Result<MoodSubmission, FormErrors> {
        let mut errors = FormErrors::default();

        let adventurous = parse_scale(&mut errors, "adventurous", self.adventurous.as_ref());
        let energy = parse_scale(&mut errors, "energy", self.energy.as_ref());

        let what_do_you_enjoy = parse_text(
            &mut errors,
            "what_do_you_enjoy",
            self.what_do_you_enjoy.as_ref(),
        )
        .unwrap_or_default();

        let destination = parse_text(&mut errors, "destination", self.destination.as_ref())
            .filter(|d| !d.is_empty());

        let submission = MoodSubmission {
            destination,
            adventurous: adventurous.unwrap_or_default(),
            energy: energy.unwrap_or_default(),
            what_do_you_enjoy,
        };

        if let Err(validation) = submission.validate() {
            errors.absorb(&validation);
        }

        if errors.is_empty() {
            Ok(submission)
        } else {
            Err(errors)
        }
    }

    /// Raw values as text, for echoing back into a re-rendered form.
    pub fn echo(&self) -> BTreeMap<&'static str, String> {
        let text = |f: &Option<RawField>| f.as_ref().map(RawField::as_text).unwrap_or_default();
        BTreeMap::from([
            ("destination", text(&self.destination)),
            ("adventurous", text(&self.adventurous)),
            ("energy", text(&self.energy)),
            ("what_do_you_enjoy", text(&self.what_do_you_enjoy)),
        ])
    }
}

fn parse_scale(errors: &mut FormErrors, field: &str, raw: Option<&RawField>) -> Option<i32> {
    let text = match raw {
        None => {
            errors.add(field, REQUIRED_MESSAGE);
            return None;
        }
        Some(RawField::Number(n)) => return Some(i32::try_from(*n).unwrap_or(i32::MAX)),
        Some(RawField::Text(s)) => s.trim(),
        Some(RawField::Other(_)) => {
            errors.add(field, NOT_A_NUMBER_MESSAGE);
            return None;
        }
    };

    if text.is_empty() {
        errors.add(field, REQUIRED_MESSAGE);
        return None;
    }

    match text.parse::<i32>() {
        Ok(n) => Some(n),
        Err(_) => {
            errors.add(field, NOT_A_NUMBER_MESSAGE);
            None
        }
    }
}

fn parse_text(errors: &mut FormErrors, field: &str, raw: Option<&RawField>) -> Option<String> {
    match raw {
        None => None,
        Some(RawField::Other(_)) => {
            errors.add(field, INVALID_VALUE_MESSAGE);
            None
        }
        Some(value) => Some(value.as_text().trim().to_string()),
    }
}
