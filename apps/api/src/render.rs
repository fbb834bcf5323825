//! HTML rendering with Tera. Templates are compiled into the binary and
//! autoescaped (all names end in `.html`).

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tera::{Context, Tera};

use crate::models::mood::{MoodResponseRow, RecordId};
use crate::mood::form::{FormErrors, MoodFormInput, MoodSubmission, INTEREST_SUGGESTIONS};
use crate::mood::recommender::{Recommendation, RecommendationError};

pub const RECOMMENDATION_UNAVAILABLE_MESSAGE: &str =
    "We could not generate a recommendation right now. Please submit the questionnaire again.";

pub const SUBMISSION_FAILED_MESSAGE: &str =
    "Your answers could not be saved. Please try submitting again.";

pub const SUBMISSION_UNREADABLE_MESSAGE: &str =
    "We could not read that submission. Please fill in the questionnaire again.";

const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../templates/base.html")),
    (
        "mood_questionnaire.html",
        include_str!("../templates/mood_questionnaire.html"),
    ),
    (
        "mood_results.html",
        include_str!("../templates/mood_results.html"),
    ),
    (
        "admin_mood_responses.html",
        include_str!("../templates/admin_mood_responses.html"),
    ),
];

const SCALES: [(&str, &str); 2] = [
    ("adventurous", "How adventurous are you feeling?"),
    ("energy", "What is your energy level?"),
];

const FORM_FIELDS: [&str; 4] = ["destination", "adventurous", "energy", "what_do_you_enjoy"];

#[derive(Serialize)]
struct ScaleField {
    name: &'static str,
    label: &'static str,
    options: Vec<ScaleOption>,
    errors: Vec<String>,
}

#[derive(Serialize)]
struct ScaleOption {
    value: u8,
    checked: bool,
}

/// Compiled page templates plus the values every page shares.
#[derive(Clone)]
pub struct Templates {
    tera: Arc<Tera>,
    maps_browser_key: Option<String>,
}

impl Templates {
    pub fn new(maps_browser_key: Option<String>) -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self {
            tera: Arc::new(tera),
            maps_browser_key,
        })
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("maps_browser_key", &self.maps_browser_key);
        context
    }

    /// The questionnaire, optionally re-filled with a rejected submission and its errors.
    pub fn questionnaire(
        &self,
        input: &MoodFormInput,
        errors: &FormErrors,
    ) -> Result<String, tera::Error> {
        self.render_questionnaire(input, errors, None)
    }

    /// The questionnaire with a page-level failure notice above the fields.
    pub fn questionnaire_with_notice(
        &self,
        input: &MoodFormInput,
        notice: &str,
    ) -> Result<String, tera::Error> {
        self.render_questionnaire(input, &FormErrors::default(), Some(notice))
    }

    fn render_questionnaire(
        &self,
        input: &MoodFormInput,
        errors: &FormErrors,
        notice: Option<&str>,
    ) -> Result<String, tera::Error> {
        let values = input.echo();

        let field_errors: BTreeMap<&str, Vec<String>> = FORM_FIELDS
            .iter()
            .map(|field| (*field, errors.get(field).unwrap_or_default().to_vec()))
            .collect();

        let scales: Vec<ScaleField> = SCALES
            .iter()
            .map(|&(name, label)| {
                let current = values.get(name).map(|v| v.trim()).unwrap_or_default();
                ScaleField {
                    name,
                    label,
                    options: (1..=5)
                        .map(|value: u8| ScaleOption {
                            value,
                            checked: current == value.to_string(),
                        })
                        .collect(),
                    errors: field_errors[name].clone(),
                }
            })
            .collect();

        let mut context = self.base_context();
        context.insert("values", &values);
        context.insert("errors", &field_errors);
        context.insert("scales", &scales);
        context.insert("interest_suggestions", &INTEREST_SUGGESTIONS);
        context.insert("notice", &notice);
        self.tera.render("mood_questionnaire.html", &context)
    }

    /// The results page: the recommendation, or the generic failure message.
    pub fn results(
        &self,
        response_id: RecordId,
        submission: &MoodSubmission,
        outcome: &Result<Recommendation, RecommendationError>,
    ) -> Result<String, tera::Error> {
        let mut context = self.base_context();
        context.insert("response_id", &response_id);
        context.insert("submission", submission);
        match outcome {
            Ok(recommendation) => context.insert("recommendation", recommendation),
            Err(_) => {
                context.insert("recommendation", &Option::<Recommendation>::None);
                context.insert("error_message", RECOMMENDATION_UNAVAILABLE_MESSAGE);
            }
        }
        self.tera.render("mood_results.html", &context)
    }

    pub fn admin_listing(
        &self,
        rows: &[MoodResponseRow],
        search: Option<&str>,
    ) -> Result<String, tera::Error> {
        let mut context = self.base_context();
        context.insert("rows", rows);
        context.insert("search", search.unwrap_or_default());
        self.tera.render("admin_mood_responses.html", &context)
    }
}
