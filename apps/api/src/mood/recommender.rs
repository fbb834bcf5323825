//! Recommendation requester. Builds the prompt from a submission, calls the
//! completion backend once, and parses the reply into a `Recommendation`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::{strip_json_fences, Completion, LlmError};
use crate::mood::form::MoodSubmission;
use crate::mood::prompts::{recommendation_system, RECOMMENDATION_PROMPT_TEMPLATE};

/// Keys the model must return, all string-valued.
pub const REQUIRED_FIELDS: [&str; 5] = ["title", "description", "why_recommended", "duration", "type"];

/// A single activity suggestion. Lives for one request/response cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub why_recommended: String,
    pub duration: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("recommendation request failed: {0}")]
    Upstream(#[from] LlmError),

    #[error("reply is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("reply is not a JSON object")]
    NotAnObject,

    /// Keys that were absent or not strings.
    #[error("reply is missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

impl RecommendationError {
    pub fn code(&self) -> &'static str {
        match self {
            RecommendationError::Upstream(_) => "LLM_UNAVAILABLE",
            RecommendationError::InvalidJson(_) => "LLM_INVALID_JSON",
            RecommendationError::NotAnObject => "LLM_UNEXPECTED_SHAPE",
            RecommendationError::MissingFields(_) => "LLM_MISSING_FIELDS",
        }
    }
}

/// Builds the user prompt for a submission.
pub fn build_prompt(submission: &MoodSubmission) -> String {
    let (destination_line, where_clause) = match submission.destination.as_deref() {
        Some(destination) => (
            format!("- Destination: {destination}\n"),
            format!(" in {destination}"),
        ),
        None => (String::new(), String::new()),
    };

    let adventurous = submission.adventurous.to_string();
    let energy = submission.energy.to_string();

    fill_template(
        RECOMMENDATION_PROMPT_TEMPLATE,
        &[
            ("destination_line", &destination_line),
            ("adventurous", &adventurous),
            ("energy", &energy),
            ("interests", &submission.what_do_you_enjoy),
            ("where", &where_clause),
        ],
    )
}

/// Single-pass `{name}` substitution. Substituted text is never rescanned, so
/// user answers containing braces come through verbatim.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = values
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Parses a raw model reply.
///
/// Code fences are stripped; JSON wrapped in prose is recovered from its
/// outermost `{...}` or `[...]` span; an array reply yields its first element.
pub fn parse_recommendation(raw: &str) -> Result<Recommendation, RecommendationError> {
    let value = parse_reply_json(raw).map_err(RecommendationError::InvalidJson)?;

    let object = match value {
        Value::Object(map) => map,
        Value::Array(items) => match items.into_iter().next() {
            Some(Value::Object(map)) => map,
            _ => return Err(RecommendationError::NotAnObject),
        },
        _ => return Err(RecommendationError::NotAnObject),
    };

    let missing = missing_fields(&object);
    if !missing.is_empty() {
        return Err(RecommendationError::MissingFields(missing));
    }

    serde_json::from_value(Value::Object(object)).map_err(RecommendationError::InvalidJson)
}

fn parse_reply_json(raw: &str) -> Result<Value, serde_json::Error> {
    let text = strip_json_fences(raw);
    serde_json::from_str(text).or_else(|err| {
        embedded_json(text)
            .and_then(|span| serde_json::from_str(span).ok())
            .ok_or(err)
    })
}

/// The span from the first `{` or `[` to the last matching closer.
fn embedded_json(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c == '{' || c == '[')?;
    let close = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

fn missing_fields(object: &Map<String, Value>) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|key| !object.get(**key).is_some_and(Value::is_string))
        .map(|key| key.to_string())
        .collect()
}

/// Requests a recommendation for a stored submission. Never retries.
pub async fn request_recommendation(
    completion: &dyn Completion,
    submission: &MoodSubmission,
) -> Result<Recommendation, RecommendationError> {
    let prompt = build_prompt(submission);
    let reply = completion
        .complete(&prompt, &recommendation_system())
        .await?;
    debug!("LLM recommendation reply: {reply}");

    parse_recommendation(&reply).inspect_err(|e| warn!("Unusable recommendation reply: {e}"))
}

#[cfg(test)]
pub mod stub {
    //! Canned completion backends for tests.

    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    pub const RIDGE_TRAIL_REPLY: &str = r#"{"title":"Hike the Ridge Trail","description":"A scenic moderate hike","why_recommended":"Matches your high energy and adventurous mood","duration":"1-2 hours","type":"Adventure"}"#;

    /// Replies with a fixed string and records every prompt it receives.
    pub struct CannedCompletion {
        reply: Result<String, u16>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl CannedCompletion {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Fails every call with an upstream API status.
        pub fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Completion for CannedCompletion {
        async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "upstream unavailable".to_string(),
                }),
            }
        }
    }
}
