// LLM prompt constants for the mood recommendation flow.

/// Keeps the reply parseable by `parse_recommendation`.
const JSON_ONLY_SYSTEM: &str = "Respond with a single JSON object and nothing else: \
    no prose before or after it and no markdown code fences.";

/// Persona prefix for the recommendation system prompt.
const RECOMMENDATION_PERSONA: &str = "You are a friendly local travel guide who suggests \
    one activity that fits a traveller's current mood.";

pub fn recommendation_system() -> String {
    format!("{RECOMMENDATION_PERSONA} {JSON_ONLY_SYSTEM}")
}

/// Recommendation prompt template.
/// Replace: {destination_line}, {adventurous}, {energy}, {interests}, {where}
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"User mood questionnaire responses:
{destination_line}- Adventurousness level: {adventurous}/5
- Energy level: {energy}/5
- Interests: {interests}

Consider these responses and suggest ONE activity{where} that would suit the user's mood.

Return a JSON object with EXACTLY these string fields and no others:
{
  "title": "Short name of the activity",
  "description": "One or two sentences describing it",
  "why_recommended": "Why it fits the adventurousness, energy and interests above",
  "duration": "Typical time needed, e.g. 1-2 hours",
  "type": "Category, e.g. Adventure, Culture, Food, Relaxation"
}"#;
