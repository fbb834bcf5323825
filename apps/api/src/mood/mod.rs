// Mood questionnaire → stored response → LLM recommendation → rendered page.
// All LLM calls go through llm_client; this module only sees the `Completion` trait.

pub mod form;
pub mod handlers;
pub mod prompts;
pub mod recommender;
pub mod store;
