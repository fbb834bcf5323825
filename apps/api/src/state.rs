use std::sync::Arc;

use crate::llm_client::Completion;
use crate::mood::store::MoodStore;
use crate::places::PlacesClient;
use crate::render::Templates;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Append-only questionnaire store. Default: `PgMoodStore`.
    pub store: Arc<dyn MoodStore>,
    /// Completion backend for recommendations. Default: `LlmClient`.
    pub completion: Arc<dyn Completion>,
    /// Server-side Places proxy; `None` when no server key is configured.
    pub places: Option<PlacesClient>,
    pub templates: Templates,
}
