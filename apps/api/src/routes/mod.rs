use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::warn;

use crate::admin;
use crate::mood::handlers;
use crate::places::handlers as places;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        // Questionnaire pages
        .route(
            "/mood/",
            get(handlers::handle_questionnaire).post(handlers::handle_submit),
        )
        .route(
            "/mood",
            get(handlers::handle_questionnaire).post(handlers::handle_submit),
        )
        .route("/api/v1/mood", post(handlers::handle_submit_json))
        // Places proxy
        .route("/mood/text_search/", post(places::handle_text_search))
        .route("/place_photos/*photo_name", get(places::handle_place_photo))
        // Read-only admin
        .route("/admin/mood-responses", get(admin::handle_list_page))
        .route(
            "/api/v1/admin/mood-responses",
            get(admin::handle_list_responses),
        )
        .route(
            "/api/v1/admin/mood-responses/:id",
            get(admin::handle_get_response),
        )
        .with_state(state)
}

/// GET /health
/// Reports the service version and whether the store answers.
async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, store) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            warn!("Health check: store unreachable: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, "unreachable")
        }
    };
    let body = json!({
        "status": if status == StatusCode::OK { "ok" } else { "degraded" },
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "store": store,
    });
    (status, Json(body))
}
