//! Read-only browsing of stored questionnaire responses.

use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};

use crate::errors::AppError;
use crate::models::mood::{MoodResponseRow, RecordId};
use crate::mood::store::ResponseQuery;
use crate::state::AppState;

/// GET /api/v1/admin/mood-responses
pub async fn handle_list_responses(
    State(state): State<AppState>,
    Query(query): Query<ResponseQuery>,
) -> Result<Json<Vec<MoodResponseRow>>, AppError> {
    Ok(Json(state.store.list(&query).await?))
}

/// GET /api/v1/admin/mood-responses/:id
pub async fn handle_get_response(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<MoodResponseRow>, AppError> {
    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Mood response {id} not found")))
}

/// GET /admin/mood-responses
pub async fn handle_list_page(
    State(state): State<AppState>,
    Query(query): Query<ResponseQuery>,
) -> Result<Html<String>, AppError> {
    let rows = state.store.list(&query).await?;
    let html = state.templates.admin_listing(&rows, query.search_term())?;
    Ok(Html(html))
}
