use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::places::{parse_text_query, validate_photo_name, PlacesClient};
use crate::state::AppState;

fn client(state: &AppState) -> Result<&PlacesClient, AppError> {
    state
        .places
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("Places search is not configured".to_string()))
}

/// POST /mood/text_search/
pub async fn handle_text_search(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let text_query = parse_text_query(&body)?;
    let places = client(&state)?.text_search(&text_query).await?;
    Ok(Json(json!({ "places": places })))
}

/// GET /place_photos/*photo_name
pub async fn handle_place_photo(
    State(state): State<AppState>,
    Path(photo_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validate_photo_name(&photo_name)?;
    let media = client(&state)?.photo_media(&photo_name).await?;
    Ok(([(header::CONTENT_TYPE, media.content_type)], media.bytes))
}
