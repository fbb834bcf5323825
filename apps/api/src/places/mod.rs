//! Server-side proxy to the Places API (text search and photo media).
//!
//! Uses the server credential; the browser credential never passes through here.

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

pub mod handlers;

const PLACES_API_BASE: &str = "https://places.googleapis.com/v1";
const TEXT_SEARCH_FIELD_MASK: &str =
    "places.displayName,places.formattedAddress,places.websiteUri,places.photos";
const PHOTO_MAX_WIDTH_PX: u32 = 800;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Local route that serves proxied photo bytes.
pub const PHOTO_ROUTE_PREFIX: &str = "/place_photos/";

#[derive(Debug, Error)]
pub enum PlacesError {
    /// The client's request was unusable; the message is safe to show.
    #[error("{0}")]
    Payload(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Places API returned status {0}")]
    Status(u16),
}

/// Photo bytes with the upstream content type.
#[derive(Debug)]
pub struct PhotoMedia {
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl PlacesClient {
    pub fn new(api_key: String) -> Result<Self, PlacesError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            base_url: PLACES_API_BASE.to_string(),
        })
    }

    /// Runs a text search and returns the places with photo references
    /// rewritten to local proxy URLs.
    pub async fn text_search(&self, text_query: &str) -> Result<Vec<Value>, PlacesError> {
        let response = self
            .client
            .post(format!("{}/places:searchText", self.base_url))
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", TEXT_SEARCH_FIELD_MASK)
            .json(&json!({ "textQuery": text_query }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        let places = match body.get("places") {
            Some(Value::Array(places)) => places.clone(),
            _ => Vec::new(),
        };
        debug!("Text search '{text_query}' returned {} places", places.len());

        Ok(decorate_photo_urls(places))
    }

    /// Fetches the media for a photo resource name (`places/.../photos/...`).
    pub async fn photo_media(&self, photo_name: &str) -> Result<PhotoMedia, PlacesError> {
        let photo_name = validate_photo_name(photo_name)?;

        let response = self
            .client
            .get(format!("{}/{photo_name}/media", self.base_url))
            .query(&[("maxWidthPx", PHOTO_MAX_WIDTH_PX)])
            .header("X-Goog-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = response.bytes().await?;

        Ok(PhotoMedia {
            content_type,
            bytes,
        })
    }
}

/// Reads `textQuery` from a JSON request body.
pub fn parse_text_query(body: &[u8]) -> Result<String, PlacesError> {
    let payload: Value = if body.iter().all(u8::is_ascii_whitespace) {
        json!({})
    } else {
        serde_json::from_slice(body).map_err(|_| PlacesError::Payload("Invalid JSON".into()))?
    };

    let text_query = match payload.get("textQuery") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    };

    if text_query.is_empty() {
        return Err(PlacesError::Payload("textQuery is required".into()));
    }
    Ok(text_query)
}

pub fn validate_photo_name(photo_name: &str) -> Result<&str, PlacesError> {
    if photo_name.starts_with("places/") && !photo_name.contains("..") {
        Ok(photo_name)
    } else {
        Err(PlacesError::Payload("Invalid photo name".into()))
    }
}

/// Replaces each place's `photos` objects with local proxy URLs.
fn decorate_photo_urls(mut places: Vec<Value>) -> Vec<Value> {
    for place in places.iter_mut() {
        let Some(object) = place.as_object_mut() else {
            continue;
        };
        let urls: Vec<Value> = object
            .get("photos")
            .and_then(Value::as_array)
            .map(|photos| {
                photos
                    .iter()
                    .filter_map(|photo| photo.get("name").and_then(Value::as_str))
                    .map(|name| Value::String(format!("{PHOTO_ROUTE_PREFIX}{name}")))
                    .collect()
            })
            .unwrap_or_default();
        object.insert("photos".to_string(), Value::Array(urls));
    }
    places
}
