mod admin;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod mood;
mod places;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::mood::store::PgMoodStore;
use crate::places::PlacesClient;
use crate::render::Templates;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_PKG_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Wanderly v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.db_max_connections).await?;
    let store = Arc::new(PgMoodStore::new(db));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        &config.llm_base_url,
        config.llm_model.clone(),
        config.llm_timeout_secs,
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    // Places proxy is optional
    let places = match &config.google_places_api_key {
        Some(key) => {
            info!("Places proxy enabled");
            Some(PlacesClient::new(key.clone())?)
        }
        None => {
            warn!("GOOGLE_PLACES_API_KEY not set; place search routes will answer 503");
            None
        }
    };

    if config.google_maps_browser_key.is_none() {
        warn!("GOOGLE_MAPS_BROWSER_KEY not set; destination autocomplete is disabled");
    }
    let templates = Templates::new(config.google_maps_browser_key.clone())?;

    // Build app state
    let state = AppState {
        store,
        completion: Arc::new(llm),
        places,
        templates,
    };

    // Build router
    let app = build_router(state)
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the admin routes sit behind auth

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
