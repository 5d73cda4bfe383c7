// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use newsdesk::application::content_repository::{ContentRepository, SiteRepository};
use newsdesk::application::draft_store::DraftStore;
use newsdesk::application::public_pages::PublicPages;
use newsdesk::infrastructure::config::load_app_config;
use newsdesk::infrastructure::file_storage::FileStorage;
use newsdesk::infrastructure::http_api::HttpApi;
use newsdesk::presentation::app_state::AppState;
use newsdesk::presentation::handlers::{health_check, list_sections, newsletter_signup, section_page};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Local draft cache (infrastructure layer)
    let storage = Arc::new(FileStorage::new(&config.storage.dir)?);
    let drafts = DraftStore::new(storage, config.storage.namespace.clone());

    // Content backend, absent when no base URL is configured
    let api = HttpApi::from_config(&config.api, &config.endpoints).map(Arc::new);
    match &api {
        Some(_) => tracing::info!("Using content API at {}", config.api.base().unwrap_or_default()),
        None => tracing::warn!("No API base URL configured, serving local drafts only"),
    }
    let content = api.clone().map(|a| a as Arc<dyn ContentRepository>);
    let site = api.map(|a| a as Arc<dyn SiteRepository>);

    // Create application state
    let state = Arc::new(AppState {
        public_pages: PublicPages::new(content, site, drafts, config.preview.options()),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/sections", get(list_sections))
        .route("/sections/:section", get(section_page))
        .route("/newsletter", post(newsletter_signup))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting newsdesk on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
