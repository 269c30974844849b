use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tower_http::{
    LatencyUnit,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    api,
    catalog::Catalog,
    config,
    error::{Error, Result},
    store::TagStore,
};

/// Shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub store: Arc<dyn TagStore>,
}

impl AppState {
    pub fn new(catalog: Catalog, store: impl TagStore + 'static) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store: Arc::new(store),
        }
    }
}

/// Builds the API routes. Each request is logged at `INFO` with its method,
/// uri, status and latency in milliseconds.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/register", post(api::register))
        .route("/search", get(api::search))
        .route("/artists/{id}", get(api::artist))
        .route("/albums/{id}", get(api::album))
        .route("/tags", get(api::list_tags))
        .route(
            "/artists/{id}/tags",
            get(api::artist_tags).put(api::update_artist_tags),
        )
        .route(
            "/albums/{id}/tags",
            get(api::album_tags).put(api::update_album_tags),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(state)
}

pub async fn start_api_server(state: AppState) -> Result<()> {
    let addr_str = config::server_addr();
    let addr = SocketAddr::from_str(&addr_str)
        .map_err(|e| Error::Config(format!("Failed to parse server address {}: {}", addr_str, e)))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
