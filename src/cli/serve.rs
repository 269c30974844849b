use crate::{cli, error, info, server};

/// Starts the HTTP API and serves until the process is stopped.
pub async fn serve() {
    let store = cli::open_store().await;
    let catalog = cli::open_catalog();

    info!(
        "Artist and album caches hold {} entries for {}s",
        catalog.artist_cache().max_size(),
        catalog.artist_cache().ttl().as_secs()
    );

    let state = server::AppState::new(catalog, store);
    if let Err(e) = server::start_api_server(state).await {
        error!("Server stopped. Err: {}", e);
    }
}
