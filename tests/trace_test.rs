use std::{
    io::Write,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

use spotitag::{
    Result,
    catalog::{Catalog, CatalogApi},
    management::CatalogCache,
    server::{AppState, router},
    store::SqliteTagStore,
    types::{AlbumDetails, ArtistDetails},
};

struct EmptyApi;

#[async_trait]
impl CatalogApi for EmptyApi {
    async fn search_artists(&self, _query: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn artists(&self, _ids: &[String]) -> Result<Vec<ArtistDetails>> {
        Ok(Vec::new())
    }

    async fn albums(&self, _ids: &[String]) -> Result<Vec<AlbumDetails>> {
        Ok(Vec::new())
    }
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_requests_are_logged_at_info() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(move || writer.clone()),
        )
        .with(EnvFilter::new("info"));
    let _guard = tracing::subscriber::set_default(subscriber);

    let ttl = Duration::from_secs(3600);
    let catalog = Catalog::new(
        Arc::new(EmptyApi),
        CatalogCache::new(4, ttl),
        CatalogCache::new(4, ttl),
    );
    let app = router(AppState::new(catalog, SqliteTagStore::in_memory().unwrap()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let output = log.contents();
    assert!(output.contains("finished processing request"), "{}", output);
    assert!(output.contains("uri=/health"), "{}", output);
    assert!(output.contains("status=200"), "{}", output);
    assert!(output.contains("ms"), "{}", output);
}
