use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use reqwest::Client;
use serde_json::{Value, json};

use spotitag::spotify::artists::get_artist_album_ids;

/// Serves 120 albums in pages of 50, linking pages through `next` the way
/// Spotify does.
async fn artist_albums(
    State(base): State<String>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let total = 120;
    let offset: usize = params.get("offset").and_then(|o| o.parse().ok()).unwrap_or(0);
    let end = (offset + 50).min(total);

    let items: Vec<Value> = (offset..end)
        .map(|i| json!({"id": format!("{}-{}", id, i), "name": format!("Album {}", i)}))
        .collect();
    let next = (end < total).then(|| {
        format!(
            "{}/artists/{}/albums?include_groups=album&limit=50&offset={}",
            base, id, end
        )
    });

    Json(json!({"items": items, "next": next, "total": total}))
}

async fn spawn_fake_spotify() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let app = Router::new()
        .route("/artists/{id}/albums", get(artist_albums))
        .with_state(base.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}

#[tokio::test]
async fn test_artist_albums_follow_every_page() {
    let base = spawn_fake_spotify().await;

    let ids = get_artist_album_ids(&Client::new(), &base, "token", "a1")
        .await
        .unwrap();

    assert_eq!(ids.len(), 120);
    assert_eq!(ids.first().map(String::as_str), Some("a1-0"));
    assert_eq!(ids.last().map(String::as_str), Some("a1-119"));
}
