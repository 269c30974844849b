use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    server::AppState,
    store::EntityKind,
    types::{AlbumDetails, ArtistDetails},
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub artist: String,
}

/// Searches artists by name. Every returned artist gets a local row so it
/// can be tagged right away.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ArtistDetails>>> {
    let term = query.artist.trim();
    if term.is_empty() {
        return Err(Error::BadRequest("artist query must not be empty".to_string()));
    }

    let artists = state.catalog.search_artists(term).await?;
    for artist in &artists {
        state
            .store
            .get_or_create_entity(EntityKind::Artist, &artist.id)?;
    }

    Ok(Json(artists))
}

pub async fn artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArtistDetails>> {
    Ok(Json(state.catalog.artist_details(&id).await?))
}

pub async fn album(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AlbumDetails>> {
    Ok(Json(state.catalog.album_details(&id).await?))
}
