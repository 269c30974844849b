use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    api::AuthUser,
    error::Result,
    server::AppState,
    store::EntityKind,
    tagging::{self, ReconcileReport},
    types::{AlbumDetails, ArtistDetails},
};

#[derive(Debug, Serialize)]
pub struct EntityTags<T> {
    pub item: T,
    /// Current labels joined with `;`, ready to be edited and sent back.
    pub tags: String,
    pub labels: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTagsRequest {
    pub tags: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateTagsResponse {
    pub tags: String,
    pub report: ReconcileReport,
}

#[derive(Debug, Serialize)]
pub struct TagListing {
    pub label: String,
    pub artists: Vec<ArtistDetails>,
    pub albums: Vec<AlbumDetails>,
}

/// Lists every tag of the caller with the details of what it is linked to.
pub async fn list_tags(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<TagListing>>> {
    let overview = tagging::tag_overview(state.store.as_ref(), user.id)?;

    let artist_ids: Vec<String> = overview.iter().flat_map(|o| o.artists.clone()).collect();
    let album_ids: Vec<String> = overview.iter().flat_map(|o| o.albums.clone()).collect();
    let artists = state.catalog.artist_details_many(&artist_ids).await?;
    let albums = state.catalog.album_details_many(&album_ids).await?;

    let listing = overview
        .into_iter()
        .map(|o| TagListing {
            artists: o
                .artists
                .iter()
                .filter_map(|id| artists.get(id).cloned())
                .collect(),
            albums: o
                .albums
                .iter()
                .filter_map(|id| albums.get(id).cloned())
                .collect(),
            label: o.label,
        })
        .collect();

    Ok(Json(listing))
}

pub async fn artist_tags(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<EntityTags<ArtistDetails>>> {
    let item = state.catalog.artist_details(&id).await?;
    let tags = tagging::entity_labels(state.store.as_ref(), user.id, EntityKind::Artist, &id)?;

    Ok(Json(EntityTags {
        item,
        tags: tagging::join_labels(&tags),
        labels: tags.into_iter().map(|t| t.label).collect(),
    }))
}

pub async fn album_tags(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<EntityTags<AlbumDetails>>> {
    let item = state.catalog.album_details(&id).await?;
    let tags = tagging::entity_labels(state.store.as_ref(), user.id, EntityKind::Album, &id)?;

    Ok(Json(EntityTags {
        item,
        tags: tagging::join_labels(&tags),
        labels: tags.into_iter().map(|t| t.label).collect(),
    }))
}

pub async fn update_artist_tags(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateTagsRequest>,
) -> Result<Json<UpdateTagsResponse>> {
    update_tags(&state, user.id, EntityKind::Artist, &id, &request.tags).map(Json)
}

pub async fn update_album_tags(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateTagsRequest>,
) -> Result<Json<UpdateTagsResponse>> {
    update_tags(&state, user.id, EntityKind::Album, &id, &request.tags).map(Json)
}

fn update_tags(
    state: &AppState,
    user_id: i64,
    kind: EntityKind,
    spotify_id: &str,
    raw: &str,
) -> Result<UpdateTagsResponse> {
    let store = state.store.as_ref();
    let report = tagging::set_entity_tags(store, user_id, kind, spotify_id, raw)?;
    let tags = tagging::entity_labels(store, user_id, kind, spotify_id)?;

    Ok(UpdateTagsResponse {
        tags: tagging::join_labels(&tags),
        report,
    })
}
