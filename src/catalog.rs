//! # Catalog Module
//!
//! Cached access to artist and album details.
//!
//! Every detail lookup, single or batched, goes through [`fetch_through`]:
//!
//! 1. ask the cache for all requested ids
//! 2. the ids the cache did not return form the miss set
//! 3. an empty miss set returns right away, without a remote call
//! 4. otherwise the miss set is fetched in one batched [`CatalogApi`] call
//! 5. fetched entries are stored, and hits ∪ fetched is returned
//!
//! Remote errors are returned as-is and nothing is cached for them.

use std::{
    collections::{HashMap, HashSet},
    future::Future,
    sync::Arc,
};

use async_trait::async_trait;

use crate::{
    error::{Error, Result},
    management::CatalogCache,
    types::{AlbumDetails, ArtistDetails},
};

/// The remote catalog: search plus batched detail lookups keyed by Spotify id.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Returns the ids of artists matching `query`, best match first.
    async fn search_artists(&self, query: &str) -> Result<Vec<String>>;

    /// Returns details for the given artist ids. Unknown ids are omitted.
    async fn artists(&self, ids: &[String]) -> Result<Vec<ArtistDetails>>;

    /// Returns details for the given album ids. Unknown ids are omitted.
    async fn albums(&self, ids: &[String]) -> Result<Vec<AlbumDetails>>;
}

/// Values that know the catalog id they are cached under.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for ArtistDetails {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for AlbumDetails {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Serves `ids` from `cache`, fetching the misses with a single `fetch` call.
pub async fn fetch_through<V, F, Fut>(
    cache: &CatalogCache<V>,
    ids: &[String],
    fetch: F,
) -> Result<HashMap<String, V>>
where
    V: Clone + Keyed,
    F: FnOnce(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Vec<V>>>,
{
    let mut found = cache.get_many(ids);

    let mut seen = HashSet::new();
    let misses: Vec<String> = ids
        .iter()
        .filter(|id| !found.contains_key(id.as_str()) && seen.insert(id.as_str()))
        .cloned()
        .collect();

    tracing::debug!(hits = found.len(), misses = misses.len(), "catalog lookup");

    if misses.is_empty() {
        return Ok(found);
    }

    let fetched = fetch(misses).await?;
    let fetched: Vec<(String, V)> = fetched
        .into_iter()
        .map(|value| (value.key().to_string(), value))
        .collect();

    cache.set_many(fetched.iter().cloned());
    found.extend(fetched);

    Ok(found)
}

/// Artist and album details served through per-kind caches.
pub struct Catalog {
    api: Arc<dyn CatalogApi>,
    artists: CatalogCache<ArtistDetails>,
    albums: CatalogCache<AlbumDetails>,
}

impl Catalog {
    pub fn new(
        api: Arc<dyn CatalogApi>,
        artists: CatalogCache<ArtistDetails>,
        albums: CatalogCache<AlbumDetails>,
    ) -> Self {
        Self {
            api,
            artists,
            albums,
        }
    }

    /// Builds a catalog whose caches are sized from the environment.
    pub fn from_env(api: Arc<dyn CatalogApi>) -> Self {
        Self::new(api, CatalogCache::from_env(), CatalogCache::from_env())
    }

    pub async fn artist_details_many(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, ArtistDetails>> {
        fetch_through(&self.artists, ids, |misses| async move {
            self.api.artists(&misses).await
        })
        .await
    }

    pub async fn album_details_many(&self, ids: &[String]) -> Result<HashMap<String, AlbumDetails>> {
        fetch_through(&self.albums, ids, |misses| async move {
            self.api.albums(&misses).await
        })
        .await
    }

    /// Details for one artist; [`Error::NotFound`] if Spotify does not know it.
    pub async fn artist_details(&self, id: &str) -> Result<ArtistDetails> {
        self.artist_details_many(&[id.to_string()])
            .await?
            .remove(id)
            .ok_or_else(|| Error::NotFound(format!("artist {}", id)))
    }

    /// Details for one album; [`Error::NotFound`] if Spotify does not know it.
    pub async fn album_details(&self, id: &str) -> Result<AlbumDetails> {
        self.album_details_many(&[id.to_string()])
            .await?
            .remove(id)
            .ok_or_else(|| Error::NotFound(format!("album {}", id)))
    }

    /// Searches artists by name and returns their details in Spotify's order.
    pub async fn search_artists(&self, query: &str) -> Result<Vec<ArtistDetails>> {
        let ids = self.api.search_artists(query).await?;
        let mut details = self.artist_details_many(&ids).await?;

        Ok(ids.iter().filter_map(|id| details.remove(id)).collect())
    }

    pub fn artist_cache(&self) -> &CatalogCache<ArtistDetails> {
        &self.artists
    }

    pub fn album_cache(&self) -> &CatalogCache<AlbumDetails> {
        &self.albums
    }
}
