//! # Spotify Integration Module
//!
//! This module is the only place that talks to the Spotify Web API. It
//! implements the application-only authentication flow, artist search and
//! the batched artist/album lookups the catalog cache sits in front of.
//!
//! ## Architecture
//!
//! ```text
//! HTTP API / CLI
//!          ↓
//! Catalog (cache + miss batching)
//!          ↓
//! SpotifyClient (CatalogApi)
//!     ├── Authentication (client credentials)
//!     ├── Artist Operations (search, several artists, artist albums)
//!     └── Album Operations (several albums)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - client-credentials token request
//! - [`artists`] - artist search, `GET /artists` and an artist's album list
//! - [`albums`] - `GET /albums`
//!
//! ## Error Handling
//!
//! Failures are never retried here. A non-success status becomes
//! [`Error::Remote`], a 429 becomes [`Error::RateLimited`] with the
//! `Retry-After` value, and both propagate to the caller. The catalog cache
//! does not remember failures, so the next request simply tries again.
//!
//! ## API Coverage
//!
//! - `POST /api/token` - client-credentials token
//! - `GET /search` - artist search
//! - `GET /artists` - batch artist information
//! - `GET /artists/{id}/albums` - artist albums
//! - `GET /albums` - batch album information

pub mod albums;
pub mod artists;
pub mod auth;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

use crate::{
    catalog::CatalogApi,
    config,
    error::{Error, Result},
    management::TokenManager,
    types::{AlbumDetails, ArtistDetails},
    utils,
};

/// Turns a rate-limit answer into [`Error::RateLimited`] and any other
/// non-success status into [`Error::Remote`].
pub(crate) fn check_status(response: Response) -> Result<Response> {
    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);
        return Err(Error::RateLimited(retry_after));
    }

    Ok(response.error_for_status()?)
}

/// Spotify-backed implementation of [`CatalogApi`].
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: TokenManager,
}

impl SpotifyClient {
    pub fn new(client_id: String, client_secret: String, api_url: String) -> Self {
        Self {
            http: Client::new(),
            api_url,
            tokens: TokenManager::new(client_id, client_secret),
        }
    }

    /// Builds a client from `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and
    /// `SPOTIFY_API_URL`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(
            config::spotify_client_id()?,
            config::spotify_client_secret()?,
            config::spotify_apiurl(),
        ))
    }
}

#[async_trait]
impl CatalogApi for SpotifyClient {
    async fn search_artists(&self, query: &str) -> Result<Vec<String>> {
        let token = self.tokens.get_valid_token().await?;
        artists::search_artist_ids(&self.http, &self.api_url, &token, query).await
    }

    async fn artists(&self, ids: &[String]) -> Result<Vec<ArtistDetails>> {
        let token = self.tokens.get_valid_token().await?;
        let found = artists::get_several_artists(&self.http, &self.api_url, &token, ids).await?;

        let mut details = Vec::with_capacity(found.len());
        for artist in found {
            let albums =
                artists::get_artist_album_ids(&self.http, &self.api_url, &token, &artist.id)
                    .await?;
            details.push(ArtistDetails {
                image: utils::smallest_image(&artist.images),
                url: artist.external_urls.spotify,
                id: artist.id,
                name: artist.name,
                albums,
            });
        }

        Ok(details)
    }

    async fn albums(&self, ids: &[String]) -> Result<Vec<AlbumDetails>> {
        let token = self.tokens.get_valid_token().await?;
        let found = albums::get_several_albums(&self.http, &self.api_url, &token, ids).await?;

        Ok(found
            .into_iter()
            .map(|album| AlbumDetails {
                image: utils::smallest_image(&album.images),
                url: album.external_urls.spotify,
                id: album.id,
                name: album.name,
            })
            .collect())
    }
}
