//! Configuration management for spotitag.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Spotify credentials are required; everything else
//! falls back to a default.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::error::{Error, Result};

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_CACHE_SIZE: usize = 512;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `spotitag` data directory if it doesn't exist. A missing `.env`
/// file is not an error: every value can also come from the process
/// environment.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/spotitag/.env`
/// - macOS: `~/Library/Application Support/spotitag/.env`
/// - Windows: `%LOCALAPPDATA%/spotitag/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.exists() {
        dotenv::from_path(&path).map_err(|e| Error::Config(e.to_string()))?;
    }
    Ok(())
}

/// Returns the platform-specific data directory used by spotitag.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotitag");
    path
}

/// Returns the address the HTTP API binds to.
///
/// Reads `SPOTITAG_SERVER_ADDRESS`, defaulting to `127.0.0.1:5000`.
pub fn server_addr() -> String {
    env::var("SPOTITAG_SERVER_ADDRESS").unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Returns the path of the SQLite database.
///
/// Reads `SPOTITAG_DATABASE`, defaulting to `spotitag.db` in [`data_dir`].
pub fn database_path() -> PathBuf {
    env::var("SPOTITAG_DATABASE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| data_dir().join("spotitag.db"))
}

/// Returns the Spotify API client ID used for the client-credentials flow.
///
/// # Errors
///
/// Returns [`Error::Config`] if `SPOTIFY_CLIENT_ID` is not set.
pub fn spotify_client_id() -> Result<String> {
    required("SPOTIFY_CLIENT_ID")
}

/// Returns the Spotify API client secret used for the client-credentials flow.
///
/// The client secret should be kept confidential and never exposed in logs.
///
/// # Errors
///
/// Returns [`Error::Config`] if `SPOTIFY_CLIENT_SECRET` is not set.
pub fn spotify_client_secret() -> Result<String> {
    required("SPOTIFY_CLIENT_SECRET")
}

/// Returns the Spotify Web API base URL.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_SPOTIFY_API_URL.to_string())
}

/// Returns the Spotify OAuth token URL.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|_| DEFAULT_SPOTIFY_TOKEN_URL.to_string())
}

/// Returns the maximum number of entries per catalog cache.
///
/// Reads `SPOTITAG_CACHE_SIZE`; unparsable values fall back to the default.
pub fn cache_size() -> usize {
    parse_or("SPOTITAG_CACHE_SIZE", DEFAULT_CACHE_SIZE)
}

/// Returns how long catalog entries stay fresh.
///
/// Reads `SPOTITAG_CACHE_TTL` in seconds; unparsable values fall back to the
/// default of one hour.
pub fn cache_ttl() -> Duration {
    Duration::from_secs(parse_or("SPOTITAG_CACHE_TTL", DEFAULT_CACHE_TTL_SECS))
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("{} must be set", name)))
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
