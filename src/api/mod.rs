//! # API Module
//!
//! HTTP handlers of the spotitag JSON API.
//!
//! ## Endpoints
//!
//! ### Public
//!
//! - [`health`] - status and version for monitoring
//! - [`register`] - creates an account
//! - [`search`] - artist search with details
//! - [`artist`] / [`album`] - cached entity details
//!
//! ### Authenticated
//!
//! Requests carry HTTP Basic credentials, checked by the [`AuthUser`]
//! extractor.
//!
//! - [`list_tags`] - every tag of the user with the tagged artists and albums
//! - [`artist_tags`] / [`album_tags`] - entity details and its current tags
//! - [`update_artist_tags`] / [`update_album_tags`] - replace the entity's tags
//!
//! ## Errors
//!
//! Handlers return [`crate::Error`], which renders as `{"detail": "..."}`
//! with a status code matching the error kind.

mod auth;
mod error;
mod health;
mod search;
mod tags;

pub use auth::{AuthUser, register};
pub use error::ErrorResponse;
pub use health::health;
pub use search::{album, artist, search};
pub use tags::{
    album_tags, artist_tags, list_tags, update_album_tags, update_artist_tags,
};
