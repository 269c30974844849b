//! # CLI Module
//!
//! Command-line front end of spotitag. Every command works against the same
//! SQLite database and Spotify credentials the HTTP API uses, so tags edited
//! from the terminal show up in the API and the other way around.
//!
//! ## Commands
//!
//! - [`serve`] - runs the HTTP API
//! - [`register`] - creates an account
//! - [`search`] - searches artists by name
//! - [`artist`] / [`album`] - shows entity details
//! - [`tag`] - replaces a user's tags on an artist or album
//! - [`list_tags`] - lists a user's tags
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotitag register --username ana --email ana@example.com --password s3cret
//! spotitag search "nick cave"
//! spotitag tag artist 4Z8W4fKeB5YxbusRsdQVPb "good;live" --user ana
//! spotitag tags --user ana
//! spotitag serve
//! ```
//!
//! The CLI acts as the local administrator: commands take `--user` and do
//! not ask for the password.
//!
//! Failures are reported with the crate's `error!` macro, which exits the
//! process.

mod search;
mod serve;
mod tags;
mod users;

pub use search::album;
pub use search::artist;
pub use search::search;
pub use serve::serve;
pub use tags::list_tags;
pub use tags::tag;
pub use users::register;

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    catalog::Catalog, config, error, spotify::SpotifyClient, store::SqliteTagStore,
};

async fn open_store() -> SqliteTagStore {
    let path = config::database_path();
    if let Some(parent) = path.parent() {
        if let Err(e) = async_fs::create_dir_all(parent).await {
            error!("Cannot create {}. Err: {}", parent.display(), e);
        }
    }

    match SqliteTagStore::new(&path) {
        Ok(store) => store,
        Err(e) => error!("Cannot open database {}. Err: {}", path.display(), e),
    }
}

fn open_catalog() -> Catalog {
    match SpotifyClient::from_env() {
        Ok(client) => Catalog::from_env(Arc::new(client)),
        Err(e) => error!("Cannot set up Spotify client. Err: {}", e),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
