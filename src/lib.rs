//! Spotify Tagging Library
//!
//! This library lets users search the Spotify catalog for artists and albums
//! and attach personal tags to them. Tag associations are stored per account
//! in SQLite, and catalog lookups go through an in-process cache so repeated
//! detail requests do not hit the Spotify Web API again.
//!
//! # Modules
//!
//! - `accounts` - Account registration and password checks
//! - `api` - HTTP handlers for the JSON API
//! - `catalog` - Cached access to artist and album details
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Crate-wide error type
//! - `management` - Catalog cache and Spotify token management
//! - `server` - Router construction and the HTTP server loop
//! - `spotify` - Spotify Web API client implementation
//! - `store` - SQLite persistence for users, tags, artists and albums
//! - `tagging` - Tag reconciliation and tag overviews
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod accounts;
pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod store;
pub mod tagging;
pub mod types;
pub mod utils;

pub use error::{Error, Result};

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Searching for {}...", query);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Tags updated for {}", artist_id);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used by the CLI for unrecoverable errors. Library code never calls
/// this macro; it returns an [`Error`] instead.
///
/// # Example
///
/// ```
/// error!("Cannot open database. Err: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("No tags found for user {}", username);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
