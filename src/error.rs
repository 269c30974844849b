use thiserror::Error;

/// Errors produced by the catalog, the store and the HTTP layer.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Spotify API error: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("Spotify API rate limit reached, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type Result<T> = std::result::Result<T, Error>;
