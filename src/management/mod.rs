mod auth;
mod cache;

pub use auth::TokenManager;
pub use cache::CatalogCache;
pub use cache::Clock;
pub use cache::ManualClock;
pub use cache::SystemClock;
