//! Persistence for users, tags, artists, albums and the tag join tables.

mod models;
mod schema;
mod sqlite;

pub use models::{Entity, EntityKind, Tag, TagId, TagLink, User, UserId};
pub use sqlite::SqliteTagStore;

use crate::error::Result;

pub trait TagStore: Send + Sync {
    /// Creates a new account.
    /// Fails with `Error::Conflict` if the username or email is taken.
    fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<User>;

    /// Returns the user with the given username, if any.
    fn get_user(&self, username: &str) -> Result<Option<User>>;

    /// Returns the row for a Spotify id, inserting it on first reference.
    /// A concurrent insert of the same id is tolerated.
    fn get_or_create_entity(&self, kind: EntityKind, spotify_id: &str) -> Result<Entity>;

    /// Returns every tag the user owns, linked or not.
    fn user_tags(&self, user_id: UserId) -> Result<Vec<Tag>>;

    /// Creates one tag per label for the user, in a single transaction.
    fn create_tags(&self, user_id: UserId, labels: &[String]) -> Result<Vec<Tag>>;

    /// Returns the user's tags currently linked to the entity.
    fn entity_tags(&self, user_id: UserId, entity: &Entity) -> Result<Vec<Tag>>;

    /// Links the tags to the entity and commits. Already linked pairs are
    /// left untouched.
    fn link_tags(&self, entity: &Entity, tag_ids: &[TagId]) -> Result<()>;

    /// Unlinks the tags from the entity and commits. Tag rows are kept.
    fn unlink_tags(&self, entity: &Entity, tag_ids: &[TagId]) -> Result<()>;

    /// Returns every (tag, entity) link of the user's tags.
    fn tag_links(&self, user_id: UserId) -> Result<Vec<TagLink>>;
}
