use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type TagId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// A label owned by one user. Labels are not unique across users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub label: String,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Artist,
    Album,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Artist => "artist",
            EntityKind::Album => "album",
        }
    }

    pub(crate) fn table(&self) -> &'static str {
        self.as_str()
    }

    pub(crate) fn join_table(&self) -> &'static str {
        match self {
            EntityKind::Artist => "artist_tags",
            EntityKind::Album => "album_tags",
        }
    }

    pub(crate) fn join_column(&self) -> &'static str {
        match self {
            EntityKind::Artist => "artist_id",
            EntityKind::Album => "album_id",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "artist" => Ok(EntityKind::Artist),
            "album" => Ok(EntityKind::Album),
            other => Err(format!("Unknown entity kind: {}", other)),
        }
    }
}

/// A locally known artist or album. Only the Spotify id is stored; display
/// metadata always comes from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: i64,
    pub kind: EntityKind,
    pub spotify_id: String,
}

/// One (tag, entity) association, as listed on the tags overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLink {
    pub tag: Tag,
    pub kind: EntityKind,
    pub spotify_id: String,
}
