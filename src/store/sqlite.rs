use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use tracing::{debug, info};

use super::{
    TagStore,
    models::{Entity, EntityKind, Tag, TagId, TagLink, User, UserId},
    schema::{self, BASE_DB_VERSION, VERSIONED_SCHEMAS},
};
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct SqliteTagStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTagStore {
    /// Opens the database at `db_path`, creating it with the latest schema
    /// if it does not exist yet.
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON;", [])?;

        let latest = VERSIONED_SCHEMAS
            .last()
            .ok_or_else(|| Error::Config("No database schema defined".to_string()))?;
        let stored_version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<usize, i64>(0))?
            as usize;

        if stored_version == 0 {
            info!("Creating database schema version {}", latest.version);
            schema::create(&conn, latest)?;
        } else {
            if stored_version < BASE_DB_VERSION {
                return Err(Error::Config(format!(
                    "Database version {} does not belong to spotitag",
                    stored_version
                )));
            }
            let version = stored_version - BASE_DB_VERSION;
            let Some(current) = VERSIONED_SCHEMAS.get(version) else {
                return Err(Error::Config(format!(
                    "Database version {} is too new",
                    version
                )));
            };

            let missing = schema::missing_tables(&conn, current)?;
            if !missing.is_empty() {
                return Err(Error::Config(format!(
                    "Schema validation failed, missing tables {:?}",
                    missing
                )));
            }
        }

        Ok(SqliteTagStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation)
}

fn tag_from_row(row: &Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        label: row.get(1)?,
        user_id: row.get(2)?,
    })
}

impl TagStore for SqliteTagStore {
    fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<User> {
        let conn = self.conn();
        match conn.execute(
            "INSERT INTO user (username, email, password_hash) VALUES (?1, ?2, ?3)",
            params![username, email, password_hash],
        ) {
            Ok(_) => Ok(User {
                id: conn.last_insert_rowid(),
                username: username.to_string(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
            }),
            Err(e) if is_constraint_violation(&e) => Err(Error::Conflict(format!(
                "username {} or email {} is already registered",
                username, email
            ))),
            Err(e) => Err(e.into()),
        }
    }

    fn get_user(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn();
        let user = conn
            .query_row(
                "SELECT id, username, email, password_hash FROM user WHERE username = ?1",
                params![username],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        email: row.get(2)?,
                        password_hash: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    fn get_or_create_entity(&self, kind: EntityKind, spotify_id: &str) -> Result<Entity> {
        let conn = self.conn();
        match conn.execute(
            &format!("INSERT INTO {} (spotify_id) VALUES (?1)", kind.table()),
            params![spotify_id],
        ) {
            Ok(_) => debug!("Created {} {}", kind, spotify_id),
            Err(e) if is_constraint_violation(&e) => {}
            Err(e) => return Err(e.into()),
        }

        let id = conn.query_row(
            &format!("SELECT id FROM {} WHERE spotify_id = ?1", kind.table()),
            params![spotify_id],
            |row| row.get(0),
        )?;

        Ok(Entity {
            id,
            kind,
            spotify_id: spotify_id.to_string(),
        })
    }

    fn user_tags(&self, user_id: UserId) -> Result<Vec<Tag>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT id, label, user_id FROM tag WHERE user_id = ?1 ORDER BY id")?;
        let tags = stmt
            .query_map(params![user_id], tag_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tags)
    }

    fn create_tags(&self, user_id: UserId, labels: &[String]) -> Result<Vec<Tag>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let mut tags = Vec::with_capacity(labels.len());
        {
            let mut stmt = tx.prepare("INSERT INTO tag (label, user_id) VALUES (?1, ?2)")?;
            for label in labels {
                let id = stmt.insert(params![label, user_id])?;
                tags.push(Tag {
                    id,
                    label: label.clone(),
                    user_id,
                });
            }
        }
        tx.commit()?;
        Ok(tags)
    }

    fn entity_tags(&self, user_id: UserId, entity: &Entity) -> Result<Vec<Tag>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT t.id, t.label, t.user_id FROM tag t JOIN {join} j ON j.tag_id = t.id WHERE j.{column} = ?1 AND t.user_id = ?2 ORDER BY t.id",
            join = entity.kind.join_table(),
            column = entity.kind.join_column(),
        ))?;
        let tags = stmt
            .query_map(params![entity.id, user_id], tag_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tags)
    }

    fn link_tags(&self, entity: &Entity, tag_ids: &[TagId]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT OR IGNORE INTO {join} (tag_id, {column}) VALUES (?1, ?2)",
                join = entity.kind.join_table(),
                column = entity.kind.join_column(),
            ))?;
            for tag_id in tag_ids {
                stmt.execute(params![tag_id, entity.id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn unlink_tags(&self, entity: &Entity, tag_ids: &[TagId]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "DELETE FROM {join} WHERE tag_id = ?1 AND {column} = ?2",
                join = entity.kind.join_table(),
                column = entity.kind.join_column(),
            ))?;
            for tag_id in tag_ids {
                stmt.execute(params![tag_id, entity.id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn tag_links(&self, user_id: UserId) -> Result<Vec<TagLink>> {
        let conn = self.conn();
        let mut links = Vec::new();

        for kind in [EntityKind::Artist, EntityKind::Album] {
            let mut stmt = conn.prepare(&format!(
                "SELECT t.id, t.label, t.user_id, e.spotify_id FROM tag t JOIN {join} j ON j.tag_id = t.id JOIN {table} e ON e.id = j.{column} WHERE t.user_id = ?1 ORDER BY t.id, e.id",
                join = kind.join_table(),
                table = kind.table(),
                column = kind.join_column(),
            ))?;
            let rows = stmt.query_map(params![user_id], |row| {
                Ok(TagLink {
                    tag: tag_from_row(row)?,
                    kind,
                    spotify_id: row.get(3)?,
                })
            })?;
            for link in rows {
                links.push(link?);
            }
        }

        Ok(links)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use tempfile::TempDir;

    fn create_tmp_store() -> (SqliteTagStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let temp_file_path = temp_dir.path().join("test.db");
        let store = SqliteTagStore::new(&temp_file_path).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_create_user() {
        let (store, _temp_dir) = create_tmp_store();

        let user = store.create_user("alice", "alice@example.com", "hash").unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(store.get_user("alice").unwrap(), Some(user));
        assert_eq!(store.get_user("bob").unwrap(), None);
    }

    #[test]
    fn duplicate_username_or_email_is_a_conflict() {
        let (store, _temp_dir) = create_tmp_store();
        store.create_user("alice", "alice@example.com", "hash").unwrap();

        let same_name = store.create_user("alice", "other@example.com", "hash");
        assert!(matches!(same_name, Err(Error::Conflict(_))));

        let same_email = store.create_user("bob", "alice@example.com", "hash");
        assert!(matches!(same_email, Err(Error::Conflict(_))));
    }

    #[test]
    fn get_or_create_entity_returns_the_same_row() {
        let (store, _temp_dir) = create_tmp_store();

        let first = store
            .get_or_create_entity(EntityKind::Artist, "4Z8W4fKeB5YxbusRsdQVPb")
            .unwrap();
        let second = store
            .get_or_create_entity(EntityKind::Artist, "4Z8W4fKeB5YxbusRsdQVPb")
            .unwrap();
        assert_eq!(first, second);

        // artists and albums live in separate tables
        let album = store
            .get_or_create_entity(EntityKind::Album, "4Z8W4fKeB5YxbusRsdQVPb")
            .unwrap();
        assert_eq!(album.kind, EntityKind::Album);
        assert_eq!(album.id, 1);
    }

    #[test]
    fn linking_twice_keeps_a_single_link() {
        let (store, _temp_dir) = create_tmp_store();
        let user = store.create_user("alice", "alice@example.com", "hash").unwrap();
        let artist = store.get_or_create_entity(EntityKind::Artist, "a1").unwrap();
        let tags = store.create_tags(user.id, &["good".to_string()]).unwrap();

        store.link_tags(&artist, &[tags[0].id]).unwrap();
        store.link_tags(&artist, &[tags[0].id]).unwrap();

        assert_eq!(store.entity_tags(user.id, &artist).unwrap(), tags);
        assert_eq!(store.tag_links(user.id).unwrap().len(), 1);
    }

    #[test]
    fn unlinking_keeps_the_tag_row() {
        let (store, _temp_dir) = create_tmp_store();
        let user = store.create_user("alice", "alice@example.com", "hash").unwrap();
        let album = store.get_or_create_entity(EntityKind::Album, "b1").unwrap();
        let tags = store.create_tags(user.id, &["live".to_string()]).unwrap();

        store.link_tags(&album, &[tags[0].id]).unwrap();
        store.unlink_tags(&album, &[tags[0].id]).unwrap();

        assert!(store.entity_tags(user.id, &album).unwrap().is_empty());
        assert_eq!(store.user_tags(user.id).unwrap(), tags);
    }

    #[test]
    fn entity_tags_are_scoped_to_the_owner() {
        let (store, _temp_dir) = create_tmp_store();
        let alice = store.create_user("alice", "alice@example.com", "hash").unwrap();
        let bob = store.create_user("bob", "bob@example.com", "hash").unwrap();
        let artist = store.get_or_create_entity(EntityKind::Artist, "a1").unwrap();

        let alice_tags = store.create_tags(alice.id, &["good".to_string()]).unwrap();
        let bob_tags = store.create_tags(bob.id, &["good".to_string()]).unwrap();
        store.link_tags(&artist, &[alice_tags[0].id, bob_tags[0].id]).unwrap();

        assert_eq!(store.entity_tags(alice.id, &artist).unwrap(), alice_tags);
        assert_eq!(store.entity_tags(bob.id, &artist).unwrap(), bob_tags);
    }

    #[test]
    fn tag_links_lists_artists_and_albums() {
        let (store, _temp_dir) = create_tmp_store();
        let user = store.create_user("alice", "alice@example.com", "hash").unwrap();
        let artist = store.get_or_create_entity(EntityKind::Artist, "a1").unwrap();
        let album = store.get_or_create_entity(EntityKind::Album, "b1").unwrap();
        let tags = store.create_tags(user.id, &["good".to_string()]).unwrap();

        store.link_tags(&artist, &[tags[0].id]).unwrap();
        store.link_tags(&album, &[tags[0].id]).unwrap();

        let links = store.tag_links(user.id).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].kind, EntityKind::Artist);
        assert_eq!(links[0].spotify_id, "a1");
        assert_eq!(links[1].kind, EntityKind::Album);
        assert_eq!(links[1].spotify_id, "b1");
    }

    #[test]
    fn reopening_keeps_data() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.db");

        {
            let store = SqliteTagStore::new(&path).unwrap();
            store.create_user("alice", "alice@example.com", "hash").unwrap();
        }

        let store = SqliteTagStore::new(&path).unwrap();
        assert!(store.get_user("alice").unwrap().is_some());
    }

    #[test]
    fn refuses_a_newer_database() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.db");

        {
            let conn = Connection::open(&path).unwrap();
            conn.execute(
                &format!(
                    "PRAGMA user_version = {}",
                    BASE_DB_VERSION + VERSIONED_SCHEMAS.len()
                ),
                [],
            )
            .unwrap();
        }

        assert!(matches!(SqliteTagStore::new(&path), Err(Error::Config(_))));
    }
}
