use rusqlite::Connection;

/// Offset added to the schema version stored in `PRAGMA user_version`, so a
/// database created by something else (version 0) is never mistaken for ours.
pub const BASE_DB_VERSION: usize = 5400;

pub struct Table {
    pub name: &'static str,
    pub schema: &'static str,
    pub indices: &'static [&'static str],
}

pub struct VersionedSchema {
    pub version: usize,
    pub tables: &'static [Table],
}

/// V 0
const USER_TABLE_V_0: Table = Table {
    name: "user",
    schema: "CREATE TABLE user (id INTEGER PRIMARY KEY, username TEXT NOT NULL UNIQUE, email TEXT NOT NULL UNIQUE, password_hash TEXT NOT NULL, created INTEGER DEFAULT (cast(strftime('%s','now') as int)));",
    indices: &[
        "CREATE INDEX user_username_index ON user (username);",
        "CREATE INDEX user_email_index ON user (email);",
    ],
};
const TAG_TABLE_V_0: Table = Table {
    name: "tag",
    schema: "CREATE TABLE tag (id INTEGER PRIMARY KEY, label TEXT NOT NULL, user_id INTEGER NOT NULL, CONSTRAINT user_id FOREIGN KEY (user_id) REFERENCES user (id) ON DELETE CASCADE);",
    indices: &[
        "CREATE INDEX tag_label_index ON tag (label);",
        "CREATE INDEX tag_user_index ON tag (user_id);",
    ],
};
const ARTIST_TABLE_V_0: Table = Table {
    name: "artist",
    schema: "CREATE TABLE artist (id INTEGER PRIMARY KEY, spotify_id TEXT NOT NULL UNIQUE);",
    indices: &[],
};
const ALBUM_TABLE_V_0: Table = Table {
    name: "album",
    schema: "CREATE TABLE album (id INTEGER PRIMARY KEY, spotify_id TEXT NOT NULL UNIQUE);",
    indices: &[],
};
const ARTIST_TAGS_TABLE_V_0: Table = Table {
    name: "artist_tags",
    schema: "CREATE TABLE artist_tags (tag_id INTEGER NOT NULL, artist_id INTEGER NOT NULL, CONSTRAINT unique_artist_tag UNIQUE (tag_id, artist_id), CONSTRAINT tag_id FOREIGN KEY (tag_id) REFERENCES tag (id) ON DELETE CASCADE, CONSTRAINT artist_id FOREIGN KEY (artist_id) REFERENCES artist (id) ON DELETE CASCADE);",
    indices: &["CREATE INDEX artist_tags_artist_index ON artist_tags (artist_id);"],
};
const ALBUM_TAGS_TABLE_V_0: Table = Table {
    name: "album_tags",
    schema: "CREATE TABLE album_tags (tag_id INTEGER NOT NULL, album_id INTEGER NOT NULL, CONSTRAINT unique_album_tag UNIQUE (tag_id, album_id), CONSTRAINT tag_id FOREIGN KEY (tag_id) REFERENCES tag (id) ON DELETE CASCADE, CONSTRAINT album_id FOREIGN KEY (album_id) REFERENCES album (id) ON DELETE CASCADE);",
    indices: &["CREATE INDEX album_tags_album_index ON album_tags (album_id);"],
};

pub const VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        USER_TABLE_V_0,
        TAG_TABLE_V_0,
        ARTIST_TABLE_V_0,
        ALBUM_TABLE_V_0,
        ARTIST_TAGS_TABLE_V_0,
        ALBUM_TAGS_TABLE_V_0,
    ],
}];

/// Creates every table of `schema` and stamps the database version.
pub fn create(conn: &Connection, schema: &VersionedSchema) -> rusqlite::Result<()> {
    for table in schema.tables {
        conn.execute(table.schema, [])?;
        for index in table.indices {
            conn.execute(index, [])?;
        }
    }
    conn.execute(
        &format!("PRAGMA user_version = {}", BASE_DB_VERSION + schema.version),
        [],
    )?;
    Ok(())
}

/// Returns the names of the tables `schema` expects that are missing.
pub fn missing_tables(conn: &Connection, schema: &VersionedSchema) -> rusqlite::Result<Vec<&'static str>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table';")?;
    let existing: Vec<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<_, _>>()?;

    Ok(schema
        .tables
        .iter()
        .map(|t| t.name)
        .filter(|name| !existing.iter().any(|e| e == name))
        .collect())
}
