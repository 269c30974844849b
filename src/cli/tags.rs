use tabled::Table;

use crate::{
    accounts, cli, error, info,
    store::{EntityKind, SqliteTagStore, User},
    success, tagging,
    types::TagTableRow,
    warning,
};

fn user_or_exit(store: &SqliteTagStore, username: &str) -> User {
    match accounts::find_user(store, username) {
        Ok(user) => user,
        Err(e) => error!("Cannot use account {}. Err: {}", username, e),
    }
}

/// Replaces the user's tags on an artist or album with `tags`, a
/// `;`-delimited list. An empty list removes all of them.
pub async fn tag(kind: EntityKind, id: String, tags: String, username: String) {
    let store = cli::open_store().await;
    let user = user_or_exit(&store, &username);

    let report = match tagging::set_entity_tags(&store, user.id, kind, &id, &tags) {
        Ok(report) => report,
        Err(e) => error!("Cannot update tags of {} {}. Err: {}", kind, id, e),
    };

    if report.is_noop() {
        info!("Tags of {} {} already up to date", kind, id);
    } else {
        if !report.created.is_empty() {
            info!("New tags: {}", report.created.join(", "));
        }
        if !report.linked.is_empty() {
            info!("Added: {}", report.linked.join(", "));
        }
        if !report.unlinked.is_empty() {
            info!("Removed: {}", report.unlinked.join(", "));
        }
    }

    match tagging::entity_labels(&store, user.id, kind, &id) {
        Ok(current) if current.is_empty() => success!("{} {} has no tags", kind, id),
        Ok(current) => success!("{} {} tagged: {}", kind, id, tagging::join_labels(&current)),
        Err(e) => warning!("Cannot read back tags. Err: {}", e),
    }
}

/// Prints every tag of the user with the artists and albums it is on.
pub async fn list_tags(username: String) {
    let store = cli::open_store().await;
    let user = user_or_exit(&store, &username);

    let overview = match tagging::tag_overview(&store, user.id) {
        Ok(overview) => overview,
        Err(e) => error!("Cannot load tags of {}. Err: {}", username, e),
    };

    if overview.is_empty() {
        warning!("No tags found for user {}", username);
        return;
    }

    let artist_ids: Vec<String> = overview.iter().flat_map(|o| o.artists.clone()).collect();
    let album_ids: Vec<String> = overview.iter().flat_map(|o| o.albums.clone()).collect();

    let catalog = cli::open_catalog();
    let pb = cli::spinner("Resolving tagged artists and albums...");
    let artists = catalog.artist_details_many(&artist_ids).await;
    let albums = catalog.album_details_many(&album_ids).await;
    pb.finish_and_clear();

    let (artists, albums) = match (artists, albums) {
        (Ok(artists), Ok(albums)) => (artists, albums),
        (Err(e), _) | (_, Err(e)) => error!("Cannot resolve tagged items. Err: {}", e),
    };

    let mut rows = Vec::new();
    for entry in &overview {
        if entry.artists.is_empty() && entry.albums.is_empty() {
            rows.push(TagTableRow {
                tag: entry.label.clone(),
                kind: "-".to_string(),
                name: "-".to_string(),
                id: "-".to_string(),
            });
            continue;
        }

        for id in &entry.artists {
            rows.push(TagTableRow {
                tag: entry.label.clone(),
                kind: EntityKind::Artist.to_string(),
                name: artists.get(id).map(|a| a.name.clone()).unwrap_or_default(),
                id: id.clone(),
            });
        }
        for id in &entry.albums {
            rows.push(TagTableRow {
                tag: entry.label.clone(),
                kind: EntityKind::Album.to_string(),
                name: albums.get(id).map(|a| a.name.clone()).unwrap_or_default(),
                id: id.clone(),
            });
        }
    }

    success!("{} tags for {}", overview.len(), username);
    println!("{}", Table::new(rows));
}
