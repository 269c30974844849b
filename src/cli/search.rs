use tabled::Table;

use crate::{
    cli, error,
    store::{EntityKind, TagStore},
    success,
    types::{AlbumTableRow, ArtistTableRow},
    warning,
};

pub async fn search(query: String) {
    let query = query.trim();
    if query.is_empty() {
        error!("Search query must not be empty");
    }

    let catalog = cli::open_catalog();
    let store = cli::open_store().await;

    let pb = cli::spinner(&format!("Searching artists for '{}'...", query));
    let result = catalog.search_artists(query).await;
    pb.finish_and_clear();

    let artists = match result {
        Ok(artists) => artists,
        Err(e) => error!("Search failed. Err: {}", e),
    };

    if artists.is_empty() {
        warning!("No artists found for '{}'", query);
        return;
    }

    for artist in &artists {
        if let Err(e) = store.get_or_create_entity(EntityKind::Artist, &artist.id) {
            warning!("Cannot record artist {}. Err: {}", artist.id, e);
        }
    }

    success!("Found {} artists", artists.len());
    let rows: Vec<ArtistTableRow> = artists
        .into_iter()
        .map(|a| ArtistTableRow {
            name: a.name,
            id: a.id,
            url: a.url,
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub async fn artist(id: String) {
    let catalog = cli::open_catalog();

    let pb = cli::spinner("Fetching artist...");
    let result = catalog.artist_details(&id).await;
    pb.finish_and_clear();

    let artist = match result {
        Ok(artist) => artist,
        Err(e) => error!("Cannot load artist {}. Err: {}", id, e),
    };

    success!("{} ({})", artist.name, artist.url);
    if let Some(image) = &artist.image {
        println!("Image: {}", image);
    }

    if artist.albums.is_empty() {
        warning!("No albums listed for {}", artist.name);
        return;
    }

    let pb = cli::spinner(&format!("Fetching {} albums...", artist.albums.len()));
    let result = catalog.album_details_many(&artist.albums).await;
    pb.finish_and_clear();

    let mut albums = match result {
        Ok(albums) => albums,
        Err(e) => error!("Cannot load albums of {}. Err: {}", artist.name, e),
    };

    let rows: Vec<AlbumTableRow> = artist
        .albums
        .iter()
        .filter_map(|album_id| albums.remove(album_id))
        .map(|a| AlbumTableRow {
            name: a.name,
            id: a.id,
            url: a.url,
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub async fn album(id: String) {
    let catalog = cli::open_catalog();

    let pb = cli::spinner("Fetching album...");
    let result = catalog.album_details(&id).await;
    pb.finish_and_clear();

    match result {
        Ok(album) => {
            success!("{} ({})", album.name, album.url);
            if let Some(image) = album.image {
                println!("Image: {}", image);
            }
        }
        Err(e) => error!("Cannot load album {}. Err: {}", id, e),
    }
}
