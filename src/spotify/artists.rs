use reqwest::Client;

use crate::{
    error::Result,
    spotify::check_status,
    types::{ArtistObject, GetSeveralArtistsResponse, Paging, SearchArtistsResponse, SimplifiedAlbum},
};

/// Spotify accepts at most 50 ids per `GET /artists` call.
pub const MAX_ARTIST_IDS: usize = 50;

/// Searches artists by name and returns their Spotify ids in ranking order.
///
/// The query is sent as `artist:{query}` so Spotify only matches on the
/// artist name. Ranking is entirely Spotify's.
///
/// # API Endpoint
///
/// `GET /search?q=artist:{query}&type=artist`
pub async fn search_artist_ids(
    client: &Client,
    api_url: &str,
    token: &str,
    query: &str,
) -> Result<Vec<String>> {
    let q = format!("artist:{}", query);
    let response = client
        .get(format!("{uri}/search", uri = api_url))
        .query(&[("q", q.as_str()), ("type", "artist")])
        .bearer_auth(token)
        .send()
        .await?;

    let json = check_status(response)?
        .json::<SearchArtistsResponse>()
        .await?;

    Ok(json.artists.items.into_iter().map(|a| a.id).collect())
}

/// Retrieves artist objects for a batch of ids.
///
/// Ids are sent in chunks of [`MAX_ARTIST_IDS`]. Ids Spotify does not know
/// come back as `null` and are skipped, so the result may be shorter than
/// the input.
///
/// # API Endpoint
///
/// `GET /artists?ids={ids}`
pub async fn get_several_artists(
    client: &Client,
    api_url: &str,
    token: &str,
    ids: &[String],
) -> Result<Vec<ArtistObject>> {
    let mut artists = Vec::with_capacity(ids.len());

    for chunk in ids.chunks(MAX_ARTIST_IDS) {
        let response = client
            .get(format!("{uri}/artists", uri = api_url))
            .query(&[("ids", chunk.join(","))])
            .bearer_auth(token)
            .send()
            .await?;

        let json = check_status(response)?
            .json::<GetSeveralArtistsResponse>()
            .await?;
        artists.extend(json.artists.into_iter().flatten());
    }

    Ok(artists)
}

/// Retrieves the ids of an artist's full-length albums.
///
/// Singles, compilations and appearances are excluded. Pages of 50 are
/// followed through `next` until Spotify reports no further page.
///
/// # API Endpoint
///
/// `GET /artists/{id}/albums?include_groups=album`
pub async fn get_artist_album_ids(
    client: &Client,
    api_url: &str,
    token: &str,
    artist_id: &str,
) -> Result<Vec<String>> {
    let response = client
        .get(format!(
            "{uri}/artists/{id}/albums",
            uri = api_url,
            id = artist_id
        ))
        .query(&[("include_groups", "album"), ("limit", "50")])
        .bearer_auth(token)
        .send()
        .await?;

    let mut page = check_status(response)?
        .json::<Paging<SimplifiedAlbum>>()
        .await?;
    let mut ids: Vec<String> = page.items.drain(..).map(|a| a.id).collect();

    while let Some(next) = page.next.take() {
        let response = client.get(next).bearer_auth(token).send().await?;
        page = check_status(response)?
            .json::<Paging<SimplifiedAlbum>>()
            .await?;
        ids.extend(page.items.drain(..).map(|a| a.id));
    }

    Ok(ids)
}
