use reqwest::Client;

use crate::{
    error::Result,
    spotify::check_status,
    types::{AlbumObject, GetSeveralAlbumsResponse},
};

/// Spotify accepts at most 20 ids per `GET /albums` call.
pub const MAX_ALBUM_IDS: usize = 20;

/// Retrieves album objects for a batch of ids.
///
/// Combines up to [`MAX_ALBUM_IDS`] ids per request. Unknown ids come back
/// as `null` and are skipped.
///
/// # API Endpoint
///
/// `GET /albums?ids={ids}`
///
/// # Example
///
/// ```
/// let ids = vec!["4aawyAB9vmqN3uQ7FjRGTy".to_string()];
/// let albums = get_several_albums(&client, &api_url, &token, &ids).await?;
/// ```
pub async fn get_several_albums(
    client: &Client,
    api_url: &str,
    token: &str,
    ids: &[String],
) -> Result<Vec<AlbumObject>> {
    let mut albums = Vec::with_capacity(ids.len());

    for chunk in ids.chunks(MAX_ALBUM_IDS) {
        let response = client
            .get(format!("{url}/albums", url = api_url))
            .query(&[("ids", chunk.join(","))])
            .bearer_auth(token)
            .send()
            .await?;

        let json = check_status(response)?
            .json::<GetSeveralAlbumsResponse>()
            .await?;
        albums.extend(json.albums.into_iter().flatten());
    }

    Ok(albums)
}
