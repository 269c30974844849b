use chrono::Utc;
use reqwest::Client;

use crate::{
    config,
    error::Result,
    spotify::check_status,
    types::{Token, TokenResponse},
};

/// Requests an app-only access token with the client-credentials grant.
///
/// spotitag never acts on behalf of a Spotify user: searching and reading
/// artist/album metadata only needs an application token, so there is no
/// authorization redirect and no refresh token. The client id and secret are
/// sent as HTTP Basic credentials.
///
/// # Errors
///
/// Network failures and non-success statuses are returned as
/// [`crate::Error::Remote`]; a 429 becomes [`crate::Error::RateLimited`].
pub async fn request_client_token(client_id: &str, client_secret: &str) -> Result<Token> {
    let client = Client::new();
    let response = client
        .post(config::spotify_apitoken_url())
        .basic_auth(client_id, Some(client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?;

    let json = check_status(response)?.json::<TokenResponse>().await?;

    Ok(Token {
        access_token: json.access_token,
        expires_in: json.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
