use chrono::Utc;
use tokio::sync::Mutex;

use crate::{error::Result, spotify, types::Token};

/// Seconds before the reported expiry at which a token is renewed.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// Holds the client-credentials access token and renews it when it is about
/// to expire. Shared by every request, so the token lives behind a mutex.
pub struct TokenManager {
    client_id: String,
    client_secret: String,
    token: Mutex<Option<Token>>,
}

impl TokenManager {
    pub fn new(client_id: String, client_secret: String) -> Self {
        TokenManager {
            client_id,
            client_secret,
            token: Mutex::new(None),
        }
    }

    pub async fn get_valid_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;

        if let Some(current) = token.as_ref() {
            if !is_expired(current, Utc::now().timestamp() as u64) {
                return Ok(current.access_token.clone());
            }
        }

        let fresh =
            spotify::auth::request_client_token(&self.client_id, &self.client_secret).await?;
        let access_token = fresh.access_token.clone();
        *token = Some(fresh);
        Ok(access_token)
    }
}

fn is_expired(token: &Token, now: u64) -> bool {
    now + EXPIRY_MARGIN_SECS >= token.obtained_at + token.expires_in
}
