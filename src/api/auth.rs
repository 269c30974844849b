use axum::{
    Json,
    extract::{FromRequestParts, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
};
use serde::{Deserialize, Serialize};

use crate::{
    accounts,
    error::{Error, Result},
    server::AppState,
    store::User,
    utils,
};

/// The authenticated caller, resolved from HTTP Basic credentials.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(Error::Unauthorized)?;
        let (username, password) = utils::decode_basic_auth(header).ok_or(Error::Unauthorized)?;

        let user = accounts::authenticate(state.store.as_ref(), &username, &password)?;
        Ok(AuthUser(user))
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub username: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let user = accounts::register_user(
        state.store.as_ref(),
        &request.username,
        &request.email,
        &request.password,
    )?;
    tracing::info!(username = %user.username, "Registered user");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            username: user.username,
        }),
    ))
}
