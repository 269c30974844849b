use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{
    error::{Error, Result},
    types::Image,
};

/// Picks the URL of the narrowest image, which is the thumbnail Spotify lists.
///
/// Images without a width sort last. Returns `None` when the list is empty.
pub fn smallest_image(images: &[Image]) -> Option<String> {
    images
        .iter()
        .min_by_key(|image| image.width.unwrap_or(u32::MAX))
        .map(|image| image.url.clone())
}

/// Hashes a password with Argon2id and a random salt, returning the PHC
/// string (`$argon2id$v=19$...`) that is stored for the user.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Checks a password against a stored PHC string. A hash that cannot be
/// parsed never matches.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Decodes an `Authorization: Basic ...` header value into a username and
/// password. Returns `None` for any other scheme or malformed payload.
pub fn decode_basic_auth(header_value: &str) -> Option<(String, String)> {
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
