use crate::{
    error::{Error, Result},
    store::{TagStore, User},
    utils,
};

/// Validates the registration fields and stores a new account with a
/// salted password hash.
pub fn register_user<S: TagStore + ?Sized>(
    store: &S,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User> {
    let username = username.trim();
    let email = email.trim();

    if username.is_empty() {
        return Err(Error::BadRequest("username must not be empty".to_string()));
    }
    if !email.contains('@') {
        return Err(Error::BadRequest(format!("invalid email address: {}", email)));
    }
    if password.is_empty() {
        return Err(Error::BadRequest("password must not be empty".to_string()));
    }

    let hash = utils::hash_password(password)?;
    store.create_user(username, email, &hash)
}

/// Returns the user if the password matches, [`Error::Unauthorized`]
/// otherwise. Unknown usernames and wrong passwords are indistinguishable.
pub fn authenticate<S: TagStore + ?Sized>(store: &S, username: &str, password: &str) -> Result<User> {
    match store.get_user(username)? {
        Some(user) if utils::verify_password(password, &user.password_hash) => Ok(user),
        _ => Err(Error::Unauthorized),
    }
}

/// Looks up a user for local CLI use, where no password is asked.
pub fn find_user<S: TagStore + ?Sized>(store: &S, username: &str) -> Result<User> {
    store
        .get_user(username)?
        .ok_or_else(|| Error::NotFound(format!("user {}", username)))
}
