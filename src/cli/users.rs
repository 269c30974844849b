use crate::{accounts, cli, error, success};

pub async fn register(username: String, email: String, password: String) {
    let store = cli::open_store().await;

    match accounts::register_user(&store, &username, &email, &password) {
        Ok(user) => success!("Registered {} (id {})", user.username, user.id),
        Err(e) => error!("Cannot register {}. Err: {}", username, e),
    }
}
