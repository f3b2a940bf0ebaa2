use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,                          // SERIAL, assigned by the store
    pub name: String,                     // unique, at most 30 chars
    pub email: String,                    // unique, at most 100 chars
    #[serde(skip_serializing)]
    pub password: String,                 // Argon2 PHC string, never plaintext
    pub profile_picture: Option<String>,  // base64 of the uploaded image
}

/// Fields supplied on signup; `id` is left to the store.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub profile_picture: Option<&'a str>,
}
