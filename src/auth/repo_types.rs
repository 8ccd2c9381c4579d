use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the credential store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                   // unique user ID
    pub name: String,               // display name
    pub email: String,              // normalized (lowercase) email
    #[serde(skip_serializing)]
    pub password_hash: String,      // Argon2 hash, not exposed in JSON
    pub work: String,               // free-text work field
    pub created_at: OffsetDateTime, // creation timestamp
    pub updated_at: OffsetDateTime, // last modification timestamp
}

/// Candidate record handed to `UserStore::insert`. The id is chosen by the
/// caller so a token can be issued before the row exists.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub work: String,
}
