use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::User;

/// Input of the `signupUser` operation.
#[derive(Debug, Deserialize)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub work: String,
}

/// Input of the `loginUser` operation.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Input of the `logoutUser` operation. The token may instead arrive as a
/// bearer header.
#[derive(Debug, Default, Deserialize)]
pub struct LogoutInput {
    #[serde(default)]
    pub token: Option<String>,
}

/// Returned by signup and login.
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub work: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            work: user.work,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogoutPayload {
    pub message: String,
}
