use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{AuthPayload, LoginInput, LogoutPayload, PublicUser, SignupInput},
        repo_types::{NewUser, User},
    },
    error::AuthError,
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const LOGOUT_MESSAGE: &str = "User logged out successfully";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Emails compare case-insensitively everywhere.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_signup(input: &SignupInput) -> Result<(), AuthError> {
    if input.name.trim().is_empty() {
        return Err(AuthError::InvalidInput("Name is required".into()));
    }
    if !is_valid_email(&input.email) {
        return Err(AuthError::InvalidInput("Invalid email".into()));
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::InvalidInput("Password too short".into()));
    }
    if input.work.trim().is_empty() {
        return Err(AuthError::InvalidInput("Work is required".into()));
    }
    Ok(())
}

fn sign_token(state: &AppState, user_id: Uuid) -> Result<String, AuthError> {
    state
        .keys
        .sign(user_id)
        .map_err(|e| AuthError::internal("jwt sign failed", e))
}

fn issue(state: &AppState, user: User) -> Result<AuthPayload, AuthError> {
    let token = sign_token(state, user.id)?;
    Ok(AuthPayload {
        token,
        user: PublicUser::from(user),
    })
}

#[instrument(skip(state, input), fields(email = %input.email.trim()))]
pub async fn signup(state: &AppState, mut input: SignupInput) -> Result<AuthPayload, AuthError> {
    input.email = normalize_email(&input.email);
    validate_signup(&input)?;

    // Fast path; the store's uniqueness check below is what actually decides.
    if state.store.find_by_email(&input.email).await?.is_some() {
        warn!(email = %input.email, "email already registered");
        return Err(AuthError::UserAlreadyExists);
    }

    // Sign before insert: a signing failure must leave no account behind.
    let id = Uuid::new_v4();
    let token = sign_token(state, id)?;

    let password_hash = state
        .passwords
        .hash_blocking(input.password)
        .await
        .map_err(|e| AuthError::internal("hash_password failed", e))?;

    let user = match state
        .store
        .insert(NewUser {
            id,
            name: input.name.trim().to_string(),
            email: input.email,
            password_hash,
            work: input.work.trim().to_string(),
        })
        .await
    {
        Ok(user) => user,
        Err(e) => {
            let err = AuthError::from(e);
            if matches!(err, AuthError::UserAlreadyExists) {
                warn!("email registered concurrently");
            }
            return Err(err);
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(AuthPayload {
        token,
        user: PublicUser::from(user),
    })
}

#[instrument(skip(state, input), fields(email = %input.email.trim()))]
pub async fn login(state: &AppState, input: LoginInput) -> Result<AuthPayload, AuthError> {
    let email = normalize_email(&input.email);
    if email.is_empty() || input.password.is_empty() {
        return Err(AuthError::InvalidInput(
            "Email and password are required".into(),
        ));
    }

    let Some(user) = state.store.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AuthError::UserNotFound);
    };

    let ok = state
        .passwords
        .verify_blocking(input.password, user.password_hash.clone())
        .await
        .map_err(|e| AuthError::internal("verify_password failed", e))?;

    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    issue(state, user)
}

/// Verifies the token and that its user still exists. Tokens stay valid
/// until they expire; nothing is revoked.
#[instrument(skip_all)]
pub async fn logout(state: &AppState, token: Option<&str>) -> Result<LogoutPayload, AuthError> {
    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidToken(None))?;

    let claims = state.keys.verify(token).map_err(|e| {
        warn!(reason = %e, "logout with rejected token");
        AuthError::from(e)
    })?;

    if state.store.find_by_id(claims.user_id).await?.is_none() {
        warn!(user_id = %claims.user_id, "logout for missing user");
        return Err(AuthError::UserNotFound);
    }

    info!(user_id = %claims.user_id, "user logged out");
    Ok(LogoutPayload {
        message: LOGOUT_MESSAGE.to_string(),
    })
}
