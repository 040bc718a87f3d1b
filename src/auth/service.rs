use lazy_static::lazy_static;
use regex::Regex;
use tokio::task;
use tracing::{info, warn};

use crate::auth::dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::store::{CredentialStore, NewUser};
use crate::error::ApiError;
use crate::users::repo::User;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref USERNAME_RE: Regex = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_username(username: &str) -> bool {
    (3..=30).contains(&username.chars().count()) && USERNAME_RE.is_match(username)
}

/// bcrypt is CPU-bound, so it runs off the request-handling runtime.
pub async fn hash_password_blocking(plain: String, cost: u32) -> Result<String, ApiError> {
    task::spawn_blocking(move || hash_password(&plain, cost))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .map_err(ApiError::Internal)
}

/// Create a user record: uniqueness check, hash off the runtime, insert.
/// The unique indexes are the authoritative guard against concurrent
/// registrations; the lookup here is only an early exit.
pub async fn create_user(
    store: &dyn CredentialStore,
    bcrypt_cost: u32,
    input: RegisterRequest,
) -> Result<User, ApiError> {
    if store
        .find_conflict(&input.username, &input.email)
        .await?
        .is_some()
    {
        warn!(username = %input.username, "registration conflict");
        return Err(ApiError::Conflict);
    }

    let password_hash = hash_password_blocking(input.password, bcrypt_cost).await?;

    let user = store
        .insert(NewUser {
            username: input.username,
            name: input.name,
            email: input.email,
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

pub async fn register(
    store: &dyn CredentialStore,
    keys: &JwtKeys,
    bcrypt_cost: u32,
    input: RegisterRequest,
) -> Result<AuthResponse, ApiError> {
    let user = create_user(store, bcrypt_cost, input).await?;
    init_session(keys, &user)
}

pub async fn login(
    store: &dyn CredentialStore,
    keys: &JwtKeys,
    input: LoginRequest,
) -> Result<AuthResponse, ApiError> {
    let ident = input.username.trim().to_string();

    // Missing user and wrong password must be indistinguishable.
    let Some(user) = store.find_active_by_identifier(&ident).await? else {
        warn!("login for unknown identifier");
        return Err(ApiError::Unauthorized);
    };

    let plain = input.password;
    let hash = user.password_hash.clone();
    let ok = task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .map_err(ApiError::Internal)?;

    if !ok {
        warn!(user_id = %user.id, "login password mismatch");
        return Err(ApiError::Unauthorized);
    }

    info!(user_id = %user.id, "user logged in");
    init_session(keys, &user)
}

/// Stateless: claims are derived from the record and signed, nothing is
/// persisted.
pub fn init_session(keys: &JwtKeys, user: &User) -> Result<AuthResponse, ApiError> {
    let access_token = keys.sign(user)?;
    Ok(AuthResponse {
        access_token,
        user: PublicUser::from(user),
    })
}
