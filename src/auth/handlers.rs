use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        jwt::{AuthUser, JwtKeys},
        password,
        service::{self, is_valid_email, is_valid_username},
    },
    error::ApiError,
    state::AppState,
    users::repo::User,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/me", get(me))
}

pub(crate) fn validate_registration(payload: &RegisterRequest) -> Result<(), ApiError> {
    if !is_valid_username(&payload.username) {
        return Err(ApiError::Validation(
            "username must be 3-30 characters of letters, digits, '-' or '_'".into(),
        ));
    }
    if payload.name.is_empty() {
        return Err(ApiError::Validation("name is required".into()));
    }
    if !is_valid_email(&payload.email) {
        return Err(ApiError::Validation("invalid email".into()));
    }
    if let Err(msg) = password::check_policy(&payload.password) {
        return Err(ApiError::Validation(msg.into()));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let payload = payload.normalize();
    validate_registration(&payload)?;

    let keys = JwtKeys::from_ref(&state);
    let resp = service::register(
        state.users.as_ref(),
        &keys,
        state.config.bcrypt_cost,
        payload,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "username and password are required".into(),
        ));
    }

    let keys = JwtKeys::from_ref(&state);
    let resp = service::login(state.users.as_ref(), &keys, payload).await?;
    Ok(Json(resp))
}

#[instrument(skip(state, claims))]
async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_one(&state.db, claims.sub)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    Ok(Json(PublicUser::from(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RegisterRequest {
        RegisterRequest {
            username: "johndoe".into(),
            name: "John Doe".into(),
            email: "john@x.com".into(),
            password: "Password1!".into(),
        }
    }

    #[test]
    fn validation_accepts_a_well_formed_registration() {
        assert!(validate_registration(&valid()).is_ok());
    }

    #[test]
    fn validation_rejects_bad_username() {
        let mut req = valid();
        req.username = "j!".into();
        assert!(matches!(
            validate_registration(&req),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn validation_rejects_bad_email() {
        let mut req = valid();
        req.email = "john-at-x".into();
        assert!(matches!(
            validate_registration(&req),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn validation_rejects_weak_password() {
        let mut req = valid();
        req.password = "password".into();
        assert!(matches!(
            validate_registration(&req),
            Err(ApiError::Validation(_))
        ));
    }
}
