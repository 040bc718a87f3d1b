use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{PublicUser, RegisterRequest},
        handlers::validate_registration,
        service,
    },
    error::ApiError,
    state::AppState,
    users::{
        dto::UpdateUserRequest,
        repo::{User, UserPatch},
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

#[instrument(skip(state, payload))]
async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let payload = payload.normalize();
    validate_registration(&payload)?;

    let user = service::create_user(state.users.as_ref(), state.config.bcrypt_cost, payload).await?;
    Ok((StatusCode::CREATED, Json(PublicUser::from(&user))))
}

#[instrument(skip(state))]
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>, ApiError> {
    let users = User::find_all(&state.db).await?;
    Ok(Json(users.iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state))]
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_one(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(PublicUser::from(&user)))
}

#[instrument(skip(state, payload))]
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let payload = payload.normalize();
    payload.validate()?;

    let password_hash = match payload.password {
        Some(pw) => Some(service::hash_password_blocking(pw, state.config.bcrypt_cost).await?),
        None => None,
    };

    let patch = UserPatch {
        username: payload.username,
        name: payload.name,
        email: payload.email,
        password_hash,
    };
    let user = User::update(&state.db, id, patch)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(PublicUser::from(&user)))
}

#[instrument(skip(state))]
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::remove(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(user_id = %user.id, "user soft-deleted");
    Ok(Json(PublicUser::from(&user)))
}
