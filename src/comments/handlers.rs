use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    comments::{
        dto::{CreateCommentRequest, UpdateCommentRequest},
        repo::{Comment, CommentPatch, NewComment},
    },
    error::ApiError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/comments", get(list_comments).post(create_comment))
        .route(
            "/comments/:id",
            get(get_comment).patch(update_comment).delete(delete_comment),
        )
}

#[instrument(skip(state, payload))]
async fn create_comment(
    State(state): State<AppState>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let payload = payload.normalize();
    payload.validate()?;

    let new = NewComment {
        post_id: payload.post_id,
        name: payload.name,
        email: payload.email,
        body: payload.body,
    };
    let comment = match Comment::create(&state.db, new).await {
        Ok(c) => c,
        Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
            return Err(ApiError::Validation(
                "postId does not reference an existing post".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    };
    info!(comment_id = %comment.id, post_id = %comment.post_id, "comment created");
    Ok((StatusCode::CREATED, Json(comment)))
}

#[instrument(skip(state))]
async fn list_comments(State(state): State<AppState>) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = Comment::find_all(&state.db).await?;
    Ok(Json(comments))
}

#[instrument(skip(state))]
async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Comment>, ApiError> {
    let comment = Comment::find_one(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(comment))
}

#[instrument(skip(state, payload))]
async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    let payload = payload.normalize();
    payload.validate()?;

    let patch = CommentPatch {
        name: payload.name,
        email: payload.email,
        body: payload.body,
    };
    let comment = Comment::update(&state.db, id, patch)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(comment))
}

#[instrument(skip(state))]
async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Comment>, ApiError> {
    let comment = Comment::remove(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(comment_id = %comment.id, "comment soft-deleted");
    Ok(Json(comment))
}
