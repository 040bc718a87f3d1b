use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    error::ApiError,
    posts::{
        dto::{CreatePostRequest, UpdatePostRequest},
        repo::{NewPost, Post, PostPatch},
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/bulk", post(bulk_create_posts))
        .route(
            "/posts/:id",
            get(get_post).patch(update_post).delete(delete_post),
        )
}

fn to_new_post(req: CreatePostRequest) -> NewPost {
    NewPost {
        title: req.title,
        body: req.body,
        author: req.author,
        tags: req.tags,
        image_url: req.image_url,
        published: req.published,
    }
}

#[instrument(skip(state, payload))]
async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let payload = payload.normalize();
    payload.validate()?;

    let post = state.posts.create(to_new_post(payload)).await?;
    info!(post_id = %post.id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

#[instrument(skip(state, payload))]
async fn bulk_create_posts(
    State(state): State<AppState>,
    Json(payload): Json<Vec<CreatePostRequest>>,
) -> Result<(StatusCode, Json<Vec<Post>>), ApiError> {
    if payload.is_empty() {
        return Err(ApiError::Validation("at least one post is required".into()));
    }

    let mut new_posts = Vec::with_capacity(payload.len());
    for req in payload {
        let req = req.normalize();
        req.validate()?;
        new_posts.push(to_new_post(req));
    }

    let posts = state.posts.bulk_create(new_posts).await?;
    info!(count = posts.len(), "posts bulk-created");
    Ok((StatusCode::CREATED, Json(posts)))
}

#[instrument(skip(state))]
async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state.posts.find_all().await?;
    Ok(Json(posts))
}

#[instrument(skip(state))]
async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, ApiError> {
    let post = state.posts.find_one(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(post))
}

#[instrument(skip(state, payload))]
async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    let payload = payload.normalize();
    payload.validate()?;

    let patch = PostPatch {
        title: payload.title,
        body: payload.body,
        author: payload.author,
        tags: payload.tags,
        image_url: payload.image_url,
        published: payload.published,
    };
    let post = state
        .posts
        .update(id, patch)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(post))
}

#[instrument(skip(state))]
async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, ApiError> {
    let post = state.posts.remove(id).await?.ok_or(ApiError::NotFound)?;
    info!(post_id = %post.id, "post soft-deleted");
    Ok(Json(post))
}
