use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Blog post. Same soft-delete convention as users and comments.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub published: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

#[derive(Debug)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub author: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub published: bool,
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub published: Option<bool>,
}
