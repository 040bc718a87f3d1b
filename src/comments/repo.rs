use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Comment on a post. Soft-deleted like the other entities.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub name: String,
    pub email: String,
    pub body: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

#[derive(Debug)]
pub struct NewComment {
    pub post_id: Uuid,
    pub name: String,
    pub email: String,
    pub body: String,
}

#[derive(Debug, Default)]
pub struct CommentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub body: Option<String>,
}

const COMMENT_COLUMNS: &str =
    "id, post_id, name, email, body, created_at, updated_at, deleted_at";

impl Comment {
    pub async fn create(db: &PgPool, new: NewComment) -> sqlx::Result<Comment> {
        sqlx::query_as::<_, Comment>(&format!(
            r#"
            INSERT INTO comments (post_id, name, email, body)
            VALUES ($1, $2, $3, $4)
            RETURNING {COMMENT_COLUMNS}
            "#,
        ))
        .bind(new.post_id)
        .bind(new.name)
        .bind(new.email)
        .bind(new.body)
        .fetch_one(db)
        .await
    }

    pub async fn find_all(db: &PgPool) -> sqlx::Result<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        ))
        .fetch_all(db)
        .await
    }

    pub async fn find_one(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Comment>> {
        sqlx::query_as::<_, Comment>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Patch by id without the soft-delete filter.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        patch: CommentPatch,
    ) -> sqlx::Result<Option<Comment>> {
        sqlx::query_as::<_, Comment>(&format!(
            r#"
            UPDATE comments
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                body = COALESCE($4, body),
                updated_at = now()
            WHERE id = $1
            RETURNING {COMMENT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.body)
        .fetch_optional(db)
        .await
    }

    pub async fn remove(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Comment>> {
        sqlx::query_as::<_, Comment>(&format!(
            r#"
            UPDATE comments
            SET deleted_at = now(), updated_at = now()
            WHERE id = $1
            RETURNING {COMMENT_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }
}
