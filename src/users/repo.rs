use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database. A set `deleted_at` marks a soft-deleted
/// row: excluded from list/find reads but still addressable by id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl User {
    pub async fn find_all(db: &PgPool) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, name, email, password_hash, created_at, updated_at, deleted_at
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find_one(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, name, email, password_hash, created_at, updated_at, deleted_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Patch by id without the soft-delete filter; deleted rows stay
    /// addressable for direct updates.
    pub async fn update(db: &PgPool, id: Uuid, patch: UserPatch) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                password_hash = COALESCE($5, password_hash),
                updated_at = now()
            WHERE id = $1
            RETURNING id, username, name, email, password_hash, created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .bind(patch.username)
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.password_hash)
        .fetch_optional(db)
        .await
    }

    pub async fn remove(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET deleted_at = now(), updated_at = now()
            WHERE id = $1
            RETURNING id, username, name, email, password_hash, created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_never_serializes() {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            username: "johndoe".into(),
            name: "John Doe".into(),
            email: "john@x.com".into(),
            password_hash: "$2b$10$secret".into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("passwordHash"));
    }
}
