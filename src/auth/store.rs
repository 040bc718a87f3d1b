use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::users::repo::User;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate username or email")]
    Duplicate,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
            _ => StoreError::Other(e.into()),
        }
    }
}

/// Fields persisted for a new user. The hash is computed by the caller;
/// plaintext never crosses this boundary.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Persistence seam for the auth service.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Any record, deleted or live, holding either identifier.
    async fn find_conflict(&self, username: &str, email: &str)
        -> Result<Option<User>, StoreError>;

    /// Live record whose username or email equals `ident`.
    async fn find_active_by_identifier(&self, ident: &str) -> Result<Option<User>, StoreError>;

    async fn insert(&self, new: NewUser) -> Result<User, StoreError>;
}

pub struct PgCredentialStore {
    db: PgPool,
}

impl PgCredentialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_conflict(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, name, email, password_hash, created_at, updated_at, deleted_at
            FROM users
            WHERE username = $1 OR email = $2
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_active_by_identifier(&self, ident: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, name, email, password_hash, created_at, updated_at, deleted_at
            FROM users
            WHERE (username = $1 OR email = $1) AND deleted_at IS NULL
            "#,
        )
        .bind(ident)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, new: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, name, email, password_hash, created_at, updated_at, deleted_at
            "#,
        )
        .bind(new.username)
        .bind(new.name)
        .bind(new.email)
        .bind(new.password_hash)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;

    /// In-memory store mirroring the unique-index guarantees of the schema.
    #[derive(Default)]
    pub struct InMemoryCredentialStore {
        pub records: Mutex<Vec<User>>,
    }

    impl InMemoryCredentialStore {
        pub fn soft_delete(&self, id: Uuid) {
            let mut records = self.records.lock().unwrap();
            if let Some(user) = records.iter_mut().find(|u| u.id == id) {
                user.deleted_at = Some(OffsetDateTime::now_utc());
            }
        }

        pub fn len(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CredentialStore for InMemoryCredentialStore {
        async fn find_conflict(
            &self,
            username: &str,
            email: &str,
        ) -> Result<Option<User>, StoreError> {
            let records = self.records.lock().unwrap();
            Ok(records
                .iter()
                .find(|u| u.username == username || u.email == email)
                .cloned())
        }

        async fn find_active_by_identifier(
            &self,
            ident: &str,
        ) -> Result<Option<User>, StoreError> {
            let records = self.records.lock().unwrap();
            Ok(records
                .iter()
                .find(|u| u.deleted_at.is_none() && (u.username == ident || u.email == ident))
                .cloned())
        }

        async fn insert(&self, new: NewUser) -> Result<User, StoreError> {
            let mut records = self.records.lock().unwrap();
            if records
                .iter()
                .any(|u| u.username == new.username || u.email == new.email)
            {
                return Err(StoreError::Duplicate);
            }
            let now = OffsetDateTime::now_utc();
            let user = User {
                id: Uuid::new_v4(),
                username: new.username,
                name: new.name,
                email: new.email,
                password_hash: new.password_hash,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };
            records.push(user.clone());
            Ok(user)
        }
    }
}
