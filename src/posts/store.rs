use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::posts::repo::{NewPost, Post, PostPatch};

const POST_COLUMNS: &str =
    "id, title, body, author, tags, image_url, published, created_at, updated_at, deleted_at";

/// Persistence seam for posts. List/find reads exclude soft-deleted rows;
/// update and remove address rows by bare id.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create(&self, new: NewPost) -> anyhow::Result<Post>;

    /// Insert a batch atomically, preserving input order in the result.
    async fn bulk_create(&self, posts: Vec<NewPost>) -> anyhow::Result<Vec<Post>>;

    async fn find_all(&self) -> anyhow::Result<Vec<Post>>;

    async fn find_one(&self, id: Uuid) -> anyhow::Result<Option<Post>>;

    /// Patch by id without the soft-delete filter; deleted rows stay
    /// addressable for direct updates.
    async fn update(&self, id: Uuid, patch: PostPatch) -> anyhow::Result<Option<Post>>;

    async fn remove(&self, id: Uuid) -> anyhow::Result<Option<Post>>;
}

pub struct PgPostStore {
    db: PgPool,
}

impl PgPostStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn create(&self, new: NewPost) -> anyhow::Result<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (title, body, author, tags, image_url, published)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(new.title)
        .bind(new.body)
        .bind(new.author)
        .bind(new.tags)
        .bind(new.image_url)
        .bind(new.published)
        .fetch_one(&self.db)
        .await?;
        Ok(post)
    }

    async fn bulk_create(&self, posts: Vec<NewPost>) -> anyhow::Result<Vec<Post>> {
        let mut tx = self.db.begin().await?;
        let mut created = Vec::with_capacity(posts.len());
        for new in posts {
            let post = sqlx::query_as::<_, Post>(&format!(
                r#"
                INSERT INTO posts (title, body, author, tags, image_url, published)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING {POST_COLUMNS}
                "#,
            ))
            .bind(new.title)
            .bind(new.body)
            .bind(new.author)
            .bind(new.tags)
            .bind(new.image_url)
            .bind(new.published)
            .fetch_one(&mut *tx)
            .await?;
            created.push(post);
        }
        tx.commit().await?;
        Ok(created)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(posts)
    }

    async fn find_one(&self, id: Uuid) -> anyhow::Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(post)
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> anyhow::Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                body = COALESCE($3, body),
                author = COALESCE($4, author),
                tags = COALESCE($5, tags),
                image_url = COALESCE($6, image_url),
                published = COALESCE($7, published),
                updated_at = now()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.body)
        .bind(patch.author)
        .bind(patch.tags)
        .bind(patch.image_url)
        .bind(patch.published)
        .fetch_optional(&self.db)
        .await?;
        Ok(post)
    }

    async fn remove(&self, id: Uuid) -> anyhow::Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET deleted_at = now(), updated_at = now()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(post)
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use time::OffsetDateTime;

    use super::*;

    /// In-memory store mirroring the SQL predicates: reads filter on the
    /// deletion timestamp, update and remove address rows by bare id.
    #[derive(Default)]
    pub struct InMemoryPostStore {
        pub records: Mutex<Vec<Post>>,
    }

    fn materialize(new: NewPost) -> Post {
        let now = OffsetDateTime::now_utc();
        Post {
            id: Uuid::new_v4(),
            title: new.title,
            body: new.body,
            author: new.author,
            tags: new.tags,
            image_url: new.image_url,
            published: new.published,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[async_trait]
    impl PostStore for InMemoryPostStore {
        async fn create(&self, new: NewPost) -> anyhow::Result<Post> {
            let post = materialize(new);
            self.records.lock().unwrap().push(post.clone());
            Ok(post)
        }

        async fn bulk_create(&self, posts: Vec<NewPost>) -> anyhow::Result<Vec<Post>> {
            let mut records = self.records.lock().unwrap();
            let mut created = Vec::with_capacity(posts.len());
            for new in posts {
                let post = materialize(new);
                records.push(post.clone());
                created.push(post);
            }
            Ok(created)
        }

        async fn find_all(&self) -> anyhow::Result<Vec<Post>> {
            let records = self.records.lock().unwrap();
            Ok(records
                .iter()
                .filter(|p| p.deleted_at.is_none())
                .cloned()
                .collect())
        }

        async fn find_one(&self, id: Uuid) -> anyhow::Result<Option<Post>> {
            let records = self.records.lock().unwrap();
            Ok(records
                .iter()
                .find(|p| p.id == id && p.deleted_at.is_none())
                .cloned())
        }

        async fn update(&self, id: Uuid, patch: PostPatch) -> anyhow::Result<Option<Post>> {
            let mut records = self.records.lock().unwrap();
            let Some(post) = records.iter_mut().find(|p| p.id == id) else {
                return Ok(None);
            };
            if let Some(title) = patch.title {
                post.title = title;
            }
            if let Some(body) = patch.body {
                post.body = body;
            }
            if let Some(author) = patch.author {
                post.author = author;
            }
            if let Some(tags) = patch.tags {
                post.tags = tags;
            }
            if let Some(image_url) = patch.image_url {
                post.image_url = Some(image_url);
            }
            if let Some(published) = patch.published {
                post.published = published;
            }
            post.updated_at = OffsetDateTime::now_utc();
            Ok(Some(post.clone()))
        }

        async fn remove(&self, id: Uuid) -> anyhow::Result<Option<Post>> {
            let mut records = self.records.lock().unwrap();
            let Some(post) = records.iter_mut().find(|p| p.id == id) else {
                return Ok(None);
            };
            let now = OffsetDateTime::now_utc();
            post.deleted_at = Some(now);
            post.updated_at = now;
            Ok(Some(post.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::InMemoryPostStore;
    use super::*;

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: title.into(),
            body: "Long enough body text".into(),
            author: "John Doe".into(),
            tags: vec![],
            image_url: None,
            published: false,
        }
    }

    #[tokio::test]
    async fn soft_deleted_post_leaves_list_and_find_but_stays_updatable() {
        let store = InMemoryPostStore::default();
        let post = store.create(new_post("My first post")).await.unwrap();

        let removed = store.remove(post.id).await.unwrap().expect("removed");
        assert!(removed.deleted_at.is_some());

        assert!(store.find_all().await.unwrap().is_empty());
        assert!(store.find_one(post.id).await.unwrap().is_none());

        // Direct id-based update does not apply the soft-delete filter.
        let patch = PostPatch {
            title: Some("Edited after delete".into()),
            ..Default::default()
        };
        let updated = store.update(post.id, patch).await.unwrap().expect("updated");
        assert_eq!(updated.title, "Edited after delete");
        assert!(updated.deleted_at.is_some());
    }

    #[tokio::test]
    async fn find_all_keeps_live_posts_when_another_is_deleted() {
        let store = InMemoryPostStore::default();
        let first = store.create(new_post("First post")).await.unwrap();
        let second = store.create(new_post("Second post")).await.unwrap();

        store.remove(first.id).await.unwrap();

        let live = store.find_all().await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, second.id);
    }

    #[tokio::test]
    async fn bulk_create_preserves_input_order() {
        let store = InMemoryPostStore::default();
        let created = store
            .bulk_create(vec![
                new_post("First post"),
                new_post("Second post"),
                new_post("Third post"),
            ])
            .await
            .unwrap();

        let titles: Vec<&str> = created.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["First post", "Second post", "Third post"]);
    }

    #[tokio::test]
    async fn remove_of_missing_id_is_a_not_found_signal() {
        let store = InMemoryPostStore::default();
        assert!(store.remove(Uuid::new_v4()).await.unwrap().is_none());
    }
}
