use async_trait::async_trait;
use sqlx::PgPool;

use super::transaction::unit_of_work;
use super::{RepositoryError, TagRepository};
use crate::models::{NewTag, Tag};

#[derive(Clone)]
pub struct PgTagRepository {
    pool: PgPool,
}

impl PgTagRepository {
    pub fn new(pool: PgPool) -> Self {
        PgTagRepository { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn get_tag_by_name(&self, name: &str) -> Result<Option<Tag>, RepositoryError> {
        let name = name.to_string();

        unit_of_work(&self.pool, "get_tag_by_name", move |conn| {
            Box::pin(async move {
                let tag: Option<Tag> = sqlx::query_as("SELECT id, name FROM tags WHERE name = $1")
                    .bind(name.as_str())
                    .fetch_optional(&mut *conn)
                    .await?;

                Ok::<_, RepositoryError>(tag)
            })
        })
        .await
    }

    #[tracing::instrument(skip(self), fields(name = %tag.name))]
    async fn create_tag(&self, tag: NewTag) -> Result<Tag, RepositoryError> {
        unit_of_work(&self.pool, "create_tag", move |conn| {
            Box::pin(async move {
                // the unique index on name turns a repeated create into a lookup
                let tag: Tag = sqlx::query_as(
                    "INSERT INTO tags (name)
                    VALUES ($1)
                    ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                    RETURNING id, name",
                )
                .bind(tag.name.as_str())
                .fetch_one(&mut *conn)
                .await?;

                Ok::<_, RepositoryError>(tag)
            })
        })
        .await
    }
}
