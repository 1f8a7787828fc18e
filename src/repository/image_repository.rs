use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Local;
use sqlx::{PgConnection, PgPool};

use super::transaction::unit_of_work;
use super::{ImageRepository, RepositoryError};
use crate::models::comment::CommentRow;
use crate::models::image::ImageRow;
use crate::models::{Comment, Image, NewComment, NewImage, Tag};

const SELECT_IMAGE: &str = "
    SELECT
        i.id,
        i.title,
        i.description,
        i.image_file,
        i.uploaded_on,
        i.user_id,
        u.username
    FROM
        images i
        JOIN users u ON u.id = i.user_id";

#[derive(Clone)]
pub struct PgImageRepository {
    pool: PgPool,
}

impl PgImageRepository {
    pub fn new(pool: PgPool) -> Self {
        PgImageRepository { pool }
    }
}

async fn fetch_tags(
    conn: &mut PgConnection,
    image_ids: &[i32],
) -> Result<HashMap<i32, Vec<Tag>>, sqlx::Error> {
    if image_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i32, i32, String)> = sqlx::query_as(
        "SELECT
            it.image_id,
            t.id,
            t.name
        FROM
            image_tags it
            JOIN tags t ON t.id = it.tag_id
        WHERE
            it.image_id = ANY($1)
        ORDER BY
            it.image_id,
            it.position",
    )
    .bind(image_ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut tag_map: HashMap<i32, Vec<Tag>> = HashMap::new();
    for (image_id, id, name) in rows {
        tag_map.entry(image_id).or_default().push(Tag { id, name });
    }

    Ok(tag_map)
}

async fn fetch_comments(
    conn: &mut PgConnection,
    image_id: i32,
) -> Result<Vec<Comment>, sqlx::Error> {
    let rows: Vec<CommentRow> = sqlx::query_as(
        "SELECT
            c.id,
            c.text,
            c.created_date,
            c.image_id,
            c.user_id,
            u.username
        FROM
            comments c
            JOIN users u ON u.id = c.user_id
        WHERE
            c.image_id = $1
        ORDER BY
            c.id",
    )
    .bind(image_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(Comment::from).collect())
}

/// Loads one image and its tags, optionally restricted to an owner.
async fn fetch_image(
    conn: &mut PgConnection,
    image_id: i32,
    owner_id: Option<i32>,
) -> Result<Option<Image>, sqlx::Error> {
    let sql = match owner_id {
        Some(_) => format!("{SELECT_IMAGE} WHERE i.id = $1 AND i.user_id = $2"),
        None => format!("{SELECT_IMAGE} WHERE i.id = $1"),
    };

    let mut query = sqlx::query_as::<_, ImageRow>(&sql).bind(image_id);
    if let Some(user_id) = owner_id {
        query = query.bind(user_id);
    }

    let Some(row) = query.fetch_optional(&mut *conn).await? else {
        return Ok(None);
    };

    let mut tag_map = fetch_tags(&mut *conn, &[row.id]).await?;
    let tags = tag_map.remove(&row.id).unwrap_or_default();

    Ok(Some(row.into_image(tags, Vec::new())))
}

async fn attach_tags(
    conn: &mut PgConnection,
    image_id: i32,
    tags: &[Tag],
) -> Result<(), sqlx::Error> {
    for (position, tag) in tags.iter().enumerate() {
        sqlx::query(
            "INSERT INTO image_tags (image_id, tag_id, position)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING",
        )
        .bind(image_id)
        .bind(tag.id)
        .bind(position as i32)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

#[async_trait]
impl ImageRepository for PgImageRepository {
    #[tracing::instrument(skip(self, image), fields(title = %image.title, owner = image.owner.id))]
    async fn create_image(&self, image: NewImage) -> Result<Image, RepositoryError> {
        unit_of_work(&self.pool, "create_image", move |conn| {
            Box::pin(async move {
                let (id,): (i32,) = sqlx::query_as(
                    "INSERT INTO images
                        (title, description, image_file, uploaded_on, user_id)
                    VALUES
                        ($1, $2, $3, $4, $5)
                    RETURNING id",
                )
                .bind(image.title.as_str())
                .bind(image.description.as_str())
                .bind(image.image_file.as_str())
                .bind(image.uploaded_on)
                .bind(image.owner.id)
                .fetch_one(&mut *conn)
                .await?;

                attach_tags(conn, id, &image.tags).await?;

                tracing::info!(image_id = id, "image stored");
                Ok::<_, RepositoryError>(image.into_image(id))
            })
        })
        .await
    }

    async fn list_images(&self) -> Result<Vec<Image>, RepositoryError> {
        unit_of_work(&self.pool, "list_images", |conn| {
            Box::pin(async move {
                let rows: Vec<ImageRow> = sqlx::query_as(&format!("{SELECT_IMAGE} ORDER BY i.id"))
                    .fetch_all(&mut *conn)
                    .await?;

                let image_ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
                let mut tag_map = fetch_tags(conn, &image_ids).await?;

                let images = rows
                    .into_iter()
                    .map(|row| {
                        let tags = tag_map.remove(&row.id).unwrap_or_default();
                        row.into_image(tags, Vec::new())
                    })
                    .collect();

                Ok::<_, RepositoryError>(images)
            })
        })
        .await
    }

    async fn get_image_by_id(&self, image_id: i32) -> Result<Option<Image>, RepositoryError> {
        unit_of_work(&self.pool, "get_image_by_id", move |conn| {
            Box::pin(async move {
                let Some(mut image) = fetch_image(&mut *conn, image_id, None).await? else {
                    return Ok(None);
                };
                image.comments = fetch_comments(conn, image_id).await?;

                Ok::<_, RepositoryError>(Some(image))
            })
        })
        .await
    }

    async fn get_image_by_id_and_owner(
        &self,
        image_id: i32,
        user_id: i32,
    ) -> Result<Option<Image>, RepositoryError> {
        unit_of_work(&self.pool, "get_image_by_id_and_owner", move |conn| {
            Box::pin(async move {
                let image = fetch_image(conn, image_id, Some(user_id)).await?;
                Ok::<_, RepositoryError>(image)
            })
        })
        .await
    }

    #[tracing::instrument(skip(self, image), fields(image_id = image.id))]
    async fn update_image(&self, image: &Image) -> Result<(), RepositoryError> {
        let image = image.clone();

        unit_of_work(&self.pool, "update_image", move |conn| {
            Box::pin(async move {
                let result = sqlx::query(
                    "UPDATE images
                    SET
                        title = $1,
                        description = $2,
                        image_file = $3,
                        uploaded_on = $4
                    WHERE
                        id = $5",
                )
                .bind(image.title.as_str())
                .bind(image.description.as_str())
                .bind(image.image_file.as_str())
                .bind(image.uploaded_on)
                .bind(image.id)
                .execute(&mut *conn)
                .await?;

                if result.rows_affected() == 0 {
                    tracing::debug!("update matched no image");
                    return Ok(());
                }

                sqlx::query("DELETE FROM image_tags WHERE image_id = $1")
                    .bind(image.id)
                    .execute(&mut *conn)
                    .await?;
                attach_tags(conn, image.id, &image.tags).await?;

                Ok::<_, RepositoryError>(())
            })
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_image(
        &self,
        image_id: i32,
        user_id: i32,
    ) -> Result<Option<Image>, RepositoryError> {
        unit_of_work(&self.pool, "delete_image", move |conn| {
            Box::pin(async move {
                let Some(mut image) = fetch_image(&mut *conn, image_id, Some(user_id)).await? else {
                    tracing::debug!("no image matched id and owner");
                    return Ok(None);
                };
                image.comments = fetch_comments(&mut *conn, image_id).await?;

                // comments and tag links go with the image (ON DELETE CASCADE)
                sqlx::query("DELETE FROM images WHERE id = $1 AND user_id = $2")
                    .bind(image_id)
                    .bind(user_id)
                    .execute(&mut *conn)
                    .await?;

                Ok::<_, RepositoryError>(Some(image))
            })
        })
        .await
    }

    #[tracing::instrument(skip(self, comment), fields(author = comment.author.id))]
    async fn save_comment(
        &self,
        image_id: i32,
        comment: NewComment,
    ) -> Result<Option<Comment>, RepositoryError> {
        let created_date = Local::now().date_naive();

        unit_of_work(&self.pool, "save_comment", move |conn| {
            Box::pin(async move {
                let image: Option<(i32,)> = sqlx::query_as("SELECT id FROM images WHERE id = $1")
                    .bind(image_id)
                    .fetch_optional(&mut *conn)
                    .await?;

                if image.is_none() {
                    tracing::debug!("comment target image not found");
                    return Ok(None);
                }

                let (id,): (i32,) = sqlx::query_as(
                    "INSERT INTO comments
                        (text, created_date, image_id, user_id)
                    VALUES
                        ($1, $2, $3, $4)
                    RETURNING id",
                )
                .bind(comment.text.as_str())
                .bind(created_date)
                .bind(image_id)
                .bind(comment.author.id)
                .fetch_one(&mut *conn)
                .await?;

                Ok::<_, RepositoryError>(Some(Comment {
                    id,
                    text: comment.text,
                    created_date,
                    image_id,
                    author: comment.author,
                }))
            })
        })
        .await
    }
}
