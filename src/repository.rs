//! Persistence gateway.
//!
//! Every operation runs inside its own unit of work (see [`transaction`]).
//! Lookups return `Ok(None)` when no row matches; `Err` is reserved for store
//! failures, after the transaction has been rolled back.

pub mod image_repository;
#[cfg(test)]
pub mod memory;
pub mod tag_repository;
pub mod transaction;
pub mod user_repository;

use async_trait::async_trait;

use crate::models::{Comment, Image, NewComment, NewImage, NewTag, NewUser, Tag, User};

pub use image_repository::PgImageRepository;
pub use tag_repository::PgTagRepository;
pub use user_repository::PgUserRepository;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0} already exists")]
    Duplicate(String),
}

#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn create_image(&self, image: NewImage) -> Result<Image, RepositoryError>;

    async fn list_images(&self) -> Result<Vec<Image>, RepositoryError>;

    /// The image with its tags and comments.
    async fn get_image_by_id(&self, image_id: i32) -> Result<Option<Image>, RepositoryError>;

    /// `None` both when the image is missing and when `user_id` does not own it.
    async fn get_image_by_id_and_owner(
        &self,
        image_id: i32,
        user_id: i32,
    ) -> Result<Option<Image>, RepositoryError>;

    /// Replaces title, description, payload, upload date and tags. The owner is never changed.
    async fn update_image(&self, image: &Image) -> Result<(), RepositoryError>;

    async fn delete_image(
        &self,
        image_id: i32,
        user_id: i32,
    ) -> Result<Option<Image>, RepositoryError>;

    /// Stamps today's date on the comment. `None` if the image does not exist.
    async fn save_comment(
        &self,
        image_id: i32,
        comment: NewComment,
    ) -> Result<Option<Comment>, RepositoryError>;
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn get_tag_by_name(&self, name: &str) -> Result<Option<Tag>, RepositoryError>;

    /// Returns the stored tag when one with the same name already exists.
    async fn create_tag(&self, tag: NewTag) -> Result<Tag, RepositoryError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn register_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
}

/// Looks up each name and creates the tags that do not exist yet.
pub async fn find_or_create_tags(
    tags: &dyn TagRepository,
    names: &[String],
) -> Result<Vec<Tag>, RepositoryError> {
    let mut found = Vec::with_capacity(names.len());

    for name in names {
        let tag = match tags.get_tag_by_name(name).await? {
            Some(tag) => tag,
            None => tags.create_tag(NewTag::new(name.as_str())).await?,
        };
        found.push(tag);
    }

    Ok(found)
}
