use chrono::NaiveDate;
use serde::Serialize;

use super::comment::Comment;
use super::tag::Tag;

/// The user an image or comment belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Owner {
    pub id: i32,
    pub username: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Image {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// Base64 encoded image bytes.
    pub image_file: String,
    pub uploaded_on: NaiveDate,
    pub owner: Owner,
    pub tags: Vec<Tag>,
    pub comments: Vec<Comment>,
}

/// An uploaded image that has not been stored yet.
#[derive(Clone, Debug, PartialEq)]
pub struct NewImage {
    pub title: String,
    pub description: String,
    pub image_file: String,
    pub uploaded_on: NaiveDate,
    pub owner: Owner,
    pub tags: Vec<Tag>,
}

impl NewImage {
    pub fn into_image(self, id: i32) -> Image {
        Image {
            id,
            title: self.title,
            description: self.description,
            image_file: self.image_file,
            uploaded_on: self.uploaded_on,
            owner: self.owner,
            tags: self.tags,
            comments: Vec::new(),
        }
    }
}

/// Only the uploader of an image may edit or delete it.
pub fn can_modify(image: &Image, acting_user_id: i32) -> bool {
    image.owner.id == acting_user_id
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ImageRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image_file: String,
    pub uploaded_on: NaiveDate,
    pub user_id: i32,
    pub username: String,
}

impl ImageRow {
    pub fn into_image(self, tags: Vec<Tag>, comments: Vec<Comment>) -> Image {
        Image {
            id: self.id,
            title: self.title,
            description: self.description,
            image_file: self.image_file,
            uploaded_on: self.uploaded_on,
            owner: Owner {
                id: self.user_id,
                username: self.username,
            },
            tags,
            comments,
        }
    }
}
