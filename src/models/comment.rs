use chrono::NaiveDate;
use serde::Serialize;

use super::image::Owner;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub created_date: NaiveDate,
    pub image_id: i32,
    pub author: Owner,
}

/// A comment as submitted. The creation date is not part of it; the store
/// stamps it when the comment is saved.
#[derive(Clone, Debug)]
pub struct NewComment {
    pub text: String,
    pub author: Owner,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CommentRow {
    pub id: i32,
    pub text: String,
    pub created_date: NaiveDate,
    pub image_id: i32,
    pub user_id: i32,
    pub username: String,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            text: row.text,
            created_date: row.created_date,
            image_id: row.image_id,
            author: Owner {
                id: row.user_id,
                username: row.username,
            },
        }
    }
}
