//! In-memory repositories for driving the handlers in tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Local;

use super::{ImageRepository, RepositoryError, TagRepository, UserRepository};
use crate::models::{
    Comment, Image, NewComment, NewImage, NewTag, NewUser, Tag, User, UserProfile,
};

#[derive(Default)]
struct Tables {
    images: Vec<Image>,
    tags: Vec<Tag>,
    users: Vec<User>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an image directly, bypassing the upload flow.
    pub fn insert_image(&self, image: Image) {
        let mut tables = self.tables.lock().unwrap();
        tables.next_id = tables.next_id.max(image.id);
        tables.images.push(image);
    }

    pub fn image(&self, image_id: i32) -> Option<Image> {
        let tables = self.tables.lock().unwrap();
        tables.images.iter().find(|image| image.id == image_id).cloned()
    }

    pub fn image_count(&self) -> usize {
        self.tables.lock().unwrap().images.len()
    }
}

#[async_trait]
impl ImageRepository for MemoryStore {
    async fn create_image(&self, image: NewImage) -> Result<Image, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let image = image.into_image(tables.next_id());
        tables.images.push(image.clone());
        Ok(image)
    }

    async fn list_images(&self) -> Result<Vec<Image>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .images
            .iter()
            .cloned()
            .map(|mut image| {
                image.comments.clear();
                image
            })
            .collect())
    }

    async fn get_image_by_id(&self, image_id: i32) -> Result<Option<Image>, RepositoryError> {
        Ok(self.image(image_id))
    }

    async fn get_image_by_id_and_owner(
        &self,
        image_id: i32,
        user_id: i32,
    ) -> Result<Option<Image>, RepositoryError> {
        Ok(self
            .image(image_id)
            .filter(|image| image.owner.id == user_id)
            .map(|mut image| {
                image.comments.clear();
                image
            }))
    }

    async fn update_image(&self, image: &Image) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(stored) = tables.images.iter_mut().find(|stored| stored.id == image.id) {
            stored.title = image.title.clone();
            stored.description = image.description.clone();
            stored.image_file = image.image_file.clone();
            stored.uploaded_on = image.uploaded_on;
            stored.tags = image.tags.clone();
        }
        Ok(())
    }

    async fn delete_image(
        &self,
        image_id: i32,
        user_id: i32,
    ) -> Result<Option<Image>, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let position = tables
            .images
            .iter()
            .position(|image| image.id == image_id && image.owner.id == user_id);

        Ok(position.map(|index| tables.images.remove(index)))
    }

    async fn save_comment(
        &self,
        image_id: i32,
        comment: NewComment,
    ) -> Result<Option<Comment>, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let Some(image) = tables.images.iter_mut().find(|image| image.id == image_id) else {
            return Ok(None);
        };

        let comment = Comment {
            id,
            text: comment.text,
            created_date: Local::now().date_naive(),
            image_id,
            author: comment.author,
        };
        image.comments.push(comment.clone());

        Ok(Some(comment))
    }
}

#[async_trait]
impl TagRepository for MemoryStore {
    async fn get_tag_by_name(&self, name: &str) -> Result<Option<Tag>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.tags.iter().find(|tag| tag.name == name).cloned())
    }

    async fn create_tag(&self, tag: NewTag) -> Result<Tag, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables.tags.iter().find(|stored| stored.name == tag.name) {
            return Ok(existing.clone());
        }

        let tag = Tag {
            id: tables.next_id(),
            name: tag.name,
        };
        tables.tags.push(tag.clone());
        Ok(tag)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn register_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|stored| stored.username == user.username) {
            return Err(RepositoryError::Duplicate(format!("username {}", user.username)));
        }

        let id = tables.next_id();
        let user = User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            profile: UserProfile {
                id,
                full_name: user.full_name,
                email_address: user.email_address,
                mobile_number: user.mobile_number,
            },
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|user| user.username == username).cloned())
    }
}

/// A store whose every operation fails, as a lost database connection would.
pub struct UnavailableStore;

fn unavailable() -> RepositoryError {
    RepositoryError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl ImageRepository for UnavailableStore {
    async fn create_image(&self, _image: NewImage) -> Result<Image, RepositoryError> {
        Err(unavailable())
    }

    async fn list_images(&self) -> Result<Vec<Image>, RepositoryError> {
        Err(unavailable())
    }

    async fn get_image_by_id(&self, _image_id: i32) -> Result<Option<Image>, RepositoryError> {
        Err(unavailable())
    }

    async fn get_image_by_id_and_owner(
        &self,
        _image_id: i32,
        _user_id: i32,
    ) -> Result<Option<Image>, RepositoryError> {
        Err(unavailable())
    }

    async fn update_image(&self, _image: &Image) -> Result<(), RepositoryError> {
        Err(unavailable())
    }

    async fn delete_image(
        &self,
        _image_id: i32,
        _user_id: i32,
    ) -> Result<Option<Image>, RepositoryError> {
        Err(unavailable())
    }

    async fn save_comment(
        &self,
        _image_id: i32,
        _comment: NewComment,
    ) -> Result<Option<Comment>, RepositoryError> {
        Err(unavailable())
    }
}

#[async_trait]
impl TagRepository for UnavailableStore {
    async fn get_tag_by_name(&self, _name: &str) -> Result<Option<Tag>, RepositoryError> {
        Err(unavailable())
    }

    async fn create_tag(&self, _tag: NewTag) -> Result<Tag, RepositoryError> {
        Err(unavailable())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::Owner;

    fn abhi() -> Owner {
        Owner { id: 1, username: "Abhi".to_string() }
    }

    #[tokio::test]
    async fn test_delete_requires_matching_owner() {
        let store = MemoryStore::new();
        let image = store
            .create_image(NewImage {
                title: "new".to_string(),
                description: "test".to_string(),
                image_file: String::new(),
                uploaded_on: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                owner: abhi(),
                tags: vec![],
            })
            .await
            .unwrap();

        assert!(store.delete_image(image.id, 2).await.unwrap().is_none());
        assert_eq!(store.image_count(), 1);
        assert!(store.delete_image(image.id, 1).await.unwrap().is_some());
        assert_eq!(store.image_count(), 0);
    }

    #[tokio::test]
    async fn test_create_tag_twice_returns_same_tag() {
        let store = MemoryStore::new();
        let first = store.create_tag(NewTag::new("dog")).await.unwrap();
        let second = store.create_tag(NewTag::new("dog")).await.unwrap();
        assert_eq!(first, second);
    }
}
