use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::repository::{
    ImageRepository, PgImageRepository, PgTagRepository, PgUserRepository, TagRepository,
    UserRepository,
};

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub images: Arc<dyn ImageRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub users: Arc<dyn UserRepository>,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn postgres(pool: PgPool, config: &Config) -> Self {
        AppState {
            images: Arc::new(PgImageRepository::new(pool.clone())),
            tags: Arc::new(PgTagRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool)),
            jwt_secret: config.jwt_secret.clone(),
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}
