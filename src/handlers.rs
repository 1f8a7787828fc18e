pub mod auth_handler;
pub mod comment_handler;
pub mod image_handler;
pub mod upload;
pub mod user_handler;
