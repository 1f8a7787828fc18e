pub mod comment;
pub mod image;
pub mod tag;
pub mod user;

pub use comment::{Comment, NewComment};
pub use image::{can_modify, Image, NewImage, Owner};
pub use tag::{NewTag, Tag};
pub use user::{Claims, NewUser, User, UserProfile};
