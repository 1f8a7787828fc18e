use derive_more::Display;
use serde::Serialize;

use crate::handlers::upload::MAX_IMAGE_BYTES;

/// A mutation that only the owner of an image may perform.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize)]
pub enum ImageAction {
    #[display(fmt = "edit")]
    Edit,
    #[display(fmt = "delete")]
    Delete,
}

#[derive(Debug, Serialize)]
pub enum AppError {
    NotOwner(ImageAction),
    ImageNotFound,
    NotAnImage,
    NoImageSelected,
    ImageTooLarge,
    WeakPassword,
    UsernameTaken,
    InvalidCredentials,
    InternalServerError,
}

impl AppError {
    pub fn message(&self) -> String {
        match self {
            AppError::NotOwner(action) => format!("Only the owner of the image can {action} the image"),
            AppError::ImageNotFound => "Image not found".to_string(),
            AppError::NotAnImage => "Only image files can be uploaded".to_string(),
            AppError::NoImageSelected => "Select an image to upload".to_string(),
            AppError::ImageTooLarge => format!(
                "Images larger than {} MB cannot be uploaded",
                MAX_IMAGE_BYTES / (1024 * 1024)
            ),
            AppError::WeakPassword => {
                "Password must contain atleast 1 alphabet, 1 number & 1 special character".to_string()
            }
            AppError::UsernameTaken => "Username is already taken".to_string(),
            AppError::InvalidCredentials => "Invalid username or password".to_string(),
            AppError::InternalServerError => "Internal Server Error".to_string(),
        }
    }
}
