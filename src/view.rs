//! The JSON documents handed to the front end: a view token plus named model attributes.

use actix_web::http::{header, StatusCode};
use actix_web::HttpResponse;
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::models::tag::join_tag_names;
use crate::models::{Comment, Image, Tag};

pub const IMAGES: &str = "images";
pub const IMAGE: &str = "images/image";
pub const EDIT: &str = "images/edit";
pub const UPLOAD: &str = "images/upload";
pub const REGISTRATION: &str = "users/registration";
pub const LOGIN: &str = "users/login";

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TagsAttribute {
    List(Vec<Tag>),
    /// Comma separated names, as the edit form expects them.
    Joined(String),
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub images: Option<Vec<Image>>,
    pub image: Option<Image>,
    pub tags: Option<TagsAttribute>,
    pub comments: Option<Vec<Comment>>,
    pub edit_error: Option<String>,
    pub delete_error: Option<String>,
    pub upload_error: Option<String>,
    pub password_type_error: Option<String>,
    pub registration_error: Option<String>,
    pub login_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct View {
    pub view: &'static str,
    pub model: Model,
}

impl View {
    pub fn new(view: &'static str) -> Self {
        View {
            view,
            model: Model::default(),
        }
    }

    pub fn with_images(mut self, images: Vec<Image>) -> Self {
        self.model.images = Some(images);
        self
    }

    /// The image detail attributes: the image, its tags and its comments.
    pub fn with_image(mut self, image: Image) -> Self {
        self.model.tags = Some(TagsAttribute::List(image.tags.clone()));
        self.model.comments = Some(image.comments.clone());
        self.model.image = Some(image);
        self
    }

    /// The edit form attributes: the image and its tag names joined by commas.
    pub fn with_editable_image(mut self, image: Image) -> Self {
        self.model.tags = Some(TagsAttribute::Joined(join_tag_names(&image.tags)));
        self.model.image = Some(image);
        self
    }

    pub fn with_model(mut self, update: impl FnOnce(&mut Model)) -> Self {
        update(&mut self.model);
        self
    }

    pub fn render(self) -> HttpResponse {
        self.render_with(StatusCode::OK)
    }

    pub fn render_with(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}
