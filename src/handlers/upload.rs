use actix_multipart::Multipart;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures_util::TryStreamExt;
use mime::Mime;

use crate::models::tag::parse_tag_names;

/// Largest multipart part accepted, before base64 encoding.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ImageFormError {
    #[error("form part exceeds the upload size limit")]
    TooLarge,
    #[error(transparent)]
    Malformed(#[from] actix_web::Error),
}

impl From<actix_multipart::MultipartError> for ImageFormError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        ImageFormError::Malformed(e.into())
    }
}

/// The file part of an upload form.
#[derive(Debug)]
pub struct UploadedFile {
    pub content_type: Option<Mime>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_ref()
            .is_some_and(|content_type| content_type.type_() == mime::IMAGE)
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// The fields shared by the upload and edit forms.
#[derive(Debug, Default)]
pub struct ImageForm {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub file: Option<UploadedFile>,
}

/// Reads the upload/edit form, giving up on the first part larger than [`MAX_IMAGE_BYTES`].
pub async fn read_image_form(mut payload: Multipart) -> Result<ImageForm, ImageFormError> {
    let mut form = ImageForm::default();

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().to_string();
        let content_type = field.content_type().cloned();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
                tracing::warn!(field = %name, "rejecting oversized form part");
                return Err(ImageFormError::TooLarge);
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "file" => {
                // browsers send an empty part when no file was chosen
                if !bytes.is_empty() {
                    form.file = Some(UploadedFile { content_type, bytes });
                }
            }
            "title" => form.title = into_text(bytes)?.trim().to_string(),
            "description" => form.description = into_text(bytes)?.trim().to_string(),
            "tags" => form.tags = parse_tag_names(&into_text(bytes)?),
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    Ok(form)
}

fn into_text(bytes: Vec<u8>) -> Result<String, actix_web::Error> {
    String::from_utf8(bytes).map_err(actix_web::error::ErrorBadRequest)
}
