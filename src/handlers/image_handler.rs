use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse, Responder};
use chrono::Local;
use serde::Deserialize;

use super::auth_handler::current_user;
use super::upload::{read_image_form, ImageForm, ImageFormError};
use crate::message::{AppError, ImageAction};
use crate::models::{can_modify, Image, NewImage, Tag};
use crate::repository::{find_or_create_tags, RepositoryError};
use crate::state::AppState;
use crate::view::{self, redirect, View};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageIdQuery {
    pub image_id: i32,
}

/// Store failures are logged and then treated like a missing row.
fn found<T>(result: Result<Option<T>, RepositoryError>, operation: &str) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(operation, error = %e, "store operation failed");
            None
        }
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().body(AppError::ImageNotFound.message())
}

/// Shows the image detail view with the ownership error for `action`.
fn owner_only(image: Image, action: ImageAction) -> HttpResponse {
    let message = AppError::NotOwner(action).message();

    View::new(view::IMAGE)
        .with_image(image)
        .with_model(|model| match action {
            ImageAction::Edit => model.edit_error = Some(message),
            ImageAction::Delete => model.delete_error = Some(message),
        })
        .render()
}

/// Called once a lookup constrained to the acting user came back empty.
async fn not_owner_or_missing(state: &AppState, image_id: i32, action: ImageAction) -> HttpResponse {
    match found(state.images.get_image_by_id(image_id).await, "get_image_by_id") {
        Some(image) => {
            tracing::info!(image_id, %action, "rejected change by non-owner");
            owner_only(image, action)
        }
        None => not_found(),
    }
}

/// `None` when the tag store failed; the caller must then leave the image untouched.
async fn resolve_tags(state: &AppState, names: &[String]) -> Option<Vec<Tag>> {
    match find_or_create_tags(state.tags.as_ref(), names).await {
        Ok(tags) => Some(tags),
        Err(e) => {
            tracing::error!(error = %e, "resolving tags failed");
            None
        }
    }
}

fn upload_error(view_name: &'static str, error: AppError) -> View {
    View::new(view_name).with_model(|model| model.upload_error = Some(error.message()))
}

#[get("/images")]
pub async fn list_images(state: web::Data<AppState>) -> impl Responder {
    let images = match state.images.list_images().await {
        Ok(images) => images,
        Err(e) => {
            tracing::error!(error = %e, "listing images failed");
            Vec::new()
        }
    };

    View::new(view::IMAGES).with_images(images).render()
}

#[get("/images/upload")]
pub async fn upload_form() -> impl Responder {
    View::new(view::UPLOAD).render()
}

#[post("/images/upload")]
pub async fn upload_image(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    let claims = match current_user(&req) {
        Ok(c) => c,
        Err(resp) => return Ok(resp),
    };

    let ImageForm {
        title,
        description,
        tags,
        file,
    } = match read_image_form(payload).await {
        Ok(form) => form,
        Err(ImageFormError::TooLarge) => {
            return Ok(upload_error(view::UPLOAD, AppError::ImageTooLarge).render())
        }
        Err(ImageFormError::Malformed(e)) => return Err(e),
    };

    let image_file = match file {
        Some(file) if file.is_image() => file.to_base64(),
        Some(_) => return Ok(upload_error(view::UPLOAD, AppError::NotAnImage).render()),
        None => return Ok(upload_error(view::UPLOAD, AppError::NoImageSelected).render()),
    };

    let Some(tags) = resolve_tags(&state, &tags).await else {
        return Ok(redirect("/images"));
    };

    let new_image = NewImage {
        title,
        description,
        image_file,
        uploaded_on: Local::now().date_naive(),
        owner: claims.owner(),
        tags,
    };

    match state.images.create_image(new_image).await {
        Ok(image) => tracing::info!(image_id = image.id, user_id = claims.user_id, "image uploaded"),
        Err(e) => tracing::error!(error = %e, user_id = claims.user_id, "image upload failed"),
    }

    Ok(redirect("/images"))
}

#[get("/images/{image_id}")]
pub async fn show_image(state: web::Data<AppState>, path: web::Path<i32>) -> impl Responder {
    let image_id = path.into_inner();

    match found(state.images.get_image_by_id(image_id).await, "get_image_by_id") {
        Some(image) => View::new(view::IMAGE).with_image(image).render(),
        None => not_found(),
    }
}

#[get("/editImage")]
pub async fn edit_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ImageIdQuery>,
) -> impl Responder {
    let claims = match current_user(&req) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let image_id = query.image_id;

    let owned = state
        .images
        .get_image_by_id_and_owner(image_id, claims.user_id)
        .await;

    match found(owned, "get_image_by_id_and_owner") {
        Some(image) => View::new(view::EDIT).with_editable_image(image).render(),
        None => not_owner_or_missing(&state, image_id, ImageAction::Edit).await,
    }
}

#[put("/editImage")]
pub async fn edit_image(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ImageIdQuery>,
    payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    let claims = match current_user(&req) {
        Ok(c) => c,
        Err(resp) => return Ok(resp),
    };
    let image_id = query.image_id;

    let Some(existing) = found(state.images.get_image_by_id(image_id).await, "get_image_by_id") else {
        return Ok(not_found());
    };

    if !can_modify(&existing, claims.user_id) {
        tracing::info!(image_id, user_id = claims.user_id, "rejected edit by non-owner");
        return Ok(owner_only(existing, ImageAction::Edit));
    }

    let form = match read_image_form(payload).await {
        Ok(form) => form,
        Err(ImageFormError::TooLarge) => {
            return Ok(upload_error(view::EDIT, AppError::ImageTooLarge)
                .with_editable_image(existing)
                .render())
        }
        Err(ImageFormError::Malformed(e)) => return Err(e),
    };

    let image_file = match form.file {
        Some(file) if file.is_image() => file.to_base64(),
        Some(_) => {
            return Ok(upload_error(view::EDIT, AppError::NotAnImage)
                .with_editable_image(existing)
                .render())
        }
        None => existing.image_file.clone(),
    };

    let Some(tags) = resolve_tags(&state, &form.tags).await else {
        return Ok(redirect(&format!("/images/{image_id}")));
    };

    let updated = Image {
        title: form.title,
        description: form.description,
        image_file,
        uploaded_on: Local::now().date_naive(),
        tags,
        ..existing
    };

    if let Err(e) = state.images.update_image(&updated).await {
        tracing::error!(image_id, error = %e, "image update failed");
    }

    Ok(redirect(&format!("/images/{image_id}")))
}

#[delete("/deleteImage")]
pub async fn delete_image(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ImageIdQuery>,
) -> impl Responder {
    let claims = match current_user(&req) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let image_id = query.image_id;

    let deleted = state.images.delete_image(image_id, claims.user_id).await;

    match found(deleted, "delete_image") {
        Some(image) => {
            tracing::info!(image_id = image.id, user_id = claims.user_id, "image deleted");
            redirect("/images")
        }
        None => not_owner_or_missing(&state, image_id, ImageAction::Delete).await,
    }
}
