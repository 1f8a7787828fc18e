use actix_web::{post, web, HttpRequest, Responder};
use serde::Deserialize;

use super::auth_handler::current_user;
use crate::models::NewComment;
use crate::state::AppState;
use crate::view::redirect;

#[derive(Deserialize)]
pub struct CommentForm {
    pub comment: String,
}

#[post("/image/{image_id}/comments")]
pub async fn add_comment(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Form<CommentForm>,
) -> impl Responder {
    let claims = match current_user(&req) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let image_id = path.into_inner();
    let text = form.into_inner().comment;

    if text.trim().is_empty() {
        tracing::debug!(image_id, "ignoring empty comment");
        return redirect(&format!("/images/{image_id}"));
    }

    let comment = NewComment {
        text,
        author: claims.owner(),
    };

    match state.images.save_comment(image_id, comment).await {
        Ok(Some(saved)) => tracing::info!(image_id, comment_id = saved.id, "comment saved"),
        Ok(None) => tracing::debug!(image_id, "comment target image not found"),
        Err(e) => tracing::error!(image_id, error = %e, "saving comment failed"),
    }

    redirect(&format!("/images/{image_id}"))
}
