use actix_web::guard::{self, GuardContext};
use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

use crate::handlers::auth_handler::validate_jwt;
use crate::handlers::comment_handler::add_comment;
use crate::handlers::image_handler::{
    delete_image, edit_form, edit_image, list_images, show_image, upload_form, upload_image,
};
use crate::handlers::user_handler::{index, signin, signup};

/// Path prefixes served behind the bearer middleware.
const PROTECTED_PREFIXES: [&str; 4] = ["/images", "/image", "/editImage", "/deleteImage"];

/// True for paths under one of [`PROTECTED_PREFIXES`]; anything else falls through to a 404.
fn is_protected(ctx: &GuardContext<'_>) -> bool {
    let path = ctx.head().uri.path();

    PROTECTED_PREFIXES.iter().any(|prefix| match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(index)
        .service(signup)
        .service(signin)
        .service(
            web::scope("")
                .guard(guard::fn_guard(is_protected))
                .wrap(HttpAuthentication::bearer(validate_jwt))
                .service(list_images)
                // registered ahead of /images/{image_id} so "upload" is not read as an id
                .service(upload_form)
                .service(upload_image)
                .service(show_image)
                .service(edit_form)
                .service(edit_image)
                .service(delete_image)
                .service(add_comment),
        );
}
