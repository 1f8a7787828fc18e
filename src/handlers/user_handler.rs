use actix_web::{get, post, web, HttpResponse, Responder};

use super::auth_handler::encode_jwt;
use crate::message::AppError;
use crate::models::user::{LoginRequest, UserCreateRequest};
use crate::models::NewUser;
use crate::repository::RepositoryError;
use crate::state::AppState;
use crate::validation::check_password_strength;
use crate::view::{self, redirect, View};

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().body(AppError::InternalServerError.message())
}

fn login_failed() -> HttpResponse {
    View::new(view::LOGIN)
        .with_model(|model| model.login_error = Some(AppError::InvalidCredentials.message()))
        .render_with(actix_web::http::StatusCode::UNAUTHORIZED)
}

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("image_hoster is running")
}

#[post("/users/registration")]
pub async fn signup(
    state: web::Data<AppState>,
    payload: web::Json<UserCreateRequest>,
) -> impl Responder {
    let payload = payload.into_inner();

    if !check_password_strength(&payload.password) {
        return View::new(view::REGISTRATION)
            .with_model(|model| model.password_type_error = Some(AppError::WeakPassword.message()))
            .render();
    }

    let password = payload.password;
    let cost = state.bcrypt_cost;
    let hashed = match web::block(move || bcrypt::hash(password, cost)).await {
        Ok(Ok(hash)) => hash,
        Ok(Err(e)) => {
            tracing::error!(error = %e, "password hashing failed");
            return internal_error();
        }
        Err(e) => {
            tracing::error!(error = %e, "password hashing was cancelled");
            return internal_error();
        }
    };

    let new_user = NewUser {
        username: payload.username,
        password_hash: hashed,
        full_name: payload.full_name,
        email_address: payload.email_address,
        mobile_number: payload.mobile_number,
    };

    match state.users.register_user(new_user).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, "user registered");
            redirect("/users/login")
        }
        Err(RepositoryError::Duplicate(_)) => View::new(view::REGISTRATION)
            .with_model(|model| model.registration_error = Some(AppError::UsernameTaken.message()))
            .render(),
        Err(e) => {
            tracing::error!(error = %e, "user registration failed");
            internal_error()
        }
    }
}

#[post("/users/login")]
pub async fn signin(state: web::Data<AppState>, payload: web::Json<LoginRequest>) -> impl Responder {
    let LoginRequest { username, password } = payload.into_inner();

    let user = match state.users.get_user_by_username(&username).await {
        Ok(Some(user)) => user,
        Ok(None) => return login_failed(),
        Err(e) => {
            tracing::error!(error = %e, "user lookup failed");
            return internal_error();
        }
    };

    let hash = user.password_hash.clone();
    match web::block(move || bcrypt::verify(password, &hash)).await {
        Ok(Ok(true)) => {}
        Ok(Ok(false)) | Ok(Err(_)) => {
            tracing::debug!(%username, "login rejected");
            return login_failed();
        }
        Err(e) => {
            tracing::error!(error = %e, "password check was cancelled");
            return internal_error();
        }
    }

    match encode_jwt(&user, state.jwt_secret.as_bytes()) {
        Ok(token) => HttpResponse::Ok().json(serde_json::json!({ "token": token })),
        Err(e) => {
            tracing::error!(error = %e, "token signing failed");
            internal_error()
        }
    }
}
