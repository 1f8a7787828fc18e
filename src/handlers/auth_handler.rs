use actix_web::{dev::ServiceRequest, web, Error, HttpMessage, HttpRequest, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation};

use crate::models::{Claims, User};
use crate::state::AppState;

const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Bearer middleware for the image routes: stores the token's claims in the request extensions.
pub async fn validate_jwt(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let secret = req
        .app_data::<web::Data<AppState>>()
        .map(|state| state.jwt_secret.clone());

    let Some(secret) = secret else {
        tracing::error!("application state missing while validating token");
        return Err((
            actix_web::error::ErrorInternalServerError("Internal Server Error"),
            req,
        ));
    };

    match decode_jwt(credentials.token(), secret.as_bytes()) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(req)
        }
        Err(e) => {
            tracing::debug!(error = %e, "rejected bearer token");
            Err((actix_web::error::ErrorUnauthorized("Invalid token"), req))
        }
    }
}

pub fn decode_jwt(token: &str, secret: &[u8]) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret);
    let validation = Validation::new(Algorithm::HS256);
    let token_data: TokenData<Claims> = decode(token, &key, &validation)?;

    Ok(token_data.claims)
}

pub fn encode_jwt(user: &User, secret: &[u8]) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        user_id: user.id,
        username: user.username.clone(),
        exp: (Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp() as usize,
    };

    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret))
}

/// The claims `validate_jwt` attached to this request.
pub fn current_user(req: &HttpRequest) -> Result<Claims, HttpResponse> {
    match req.extensions().get::<Claims>() {
        Some(claims) => Ok(claims.clone()),
        None => Err(HttpResponse::Unauthorized().body("Missing Authorization token")),
    }
}
