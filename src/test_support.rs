//! Fixtures for driving the router in handler tests.

use std::sync::Arc;

use actix_web::http::header;
use chrono::NaiveDate;
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::models::{Claims, Image, NewImage, Owner, Tag};
use crate::repository::memory::MemoryStore;
use crate::state::AppState;

pub const SECRET: &str = "test-secret";
/// Lowest cost bcrypt accepts, so registration tests stay fast.
pub const TEST_BCRYPT_COST: u32 = 4;
pub const BOUNDARY: &str = "----imagehosterboundary";

/// Builds the application around `$state` and returns the initialised test service.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .configure(crate::routes::config),
        )
        .await
    };
}
pub(crate) use init_app;

pub fn state_with(store: Arc<MemoryStore>) -> AppState {
    AppState {
        images: store.clone(),
        tags: store.clone(),
        users: store,
        jwt_secret: SECRET.to_string(),
        bcrypt_cost: TEST_BCRYPT_COST,
    }
}

pub fn abhi() -> Owner {
    Owner {
        id: 1,
        username: "Abhi".to_string(),
    }
}

pub fn prerna() -> Owner {
    Owner {
        id: 2,
        username: "Prerna".to_string(),
    }
}

pub fn bearer(user: &Owner) -> (header::HeaderName, String) {
    let claims = Claims {
        user_id: user.id,
        username: user.username.clone(),
        exp: (chrono::Utc::now() + chrono::Duration::minutes(10)).timestamp() as usize,
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap();

    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Image 1, "new", tagged "dog", uploaded by `owner`.
pub fn sample_image(owner: Owner) -> Image {
    NewImage {
        title: "new".to_string(),
        description: "This image is for testing purpose".to_string(),
        image_file: "c29tZV9pbWFnZQ==".to_string(),
        uploaded_on: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        owner,
        tags: vec![Tag {
            id: 100,
            name: "dog".to_string(),
        }],
    }
    .into_image(1)
}

pub fn multipart_content_type() -> (header::HeaderName, String) {
    (
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    )
}

/// Encodes text fields and an optional `file` part as `multipart/form-data`.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some((content_type, bytes)) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file\"; filename=\"image.jpg\"\r\n",
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
