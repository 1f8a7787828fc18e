use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: i32,
    pub full_name: String,
    pub email_address: String,
    pub mobile_number: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub profile: UserProfile,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub profile_id: i32,
    pub full_name: String,
    pub email_address: String,
    pub mobile_number: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            profile: UserProfile {
                id: row.profile_id,
                full_name: row.full_name,
                email_address: row.email_address,
                mobile_number: row.mobile_number,
            },
        }
    }
}

/// A registration with the password already hashed.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub email_address: String,
    pub mobile_number: String,
}

#[derive(Debug, Deserialize)]
pub struct UserCreateRequest {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email_address: String,
    pub mobile_number: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub username: String,
    pub exp: usize,
}

impl Claims {
    /// The acting principal, as recorded on the images and comments it creates.
    pub fn owner(&self) -> super::image::Owner {
        super::image::Owner {
            id: self.user_id,
            username: self.username.clone(),
        }
    }
}
