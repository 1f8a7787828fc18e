use async_trait::async_trait;
use sqlx::PgPool;

use super::transaction::unit_of_work;
use super::{RepositoryError, UserRepository};
use crate::models::user::UserRow;
use crate::models::{NewUser, User, UserProfile};

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        PgUserRepository { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[tracing::instrument(skip(self, user), fields(username = %user.username))]
    async fn register_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        unit_of_work(&self.pool, "register_user", move |conn| {
            Box::pin(async move {
                let (profile_id,): (i32,) = sqlx::query_as(
                    "INSERT INTO user_profiles
                        (full_name, email_address, mobile_number)
                    VALUES
                        ($1, $2, $3)
                    RETURNING id",
                )
                .bind(user.full_name.as_str())
                .bind(user.email_address.as_str())
                .bind(user.mobile_number.as_str())
                .fetch_one(&mut *conn)
                .await?;

                let inserted: Result<(i32,), sqlx::Error> = sqlx::query_as(
                    "INSERT INTO users
                        (username, password_hash, profile_id)
                    VALUES
                        ($1, $2, $3)
                    RETURNING id",
                )
                .bind(user.username.as_str())
                .bind(user.password_hash.as_str())
                .bind(profile_id)
                .fetch_one(&mut *conn)
                .await;

                let (id,) = match inserted {
                    Ok(row) => row,
                    Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                        return Err(RepositoryError::Duplicate(format!(
                            "username {}",
                            user.username
                        )));
                    }
                    Err(err) => return Err(err.into()),
                };

                Ok::<_, RepositoryError>(User {
                    id,
                    username: user.username,
                    password_hash: user.password_hash,
                    profile: UserProfile {
                        id: profile_id,
                        full_name: user.full_name,
                        email_address: user.email_address,
                        mobile_number: user.mobile_number,
                    },
                })
            })
        })
        .await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let username = username.to_string();

        unit_of_work(&self.pool, "get_user_by_username", move |conn| {
            Box::pin(async move {
                let row: Option<UserRow> = sqlx::query_as(
                    "SELECT
                        u.id,
                        u.username,
                        u.password_hash,
                        u.profile_id,
                        p.full_name,
                        p.email_address,
                        p.mobile_number
                    FROM
                        users u
                        JOIN user_profiles p ON p.id = u.profile_id
                    WHERE
                        u.username = $1",
                )
                .bind(username.as_str())
                .fetch_optional(&mut *conn)
                .await?;

                Ok::<_, RepositoryError>(row.map(User::from))
            })
        })
        .await
    }
}
