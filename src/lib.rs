pub mod config;
pub mod handlers;
pub mod message;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod validation;
pub mod view;

#[cfg(test)]
mod test_support;

/// Applies the migrations in `migrations/`.
pub async fn migrate(pool: &sqlx::PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}
