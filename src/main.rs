use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;

use image_hoster::config::Config;
use image_hoster::state::AppState;
use image_hoster::{migrate, routes, telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    if let Err(e) = telemetry::init() {
        eprintln!("failed to initialise logging: {e}");
    }

    let config = Config::from_env().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to connect to the database");
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e)
        })?;

    migrate(&pool).await.map_err(|e| {
        tracing::error!(error = %e, "failed to run migrations");
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    let state = web::Data::new(AppState::postgres(pool, &config));

    tracing::info!(host = %config.host, port = config.port, "starting image_hoster");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(state.clone())
            .configure(routes::config)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
