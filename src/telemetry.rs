use tracing_subscriber::{fmt, EnvFilter};

pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?
        .add_directive("image_hoster=debug".parse()?)
        .add_directive("sqlx=warn".parse()?);

    fmt().with_env_filter(filter).try_init()?;

    Ok(())
}
