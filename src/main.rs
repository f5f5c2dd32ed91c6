use anyhow::Result;
use stormwatch::{StormConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = StormConfig::load()?;
    logging::init(&config.logging)?;

    tracing::info!(
        "Starting stormwatch {} (weather: {}, timeout {}s)",
        stormwatch::VERSION,
        config.upstream.weather_base_url,
        config.upstream.timeout_seconds
    );

    web::run(config).await
}
