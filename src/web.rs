use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::air_quality::AirNowClient;
use crate::api::{self, AppState, openapi};
use crate::config::StormConfig;
use crate::satellite::SatelliteImagery;
use crate::upstream::UpstreamClient;
use crate::weather::WeatherGovClient;

/// Build the upstream clients from configuration
pub fn app_state(config: &StormConfig) -> Result<AppState> {
    let http = UpstreamClient::new(&config.upstream)?;

    Ok(AppState {
        weather: Arc::new(WeatherGovClient::new(
            http.clone(),
            config.upstream.weather_base_url.clone(),
        )),
        air_quality: Arc::new(AirNowClient::new(
            http,
            &config.upstream,
            config.credentials.airnow_api_key.clone(),
        )),
        satellite: Arc::new(SatelliteImagery::new(
            config.upstream.nasa_imagery_url.clone(),
            config.credentials.nasa_api_key.clone(),
        )),
        request_timeout: config.server.request_timeout(),
    })
}

/// Full application router: `/api`, `/api-docs` and the optional static client
pub fn app(config: &StormConfig, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .nest("/api", api::router(state))
        .route("/api-docs", get(openapi::get_document));

    if let Some(dir) = &config.server.static_dir {
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(dir).not_found_service(index));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
}

pub async fn run(config: StormConfig) -> Result<()> {
    if config.credentials.nasa_api_key.is_none() {
        tracing::warn!("NASA_API_KEY is not set; satellite image URLs will be rejected by NASA");
    }
    if config.credentials.airnow_api_key.is_none() {
        tracing::warn!("AIRNOW_API_KEY is not set; /api/airquality will fail");
    }

    let state = app_state(&config)?;
    let app = app(&config, state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server is running on port {}", config.server.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
