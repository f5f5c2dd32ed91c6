//! `/api` routes consumed by the browser client
//!
//! Handlers resolve coordinates from the query string, call the upstream
//! clients and wrap the records in the response envelopes the client expects.
//! Upstream causes are logged here and replaced by a generic message.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    extract::{Query, State, rejection::QueryRejection},
    handler::Handler,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tracing::{error, warn};

use crate::StormError;
use crate::air_quality::AirNowClient;
use crate::models::{AirQualityRecord, AlertRecord, Coordinates, ForecastRecord, MergedForecastRecord};
use crate::satellite::SatelliteImagery;
use crate::weather::WeatherGovClient;

pub mod openapi;

/// Upstream clients shared by every request
#[derive(Debug, Clone)]
pub struct AppState {
    pub weather: Arc<WeatherGovClient>,
    pub air_quality: Arc<AirNowClient>,
    pub satellite: Arc<SatelliteImagery>,
    /// Upper bound for handling one `/api` request
    pub request_timeout: Duration,
}

const HOURLY_ERROR: &str = "Failed to fetch weather data";
const DAILY_ERROR: &str = "Failed to fetch daily weather data";
const TEN_DAY_ERROR: &str = "Failed to fetch 10-day weather data";
const ALERTS_ERROR: &str = "Failed to fetch storm alerts";
const SATELLITE_ERROR: &str = "Failed to fetch satellite imagery";
const AIR_QUALITY_ERROR: &str = "Failed to fetch air quality data";

/// Raw `lat`/`lon` query values, validated by [`Coordinates::parse`]
#[derive(Debug, Deserialize)]
pub struct CoordinateQuery {
    pub lat: String,
    pub lon: String,
}

/// Error body `{ "error": message }` with its status
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn internal(generic: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: generic.to_string(),
        }
    }

    /// Map a failure to the endpoint's generic message. Only not-found is
    /// shown as it is.
    fn from_storm(err: StormError, generic: &'static str) -> Self {
        match err {
            StormError::NotFound { message } => Self {
                status: StatusCode::NOT_FOUND,
                message,
            },
            StormError::InvalidQuery { message } => {
                warn!("{}: {}", generic, message);
                Self::internal(generic)
            }
            other => {
                error!("{}: {}", generic, other);
                Self::internal(generic)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn coordinates(query: Result<Query<CoordinateQuery>, QueryRejection>) -> Result<Coordinates, StormError> {
    let Query(query) = query.map_err(|rejection| StormError::invalid_query(rejection.body_text()))?;
    Coordinates::parse(&query.lat, &query.lon)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyForecastBody {
    pub hourly_forecast: Vec<MergedForecastRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecastBody {
    pub daily_forecast: Vec<ForecastRecord>,
}

#[derive(Debug, Serialize)]
pub struct TenDayForecastBody {
    #[serde(rename = "next10DaysForecast")]
    pub next_10_days_forecast: Vec<ForecastRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsBody {
    pub storm_alerts: Vec<AlertRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteBody {
    pub image_url: String,
}

pub fn router(state: AppState) -> Router {
    let timeout = state.request_timeout;
    Router::new()
        .route("/weather", bounded(get_hourly_forecast, HOURLY_ERROR, timeout))
        .route("/weather/daily", bounded(get_daily_forecast, DAILY_ERROR, timeout))
        .route("/weather/10days", bounded(get_ten_day_forecast, TEN_DAY_ERROR, timeout))
        .route("/alerts", bounded(get_alerts, ALERTS_ERROR, timeout))
        .route("/satellite", bounded(get_satellite, SATELLITE_ERROR, timeout))
        .route("/airquality", bounded(get_air_quality, AIR_QUALITY_ERROR, timeout))
        .with_state(state)
}

/// GET route that answers with its generic error once `timeout` elapses
fn bounded<H, T>(handler: H, generic: &'static str, timeout: Duration) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    get(handler).layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                error!("{}: request aborted: {}", generic, err);
                ApiError::internal(generic)
            }))
            .layer(TimeoutLayer::new(timeout)),
    )
}

async fn get_hourly_forecast(
    State(state): State<AppState>,
    query: Result<Query<CoordinateQuery>, QueryRejection>,
) -> ApiResult<HourlyForecastBody> {
    let hourly = async {
        let point = state.weather.resolve_point(&coordinates(query)?).await?;
        state.weather.fetch_hourly(&point).await
    }
    .await
    .map_err(|e| ApiError::from_storm(e, HOURLY_ERROR))?;

    Ok(Json(HourlyForecastBody {
        hourly_forecast: hourly,
    }))
}

async fn get_daily_forecast(
    State(state): State<AppState>,
    query: Result<Query<CoordinateQuery>, QueryRejection>,
) -> ApiResult<DailyForecastBody> {
    let daily = async {
        let point = state.weather.resolve_point(&coordinates(query)?).await?;
        state.weather.fetch_daily(&point).await
    }
    .await
    .map_err(|e| ApiError::from_storm(e, DAILY_ERROR))?;

    Ok(Json(DailyForecastBody {
        daily_forecast: daily,
    }))
}

async fn get_ten_day_forecast(
    State(state): State<AppState>,
    query: Result<Query<CoordinateQuery>, QueryRejection>,
) -> ApiResult<TenDayForecastBody> {
    let ten_day = async {
        let point = state.weather.resolve_point(&coordinates(query)?).await?;
        state.weather.fetch_ten_day(&point).await
    }
    .await
    .map_err(|e| ApiError::from_storm(e, TEN_DAY_ERROR))?;

    Ok(Json(TenDayForecastBody {
        next_10_days_forecast: ten_day,
    }))
}

async fn get_alerts(
    State(state): State<AppState>,
    query: Result<Query<CoordinateQuery>, QueryRejection>,
) -> ApiResult<AlertsBody> {
    let alerts = async {
        let point = state.weather.resolve_point(&coordinates(query)?).await?;
        state.weather.fetch_alerts(&point).await
    }
    .await
    .map_err(|e| ApiError::from_storm(e, ALERTS_ERROR))?;

    Ok(Json(AlertsBody {
        storm_alerts: alerts,
    }))
}

async fn get_satellite(
    State(state): State<AppState>,
    query: Result<Query<CoordinateQuery>, QueryRejection>,
) -> ApiResult<SatelliteBody> {
    let coordinates = coordinates(query).map_err(|e| ApiError::from_storm(e, SATELLITE_ERROR))?;

    Ok(Json(SatelliteBody {
        image_url: state.satellite.image_url(&coordinates),
    }))
}

async fn get_air_quality(
    State(state): State<AppState>,
    query: Result<Query<CoordinateQuery>, QueryRejection>,
) -> ApiResult<AirQualityRecord> {
    let record = async { state.air_quality.fetch_air_quality(&coordinates(query)?).await }
        .await
        .map_err(|e| ApiError::from_storm(e, AIR_QUALITY_ERROR))?;

    Ok(Json(record))
}
