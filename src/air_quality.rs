//! AirNow air quality lookup by coordinate

use tracing::{info, instrument, warn};

use crate::config::{ApiKey, UpstreamConfig};
use crate::models::{AirNowObservation, AirQualityRecord, Coordinates};
use crate::upstream::UpstreamClient;
use crate::{Result, StormError};

const SERVICE: &str = "airnow";

#[derive(Debug, Clone)]
pub struct AirNowClient {
    http: UpstreamClient,
    base_url: String,
    api_key: Option<ApiKey>,
    radius_miles: u32,
}

impl AirNowClient {
    pub fn new(http: UpstreamClient, config: &UpstreamConfig, api_key: Option<ApiKey>) -> Self {
        Self {
            http,
            base_url: config.airnow_base_url.trim_end_matches('/').to_string(),
            api_key,
            radius_miles: config.air_quality_radius_miles,
        }
    }

    /// Current observation nearest to the coordinate.
    ///
    /// Returns `NotFound` when AirNow has no observation within the radius.
    /// Only the first observation is used.
    #[instrument(skip_all, fields(lat = coordinates.lat(), lon = coordinates.lon()))]
    pub async fn fetch_air_quality(&self, coordinates: &Coordinates) -> Result<AirQualityRecord> {
        let Some(api_key) = &self.api_key else {
            warn!("AirNow API key is not configured");
            return Err(StormError::config("AirNow API key is not configured"));
        };

        let url = format!("{}/aq/observation/latLong/current/", self.base_url);
        let distance = self.radius_miles.to_string();
        let query = [
            ("format", "application/json"),
            ("latitude", coordinates.lat()),
            ("longitude", coordinates.lon()),
            ("distance", distance.as_str()),
            ("API_KEY", api_key.expose()),
        ];

        let observations: Vec<AirNowObservation> = self.http.get_json(SERVICE, &url, &query).await?;
        let count = observations.len();

        let first = observations.into_iter().next().ok_or_else(|| {
            StormError::not_found("No air quality data found for the given location.")
        })?;

        info!("AirNow returned {} observations, using the first", count);
        Ok(AirQualityRecord::from(first))
    }
}
