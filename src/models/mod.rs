//! Data models for the stormwatch service
//!
//! Upstream payloads are deserialized into the `*Response` types and reshaped
//! into the simplified records the browser client consumes:
//! - Location: coordinate pair taken from the query string
//! - Point: weather.gov point resource and the links it carries
//! - Forecast: forecast periods, grid series and the merged records
//! - Alert: active alerts for a forecast zone
//! - Air quality: AirNow observations

pub mod air_quality;
pub mod alert;
pub mod forecast;
pub mod location;
pub mod point;
pub mod reading;

// Re-export all public types for convenient access
pub use air_quality::{AirNowObservation, AirQualityRecord};
pub use alert::{AlertRecord, AlertsResponse};
pub use forecast::{
    ForecastPeriod, ForecastRecord, ForecastResponse, GridDataResponse, GridProperties, GridSeries,
    MergedForecastRecord, merge_by_index,
};
pub use location::Coordinates;
pub use point::{PointResource, PointResponse};
pub use reading::{NOT_AVAILABLE, Reading, text_or_sentinel};
