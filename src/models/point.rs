//! weather.gov point resource

use serde::Deserialize;

use crate::{Result, StormError};

const SERVICE: &str = "weather.gov";

#[derive(Debug, Clone, Deserialize)]
pub struct PointResponse {
    pub properties: PointResource,
}

/// Links to the resources that depend on a coordinate
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointResource {
    pub forecast: Option<String>,
    pub forecast_hourly: Option<String>,
    pub forecast_grid_data: Option<String>,
    pub forecast_zone: Option<String>,
}

fn require<'a>(link: Option<&'a String>, name: &str) -> Result<&'a str> {
    link.map(String::as_str)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| StormError::upstream(SERVICE, format!("point resource has no {name} link")))
}

impl PointResource {
    pub fn daily_forecast_url(&self) -> Result<&str> {
        require(self.forecast.as_ref(), "forecast")
    }

    pub fn hourly_forecast_url(&self) -> Result<&str> {
        require(self.forecast_hourly.as_ref(), "forecastHourly")
    }

    pub fn grid_data_url(&self) -> Result<&str> {
        require(self.forecast_grid_data.as_ref(), "forecastGridData")
    }

    /// Alert zone identifier, the last path segment of the forecast zone link
    pub fn zone_id(&self) -> Result<&str> {
        let zone_url = require(self.forecast_zone.as_ref(), "forecastZone")?;
        zone_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| {
                StormError::upstream(SERVICE, format!("cannot derive zone from '{zone_url}'"))
            })
    }
}
