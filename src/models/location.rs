//! Coordinate pair supplied by the browser client

use std::fmt;

use crate::{Result, StormError};

/// Latitude/longitude in decimal degrees, kept as the text the client sent.
/// Both values must parse as finite numbers; ranges are not checked, the
/// upstream services decide what they cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    lat: String,
    lon: String,
}

fn checked(name: &str, value: &str) -> Result<String> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(value.to_string()),
        _ => Err(StormError::invalid_query(format!(
            "{name} must be a decimal number, got '{value}'"
        ))),
    }
}

impl Coordinates {
    /// Validate raw query values without reformatting them
    pub fn parse(lat: &str, lon: &str) -> Result<Self> {
        Ok(Self {
            lat: checked("lat", lat)?,
            lon: checked("lon", lon)?,
        })
    }

    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: lat.to_string(),
            lon: lon.to_string(),
        }
    }

    #[must_use]
    pub fn lat(&self) -> &str {
        &self.lat
    }

    #[must_use]
    pub fn lon(&self) -> &str {
        &self.lon
    }

    /// Path segment used by the weather.gov points endpoint
    #[must_use]
    pub fn point_path(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}
