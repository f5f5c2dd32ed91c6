//! NASA Earth imagery reference
//!
//! The browser fetches the image itself; this only builds the URL.

use crate::config::ApiKey;
use crate::models::Coordinates;

/// Width and height of the image tile, in degrees
pub const IMAGE_DIM: &str = "0.05";

#[derive(Debug, Clone)]
pub struct SatelliteImagery {
    imagery_url: String,
    api_key: Option<ApiKey>,
}

impl SatelliteImagery {
    pub fn new(imagery_url: impl Into<String>, api_key: Option<ApiKey>) -> Self {
        Self {
            imagery_url: imagery_url.into(),
            api_key,
        }
    }

    /// Image URL for the coordinate. A missing key yields an empty `api_key`
    /// parameter; NASA rejects it when the browser loads the image.
    #[must_use]
    pub fn image_url(&self, coordinates: &Coordinates) -> String {
        let key = self.api_key.as_ref().map(ApiKey::expose).unwrap_or_default();
        format!(
            "{}?lat={}&lon={}&dim={}&api_key={}",
            self.imagery_url,
            coordinates.lat(),
            coordinates.lon(),
            IMAGE_DIM,
            urlencoding::encode(key)
        )
    }
}
