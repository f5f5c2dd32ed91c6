//! `stormwatch` - storm reporting API
//!
//! Forwards coordinates to weather.gov, NASA Earth imagery and AirNow and
//! reshapes their responses into the simplified schema the browser client
//! renders.

pub mod air_quality;
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod satellite;
pub mod upstream;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use air_quality::AirNowClient;
pub use config::StormConfig;
pub use error::StormError;
pub use models::{Coordinates, Reading};
pub use satellite::SatelliteImagery;
pub use upstream::UpstreamClient;
pub use weather::WeatherGovClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, StormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
