//! AirNow current observations

use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::reading::{Reading, text_or_sentinel};

/// One element of the AirNow `latLong/current` response array
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AirNowObservation {
    pub date_observed: Option<String>,
    pub parameter_name: Option<String>,
    #[serde(rename = "AQI")]
    pub aqi: Option<Number>,
    pub category: Option<AirNowCategory>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AirNowCategory {
    pub name: Option<String>,
}

/// Air quality reading handed to the browser client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityRecord {
    #[serde(rename = "DateObserved")]
    pub date_observed: String,
    #[serde(rename = "AQI")]
    pub aqi: Reading,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Pollutant")]
    pub pollutant: String,
}

impl From<AirNowObservation> for AirQualityRecord {
    fn from(observation: AirNowObservation) -> Self {
        Self {
            date_observed: text_or_sentinel(observation.date_observed),
            aqi: observation.aqi.into(),
            category: text_or_sentinel(observation.category.and_then(|c| c.name)),
            pollutant: text_or_sentinel(observation.parameter_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_observation_renamed() {
        let observation: AirNowObservation = serde_json::from_value(json!({
            "DateObserved": "2024-06-01 ",
            "HourObserved": 14,
            "LocalTimeZone": "EST",
            "ReportingArea": "Metropolitan Washington",
            "StateCode": "DC",
            "Latitude": 38.919,
            "Longitude": -77.013,
            "ParameterName": "O3",
            "AQI": 42,
            "Category": { "Number": 1, "Name": "Good" }
        }))
        .unwrap();

        let value = serde_json::to_value(AirQualityRecord::from(observation)).unwrap();
        assert_eq!(
            value,
            json!({
                "DateObserved": "2024-06-01 ",
                "AQI": 42,
                "Category": "Good",
                "Pollutant": "O3"
            })
        );
    }

    #[test]
    fn test_missing_category_uses_sentinel() {
        let observation: AirNowObservation =
            serde_json::from_value(json!({ "ParameterName": "PM2.5", "AQI": -1 })).unwrap();
        let record = AirQualityRecord::from(observation);
        assert_eq!(record.category, "N/A");
        assert_eq!(record.date_observed, "N/A");
    }
}
