//! Active alerts for a forecast zone

use serde::{Deserialize, Serialize};

use super::reading::text_or_sentinel;

/// GeoJSON feature collection returned by `/alerts/active`
#[derive(Debug, Clone, Deserialize)]
pub struct AlertsResponse {
    #[serde(default)]
    pub features: Vec<AlertFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertFeature {
    pub properties: AlertProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertProperties {
    pub event: Option<String>,
    pub severity: Option<String>,
    pub description: Option<String>,
    pub instruction: Option<String>,
    pub effective: Option<String>,
    pub expires: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRecord {
    pub event: String,
    pub severity: String,
    pub description: String,
    pub instruction: String,
    pub effective: String,
    pub expires: String,
}

impl From<AlertFeature> for AlertRecord {
    fn from(feature: AlertFeature) -> Self {
        let alert = feature.properties;
        Self {
            event: text_or_sentinel(alert.event),
            severity: text_or_sentinel(alert.severity),
            description: text_or_sentinel(alert.description),
            instruction: text_or_sentinel(alert.instruction),
            effective: text_or_sentinel(alert.effective),
            expires: text_or_sentinel(alert.expires),
        }
    }
}
