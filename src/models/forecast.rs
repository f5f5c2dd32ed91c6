//! Forecast periods, grid series and the records built from them

use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::reading::{Reading, text_or_sentinel};

/// Hourly or daily forecast resource as returned by weather.gov
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub properties: ForecastProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastProperties {
    #[serde(default)]
    pub periods: Vec<ForecastPeriod>,
}

/// One time-bucketed reading. Upstream order is chronological.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub start_time: Option<String>,
    pub temperature: Option<Number>,
    pub short_forecast: Option<String>,
    pub wind_speed: Option<String>,
    pub wind_direction: Option<String>,
    pub detailed_forecast: Option<String>,
    pub probability_of_precipitation: Option<QuantitativeValue>,
    pub relative_humidity: Option<QuantitativeValue>,
}

/// `{ "unitCode": "wmoUnit:percent", "value": 20 }`, value may be null
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuantitativeValue {
    pub value: Option<Number>,
}

/// Raw grid data resource
#[derive(Debug, Clone, Deserialize)]
pub struct GridDataResponse {
    pub properties: GridProperties,
}

/// Parallel series correlated to forecast periods by position only
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProperties {
    #[serde(default)]
    pub relative_humidity: GridSeries,
    #[serde(default)]
    pub probability_of_precipitation: GridSeries,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridSeries {
    #[serde(default)]
    pub values: Vec<GridValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridValue {
    pub value: Option<Number>,
}

impl GridSeries {
    /// Value at `index`, or the sentinel when the series is too short or the
    /// entry carries no value.
    #[must_use]
    pub fn reading_at(&self, index: usize) -> Reading {
        self.values
            .get(index)
            .and_then(|entry| entry.value.clone())
            .into()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Hourly output record: a forecast period joined with its grid entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedForecastRecord {
    pub start_time: String,
    pub temperature: Reading,
    pub condition: String,
    pub wind_speed: String,
    pub wind_direction: String,
    pub detailed_forecast: String,
    pub humidity: Reading,
    pub precipitation_probability: Reading,
}

/// Daily and 10-day output record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRecord {
    pub date: String,
    pub temperature_high: Reading,
    pub condition: String,
    pub wind_speed: String,
    pub wind_direction: String,
    pub detailed_forecast: String,
    pub precipitation_probability: Reading,
    pub humidity: Reading,
}

fn embedded(value: Option<QuantitativeValue>) -> Reading {
    value.and_then(|v| v.value).into()
}

/// Calendar date of a period: the `startTime` text before the `T`
fn date_part(start_time: Option<String>) -> String {
    let date = start_time.map(|text| match text.split_once('T') {
        Some((date, _)) => date.to_string(),
        None => text,
    });
    text_or_sentinel(date)
}

impl From<ForecastPeriod> for ForecastRecord {
    fn from(period: ForecastPeriod) -> Self {
        Self {
            date: date_part(period.start_time),
            temperature_high: period.temperature.into(),
            condition: text_or_sentinel(period.short_forecast),
            wind_speed: text_or_sentinel(period.wind_speed),
            wind_direction: text_or_sentinel(period.wind_direction),
            detailed_forecast: period.detailed_forecast.unwrap_or_default(),
            precipitation_probability: embedded(period.probability_of_precipitation),
            humidity: embedded(period.relative_humidity),
        }
    }
}

impl MergedForecastRecord {
    fn pair(period: ForecastPeriod, humidity: Reading, precipitation_probability: Reading) -> Self {
        Self {
            start_time: text_or_sentinel(period.start_time),
            temperature: period.temperature.into(),
            condition: text_or_sentinel(period.short_forecast),
            wind_speed: text_or_sentinel(period.wind_speed),
            wind_direction: text_or_sentinel(period.wind_direction),
            detailed_forecast: period.detailed_forecast.unwrap_or_default(),
            humidity,
            precipitation_probability,
        }
    }
}

/// Join periods with the grid series by position. The output always has one
/// record per period; grid entries beyond the period count are ignored and
/// missing ones become the sentinel.
#[must_use]
pub fn merge_by_index(periods: Vec<ForecastPeriod>, grid: &GridProperties) -> Vec<MergedForecastRecord> {
    periods
        .into_iter()
        .enumerate()
        .map(|(index, period)| {
            MergedForecastRecord::pair(
                period,
                grid.relative_humidity.reading_at(index),
                grid.probability_of_precipitation.reading_at(index),
            )
        })
        .collect()
}
