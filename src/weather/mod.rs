//! Forecast aggregation over the weather.gov API
//!
//! Every operation starts from a point lookup and follows the links the point
//! resource carries. The hourly flow is the only one with two dependent
//! fetches; both need nothing but the point, so they run concurrently and
//! either failure fails the whole operation.

use tracing::{debug, info, instrument};

use crate::Result;
use crate::models::{
    AlertRecord, AlertsResponse, Coordinates, ForecastRecord, ForecastResponse, GridDataResponse,
    MergedForecastRecord, PointResource, PointResponse, merge_by_index,
};
use crate::upstream::UpstreamClient;

const SERVICE: &str = "weather.gov";

/// Number of periods kept by the 10-day view
pub const TEN_DAY_PERIODS: usize = 10;

#[derive(Debug, Clone)]
pub struct WeatherGovClient {
    http: UpstreamClient,
    base_url: String,
}

impl WeatherGovClient {
    pub fn new(http: UpstreamClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Look up the point resource for a coordinate pair
    #[instrument(skip_all, fields(lat = coordinates.lat(), lon = coordinates.lon()))]
    pub async fn resolve_point(&self, coordinates: &Coordinates) -> Result<PointResource> {
        let url = format!("{}/points/{}", self.base_url, coordinates.point_path());
        let response: PointResponse = self.http.get_json(SERVICE, &url, &[]).await?;
        debug!("Resolved point for {}", coordinates);
        Ok(response.properties)
    }

    /// Hourly periods joined by index with humidity and precipitation
    /// probability from the grid data resource
    #[instrument(skip_all)]
    pub async fn fetch_hourly(&self, point: &PointResource) -> Result<Vec<MergedForecastRecord>> {
        let forecast_url = point.hourly_forecast_url()?;
        let grid_url = point.grid_data_url()?;

        let (forecast, grid) = futures::try_join!(
            self.http.get_json::<ForecastResponse>(SERVICE, forecast_url, &[]),
            self.http.get_json::<GridDataResponse>(SERVICE, grid_url, &[])
        )?;

        let periods = forecast.properties.periods;
        let grid = grid.properties;
        if grid.relative_humidity.len() < periods.len()
            || grid.probability_of_precipitation.len() < periods.len()
        {
            debug!(
                "Grid series shorter than {} periods (humidity {}, precipitation {})",
                periods.len(),
                grid.relative_humidity.len(),
                grid.probability_of_precipitation.len()
            );
        }

        let merged = merge_by_index(periods, &grid);
        info!("Built {} hourly forecast records", merged.len());
        Ok(merged)
    }

    /// Daily periods mapped field-for-field
    #[instrument(skip_all)]
    pub async fn fetch_daily(&self, point: &PointResource) -> Result<Vec<ForecastRecord>> {
        let url = point.daily_forecast_url()?;
        let forecast: ForecastResponse = self.http.get_json(SERVICE, url, &[]).await?;
        let records: Vec<ForecastRecord> = forecast
            .properties
            .periods
            .into_iter()
            .map(ForecastRecord::from)
            .collect();
        info!("Built {} daily forecast records", records.len());
        Ok(records)
    }

    /// The first ten daily periods
    pub async fn fetch_ten_day(&self, point: &PointResource) -> Result<Vec<ForecastRecord>> {
        let mut records = self.fetch_daily(point).await?;
        records.truncate(TEN_DAY_PERIODS);
        Ok(records)
    }

    /// Active alerts for the point's forecast zone
    #[instrument(skip_all)]
    pub async fn fetch_alerts(&self, point: &PointResource) -> Result<Vec<AlertRecord>> {
        let zone = point.zone_id()?;
        let url = format!("{}/alerts/active", self.base_url);
        let alerts: AlertsResponse = self.http.get_json(SERVICE, &url, &[("zone", zone)]).await?;
        let records: Vec<AlertRecord> = alerts.features.into_iter().map(AlertRecord::from).collect();
        info!("Found {} active alerts for zone {}", records.len(), zone);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StormError;
    use crate::config::StormConfig;
    use crate::models::Reading;
    use rstest::rstest;
    use serde_json::{Value, json};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(mock_server: &MockServer) -> WeatherGovClient {
        let http = UpstreamClient::new(&StormConfig::default().upstream).unwrap();
        WeatherGovClient::new(http, mock_server.uri())
    }

    fn point_for(mock_server: &MockServer) -> PointResource {
        let base = mock_server.uri();
        PointResource {
            forecast: Some(format!("{base}/gridpoints/LWX/97,71/forecast")),
            forecast_hourly: Some(format!("{base}/gridpoints/LWX/97,71/forecast/hourly")),
            forecast_grid_data: Some(format!("{base}/gridpoints/LWX/97,71")),
            forecast_zone: Some(format!("{base}/zones/forecast/DCZ001")),
        }
    }

    fn periods(count: usize) -> Value {
        let periods: Vec<Value> = (0..count)
            .map(|i| {
                json!({
                    "number": i + 1,
                    "startTime": format!("2024-06-{:02}T06:00:00-04:00", i + 1),
                    "temperature": 60 + i,
                    "shortForecast": "Partly Cloudy",
                    "windSpeed": "10 mph",
                    "windDirection": "NW",
                    "detailedForecast": "Partly cloudy.",
                    "probabilityOfPrecipitation": { "unitCode": "wmoUnit:percent", "value": 10 }
                })
            })
            .collect();
        json!({ "properties": { "periods": periods } })
    }

    fn grid_values(count: usize, value: i64) -> Value {
        let values: Vec<Value> = (0..count)
            .map(|i| json!({ "validTime": format!("2024-06-01T{i:02}:00:00+00:00/PT1H"), "value": value }))
            .collect();
        json!({ "values": values })
    }

    #[tokio::test]
    async fn test_resolve_point() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/points/38.8894,-77.0352"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": {
                    "forecast": "https://api.weather.gov/gridpoints/LWX/97,71/forecast",
                    "forecastHourly": "https://api.weather.gov/gridpoints/LWX/97,71/forecast/hourly",
                    "forecastGridData": "https://api.weather.gov/gridpoints/LWX/97,71",
                    "forecastZone": "https://api.weather.gov/zones/forecast/DCZ001"
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let point = client(&mock_server)
            .resolve_point(&Coordinates::new(38.8894, -77.0352))
            .await
            .unwrap();
        assert_eq!(point.zone_id().unwrap(), "DCZ001");
    }

    #[tokio::test]
    async fn test_resolve_point_outside_coverage() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/points/51.5,-0.12"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "title": "Data Unavailable For Requested Point"
            })))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server)
            .resolve_point(&Coordinates::new(51.5, -0.12))
            .await
            .unwrap_err();
        assert!(matches!(err, StormError::Upstream { .. }));
    }

    #[tokio::test]
    async fn test_fetch_hourly_twelve_periods_eight_humidity_values() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/gridpoints/LWX/97,71/forecast/hourly"))
            .respond_with(ResponseTemplate::new(200).set_body_json(periods(12)))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/gridpoints/LWX/97,71"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": {
                    "relativeHumidity": grid_values(8, 70),
                    "probabilityOfPrecipitation": grid_values(12, 20)
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let merged = client(&mock_server)
            .fetch_hourly(&point_for(&mock_server))
            .await
            .unwrap();

        assert_eq!(merged.len(), 12);
        assert!(merged[..8].iter().all(|r| r.humidity == Reading::from(70_i64)));
        assert!(merged[8..].iter().all(|r| r.humidity == Reading::NotAvailable));
        assert!(merged.iter().all(|r| r.precipitation_probability == Reading::from(20_i64)));
    }

    #[tokio::test]
    async fn test_fetch_hourly_grid_failure_fails_whole_operation() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/gridpoints/LWX/97,71/forecast/hourly"))
            .respond_with(ResponseTemplate::new(200).set_body_json(periods(3)))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/gridpoints/LWX/97,71"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).fetch_hourly(&point_for(&mock_server)).await;
        assert!(matches!(result, Err(StormError::Upstream { .. })));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(4, 4)]
    #[case(10, 10)]
    #[case(14, 10)]
    #[tokio::test]
    async fn test_fetch_ten_day_truncates(#[case] available: usize, #[case] expected: usize) {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/gridpoints/LWX/97,71/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(periods(available)))
            .mount(&mock_server)
            .await;

        let client = client(&mock_server);
        let point = point_for(&mock_server);
        let ten_day = client.fetch_ten_day(&point).await.unwrap();
        let daily = client.fetch_daily(&point).await.unwrap();

        assert_eq!(ten_day.len(), expected);
        assert_eq!(daily.len(), available);
        assert_eq!(ten_day.as_slice(), &daily[..expected]);
    }

    #[tokio::test]
    async fn test_fetch_alerts_uses_zone_from_point() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/alerts/active"))
            .and(query_param("zone", "DCZ001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "features": [
                    { "properties": {
                        "event": "Heat Advisory",
                        "severity": "Moderate",
                        "description": "Heat index values up to 105.",
                        "instruction": "Drink plenty of fluids.",
                        "effective": "2024-06-01T10:00:00-04:00",
                        "expires": "2024-06-01T20:00:00-04:00"
                    }}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let alerts = client(&mock_server)
            .fetch_alerts(&point_for(&mock_server))
            .await
            .unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].event, "Heat Advisory");
        assert_eq!(alerts[0].instruction, "Drink plenty of fluids.");
    }

    #[tokio::test]
    async fn test_missing_link_makes_no_call() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(periods(1)))
            .expect(0)
            .mount(&mock_server)
            .await;

        let point = PointResource {
            forecast_hourly: Some(format!("{}/hourly", mock_server.uri())),
            ..PointResource::default()
        };
        let err = client(&mock_server).fetch_hourly(&point).await.unwrap_err();
        assert!(err.to_string().contains("forecastGridData"));
    }
}
