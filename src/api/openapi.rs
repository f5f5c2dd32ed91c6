//! Machine-readable description of the `/api` routes, served at `/api-docs`

use axum::Json;
use serde_json::{Value, json};

struct Endpoint {
    path: &'static str,
    summary: &'static str,
    success: &'static str,
    schema: &'static str,
}

const ENDPOINTS: &[Endpoint] = &[
    Endpoint {
        path: "/api/weather",
        summary: "Get hourly weather data for a specific location",
        success: "Hourly weather data retrieved successfully",
        schema: "HourlyForecast",
    },
    Endpoint {
        path: "/api/weather/daily",
        summary: "Get daily weather data for a specific location",
        success: "Daily weather data retrieved successfully",
        schema: "DailyForecast",
    },
    Endpoint {
        path: "/api/weather/10days",
        summary: "Get 10-day weather forecast data for a specific location",
        success: "10-day weather data retrieved successfully",
        schema: "TenDayForecast",
    },
    Endpoint {
        path: "/api/alerts",
        summary: "Get active storm alerts for a specific location",
        success: "Active storm alerts retrieved successfully",
        schema: "StormAlerts",
    },
    Endpoint {
        path: "/api/satellite",
        summary: "Get live regional satellite view for a specific location",
        success: "Satellite image URL retrieved successfully",
        schema: "Satellite",
    },
    Endpoint {
        path: "/api/airquality",
        summary: "Get air quality data for a specific location",
        success: "Air quality data retrieved successfully",
        schema: "AirQuality",
    },
];

fn coordinate_parameter(name: &str, description: &str) -> Value {
    json!({
        "in": "query",
        "name": name,
        "required": true,
        "schema": { "type": "number" },
        "description": description
    })
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

fn operation(endpoint: &Endpoint) -> Value {
    let mut responses = json!({
        "200": {
            "description": endpoint.success,
            "content": { "application/json": { "schema": schema_ref(endpoint.schema) } }
        },
        "500": {
            "description": "An upstream service failed or lat/lon were missing or invalid",
            "content": { "application/json": { "schema": schema_ref("Error") } }
        }
    });
    if endpoint.path == "/api/airquality" {
        responses["404"] = json!({
            "description": "No air quality data found for the given location",
            "content": { "application/json": { "schema": schema_ref("Error") } }
        });
    }

    json!({
        "get": {
            "summary": endpoint.summary,
            "parameters": [
                coordinate_parameter("lat", "Latitude of the location"),
                coordinate_parameter("lon", "Longitude of the location")
            ],
            "responses": responses
        }
    })
}

fn components() -> Value {
    let reading = json!({
        "oneOf": [{ "type": "number" }, { "type": "string", "enum": ["N/A"] }]
    });
    let forecast_record = json!({
        "type": "object",
        "properties": {
            "date": { "type": "string", "format": "date" },
            "temperatureHigh": reading,
            "condition": { "type": "string" },
            "windSpeed": { "type": "string" },
            "windDirection": { "type": "string" },
            "detailedForecast": { "type": "string" },
            "precipitationProbability": reading,
            "humidity": reading
        }
    });

    json!({
        "schemas": {
            "Error": {
                "type": "object",
                "properties": { "error": { "type": "string" } }
            },
            "HourlyForecast": {
                "type": "object",
                "properties": {
                    "hourlyForecast": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "startTime": { "type": "string", "format": "date-time" },
                                "temperature": reading,
                                "condition": { "type": "string" },
                                "windSpeed": { "type": "string" },
                                "windDirection": { "type": "string" },
                                "detailedForecast": { "type": "string" },
                                "humidity": reading,
                                "precipitationProbability": reading
                            }
                        }
                    }
                }
            },
            "DailyForecast": {
                "type": "object",
                "properties": { "dailyForecast": { "type": "array", "items": forecast_record } }
            },
            "TenDayForecast": {
                "type": "object",
                "properties": {
                    "next10DaysForecast": { "type": "array", "maxItems": 10, "items": forecast_record }
                }
            },
            "StormAlerts": {
                "type": "object",
                "properties": {
                    "stormAlerts": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "event": { "type": "string" },
                                "severity": { "type": "string" },
                                "description": { "type": "string" },
                                "instruction": { "type": "string" },
                                "effective": { "type": "string" },
                                "expires": { "type": "string" }
                            }
                        }
                    }
                }
            },
            "Satellite": {
                "type": "object",
                "properties": { "imageUrl": { "type": "string", "format": "uri" } }
            },
            "AirQuality": {
                "type": "object",
                "properties": {
                    "DateObserved": { "type": "string" },
                    "AQI": reading,
                    "Category": { "type": "string" },
                    "Pollutant": { "type": "string" }
                }
            }
        }
    })
}

/// OpenAPI 3.0 document for the service
#[must_use]
pub fn document() -> Value {
    let mut paths = serde_json::Map::new();
    for endpoint in ENDPOINTS {
        paths.insert(endpoint.path.to_string(), operation(endpoint));
    }

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Storm Reporting API",
            "version": crate::VERSION,
            "description": "API for fetching weather data, storm alerts, and satellite imagery based on location"
        },
        "paths": paths,
        "components": components()
    })
}

pub async fn get_document() -> Json<Value> {
    Json(document())
}
