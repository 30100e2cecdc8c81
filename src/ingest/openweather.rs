/// OpenWeatherMap current weather API client.
///
/// Handles URL construction and JSON response parsing for the
/// current-weather endpoint:
///   http://api.openweathermap.org/data/2.5/weather
///
/// Without a `units` parameter the API reports temperature in Kelvin;
/// conversion to Celsius is the normalizer's job, not the fetcher's.
/// See `fixtures.rs` for annotated examples of the response structure.

use serde::Deserialize;
use tracing::{error, info};

use crate::model::{FetchError, RawReading};

// ---------------------------------------------------------------------------
// Serde structures for response deserialization
// ---------------------------------------------------------------------------

// Every field the pipeline persists is required here: a payload missing
// `main.temp` or `wind.speed` fails deserialization and the whole cycle
// degrades to the empty-reading path instead of storing a partial row.

#[derive(Deserialize)]
struct CurrentResponse {
    main: MainFields,
    wind: WindFields,
    weather: Vec<ConditionEntry>,
}

#[derive(Deserialize)]
struct MainFields {
    /// Kelvin.
    temp: f64,
    /// Percent. The API serializes this as a JSON integer.
    humidity: f64,
}

#[derive(Deserialize)]
struct WindFields {
    /// Meters per second.
    speed: f64,
}

#[derive(Deserialize)]
struct ConditionEntry {
    description: String,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

const CURRENT_BASE_URL: &str = "http://api.openweathermap.org/data/2.5/weather";

/// Builds the current-weather request URL for the given city and API key.
///
/// The city name is percent-encoded; "New York" becomes `q=New%20York`.
pub fn build_current_url(city: &str, api_key: &str) -> String {
    format!(
        "{}?q={}&appid={}",
        CURRENT_BASE_URL,
        urlencoding::encode(city),
        api_key
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a current-weather JSON response body into a `RawReading` for the
/// configured city.
///
/// # Errors
/// `FetchError::Parse` — malformed JSON, a missing expected field, or an
/// empty `weather` condition array.
pub fn parse_current_response(json: &str, city: &str) -> Result<RawReading, FetchError> {
    let response: CurrentResponse = serde_json::from_str(json)
        .map_err(|e| FetchError::Parse(format!("JSON deserialization failed: {}", e)))?;

    // The `weather` array is non-empty in practice, but the API contract
    // does not promise it; an empty array means no usable description.
    let condition = response
        .weather
        .first()
        .ok_or_else(|| FetchError::Parse("empty weather condition array".to_string()))?;

    Ok(RawReading {
        city: city.to_string(),
        temperature_k: response.main.temp,
        humidity: response.main.humidity,
        wind_speed: response.wind.speed,
        description: condition.description.clone(),
    })
}

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// One HTTP call per collection cycle for the configured city.
///
/// The HTTP client is injected once at startup and reused across cycles;
/// timeouts rely on library defaults.
pub struct WeatherFetcher {
    http: reqwest::blocking::Client,
    city: String,
    api_key: String,
}

impl WeatherFetcher {
    pub fn new(http: reqwest::blocking::Client, city: String, api_key: String) -> Self {
        Self { http, city, api_key }
    }

    /// Fetches one reading, or `None` when anything went wrong. Transport
    /// failures, non-success statuses, and unparseable payloads are all
    /// logged here and absorbed; no error propagates to the caller.
    pub fn fetch(&self) -> Option<RawReading> {
        match self.try_fetch() {
            Ok(reading) => {
                info!("Weather data fetched for city '{}'", self.city);
                Some(reading)
            }
            Err(e) => {
                error!("Error fetching weather data for city '{}': {}", self.city, e);
                None
            }
        }
    }

    fn try_fetch(&self) -> Result<RawReading, FetchError> {
        let url = build_current_url(&self.city, &self.api_key);

        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        parse_current_response(&body, &self.city)
    }
}

/// Error bodies go into log lines; keep them short.
fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;

    // --- URL construction ---------------------------------------------------

    #[test]
    fn test_build_url_targets_current_weather_endpoint() {
        let url = build_current_url("London", "test-key");
        assert!(
            url.starts_with("http://api.openweathermap.org/data/2.5/weather?"),
            "must target the current weather endpoint, got: {}",
            url
        );
    }

    #[test]
    fn test_build_url_includes_city_and_api_key() {
        let url = build_current_url("London", "test-key");
        assert!(url.contains("q=London"), "must include the city: {}", url);
        assert!(url.contains("appid=test-key"), "must include the API key: {}", url);
    }

    #[test]
    fn test_build_url_percent_encodes_city_names() {
        let url = build_current_url("New York", "k");
        assert!(
            url.contains("q=New%20York"),
            "spaces in the city name must be percent-encoded, got: {}",
            url
        );
    }

    // --- Parsing: happy path ------------------------------------------------

    #[test]
    fn test_parse_london_reading_values() {
        let reading = parse_current_response(fixture_london_clear_json(), "London")
            .expect("valid fixture should parse without error");

        assert_eq!(reading.city, "London");
        assert!(
            (reading.temperature_k - 300.0).abs() < 1e-9,
            "temperature should stay in Kelvin, got {}",
            reading.temperature_k
        );
        assert!((reading.humidity - 50.0).abs() < 1e-9);
        assert!((reading.wind_speed - 3.5).abs() < 1e-9);
        assert_eq!(reading.description, "clear sky");
    }

    #[test]
    fn test_parse_uses_configured_city_not_payload_name() {
        // The configured city keys the stored rows; the payload's resolved
        // location name ("London" vs "London, GB") is not authoritative.
        let reading = parse_current_response(fixture_london_clear_json(), "london,uk")
            .expect("should parse");
        assert_eq!(reading.city, "london,uk");
    }

    #[test]
    fn test_parse_takes_first_weather_condition() {
        let reading = parse_current_response(fixture_multi_condition_json(), "Oslo")
            .expect("multi-condition fixture should parse");
        assert_eq!(
            reading.description, "light rain",
            "the first condition entry is the primary one"
        );
    }

    // --- Parsing: error and edge cases --------------------------------------

    #[test]
    fn test_parse_malformed_json_returns_parse_error() {
        let result = parse_current_response("{ this is not valid json }}}", "London");
        assert!(
            matches!(result, Err(FetchError::Parse(_))),
            "malformed JSON should return Parse, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_empty_string_returns_parse_error() {
        let result = parse_current_response("", "London");
        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[test]
    fn test_parse_missing_main_field_returns_parse_error() {
        let result = parse_current_response(fixture_missing_main_json(), "London");
        assert!(
            matches!(result, Err(FetchError::Parse(_))),
            "payload without main must map to the empty-reading path, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_missing_wind_speed_returns_parse_error() {
        let json = r#"{
            "main": { "temp": 290.0, "humidity": 80 },
            "wind": {},
            "weather": [{ "description": "mist" }]
        }"#;
        let result = parse_current_response(json, "London");
        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[test]
    fn test_parse_empty_weather_array_returns_parse_error() {
        let result = parse_current_response(fixture_empty_weather_array_json(), "London");
        assert!(
            matches!(result, Err(FetchError::Parse(_))),
            "an empty weather array has no description to store, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_integer_humidity_is_accepted() {
        // The API serializes humidity as a JSON integer; it must land in
        // the f64 field without loss.
        let reading = parse_current_response(fixture_london_clear_json(), "London")
            .expect("should parse");
        assert_eq!(reading.humidity, 50.0);
    }
}
