/// Test fixtures: representative JSON payloads from the OpenWeatherMap
/// current weather API.
///
/// These fixtures are structurally complete but trimmed to the fields the
/// parser exercises plus enough surrounding envelope to stay realistic.
/// They reflect the real response returned by:
///   http://api.openweathermap.org/data/2.5/weather?q=...&appid=...
///
/// Response shape (fields the pipeline reads):
///   main.temp               — temperature in Kelvin (no units parameter sent)
///   main.humidity           — relative humidity percent, as a JSON integer
///   wind.speed              — wind speed in m/s
///   weather[0].description  — free-text condition, e.g. "clear sky"
///
/// Note: the payload also carries a resolved location `name`; the pipeline
/// keys rows by the configured city instead and ignores it.

/// London with clear sky: 300.00 K, 50% humidity, 3.5 m/s wind. The
/// canonical happy-path payload for the whole pipeline.
#[cfg(test)]
pub(crate) fn fixture_london_clear_json() -> &'static str {
    r#"{
      "coord": { "lon": -0.1257, "lat": 51.5085 },
      "weather": [
        { "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }
      ],
      "base": "stations",
      "main": {
        "temp": 300.0,
        "feels_like": 300.87,
        "temp_min": 298.48,
        "temp_max": 301.05,
        "pressure": 1016,
        "humidity": 50
      },
      "visibility": 10000,
      "wind": { "speed": 3.5, "deg": 240 },
      "clouds": { "all": 0 },
      "dt": 1717243200,
      "sys": { "type": 2, "id": 2075535, "country": "GB", "sunrise": 1717212279, "sunset": 1717271420 },
      "timezone": 3600,
      "id": 2643743,
      "name": "London",
      "cod": 200
    }"#
}

/// Oslo with two stacked conditions — the first entry is the primary one
/// and is what the pipeline stores.
#[cfg(test)]
pub(crate) fn fixture_multi_condition_json() -> &'static str {
    r#"{
      "coord": { "lon": 10.7461, "lat": 59.9127 },
      "weather": [
        { "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" },
        { "id": 701, "main": "Mist", "description": "mist", "icon": "50d" }
      ],
      "base": "stations",
      "main": {
        "temp": 281.64,
        "feels_like": 279.32,
        "temp_min": 280.93,
        "temp_max": 282.59,
        "pressure": 1004,
        "humidity": 93
      },
      "visibility": 8000,
      "wind": { "speed": 4.1, "deg": 200 },
      "clouds": { "all": 90 },
      "dt": 1717243200,
      "sys": { "type": 1, "id": 1636, "country": "NO", "sunrise": 1717206279, "sunset": 1717271420 },
      "timezone": 7200,
      "id": 3143244,
      "name": "Oslo",
      "cod": 200
    }"#
}

/// Structurally valid JSON envelope with the `main` block absent entirely.
/// Simulates an API change or a truncated upstream response; the parser
/// must fail instead of storing a partial row.
#[cfg(test)]
pub(crate) fn fixture_missing_main_json() -> &'static str {
    r#"{
      "coord": { "lon": -0.1257, "lat": 51.5085 },
      "weather": [
        { "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }
      ],
      "base": "stations",
      "wind": { "speed": 3.5, "deg": 240 },
      "dt": 1717243200,
      "name": "London",
      "cod": 200
    }"#
}

/// Payload with an empty `weather` condition array — a timestamped
/// observation exists but there is no description to store.
#[cfg(test)]
pub(crate) fn fixture_empty_weather_array_json() -> &'static str {
    r#"{
      "coord": { "lon": -0.1257, "lat": 51.5085 },
      "weather": [],
      "base": "stations",
      "main": {
        "temp": 295.15,
        "feels_like": 295.0,
        "temp_min": 294.0,
        "temp_max": 296.3,
        "pressure": 1012,
        "humidity": 60
      },
      "wind": { "speed": 2.1, "deg": 120 },
      "dt": 1717243200,
      "name": "London",
      "cod": 200
    }"#
}
