/// Shared data types for the weather collection pipeline.
///
/// `RawReading` is what the fetcher extracts from one API response; it
/// lives only long enough to be normalized. `NormalizedReading` is the
/// storage-ready record and is immutable once constructed.

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// One weather observation as returned by the API, before cleaning.
/// Temperature is in Kelvin, exactly as the API reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReading {
    pub city: String,
    pub temperature_k: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Wind speed, meters per second.
    pub wind_speed: f64,
    /// Free-text condition description, e.g. "clear sky".
    pub description: String,
}

/// A cleaned reading ready to be appended to the `weather` table.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedReading {
    pub city: String,
    /// Temperature in Celsius, rounded to exactly two decimal places.
    pub temperature_c: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub description: String,
    /// Capture time from the process-local clock.
    pub captured_at: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// Fetch errors
// ---------------------------------------------------------------------------

/// Failure modes for one API call. The fetcher absorbs all of these at
/// its boundary: callers only ever see `Option<RawReading>`.
#[derive(Debug)]
pub enum FetchError {
    /// Network-level failure before a status line was read.
    Transport(String),
    /// The API answered with a non-success status.
    Status { code: u16, body: String },
    /// The response body did not match the expected payload shape,
    /// including missing fields and an empty condition array.
    Parse(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transport(detail) => {
                write!(f, "transport error: {}", detail)
            }
            FetchError::Status { code, body } => {
                write!(f, "request failed with HTTP status {}: {}", code, body)
            }
            FetchError::Parse(detail) => {
                write!(f, "unexpected response payload: {}", detail)
            }
        }
    }
}

impl std::error::Error for FetchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display_includes_status_code() {
        let err = FetchError::Status {
            code: 401,
            body: "{\"cod\":401,\"message\":\"Invalid API key\"}".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("401"), "display should include the status code: {}", msg);
        assert!(msg.contains("Invalid API key"), "display should include the body: {}", msg);
    }

    #[test]
    fn test_fetch_error_display_includes_parse_detail() {
        let err = FetchError::Parse("missing field `main`".to_string());
        assert!(err.to_string().contains("missing field `main`"));
    }
}
