/// Reading normalization: unit conversion and capture timestamping.
///
/// Sits between the fetcher and the store. An empty fetch result passes
/// through as an empty normalization result, so the "nothing this cycle"
/// case flows the whole pipeline without special-casing in the job.

use chrono::Local;
use tracing::{info, warn};

use crate::model::{NormalizedReading, RawReading};

const KELVIN_OFFSET: f64 = 273.15;

/// Converts a temperature in Kelvin to Celsius, rounded to exactly two
/// decimal places.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    ((kelvin - KELVIN_OFFSET) * 100.0).round() / 100.0
}

/// Converts a raw reading into a storage-ready record: Kelvin → Celsius,
/// stamped with the process-local clock. All other fields pass through
/// unchanged. `None` in means `None` out: nothing to store this cycle.
pub fn normalize(raw: Option<RawReading>) -> Option<NormalizedReading> {
    let raw = match raw {
        Some(raw) => raw,
        None => {
            warn!("No weather data to normalize");
            return None;
        }
    };

    let normalized = NormalizedReading {
        temperature_c: kelvin_to_celsius(raw.temperature_k),
        humidity: raw.humidity,
        wind_speed: raw.wind_speed,
        description: raw.description,
        captured_at: Local::now().naive_local(),
        city: raw.city,
    };

    info!("Weather data normalized for city '{}'", normalized.city);
    Some(normalized)
}
