/// Reading persistence: append-only writes to the `weather` table.
///
/// The store owns the database connection for the process: it opens one
/// lazily on the first write, reuses it across cycles, and drops it after
/// any error so the next cycle reconnects from scratch. Write failures
/// never abort the job; the cycle's reading is dropped and logged.

use postgres::Client;
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::db::{self, DbError};
use crate::model::NormalizedReading;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum StoreError {
    /// Connecting (or validating the URL) failed.
    Connect(DbError),
    /// A statement failed on an open connection.
    Db(postgres::Error),
    /// A reading value could not be encoded for a NUMERIC column.
    Encode(String),
    /// No connection is open. Internal defect guard, mirrors a failed
    /// `ensure_connection`.
    NotConnected,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Connect(e) => write!(f, "{}", e),
            StoreError::Db(e) => write!(f, "database statement failed: {}", e),
            StoreError::Encode(detail) => write!(f, "could not encode reading: {}", detail),
            StoreError::NotConnected => write!(f, "database connection is not open"),
        }
    }
}

impl std::error::Error for StoreError {}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

// Column names carry their units, matching the rows downstream consumers
// already read. The table is append-only: no key, no upsert.
const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS weather (
        city               TEXT NOT NULL,
        "temperature (°C)" NUMERIC NOT NULL,
        "humidity (%)"     NUMERIC NOT NULL,
        "wind_speed (m/s)" NUMERIC NOT NULL,
        weather            TEXT NOT NULL,
        "timestamp"        TIMESTAMP NOT NULL
    )
"#;

const INSERT_SQL: &str = r#"
    INSERT INTO weather
        (city, "temperature (°C)", "humidity (%)", "wind_speed (m/s)", weather, "timestamp")
    VALUES ($1, $2, $3, $4, $5, $6)
"#;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Appends normalized readings to the `weather` table, one row per cycle.
pub struct ReadingStore {
    db_url: String,
    client: Option<Client>,
}

impl ReadingStore {
    pub fn new(db_url: impl Into<String>) -> Self {
        Self {
            db_url: db_url.into(),
            client: None,
        }
    }

    /// Whether a connection is currently cached. An empty cycle must never
    /// flip this to true.
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Appends one reading as one row. `None` logs a warning and does
    /// nothing. Connection and write errors are logged and swallowed;
    /// the cached connection is dropped so the next cycle reconnects.
    pub fn append(&mut self, reading: Option<NormalizedReading>) {
        let reading = match reading {
            Some(reading) => reading,
            None => {
                warn!("No weather data to store");
                return;
            }
        };

        match self.try_append(&reading) {
            Ok(()) => info!("Weather data stored for city '{}'", reading.city),
            Err(e) => {
                error!("Error storing weather data for city '{}': {}", reading.city, e);
                self.client = None;
            }
        }
    }

    fn try_append(&mut self, reading: &NormalizedReading) -> Result<(), StoreError> {
        let temperature = numeric(reading.temperature_c, "temperature")?;
        let humidity = numeric(reading.humidity, "humidity")?;
        let wind_speed = numeric(reading.wind_speed, "wind speed")?;

        self.ensure_connection()?;
        let client = self.client.as_mut().ok_or(StoreError::NotConnected)?;

        client
            .execute(
                INSERT_SQL,
                &[
                    &reading.city,
                    &temperature,
                    &humidity,
                    &wind_speed,
                    &reading.description,
                    &reading.captured_at,
                ],
            )
            .map_err(StoreError::Db)?;

        Ok(())
    }

    /// Opens the connection on first use and makes sure the `weather`
    /// table exists. Subsequent calls reuse the cached connection.
    fn ensure_connection(&mut self) -> Result<(), StoreError> {
        if self.client.is_none() {
            let mut client = db::connect(&self.db_url).map_err(StoreError::Connect)?;
            client
                .batch_execute(CREATE_TABLE_SQL)
                .map_err(StoreError::Db)?;
            info!("Connected to the database; weather table is ready");
            self.client = Some(client);
        }

        Ok(())
    }
}

/// Encodes an f64 reading value for a NUMERIC column. Fails only on
/// non-finite values, which must never reach a row.
fn numeric(value: f64, field: &str) -> Result<Decimal, StoreError> {
    Decimal::try_from(value)
        .map_err(|e| StoreError::Encode(format!("{} value {} is not storable: {}", field, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_empty_is_a_noop() {
        // Points at a server that does not exist; an empty append must
        // not even try to connect.
        let mut store = ReadingStore::new("postgresql://nobody@localhost:1/never");

        store.append(None);

        assert!(
            !store.is_connected(),
            "empty append must not open a database connection"
        );
    }

    #[test]
    fn test_numeric_encodes_rounded_values() {
        let encoded = numeric(26.85, "temperature").expect("finite value should encode");
        assert_eq!(encoded.to_string(), "26.85");
    }

    #[test]
    fn test_numeric_rejects_non_finite_values() {
        assert!(numeric(f64::NAN, "temperature").is_err());
        assert!(numeric(f64::INFINITY, "wind speed").is_err());
    }

    #[test]
    fn test_insert_targets_unit_labelled_columns() {
        assert!(INSERT_SQL.contains(r#""temperature (°C)""#));
        assert!(INSERT_SQL.contains(r#""humidity (%)""#));
        assert!(INSERT_SQL.contains(r#""wind_speed (m/s)""#));
    }
}
