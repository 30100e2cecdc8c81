/// wxcollect_service: periodic city weather collection service.
///
/// # Module structure
///
/// ```text
/// wxcollect_service
/// ├── model      — shared data types (RawReading, NormalizedReading, FetchError)
/// ├── config     — job configuration loader (config.json)
/// ├── bootstrap  — PostgreSQL service startup via the platform ServiceController
/// ├── db         — database connection and database-creation utilities
/// ├── ingest
/// │   ├── openweather — OpenWeatherMap current weather API: URL construction + JSON parsing
/// │   └── fixtures (test only) — representative API response payloads
/// ├── normalize  — unit conversion (Kelvin → Celsius) and capture timestamping
/// ├── store      — append-only persistence into the `weather` table
/// ├── job        — one collection cycle: fetch → normalize → store
/// └── scheduler  — fixed-interval loop with a one-second tick
/// ```

/// Public modules
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod ingest;
pub mod job;
pub mod model;
pub mod normalize;
pub mod scheduler;
pub mod store;
