//! City Weather Collection Service - Main Daemon
//!
//! A long-running daemon that:
//! 1. Ensures the PostgreSQL server is running and the target database exists
//! 2. Polls the OpenWeatherMap API for the configured city on a fixed interval
//! 3. Normalizes each reading (Kelvin -> Celsius, rounded, timestamped)
//! 4. Appends each normalized reading to the `weather` table
//!
//! Usage:
//!   cargo run --release                          # uses ./config.json
//!   cargo run --release -- --config prod.json    # explicit configuration file
//!
//! Environment:
//!   RUST_LOG     - log level filter (default: info)
//!   DATABASE_URL - optional override for the configured db_url

use std::env;
use std::ffi::OsStr;
use std::path::Path;
use std::process;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wxcollect_service::bootstrap;
use wxcollect_service::config::JobConfig;
use wxcollect_service::ingest::openweather::WeatherFetcher;
use wxcollect_service::job::IngestionJob;
use wxcollect_service::scheduler::Scheduler;
use wxcollect_service::store::ReadingStore;

fn main() {
    dotenv::dotenv().ok();

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut config_path = String::from("config.json");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 < args.len() {
                    config_path = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a file path");
                    process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--config PATH]", args[0]);
                process::exit(1);
            }
        }
    }

    // Load configuration; missing file or missing required keys are fatal
    let mut config = match JobConfig::from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let db_url_overridden = match env::var("DATABASE_URL") {
        Ok(url) => {
            config.db_url = url;
            true
        }
        Err(_) => false,
    };
    let config = config;

    init_logging(&config.log_file);

    info!("Weather collector initialized for city '{}'", config.city);
    info!("Poll interval: {} seconds", config.poll_interval_secs);
    if db_url_overridden {
        info!("Database URL overridden from the DATABASE_URL environment variable");
    }

    // Select the platform service controller; an unsupported platform is
    // a fatal configuration error
    let controller = match bootstrap::platform_controller() {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    // One-shot, best-effort environment setup
    bootstrap::run(&config, controller.as_ref());

    let fetcher = WeatherFetcher::new(
        reqwest::blocking::Client::new(),
        config.city.clone(),
        config.api_key.clone(),
    );
    let store = ReadingStore::new(config.db_url.clone());
    let mut job = IngestionJob::new(fetcher, store);

    let mut scheduler = Scheduler::new(Duration::from_secs(config.poll_interval_secs));
    scheduler.run(|| job.run());
}

/// Builds the process-wide subscriber once, at the binary edge: one
/// append-only log file plus console output. Each line carries timestamp,
/// level, and message. Library modules only emit events.
fn init_logging(log_file: &str) {
    let path = Path::new(log_file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .unwrap_or_else(|| OsStr::new("weather_data.log"));

    let file_appender = tracing_appender::rolling::never(dir, file_name);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();
}
