/// Environment bootstrap: PostgreSQL service startup and database creation.
///
/// Runs once, synchronously, before the scheduler loop starts. Selecting a
/// controller for an unsupported platform is fatal; everything after that
/// is best-effort. A failed service start or database creation is logged
/// and the pipeline still gets its chance to run.

use std::process::Command;
use tracing::{error, info, warn};

use crate::config::JobConfig;
use crate::db;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum BootstrapError {
    /// No service controller exists for this operating system.
    UnsupportedPlatform(String),
    /// A service-manager command exited unsuccessfully or could not be spawned.
    ServiceCommand { command: String, detail: String },
}

impl std::fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BootstrapError::UnsupportedPlatform(os) => {
                write!(f, "unsupported operating system: {}", os)
            }
            BootstrapError::ServiceCommand { command, detail } => {
                write!(f, "service command '{}' failed: {}", command, detail)
            }
        }
    }
}

impl std::error::Error for BootstrapError {}

// ---------------------------------------------------------------------------
// Service controllers
// ---------------------------------------------------------------------------

/// Capability to start the database server through the host's native
/// service-management facility.
pub trait ServiceController {
    /// Platform label used in log lines.
    fn platform(&self) -> &'static str;

    /// Ask the service manager to start the PostgreSQL server. Starting an
    /// already-running service is a success on every supported platform.
    fn start(&self) -> Result<(), BootstrapError>;
}

/// Linux: systemd, falling back to the SysV service wrapper.
pub struct SystemdController;

impl ServiceController for SystemdController {
    fn platform(&self) -> &'static str {
        "linux"
    }

    fn start(&self) -> Result<(), BootstrapError> {
        match run_command("systemctl", &["start", "postgresql"]) {
            Ok(()) => {
                info!("PostgreSQL service started via systemctl");
                Ok(())
            }
            Err(primary) => {
                warn!("systemctl start failed ({}), falling back to service", primary);
                run_command("service", &["postgresql", "start"])
                    .map(|()| info!("PostgreSQL service started via service"))
            }
        }
    }
}

/// macOS: Homebrew services.
pub struct BrewServicesController;

impl ServiceController for BrewServicesController {
    fn platform(&self) -> &'static str {
        "macos"
    }

    fn start(&self) -> Result<(), BootstrapError> {
        run_command("brew", &["services", "start", "postgresql"])
            .map(|()| info!("PostgreSQL service started via brew services"))
    }
}

/// Windows: net, falling back to sc with the versioned service name.
pub struct WindowsServiceController;

impl ServiceController for WindowsServiceController {
    fn platform(&self) -> &'static str {
        "windows"
    }

    fn start(&self) -> Result<(), BootstrapError> {
        match run_command("net", &["start", "postgresql"]) {
            Ok(()) => {
                info!("PostgreSQL service started via net");
                Ok(())
            }
            Err(primary) => {
                warn!("net start failed ({}), falling back to sc", primary);
                run_command("sc", &["start", "postgresql-x64-14"])
                    .map(|()| info!("PostgreSQL service started via sc"))
            }
        }
    }
}

/// Selects the service controller for the current operating system.
pub fn platform_controller() -> Result<Box<dyn ServiceController>, BootstrapError> {
    match std::env::consts::OS {
        "linux" => Ok(Box::new(SystemdController)),
        "macos" => Ok(Box::new(BrewServicesController)),
        "windows" => Ok(Box::new(WindowsServiceController)),
        other => Err(BootstrapError::UnsupportedPlatform(other.to_string())),
    }
}

fn run_command(program: &str, args: &[&str]) -> Result<(), BootstrapError> {
    let rendered = format!("{} {}", program, args.join(" "));

    match Command::new(program).args(args).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => Err(BootstrapError::ServiceCommand {
            command: rendered,
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
        Err(e) => Err(BootstrapError::ServiceCommand {
            command: rendered,
            detail: e.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// One-shot environment setup
// ---------------------------------------------------------------------------

/// Start the database server and create the target database, best-effort.
///
/// Failures here may leave the pipeline non-functional, but the process
/// continues: the store logs its own errors every cycle and recovers as
/// soon as the environment does.
pub fn run(config: &JobConfig, controller: &dyn ServiceController) {
    match controller.start() {
        Ok(()) => info!("Database service is up on {}", controller.platform()),
        Err(e) => error!("Could not start the PostgreSQL service: {}", e),
    }

    match db::ensure_database(&config.db_url) {
        Ok(_) => {}
        Err(e) => error!("Could not ensure the target database exists: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_controller_resolves_on_supported_hosts() {
        // The test host is one of the three supported platform families.
        let controller = platform_controller().expect("current platform should be supported");
        assert_eq!(controller.platform(), std::env::consts::OS);
    }

    #[test]
    fn test_controller_platform_labels() {
        assert_eq!(SystemdController.platform(), "linux");
        assert_eq!(BrewServicesController.platform(), "macos");
        assert_eq!(WindowsServiceController.platform(), "windows");
    }

    #[test]
    fn test_unsupported_platform_error_names_the_os() {
        let err = BootstrapError::UnsupportedPlatform("plan9".to_string());
        assert!(err.to_string().contains("plan9"));
    }

    #[test]
    fn test_run_command_reports_missing_binary() {
        let result = run_command("wxcollect-no-such-binary", &["start"]);
        let err = result.expect_err("nonexistent binary should fail");
        assert!(
            err.to_string().contains("wxcollect-no-such-binary"),
            "error should carry the attempted command: {}",
            err
        );
    }
}
