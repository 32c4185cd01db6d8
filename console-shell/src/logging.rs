use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes logging for the launcher.
///
/// Sets up two logging outputs:
/// - Console: Human-readable format for development/terminal use
/// - File: JSON format in the application data dir for bug reports
///
/// Log files are rotated daily to prevent unbounded growth. The default
/// level is "info"; RUST_LOG overrides it, e.g. RUST_LOG=safe_uninstall=debug.
///
/// Returns a guard that must be kept alive for the duration of the program.
/// Dropping this guard will cause file logging to stop.
pub fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let log_dir = file_system::get_log_dir();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "showcase.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,service=debug,safe_uninstall=debug,script_registry=info")
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::debug!("Logs are being written to {}", log_dir.display());

    guard
}
