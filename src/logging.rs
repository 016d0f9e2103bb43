//! Tracing setup for the organizer.
//!
//! Every run mirrors its log lines to stderr and appends them to a run log
//! next to where the command was invoked, so there is a durable record of
//! which file went where. Verbosity follows `RUST_LOG` when set.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Once};

use tracing::warn;
use tracing_subscriber::{
    EnvFilter,
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Run log appended in the invocation directory.
pub const LOG_FILE_NAME: &str = "sortery.log";

static INIT: Once = Once::new();

/// Initialize the global tracing subscriber.
///
/// Called once at program startup; subsequent calls are ignored. If the log
/// file cannot be opened the run continues with stderr output only.
pub fn init(log_path: &Path) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let stderr_layer = fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);

        match OpenOptions::new().create(true).append(true).open(log_path) {
            Ok(file) => {
                let file_layer = fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Arc::new(file));

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(stderr_layer)
                    .with(file_layer)
                    .init();
            }
            Err(e) => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(stderr_layer)
                    .init();

                warn!("could not open log file {}: {}", log_path.display(), e);
            }
        }
    });
}
