//! Tracing subscriber setup.
//!
//! Logs go to stderr so they never mix with report output on stdout. An
//! optional log file receives the same events without ANSI colors.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{UpdateError, UpdateResult};

/// Keeps the background log writer alive. Drop it last.
#[must_use = "logs written to a file are lost if the guard is dropped early"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Default filter directive for a `-v` count.
pub fn filter_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,vinupdate=info",
        2 => "info,vinupdate=debug",
        _ => "trace",
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `verbosity`.
pub fn init(verbosity: u8, log_file: Option<&Path>) -> UpdateResult<LogGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for_verbosity(verbosity)));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, file_guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path.file_name().ok_or_else(|| {
                UpdateError::Config(format!("log file '{}' has no file name", path.display()))
            })?;
            std::fs::create_dir_all(dir).map_err(|e| {
                UpdateError::Config(format!(
                    "cannot create log directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| UpdateError::Config(format!("failed to install logger: {}", e)))?;

    Ok(LogGuard { _file: file_guard })
}
