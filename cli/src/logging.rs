//! Logging initialization.
//!
//! `RUST_LOG` sets the filter (default `warn`). Without a log file, events go to
//! stderr so stdout carries only answers. With `--log-file`, events go only to that
//! file through a non-blocking `tracing-appender` writer.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::log_format::RunTaggedText;

const DEFAULT_FILTER: &str = "warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Keep the returned guard alive until exit so
/// buffered file lines are flushed.
pub fn init(log_file: Option<&Path>) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let filter = env_filter();
    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| format!("--log-file {} has no file name", path.display()))?;
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .event_format(RunTaggedText::new())
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter);
            tracing_subscriber::registry().with(file_layer).try_init()?;
            tracing::info!(path = %path.display(), "react-loop logging to file");
            Ok(Some(guard))
        }
        None => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter);
            tracing_subscriber::registry().with(stderr_layer).try_init()?;
            Ok(None)
        }
    }
}
