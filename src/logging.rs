//! File logging. The terminal belongs to the TUI, so log records go to a
//! rotating file under the data directory instead of stderr.

use std::fs;

use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;

use crate::config::Config;

const LOG_FILE_BASENAME: &str = "grade-manager";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Start the file logger. The returned handle must be kept alive for as long
/// as records should be flushed.
pub fn init_logging(config: &Config) -> Result<LoggerHandle> {
    fs::create_dir_all(&config.log_dir).context("failed to create log directory")?;

    let handle = Logger::try_with_str(&config.log_level)
        .with_context(|| format!("invalid log level `{}`", config.log_level))?
        .log_to_file(
            FileSpec::default()
                .directory(config.log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .context("failed to start logger")?;

    info!(
        "event=app_start version={} data_file={}",
        env!("CARGO_PKG_VERSION"),
        config.data_file.display()
    );
    Ok(handle)
}
