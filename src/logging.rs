// ============================================================================
// LOGGING - the terminal is in raw mode, so log records go to a file
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;

const LOG_FILE: &str = "household-ledger.log";

pub fn setup_logging(data_dir: &Path, level: log::LevelFilter) -> Result<PathBuf> {
    fs::create_dir_all(data_dir)?;
    let path = data_dir.join(LOG_FILE);

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {} [{}] {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(fern::log_file(&path)?)
        .apply()?;

    Ok(path)
}
