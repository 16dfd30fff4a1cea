use crate::config::LogConfig;
use crate::error::InvoiceError;
use std::fs::{self, OpenOptions};
use std::str::FromStr;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::fmt::time::ChronoLocal;

/// Route `tracing` output to the append-only log file.
///
/// Unknown levels fall back to `info`.
pub fn init(config: &LogConfig) -> Result<(), InvoiceError> {
    fs::create_dir_all(&config.dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.dir.join(&config.file_name))?;

    let level = Level::from_str(&config.level).unwrap_or(Level::INFO);

    // 2024-03-01 14:05:09  INFO sales_invoice: ...
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_max_level(level)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| InvoiceError::Io(std::io::Error::other(e.to_string())))
}
