//! Stderr logging, filtered by `STATJSON_LOG_LEVEL`

use std::sync::OnceLock;

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::config::LOG_LEVEL_ENV;

pub struct Logger {
    level: Level,
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            eprintln!(
                "{} {} [{}] {}",
                timestamp,
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

fn parse_level(value: Option<&str>) -> Level {
    value
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .and_then(|filter| filter.to_level())
        .unwrap_or(Level::Warn)
}

fn level_from_env() -> Level {
    parse_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref())
}

/// Install the logger; later calls keep the first level
pub fn init() -> Result<(), SetLoggerError> {
    init_with_level(level_from_env())
}

pub fn init_with_level(level: Level) -> Result<(), SetLoggerError> {
    static LOGGER: OnceLock<Logger> = OnceLock::new();

    let first_call = LOGGER.get().is_none();
    let logger = LOGGER.get_or_init(|| Logger { level });

    if first_call {
        log::set_logger(logger)?;
        log::set_max_level(logger.level.to_level_filter());
    }

    Ok(())
}
