//! Global error handling for statjson
//!
//! Per-path failures are never represented here: they become error records.
//! This type covers what can stop the whole invocation.

use std::io;
use thiserror::Error;

/// Global error type for statjson operations
#[derive(Error, Debug)]
pub enum StatJsonError {
    /// File system or output errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Specialized Result type for statjson operations
pub type Result<T> = std::result::Result<T, StatJsonError>;

/// Creates a StatJsonError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::StatJsonError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

impl From<rayon::ThreadPoolBuildError> for StatJsonError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        StatJsonError::ThreadPool(err.to_string())
    }
}

/// Name of an io error's kind, as reported in error records
pub fn error_class(err: &io::Error) -> String {
    format!("{:?}", err.kind())
}
