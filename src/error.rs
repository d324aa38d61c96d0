//! Error types for tl
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, invalid config)
//! - 4: Operation failed (storage I/O, serialization)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tl CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tl operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Operation failures (exit code 4)
    #[error("No usable data directory for the task file (set --file or TL_FILE)")]
    NoDataDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to write task file {0}")]
    WriteFailed(PathBuf),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            Error::NoDataDir
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::WriteFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for tl operations
pub type Result<T> = std::result::Result<T, Error>;
