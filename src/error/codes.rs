//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Input errors
//! - 2xx: Data import errors
//! - 3xx: Config errors
//! - 4xx: Search and dispatch errors
//! - 6xx: Storage errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for machine output.
///
/// Each variant maps to a numeric code (e.g., `InvalidInput` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Input errors (1xx)
    // ========================================
    /// E101: Search parameters are out of range or inconsistent
    InvalidInput,

    // ========================================
    // Import errors (2xx)
    // ========================================
    /// E201: A row source could not be read or parsed
    ImportFailed,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E302: Config file has invalid syntax or values
    ConfigInvalid,
    /// E304: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Search errors (4xx)
    // ========================================
    /// E402: A search did not finish before its deadline
    SearchTimeout,
    /// E404: The worker pool could not run or report a job
    WorkerPoolFailed,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E605: Output could not be serialized
    SerializationError,
    /// E606: IO operation failed
    IoError,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E905: Generic not found (catch-all)
    NotFound,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `InvalidInput` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::InvalidInput => 101,
            Self::ImportFailed => 201,
            Self::ConfigInvalid => 302,
            Self::ConfigMissingRequired => 304,
            Self::SearchTimeout => 402,
            Self::WorkerPoolFailed => 404,
            Self::SerializationError => 605,
            Self::IoError => 606,
            Self::NotFound => 905,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidInput => "Check --target (finite, > 0), -k (>= 1), --require and that --min-size <= --max-size",
            Self::ImportFailed => "Source files must hold a JSON array of rows; each row an array or an object",
            Self::ConfigInvalid => "Run `fitpick config` to see current values. Check TOML syntax in the config file",
            Self::ConfigMissingRequired => "Set the value in fitpick.toml or pass it on the command line",
            Self::SearchTimeout => "Raise --timeout-ms or reduce the batch size; late results are discarded",
            Self::WorkerPoolFailed => "Retry with fewer --workers. This usually indicates a panicked worker",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",
            Self::IoError => "File operation failed. Check path exists and permissions are correct",
            Self::NotFound => "The requested resource was not found. Check the path or identifier",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidInput
            | Self::ImportFailed
            | Self::ConfigInvalid
            | Self::ConfigMissingRequired
            | Self::SearchTimeout
            | Self::IoError
            | Self::NotFound => true,

            Self::WorkerPoolFailed | Self::SerializationError => false,
        }
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "input",
            2 => "import",
            3 => "config",
            4 => "search",
            6 => "storage",
            9 => "internal",
            _ => "unknown",
        }
    }

    /// Iterate over all error codes.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::InvalidInput,
            Self::ImportFailed,
            Self::ConfigInvalid,
            Self::ConfigMissingRequired,
            Self::SearchTimeout,
            Self::WorkerPoolFailed,
            Self::SerializationError,
            Self::IoError,
            Self::NotFound,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
