//! Error types for inventory partitioning.

use thiserror::Error;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Object missing from storage
    E001NotFound,
    /// E002: Manifest or listing content could not be parsed
    E002Parse,
    /// E003: Storage read/write or scratch I/O failed
    E003Transfer,
    /// E004: Marker key does not follow the tile date layout
    E004PatternMismatch,
    /// E005: Configuration missing or invalid
    E005InvalidConfig,
    /// E006: Worker task panicked or was cancelled
    E006Worker,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E001NotFound => "E001",
            Self::E002Parse => "E002",
            Self::E003Transfer => "E003",
            Self::E004PatternMismatch => "E004",
            Self::E005InvalidConfig => "E005",
            Self::E006Worker => "E006",
        }
    }
}

/// Errors that can occur while splitting an inventory by day
#[derive(Debug, Error)]
pub enum SplitError {
    /// Object does not exist (yet) at the expected path
    #[error("[{code}] Object not found: '{path}'\n\nThe inventory for this date may not have been published yet.")]
    NotFound { code: &'static str, path: String },

    /// Manifest or listing payload is malformed
    #[error("[{code}] Failed to parse '{path}': {reason}")]
    Parse {
        code: &'static str,
        path: String,
        reason: String,
    },

    /// Download, upload or scratch file operation failed
    #[error("[{code}] Transfer failed for '{path}': {reason}")]
    Transfer {
        code: &'static str,
        path: String,
        reason: String,
    },

    /// Marker row key outside `tiles/<zone>/<band>/<square>/<year>/<month>/<day>/`
    #[error("[{code}] Key '{key}' does not match the tile date layout")]
    PatternMismatch { code: &'static str, key: String },

    /// Invalid configuration provided
    #[error("[{code}] Invalid configuration: {message}")]
    InvalidConfig { code: &'static str, message: String },

    /// Worker task did not run to completion
    #[error("[{code}] Worker failed: {message}")]
    Worker { code: &'static str, message: String },
}

impl SplitError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound {
            code: ErrorCode::E001NotFound.as_str(),
            path: path.into(),
        }
    }

    pub fn parse(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            code: ErrorCode::E002Parse.as_str(),
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn transfer(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transfer {
            code: ErrorCode::E003Transfer.as_str(),
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn pattern_mismatch(key: impl Into<String>) -> Self {
        Self::PatternMismatch {
            code: ErrorCode::E004PatternMismatch.as_str(),
            key: key.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            code: ErrorCode::E005InvalidConfig.as_str(),
            message: message.into(),
        }
    }

    pub fn worker(message: impl Into<String>) -> Self {
        Self::Worker {
            code: ErrorCode::E006Worker.as_str(),
            message: message.into(),
        }
    }

    /// The code carried by this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::E001NotFound,
            Self::Parse { .. } => ErrorCode::E002Parse,
            Self::Transfer { .. } => ErrorCode::E003Transfer,
            Self::PatternMismatch { .. } => ErrorCode::E004PatternMismatch,
            Self::InvalidConfig { .. } => ErrorCode::E005InvalidConfig,
            Self::Worker { .. } => ErrorCode::E006Worker,
        }
    }
}

/// Result type alias for SplitError
pub type Result<T> = std::result::Result<T, SplitError>;
