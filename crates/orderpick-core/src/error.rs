//! Error types and exit codes for orderpick
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (oracle exhaustion, interruption, IO)
//! - 2: Usage error (bad flags/args, invalid values)
//! - 3: Data error (unknown order or line item, malformed input files)

mod macros;

use thiserror::Error;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - unknown ids, malformed input (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during orderpick operations
#[derive(Error, Debug)]
pub enum OrderpickError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    #[error("invalid input in {source_name}: {reason}")]
    InvalidInput { source_name: String, reason: String },

    // Generic failures (exit code 1)
    #[error("identifier oracle unavailable after {attempts} attempts: {reason}")]
    OracleUnavailable { attempts: u32, reason: String },

    #[error("no free identifier after {attempts} collisions (last tried {last})")]
    CollisionLimit { attempts: u32, last: String },

    #[error("identifier generation interrupted")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl OrderpickError {
    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        OrderpickError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        OrderpickError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a malformed input document
    pub fn invalid_input(source_name: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        OrderpickError::InvalidInput {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether the hosting dialog may offer the user a retry
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OrderpickError::OracleUnavailable { .. } | OrderpickError::Interrupted
        )
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            OrderpickError::UnknownFormat(_)
            | OrderpickError::UsageError(_)
            | OrderpickError::InvalidValue { .. } => ExitCode::Usage,

            OrderpickError::NotFound { .. }
            | OrderpickError::InvalidInput { .. }
            | OrderpickError::Json(_)
            | OrderpickError::Toml(_) => ExitCode::Data,

            OrderpickError::OracleUnavailable { .. }
            | OrderpickError::CollisionLimit { .. }
            | OrderpickError::Interrupted
            | OrderpickError::Io(_)
            | OrderpickError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            OrderpickError::UnknownFormat(_) => "unknown_format",
            OrderpickError::UsageError(_) => "usage_error",
            OrderpickError::InvalidValue { .. } => "invalid_value",
            OrderpickError::NotFound { .. } => "not_found",
            OrderpickError::InvalidInput { .. } => "invalid_input",
            OrderpickError::OracleUnavailable { .. } => "oracle_unavailable",
            OrderpickError::CollisionLimit { .. } => "collision_limit",
            OrderpickError::Interrupted => "interrupted",
            OrderpickError::Io(_) => "io_error",
            OrderpickError::Json(_) => "json_error",
            OrderpickError::Toml(_) => "toml_error",
            OrderpickError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
                "retryable": self.is_retryable(),
            }
        })
    }
}

/// Result type alias for orderpick operations
pub type Result<T> = std::result::Result<T, OrderpickError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            OrderpickError::UsageError("bad".into()).exit_code(),
            ExitCode::Usage
        );
        assert_eq!(
            OrderpickError::not_found("order", "O1").exit_code(),
            ExitCode::Data
        );
        assert_eq!(OrderpickError::Interrupted.exit_code(), ExitCode::Failure);
    }

    #[test]
    fn test_oracle_errors_are_retryable() {
        let err = OrderpickError::OracleUnavailable {
            attempts: 3,
            reason: "connection refused".into(),
        };
        assert!(err.is_retryable());

        let err = OrderpickError::CollisionLimit {
            attempts: 10,
            last: "LI1000010".into(),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_to_json_shape() {
        let json = OrderpickError::not_found("order", "O9").to_json();
        assert_eq!(json["error"]["code"], 3);
        assert_eq!(json["error"]["type"], "not_found");
        assert_eq!(json["error"]["message"], "order not found: O9");
        assert_eq!(json["error"]["retryable"], false);
    }
}
