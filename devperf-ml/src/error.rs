//! Error types for devperf-ml

use thiserror::Error;

/// Result type for devperf-ml operations
pub type Result<T> = std::result::Result<T, DevPerfError>;

/// devperf-ml error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DevPerfError {
    #[error("Zero reference value at index {index}: relative error is undefined")]
    ZeroReference { index: usize },

    #[error("Empty batch source: no batches were processed")]
    EmptyBatchSource,

    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Target arity mismatch: expected {expected} outputs, got {actual}")]
    TargetArity { expected: usize, actual: usize },

    #[error("Invalid thresholds: lower {lower} must be finite and not above upper {upper}")]
    InvalidThresholds { lower: f64, upper: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for DevPerfError {
    fn from(err: std::io::Error) -> Self {
        DevPerfError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DevPerfError {
    fn from(err: serde_json::Error) -> Self {
        DevPerfError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for DevPerfError {
    fn from(err: toml::de::Error) -> Self {
        DevPerfError::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DevPerfError::ZeroReference { index: 3 };
        assert!(err.to_string().contains("index 3"));

        let err = DevPerfError::LengthMismatch { expected: 4, actual: 2 };
        assert_eq!(err.to_string(), "Length mismatch: expected 4, got 2");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: DevPerfError = io.into();
        assert!(matches!(err, DevPerfError::Io(msg) if msg.contains("missing.json")));
    }
}
