use super::{ErrorCode, FlowError};
use std::path::Path;

/// Extension trait for convenient error conversion
pub trait ErrorExt<T> {
    /// Convert to a configuration error, keeping the original as source
    fn to_config_error(self, message: impl Into<String>) -> Result<T, FlowError>;
}

impl<T, E> ErrorExt<T> for Result<T, E>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn to_config_error(self, message: impl Into<String>) -> Result<T, FlowError> {
        self.map_err(|e| FlowError::config(message).with_source(e))
    }
}

/// Helper functions for common error scenarios
pub mod common {
    use super::*;

    /// Rule source or settings file is missing
    pub fn config_not_found(path: impl AsRef<Path>) -> FlowError {
        let path = path.as_ref();
        FlowError::config_with_code(
            ErrorCode::CONFIG_NOT_FOUND,
            format!("{} not found", path.display()),
            Some(path.to_path_buf()),
        )
    }

    /// Input file or directory is missing
    pub fn input_not_found(path: impl AsRef<Path>) -> FlowError {
        let path = path.as_ref();
        FlowError::input_with_code(
            ErrorCode::INPUT_NOT_FOUND,
            format!("{} not found", path.display()),
            Some(path.to_path_buf()),
        )
    }

    /// Input file could not be parsed as JSON
    pub fn input_invalid_json(path: impl AsRef<Path>, err: serde_json::Error) -> FlowError {
        let path = path.as_ref();
        FlowError::input_with_code(
            ErrorCode::INPUT_INVALID_JSON,
            format!("Malformed JSON in {}", path.display()),
            Some(path.to_path_buf()),
        )
        .with_source(err)
    }

    /// Output file could not be written
    pub fn output_write_failed(path: impl AsRef<Path>, err: std::io::Error) -> FlowError {
        let path = path.as_ref();
        FlowError::output_with_code(
            ErrorCode::OUTPUT_WRITE_FAILED,
            format!("Failed to write {}", path.display()),
            Some(path.to_path_buf()),
        )
        .with_source(err)
    }
}
