use std::path::PathBuf;
use thiserror::Error;

pub mod codes;
pub mod helpers;

pub use codes::ErrorCode;
pub use helpers::{common, ErrorExt};

use crate::path::PathError;

/// The unified error type for flow-variableizer
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Input error: {message}")]
    Input {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Structure error: {message}")]
    Structure {
        code: u16,
        message: String,
        location: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Output error: {message}")]
    Output {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl FlowError {
    /// Create a configuration error with default code
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::CONFIG_GENERIC,
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Create a configuration error with specific code and file path
    pub fn config_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create an input error with specific code and file path
    pub fn input_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Input {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create a structure error with specific code and location
    pub fn structure_with_code(
        code: u16,
        message: impl Into<String>,
        location: Option<String>,
    ) -> Self {
        Self::Structure {
            code,
            message: message.into(),
            location,
            source: None,
        }
    }

    /// Create an output error with specific code and file path
    pub fn output_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Output {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::Input { source: src, .. }
            | Self::Structure { source: src, .. }
            | Self::Output { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Attach the file this error concerns (no-op for structure errors)
    pub fn with_path(mut self, file: impl Into<PathBuf>) -> Self {
        match &mut self {
            Self::Config { path, .. } | Self::Input { path, .. } | Self::Output { path, .. } => {
                *path = Some(file.into());
            }
            Self::Structure { .. } => {}
        }
        self
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::Input { .. } => 3,
            Self::Structure { .. } => 4,
            Self::Output { .. } => 5,
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::Input { code, .. }
            | Self::Structure { code, .. }
            | Self::Output { code, .. } => *code,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        let detail = self.source_detail();
        let base = match self {
            Self::Config { message, path, .. } => match path {
                Some(p) => format!("Configuration problem in {}: {}", p.display(), message),
                None => format!("Configuration problem: {}", message),
            },
            Self::Input { message, .. } => message.clone(),
            Self::Structure {
                message, location, ..
            } => match location {
                Some(loc) => format!("Unexpected document structure at '{}': {}", loc, message),
                None => format!("Unexpected document structure: {}", message),
            },
            Self::Output { message, path, .. } => match path {
                Some(p) => format!("{} ({})", message, p.display()),
                None => message.clone(),
            },
        };

        match detail {
            Some(detail) => format!("{}: {}", base, detail),
            None => base,
        }
    }

    /// Get a developer-friendly error message with full chain
    pub fn developer_message(&self) -> String {
        format!("{:#}", self)
    }

    fn source_detail(&self) -> Option<String> {
        match self {
            Self::Config { source, .. }
            | Self::Input { source, .. }
            | Self::Structure { source, .. }
            | Self::Output { source, .. } => source.as_ref().map(|s| s.to_string()),
        }
    }
}

impl From<PathError> for FlowError {
    fn from(err: PathError) -> Self {
        let code = match &err {
            PathError::NotASequence { .. } => ErrorCode::STRUCTURE_NOT_A_SEQUENCE,
            PathError::IndexOutOfRange { .. } => ErrorCode::STRUCTURE_INDEX_OUT_OF_RANGE,
            PathError::NotAMapping { .. } => ErrorCode::STRUCTURE_NOT_A_MAPPING,
            PathError::WildcardInLocation { .. } | PathError::EmptyLocation => {
                ErrorCode::STRUCTURE_UNRESOLVED_LOCATION
            }
        };
        Self::structure_with_code(code, err.to_string(), err.location().map(str::to_string))
    }
}

/// Type alias for Results using FlowError
pub type Result<T> = std::result::Result<T, FlowError>;
