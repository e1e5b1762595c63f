//! Run settings
//!
//! Defaults, optionally overridden by a TOML file, then by environment
//! variables. Command-line flags are applied last by the caller.

use crate::error::{common, ErrorCode, FlowError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings file picked up from the working directory when present
pub const DEFAULT_SETTINGS_FILE: &str = "flow-variableizer.toml";

pub const ENV_RULES: &str = "FLOW_VARIABLEIZER_RULES";
pub const ENV_OUTPUT_DIR: &str = "FLOW_VARIABLEIZER_OUTPUT_DIR";
pub const ENV_SUFFIX: &str = "FLOW_VARIABLEIZER_SUFFIX";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Block definitions file (JSON with comments)
    pub rules_path: PathBuf,
    /// Where variableized flows are written
    pub output_dir: PathBuf,
    /// Directory processed by `--all`
    pub sample_dir: PathBuf,
    /// File processed by `--single`
    pub single_file: PathBuf,
    /// Appended to each output file stem
    pub output_suffix: String,
    /// File-name filter in directory mode
    pub file_pattern: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from("block-definitions.jsonc"),
            output_dir: PathBuf::from("outputted/flows"),
            sample_dir: PathBuf::from("sample flows"),
            single_file: PathBuf::from("sample flows/custom_cq_LATEST.json"),
            output_suffix: "_variableized".to_string(),
            file_pattern: "*.json".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            FlowError::config_with_code(ErrorCode::CONFIG_INVALID_TOML, "Invalid settings", None)
                .with_source(e)
        })
    }

    /// Load settings
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_SETTINGS_FILE`]
    /// is used if present and defaults otherwise. Environment overrides are
    /// applied in both cases.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) if !path.exists() => return Err(common::config_not_found(path)),
            Some(path) => Some(path.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_SETTINGS_FILE)).filter(|p| p.exists()),
        };

        let mut settings = match file {
            Some(file) => {
                debug!("Loading settings from {}", file.display());
                let content = tokio::fs::read_to_string(&file).await.map_err(|e| {
                    FlowError::config_with_code(
                        ErrorCode::CONFIG_READ_FAILED,
                        "Failed to read settings",
                        Some(file.clone()),
                    )
                    .with_source(e)
                })?;
                Self::from_toml(&content).map_err(|e| e.with_path(&file))?
            }
            None => Self::default(),
        };

        settings.merge_env_vars();
        Ok(settings)
    }

    pub fn merge_env_vars(&mut self) {
        if let Ok(rules) = std::env::var(ENV_RULES) {
            self.rules_path = PathBuf::from(rules);
        }

        if let Ok(output_dir) = std::env::var(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(output_dir);
        }

        if let Ok(suffix) = std::env::var(ENV_SUFFIX) {
            self.output_suffix = suffix;
        }
    }
}
