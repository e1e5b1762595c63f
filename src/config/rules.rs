//! Block definition records
//!
//! The definitions file maps a block name to a list of block configurations.
//! Each configuration names the action type it was exported as and the
//! variables that can be lifted out of that action.

use crate::error::{common, ErrorCode, ErrorExt, FlowError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

use super::jsonc::strip_comments;

/// Lifecycle status that makes a block configuration eligible
pub const COMPLETE_STATUS: &str = "complete";

/// One configuration entry of a block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockConfig {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub exported_json_block_name: Option<String>,
    #[serde(default, deserialize_with = "skip_malformed_vars")]
    pub vars: Vec<VariableDefinition>,
}

/// Keep the well-formed variable records, warning about the rest
fn skip_malformed_vars<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<VariableDefinition>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entries = Vec::<Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            serde_json::from_value(entry)
                .map_err(|e| warn!("Skipping malformed variable {}: {}", index, e))
                .ok()
        })
        .collect())
}

impl BlockConfig {
    /// Entries without a status predate the lifecycle field and are eligible
    pub fn is_complete(&self) -> bool {
        self.status
            .as_deref()
            .map_or(true, |status| status == COMPLETE_STATUS)
    }
}

/// A variable that can be lifted out of an exported action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDefinition {
    #[serde(default)]
    pub name: Option<String>,
    /// Path to the value inside the action
    #[serde(default)]
    pub actions_relative_path_value: Option<String>,
    /// Path to an object whose keys each instantiate the value path
    #[serde(default)]
    pub actions_relative_path_key: Option<String>,
    /// Metadata locations that mirror the value
    #[serde(default)]
    pub metadata_relative_path_key: Option<MetadataPathKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataPathKey {
    #[serde(default)]
    pub used: bool,
    #[serde(default)]
    pub paths: Vec<String>,
}

/// All block definitions, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockDefinitions {
    blocks: Vec<(String, Vec<BlockConfig>)>,
}

impl BlockDefinitions {
    /// Build from an already parsed document
    ///
    /// Blocks that are not lists are skipped with a warning, as is any
    /// malformed entry or variable record.
    pub fn from_value(root: Value) -> Result<Self> {
        let Value::Object(map) = root else {
            return Err(FlowError::config_with_code(
                ErrorCode::CONFIG_NOT_AN_OBJECT,
                "Block definitions must be a JSON object",
                None,
            ));
        };

        let mut blocks = Vec::with_capacity(map.len());
        for (block_name, entries) in map {
            let Value::Array(entries) = entries else {
                debug!("Skipping block '{}': not a list", block_name);
                continue;
            };

            let configs = entries
                .into_iter()
                .enumerate()
                .filter_map(|(index, entry)| {
                    serde_json::from_value::<BlockConfig>(entry)
                        .map_err(|e| {
                            warn!(
                                "Skipping malformed entry {} of block '{}': {}",
                                index, block_name, e
                            )
                        })
                        .ok()
                })
                .collect();
            blocks.push((block_name, configs));
        }

        Ok(Self { blocks })
    }

    /// Parse JSON-with-comments text
    pub fn parse(content: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(&strip_comments(content)).map_err(|e| {
            FlowError::config_with_code(
                ErrorCode::CONFIG_INVALID_JSON,
                "Invalid block definitions",
                None,
            )
            .with_source(e)
        })?;
        Self::from_value(root)
    }

    /// Load and parse a definitions file
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(common::config_not_found(path));
        }
        let content = tokio::fs::read_to_string(path)
            .await
            .to_config_error(format!("Failed to read {}", path.display()))?;
        Self::parse(&content).map_err(|e| e.with_path(path))
    }

    pub fn blocks(&self) -> impl Iterator<Item = (&str, &[BlockConfig])> {
        self.blocks
            .iter()
            .map(|(name, configs)| (name.as_str(), configs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_record_fields() {
        let defs = BlockDefinitions::parse(
            r#"{
  // prompt blocks
  "prompt": [
    {
      "status": "complete",
      "exportedJsonBlockName": "MessageParticipant",
      "vars": [
        {
          "name": "text",
          "actionsRelativePathValue": "Parameters.Text",
          "metadataRelativePathKey": { "used": true, "paths": ["text"] }
        }
      ]
    }
  ]
}"#,
        )
        .unwrap();

        let (name, configs) = defs.blocks().next().unwrap();
        assert_eq!(name, "prompt");
        assert_eq!(configs.len(), 1);
        let config = &configs[0];
        assert!(config.is_complete());
        assert_eq!(
            config.exported_json_block_name.as_deref(),
            Some("MessageParticipant")
        );
        let var = &config.vars[0];
        assert_eq!(var.name.as_deref(), Some("text"));
        assert_eq!(
            var.actions_relative_path_value.as_deref(),
            Some("Parameters.Text")
        );
        let meta = var.metadata_relative_path_key.as_ref().unwrap();
        assert!(meta.used);
        assert_eq!(meta.paths, vec!["text".to_string()]);
    }

    #[test]
    fn test_status_gate() {
        let mut config = BlockConfig::default();
        assert!(config.is_complete());
        config.status = Some("complete".to_string());
        assert!(config.is_complete());
        config.status = Some("in-progress".to_string());
        assert!(!config.is_complete());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let defs = BlockDefinitions::from_value(json!({
            "notAList": {"exportedJsonBlockName": "X"},
            "mixed": [
                "just a string",
                {"exportedJsonBlockName": "Y", "vars": []},
                {"exportedJsonBlockName": 5}
            ]
        }))
        .unwrap();

        let blocks: Vec<_> = defs.blocks().collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].0, "mixed");
        assert_eq!(blocks[0].1.len(), 1);
    }

    #[test]
    fn test_malformed_variable_keeps_its_siblings() {
        let defs = BlockDefinitions::from_value(json!({
            "prompt": [{
                "exportedJsonBlockName": "MessageParticipant",
                "vars": [
                    {"name": 5, "actionsRelativePathValue": "Parameters.Bad"},
                    {"name": "text", "actionsRelativePathValue": "Parameters.Text"},
                    "not a record"
                ]
            }]
        }))
        .unwrap();

        let (_, configs) = defs.blocks().next().unwrap();
        assert_eq!(configs.len(), 1);
        let vars = &configs[0].vars;
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name.as_deref(), Some("text"));
    }

    #[test]
    fn test_block_order_follows_file_order() {
        let defs = BlockDefinitions::parse(r#"{"zeta": [], "alpha": [], "mid": []}"#).unwrap();
        let names: Vec<_> = defs.blocks().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = BlockDefinitions::parse("{ not json").unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_JSON);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_non_object_root_is_config_error() {
        let err = BlockDefinitions::parse("[1, 2]").unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_NOT_AN_OBJECT);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = BlockDefinitions::load(Path::new("/definitely/not/here.jsonc"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_NOT_FOUND);
    }
}
