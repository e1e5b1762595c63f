//! Action type → variable rules index

use super::rules::BlockDefinitions;
use crate::path::WILDCARD_TOKEN;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Fallback variable name for records without one
pub const UNKNOWN_VARIABLE: &str = "unknown_variable";

/// Token replaced by each key in key-path rules
const KEY_TOKEN: char = '*';

/// One variable rule, flattened out of its block configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRule {
    /// Block the rule was defined under
    pub block_name: String,
    /// Variable short name (may contain `*` for key-path rules)
    pub name: String,
    /// Path to the value inside the action
    pub value_path: String,
    /// Path to an object whose keys instantiate `value_path`
    pub key_path: Option<String>,
    /// Metadata paths, relative to the action's metadata entry
    pub metadata_paths: Vec<String>,
}

impl VariableRule {
    pub fn new(block_name: &str, name: &str, value_path: &str) -> Self {
        Self {
            block_name: block_name.to_string(),
            name: name.to_string(),
            value_path: value_path.to_string(),
            key_path: None,
            metadata_paths: Vec::new(),
        }
    }

    pub fn with_key_path(mut self, key_path: &str) -> Self {
        self.key_path = Some(key_path.to_string());
        self
    }

    pub fn with_metadata_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Concrete rule for one key of a key-path object
    ///
    /// The key replaces the wildcard token in the value path, in every
    /// metadata path and in the variable name. A name without a token gets the
    /// key appended.
    pub fn instantiate_key(&self, key: &str) -> VariableRule {
        let name_key = key.replace(' ', "-");
        let name = if self.name.contains(KEY_TOKEN) {
            substitute_key(&self.name, &name_key, false)
        } else {
            format!("{}_{}", self.name, name_key)
        };

        VariableRule {
            block_name: self.block_name.clone(),
            name,
            value_path: substitute_key(&self.value_path, key, true),
            key_path: None,
            metadata_paths: self
                .metadata_paths
                .iter()
                .map(|path| substitute_key(path, key, true))
                .collect(),
        }
    }
}

/// Replace the first `[*]` (or bare `*`) in `template` with `key`
///
/// In paths, `Attributes[*]` becomes `Attributes.<key>` so the key lands as
/// a member name.
fn substitute_key(template: &str, key: &str, as_member: bool) -> String {
    if let Some(pos) = template.find(WILDCARD_TOKEN) {
        let head = &template[..pos];
        let tail = &template[pos + WILDCARD_TOKEN.len()..];
        let separator = if as_member && !head.is_empty() && !head.ends_with('.') {
            "."
        } else {
            ""
        };
        format!("{head}{separator}{key}{tail}")
    } else {
        template.replacen(KEY_TOKEN, key, 1)
    }
}

/// Read-only index from exported action type to its variable rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseMap {
    rules: BTreeMap<String, Vec<VariableRule>>,
}

impl ReverseMap {
    /// Flatten block definitions into per-action-type rule lists
    ///
    /// Incomplete block configurations, configurations without an exported
    /// name and variables without a value path are dropped.
    pub fn build(definitions: &BlockDefinitions) -> Self {
        let mut rules: BTreeMap<String, Vec<VariableRule>> = BTreeMap::new();

        for (block_name, configs) in definitions.blocks() {
            for config in configs {
                let Some(exported) = config
                    .exported_json_block_name
                    .as_deref()
                    .filter(|name| !name.is_empty())
                else {
                    continue;
                };
                if !config.is_complete() {
                    debug!(
                        "Skipping {} configuration of block '{}' (status {:?})",
                        exported, block_name, config.status
                    );
                    continue;
                }

                let entry = rules.entry(exported.to_string()).or_default();
                for var in &config.vars {
                    let Some(value_path) = var
                        .actions_relative_path_value
                        .as_deref()
                        .filter(|path| !path.is_empty())
                    else {
                        continue;
                    };

                    let mut rule = VariableRule::new(
                        block_name,
                        var.name.as_deref().unwrap_or(UNKNOWN_VARIABLE),
                        value_path,
                    );
                    rule.key_path = var
                        .actions_relative_path_key
                        .clone()
                        .filter(|path| !path.is_empty());
                    if let Some(meta) = var.metadata_relative_path_key.as_ref() {
                        if meta.used {
                            rule.metadata_paths = meta.paths.clone();
                        }
                    }
                    entry.push(rule);
                }
            }
        }

        Self { rules }
    }

    /// Rules for an action type, in definition order
    pub fn rules_for(&self, action_type: &str) -> &[VariableRule] {
        self.rules
            .get(action_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[VariableRule])> {
        self.rules
            .iter()
            .map(|(action_type, rules)| (action_type.as_str(), rules.as_slice()))
    }

    /// Number of action types
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Total number of rules across all action types
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Log a per-type summary
    pub fn log_summary(&self) {
        info!(
            "Reverse map holds {} action types, {} rules",
            self.len(),
            self.rule_count()
        );
        for (action_type, rules) in self.iter() {
            debug!("  {}: {} variables", action_type, rules.len());
        }
    }
}

impl FromIterator<(String, VariableRule)> for ReverseMap {
    fn from_iter<T: IntoIterator<Item = (String, VariableRule)>>(iter: T) -> Self {
        let mut rules: BTreeMap<String, Vec<VariableRule>> = BTreeMap::new();
        for (action_type, rule) in iter {
            rules.entry(action_type).or_default().push(rule);
        }
        Self { rules }
    }
}
