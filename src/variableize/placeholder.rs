//! Placeholder naming and substitution eligibility
//!
//! Placeholders have the fixed shape `${block_variable[_positional]_identifier}`
//! which the downstream templating step relies on.

use crate::path::Position;
use serde_json::Value;
use std::fmt;

/// Values starting with this are resolved by the flow engine at run time
pub const RUNTIME_REFERENCE_PREFIX: &str = "$.";

/// Values starting with this are already templated
pub const PLACEHOLDER_PREFIX: &str = "${";

/// Whether `value` should be replaced by a placeholder
///
/// Strings qualify unless they are empty, whitespace, runtime references or
/// existing placeholders. A non-empty array qualifies only when every element
/// is a qualifying string. Everything else is left alone.
pub fn should_substitute(value: &Value) -> bool {
    match value {
        Value::String(s) => is_substitutable_str(s),
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .all(|item| item.as_str().is_some_and(is_substitutable_str)),
        _ => false,
    }
}

/// String form of [`should_substitute`]
pub fn is_substitutable_str(value: &str) -> bool {
    !(value.starts_with(RUNTIME_REFERENCE_PREFIX)
        || value.starts_with(PLACEHOLDER_PREFIX)
        || value.trim().is_empty())
}

/// Replace spaces so identifiers can sit inside a placeholder name
pub fn clean_identifier(identifier: &str) -> String {
    identifier.replace(' ', "-")
}

/// `_step1`, `_message3`, `_<field>N` for one wildcard position
pub fn position_suffix(position: &Position) -> String {
    let stem = match position.field.as_str() {
        "Steps" => "step".to_string(),
        "Messages" => "message".to_string(),
        "" => "item".to_string(),
        other => other.to_lowercase(),
    };
    format!("_{}{}", stem, position.index + 1)
}

/// Concatenated suffix for every wildcard a match went through
pub fn positional_suffix(positions: &[Position]) -> String {
    positions.iter().map(position_suffix).collect()
}

/// A placeholder under construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    block: String,
    variable: String,
    suffix: String,
    identifier: String,
}

impl Placeholder {
    pub fn new(block: &str, variable: &str, identifier: &str) -> Self {
        Self {
            block: block.to_string(),
            variable: variable.to_string(),
            suffix: String::new(),
            identifier: clean_identifier(identifier),
        }
    }

    /// Add the positional suffix for a wildcard match
    pub fn with_positions(mut self, positions: &[Position]) -> Self {
        self.suffix = positional_suffix(positions);
        self
    }

    /// The bare variable name, without `${` `}`
    pub fn name(&self) -> String {
        format!(
            "{}_{}{}_{}",
            self.block, self.variable, self.suffix, self.identifier
        )
    }

    pub fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}}}", self.name())
    }
}

/// Build the placeholder string for one matched value
pub fn synthesize(
    block: &str,
    variable: &str,
    identifier: &str,
    positions: &[Position],
) -> String {
    Placeholder::new(block, variable, identifier)
        .with_positions(positions)
        .to_string()
}
