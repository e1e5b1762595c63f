//! Per-action view of a flow document used by every substitution mode

use crate::error::Result;
use crate::path::{self, resolve_all, resolve_single, Location, PathExpr, PathMatch};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::placeholder::should_substitute;

pub const ACTIONS_KEY: &str = "Actions";
pub const METADATA_KEY: &str = "Metadata";
pub const ACTION_METADATA_KEY: &str = "ActionMetadata";

/// Which subtree a substitution was written into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubstitutionTarget {
    Action,
    Metadata,
}

/// One value written into the document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Substitution {
    pub action_identifier: String,
    pub target: SubstitutionTarget,
    /// Location from the document root
    pub location: String,
    /// The string written (a placeholder, or text embedding one)
    pub value: String,
}

/// What a single document transformation did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VariableizeReport {
    pub actions_visited: usize,
    pub actions_skipped: usize,
    pub substitutions: Vec<Substitution>,
}

impl VariableizeReport {
    /// Writes into action parameters (metadata mirrors not counted)
    pub fn placeholder_count(&self) -> usize {
        self.substitutions
            .iter()
            .filter(|s| s.target == SubstitutionTarget::Action)
            .count()
    }
}

/// Mutable access to one action and its metadata entry
pub struct ActionContext<'a> {
    flow: &'a mut Value,
    action_index: usize,
    identifier: String,
    report: &'a mut VariableizeReport,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        flow: &'a mut Value,
        action_index: usize,
        identifier: impl Into<String>,
        report: &'a mut VariableizeReport,
    ) -> Self {
        Self {
            flow,
            action_index,
            identifier: identifier.into(),
            report,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn action_index(&self) -> usize {
        self.action_index
    }

    pub fn action(&self) -> Option<&Value> {
        self.flow.get(ACTIONS_KEY)?.get(self.action_index)
    }

    /// `Metadata.ActionMetadata.<identifier>`, looked up key by key so
    /// identifiers containing dots or brackets are safe
    pub fn metadata(&self) -> Option<&Value> {
        self.flow
            .get(METADATA_KEY)?
            .get(ACTION_METADATA_KEY)?
            .get(self.identifier.as_str())
    }

    pub fn resolve_action(&self, path: &PathExpr) -> Vec<PathMatch> {
        self.action()
            .map(|action| resolve_all(action, path))
            .unwrap_or_default()
    }

    pub fn resolve_action_single(&self, path: &PathExpr) -> Option<&Value> {
        resolve_single(self.action()?, path)
    }

    pub fn resolve_metadata(&self, path: &PathExpr) -> Vec<PathMatch> {
        self.metadata()
            .map(|metadata| resolve_all(metadata, path))
            .unwrap_or_default()
    }

    /// Write below the action
    pub fn write_action(&mut self, location: &Location, value: Value) -> Result<()> {
        let root = Location::from_keys([ACTIONS_KEY]).index(self.action_index);
        self.write(root.join(location), value, SubstitutionTarget::Action)
    }

    /// Write below the action's metadata entry
    pub fn write_metadata(&mut self, location: &Location, value: Value) -> Result<()> {
        let root = Location::from_keys([
            METADATA_KEY,
            ACTION_METADATA_KEY,
            self.identifier.as_str(),
        ]);
        self.write(root.join(location), value, SubstitutionTarget::Metadata)
    }

    /// Copy `value` into every eligible metadata location named by `paths`
    ///
    /// Wildcard paths fan out and every eligible match is written; plain paths
    /// write at most once. Missing locations are skipped.
    pub fn mirror_to_metadata(&mut self, paths: &[String], value: &Value) -> Result<usize> {
        let mut written = 0;
        for path in paths {
            let expr = PathExpr::parse(path);
            let targets: Vec<Location> = self
                .resolve_metadata(&expr)
                .into_iter()
                .filter(|m| should_substitute(&m.value))
                .map(|m| m.location)
                .collect();
            for location in targets {
                self.write_metadata(&location, value.clone())?;
                written += 1;
            }
        }
        Ok(written)
    }

    fn write(&mut self, location: Location, value: Value, target: SubstitutionTarget) -> Result<()> {
        debug!("{} -> {}", location, value);
        let written = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
        path::write(self.flow, &location, value)?;
        self.report.substitutions.push(Substitution {
            action_identifier: self.identifier.clone(),
            target,
            location: location.to_string(),
            value: written,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flow() -> Value {
        json!({
            "Actions": [
                {"Identifier": "a.b", "Type": "X", "Parameters": {"Text": "Hi"}}
            ],
            "Metadata": {
                "ActionMetadata": {
                    "a.b": {"text": "Hi", "other": "$.Attributes.x"}
                }
            }
        })
    }

    #[test]
    fn test_metadata_lookup_with_dotted_identifier() {
        let mut doc = flow();
        let mut report = VariableizeReport::default();
        let ctx = ActionContext::new(&mut doc, 0, "a.b", &mut report);
        assert_eq!(ctx.metadata().unwrap()["text"], json!("Hi"));
    }

    #[test]
    fn test_write_action_records_substitution() {
        let mut doc = flow();
        let mut report = VariableizeReport::default();
        {
            let mut ctx = ActionContext::new(&mut doc, 0, "a.b", &mut report);
            let location = Location::from_keys(["Parameters", "Text"]);
            ctx.write_action(&location, json!("${p_text_a.b}")).unwrap();
        }
        assert_eq!(doc["Actions"][0]["Parameters"]["Text"], json!("${p_text_a.b}"));
        assert_eq!(report.substitutions.len(), 1);
        assert_eq!(report.substitutions[0].location, "Actions[0].Parameters.Text");
        assert_eq!(report.placeholder_count(), 1);
    }

    #[test]
    fn test_mirror_skips_ineligible_and_missing() {
        let mut doc = flow();
        let mut report = VariableizeReport::default();
        let written = {
            let mut ctx = ActionContext::new(&mut doc, 0, "a.b", &mut report);
            ctx.mirror_to_metadata(
                &["text".to_string(), "other".to_string(), "missing".to_string()],
                &json!("${x}"),
            )
            .unwrap()
        };
        assert_eq!(written, 1);
        let meta = &doc["Metadata"]["ActionMetadata"]["a.b"];
        assert_eq!(meta["text"], json!("${x}"));
        assert_eq!(meta["other"], json!("$.Attributes.x"));
        assert!(meta.get("missing").is_none());
        assert_eq!(report.placeholder_count(), 0);
    }
}
