//! Flow transformer
//!
//! Walks the actions of a flow document and replaces the values named by the
//! reverse map with placeholders. For every rule of an action's type:
//!
//! 1. a registered [`ActionHandler`](super::handlers::ActionHandler) runs
//!    first and may consume the rule,
//! 2. rules with a key path are expanded once per key of the keyed object,
//! 3. everything else goes through generic substitution with wildcard
//!    fan-out and metadata mirroring.

use super::context::{ActionContext, VariableizeReport, ACTIONS_KEY};
use super::handlers::{HandlerOutcome, HandlerRegistry};
use super::placeholder::{should_substitute, synthesize};
use crate::config::{ReverseMap, VariableRule};
use crate::error::{ErrorCode, FlowError, Result};
use crate::path::{PathExpr, PathMatch};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A transformed copy of a flow document
#[derive(Debug, Clone, PartialEq)]
pub struct Variableized {
    pub flow: Value,
    pub report: VariableizeReport,
}

/// Applies a reverse map to flow documents
#[derive(Debug, Clone)]
pub struct FlowVariableizer {
    reverse_map: Arc<ReverseMap>,
    handlers: Arc<HandlerRegistry>,
}

impl FlowVariableizer {
    /// Transformer with the built-in action handlers
    pub fn new(reverse_map: Arc<ReverseMap>) -> Self {
        Self::with_handlers(reverse_map, Arc::new(HandlerRegistry::with_defaults()))
    }

    pub fn with_handlers(reverse_map: Arc<ReverseMap>, handlers: Arc<HandlerRegistry>) -> Self {
        Self {
            reverse_map,
            handlers,
        }
    }

    pub fn reverse_map(&self) -> &ReverseMap {
        &self.reverse_map
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Transform a copy of `flow`, leaving the input untouched
    pub fn variableize(&self, flow: &Value) -> Result<Variableized> {
        let mut copy = flow.clone();
        let report = self.variableize_in_place(&mut copy)?;
        Ok(Variableized { flow: copy, report })
    }

    /// Transform `flow` itself
    pub fn variableize_in_place(&self, flow: &mut Value) -> Result<VariableizeReport> {
        if !flow.is_object() {
            return Err(FlowError::input_with_code(
                ErrorCode::INPUT_NOT_AN_OBJECT,
                "Flow document root is not an object",
                None,
            ));
        }

        let mut report = VariableizeReport::default();
        let action_count = match flow.get(ACTIONS_KEY) {
            Some(Value::Array(actions)) => actions.len(),
            Some(_) => {
                warn!("'{}' is not an array, nothing to do", ACTIONS_KEY);
                0
            }
            None => 0,
        };

        for index in 0..action_count {
            let Some((action_type, identifier)) = action_keys(flow, index) else {
                debug!("Skipping action {} without type or identifier", index);
                report.actions_skipped += 1;
                continue;
            };
            report.actions_visited += 1;

            let rules = self.reverse_map.rules_for(&action_type);
            if rules.is_empty() {
                trace!("No rules for {} ({})", identifier, action_type);
                continue;
            }
            debug!(
                "Applying {} rules to {} ({})",
                rules.len(),
                identifier,
                action_type
            );

            let handler = self.handlers.get(&action_type);
            let mut ctx = ActionContext::new(flow, index, identifier, &mut report);
            for (rule_index, rule) in rules.iter().enumerate() {
                if let Some(handler) = handler {
                    if handler.handle(&mut ctx, rule, rule_index)? == HandlerOutcome::Handled {
                        continue;
                    }
                }
                if rule.key_path.is_some() {
                    apply_key_path(&mut ctx, rule)?;
                } else {
                    apply_generic(&mut ctx, rule)?;
                }
            }
        }

        Ok(report)
    }
}

/// `Type` and `Identifier` of the action at `index`, when both are non-empty strings
fn action_keys(flow: &Value, index: usize) -> Option<(String, String)> {
    let action = flow.get(ACTIONS_KEY)?.get(index)?;
    let non_empty = |key: &str| {
        action
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    Some((non_empty("Type")?, non_empty("Identifier")?))
}

/// Replace one matched action value with its placeholder
///
/// Returns the placeholder written, or `None` when the value is not eligible.
/// Metadata is left alone.
pub fn substitute_primary(
    ctx: &mut ActionContext<'_>,
    rule: &VariableRule,
    found: &PathMatch,
) -> Result<Option<Value>> {
    if !should_substitute(&found.value) {
        trace!("Leaving {} unchanged", found.location);
        return Ok(None);
    }
    let placeholder = Value::String(synthesize(
        &rule.block_name,
        &rule.name,
        ctx.identifier(),
        &found.positions,
    ));
    ctx.write_action(&found.location, placeholder.clone())?;
    Ok(Some(placeholder))
}

/// Generic substitution with wildcard fan-out and metadata mirroring
pub fn apply_generic(ctx: &mut ActionContext<'_>, rule: &VariableRule) -> Result<usize> {
    let path = PathExpr::parse(&rule.value_path);
    let mut written = 0;
    for found in ctx.resolve_action(&path) {
        if let Some(placeholder) = substitute_primary(ctx, rule, &found)? {
            ctx.mirror_to_metadata(&rule.metadata_paths, &placeholder)?;
            written += 1;
        }
    }
    Ok(written)
}

/// Key-path substitution: one concrete rule per key of the keyed object
pub fn apply_key_path(ctx: &mut ActionContext<'_>, rule: &VariableRule) -> Result<usize> {
    let Some(key_path) = rule.key_path.as_deref() else {
        return apply_generic(ctx, rule);
    };
    let keys: Vec<String> = match ctx.resolve_action_single(&PathExpr::parse(key_path)) {
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        _ => {
            trace!("No object at key path {}", key_path);
            return Ok(0);
        }
    };

    let mut written = 0;
    for key in keys {
        let instance = rule.instantiate_key(&key);
        let path = PathExpr::parse(&instance.value_path);
        if path.has_wildcard() {
            debug!(
                "Key path rule {} still has a wildcard after instantiation, skipping",
                instance.value_path
            );
            continue;
        }
        let Some(found) = ctx.resolve_action(&path).into_iter().next() else {
            continue;
        };
        if let Some(placeholder) = substitute_primary(ctx, &instance, &found)? {
            ctx.mirror_to_metadata(&instance.metadata_paths, &placeholder)?;
            written += 1;
        }
    }
    Ok(written)
}

#[cfg(test)]
#[path = "transformer_tests.rs"]
mod transformer_tests;
