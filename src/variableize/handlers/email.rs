//! Email senders and recipients written as `Display Name <address>`

use super::{ActionHandler, HandlerOutcome};
use crate::config::VariableRule;
use crate::error::Result;
use crate::path::PathExpr;
use crate::variableize::context::ActionContext;
use crate::variableize::placeholder::{is_substitutable_str, should_substitute, synthesize};
use crate::variableize::transformer::substitute_primary;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::trace;

pub const SEND_MESSAGE_ACTION: &str = "SendMessage";

static DISPLAY_NAME_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<name>[^<]*?)\s*<(?P<address>[^<>]+)>\s*$")
        .expect("display name pattern is valid")
});

/// Split `Display Name <address>` into its two parts
///
/// Returns `None` for bare addresses and for an empty display name.
pub fn split_display_name(value: &str) -> Option<(&str, &str)> {
    let caps = DISPLAY_NAME_ADDRESS.captures(value)?;
    let name = caps.name("name")?.as_str();
    let address = caps.name("address")?.as_str();
    if name.is_empty() {
        None
    } else {
        Some((name, address))
    }
}

/// Keeps the display name and templates only the address
#[derive(Debug, Default)]
pub struct EmailDisplayNameHandler;

impl EmailDisplayNameHandler {
    pub fn new() -> Self {
        Self
    }
}

impl ActionHandler for EmailDisplayNameHandler {
    fn action_type(&self) -> &str {
        SEND_MESSAGE_ACTION
    }

    fn handle(
        &self,
        ctx: &mut ActionContext<'_>,
        rule: &VariableRule,
        _rule_index: usize,
    ) -> Result<HandlerOutcome> {
        if rule.key_path.is_some() {
            return Ok(HandlerOutcome::Continue);
        }

        let path = PathExpr::parse(&rule.value_path);
        for found in ctx.resolve_action(&path) {
            if !should_substitute(&found.value) {
                trace!("Value at {} is not eligible", found.location);
                continue;
            }
            let merged = match found.value.as_str().and_then(split_display_name) {
                Some((_, address)) if !is_substitutable_str(address) => {
                    trace!("Address at {} already templated", found.location);
                    continue;
                }
                Some((name, _)) => {
                    let placeholder =
                        synthesize(&rule.block_name, &rule.name, ctx.identifier(), &found.positions);
                    Value::String(format!("{name} <{placeholder}>"))
                }
                None => {
                    if let Some(placeholder) = substitute_primary(ctx, rule, &found)? {
                        ctx.mirror_to_metadata(&rule.metadata_paths, &placeholder)?;
                    }
                    continue;
                }
            };

            ctx.write_action(&found.location, merged.clone())?;
            ctx.mirror_to_metadata(&rule.metadata_paths, &merged)?;
        }

        Ok(HandlerOutcome::Handled)
    }

    fn description(&self) -> &str {
        "Templates the address of 'Display Name <address>' values"
    }
}
