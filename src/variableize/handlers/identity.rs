//! Identity provider references in authentication actions

use super::{ActionHandler, HandlerOutcome};
use crate::config::VariableRule;
use crate::error::Result;
use crate::path::{Location, PathExpr};
use crate::variableize::context::ActionContext;
use crate::variableize::placeholder::should_substitute;
use crate::variableize::transformer::substitute_primary;
use serde_json::Value;

pub const AUTHENTICATE_ACTION: &str = "AuthenticateParticipant";

const ID_KEY: &str = "id";
const DISPLAY_NAME_KEY: &str = "displayName";

/// Rewrites `{id, displayName}` metadata objects along with the action value
///
/// The flow designer stores the selected provider as an object whose
/// `displayName` would otherwise keep showing the original resource after the
/// id is templated.
#[derive(Debug, Default)]
pub struct IdentityProviderHandler;

impl IdentityProviderHandler {
    pub fn new() -> Self {
        Self
    }
}

impl ActionHandler for IdentityProviderHandler {
    fn action_type(&self) -> &str {
        AUTHENTICATE_ACTION
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
            let Some(placeholder) = substitute_primary(ctx, rule, &found)? else {
                continue;
            };

            for secondary in &rule.metadata_paths {
                let matches = ctx.resolve_metadata(&PathExpr::parse(secondary));
                for target in matches {
                    for location in rewrite_targets(&target.value, target.location) {
                        ctx.write_metadata(&location, placeholder.clone())?;
                    }
                }
            }
        }

        Ok(HandlerOutcome::Handled)
    }

    fn description(&self) -> &str {
        "Templates identity provider ids and their display names in metadata"
    }
}

/// Locations to overwrite for one metadata match
fn rewrite_targets(value: &Value, location: Location) -> Vec<Location> {
    match value {
        Value::Object(map) => {
            let id_eligible = map.get(ID_KEY).is_some_and(should_substitute);
            if !id_eligible {
                return Vec::new();
            }
            let mut targets = vec![location.clone().key(ID_KEY)];
            if map.contains_key(DISPLAY_NAME_KEY) {
                targets.push(location.key(DISPLAY_NAME_KEY));
            }
            targets
        }
        other if should_substitute(other) => vec![location],
        _ => Vec::new(),
    }
}
