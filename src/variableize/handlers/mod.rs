//! Action-type specific substitution rules
//!
//! Some action types need more than "replace the value, mirror it into
//! metadata". Each such type gets an [`ActionHandler`] registered under its
//! exported type name. A handler sees every rule for its action type before
//! key-path and generic substitution do, and either consumes the rule or lets
//! it fall through.

use super::context::ActionContext;
use crate::config::VariableRule;
use crate::error::Result;

pub mod email;
pub mod identity;
pub mod loop_prompt;
pub mod registry;

pub use email::EmailDisplayNameHandler;
pub use identity::IdentityProviderHandler;
pub use loop_prompt::LoopPromptHandler;
pub use registry::HandlerRegistry;

/// What a handler did with a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The rule is fully applied; skip the other modes
    Handled,
    /// Apply the rule through key-path or generic substitution
    Continue,
}

/// Core trait that all action handlers implement
pub trait ActionHandler: Send + Sync {
    /// Exported action type this handler is registered under
    fn action_type(&self) -> &str;

    /// Apply `rule` (the `rule_index`-th rule for this action type) to the
    /// action held by `ctx`
    fn handle(
        &self,
        ctx: &mut ActionContext<'_>,
        rule: &VariableRule,
        rule_index: usize,
    ) -> Result<HandlerOutcome>;

    /// Returns a description of what this handler does
    fn description(&self) -> &str;
}

/// Creates a vector of all built-in handlers
pub fn all_handlers() -> Vec<Box<dyn ActionHandler>> {
    vec![
        Box::new(LoopPromptHandler::new()),
        Box::new(EmailDisplayNameHandler::new()),
        Box::new(IdentityProviderHandler::new()),
    ]
}
