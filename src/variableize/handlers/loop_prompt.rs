//! Loop prompts: pair each message with its own audio metadata entry

use super::{ActionHandler, HandlerOutcome};
use crate::config::VariableRule;
use crate::error::Result;
use crate::path::PathExpr;
use crate::variableize::context::ActionContext;
use crate::variableize::placeholder::should_substitute;
use crate::variableize::transformer::substitute_primary;
use serde_json::Value;
use tracing::trace;

pub const LOOP_PROMPT_ACTION: &str = "MessageParticipantIteratively";

/// Index-for-index pairing of prompt messages and metadata entries
///
/// `Parameters.Messages[1].PromptId` mirrors into `audio[1].id` only, rather
/// than into every `audio[*].id`.
#[derive(Debug, Default)]
pub struct LoopPromptHandler;

impl LoopPromptHandler {
    pub fn new() -> Self {
        Self
    }
}

impl ActionHandler for LoopPromptHandler {
    fn action_type(&self) -> &str {
        LOOP_PROMPT_ACTION
    }

    fn handle(
        &self,
        ctx: &mut ActionContext<'_>,
        rule: &VariableRule,
        _rule_index: usize,
    ) -> Result<HandlerOutcome> {
        let path = PathExpr::parse(&rule.value_path);
        if rule.key_path.is_some() || !path.has_wildcard() {
            return Ok(HandlerOutcome::Continue);
        }

        let secondaries: Vec<PathExpr> = rule
            .metadata_paths
            .iter()
            .map(|p| PathExpr::parse(p))
            .collect();

        for found in ctx.resolve_action(&path) {
            let Some(placeholder) = substitute_primary(ctx, rule, &found)? else {
                continue;
            };
            let indices: Vec<usize> = found.positions.iter().map(|p| p.index).collect();

            for secondary in &secondaries {
                let pinned = secondary.pin_wildcards(&indices);
                let targets: Vec<_> = ctx
                    .resolve_metadata(&pinned)
                    .into_iter()
                    .filter(|m| should_substitute(&m.value))
                    .map(|m| m.location)
                    .collect();
                if targets.is_empty() {
                    trace!("No metadata at {} for {}", pinned, found.location);
                }
                for location in targets {
                    ctx.write_metadata(&location, placeholder.clone())?;
                }
            }
        }

        Ok(HandlerOutcome::Handled)
    }

    fn description(&self) -> &str {
        "Pairs loop prompt messages with audio metadata by position"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variableize::context::VariableizeReport;
    use serde_json::json;

    fn rule() -> VariableRule {
        VariableRule::new("loop", "promptId", "Parameters.Messages[*].PromptId")
            .with_metadata_paths(["audio[*].id"])
    }

    fn flow() -> Value {
        json!({
            "Actions": [{
                "Identifier": "loop-1",
                "Type": LOOP_PROMPT_ACTION,
                "Parameters": {"Messages": [{"PromptId": "p1"}, {"PromptId": "p2"}]}
            }],
            "Metadata": {"ActionMetadata": {"loop-1": {
                "audio": [{"id": "p1"}, {"id": "p2"}]
            }}}
        })
    }

    fn run(doc: &mut Value, rule: &VariableRule) -> (HandlerOutcome, VariableizeReport) {
        let mut report = VariableizeReport::default();
        let outcome = {
            let mut ctx = ActionContext::new(doc, 0, "loop-1", &mut report);
            LoopPromptHandler::new().handle(&mut ctx, rule, 0).unwrap()
        };
        (outcome, report)
    }

    #[test]
    fn test_pairs_by_position() {
        let mut doc = flow();
        let (outcome, report) = run(&mut doc, &rule());
        assert_eq!(outcome, HandlerOutcome::Handled);

        let messages = &doc["Actions"][0]["Parameters"]["Messages"];
        let audio = &doc["Metadata"]["ActionMetadata"]["loop-1"]["audio"];
        assert_eq!(messages[0]["PromptId"], json!("${loop_promptId_message1_loop-1}"));
        assert_eq!(messages[1]["PromptId"], json!("${loop_promptId_message2_loop-1}"));
        assert_eq!(audio[0]["id"], messages[0]["PromptId"]);
        assert_eq!(audio[1]["id"], messages[1]["PromptId"]);
        assert_eq!(report.substitutions.len(), 4);
        assert_eq!(report.placeholder_count(), 2);
    }

    #[test]
    fn test_shorter_metadata_list_is_not_an_error() {
        let mut doc = flow();
        doc["Metadata"]["ActionMetadata"]["loop-1"]["audio"] = json!([{"id": "p1"}]);
        let (_, report) = run(&mut doc, &rule());
        assert_eq!(report.placeholder_count(), 2);
        assert_eq!(report.substitutions.len(), 3);
    }

    #[test]
    fn test_runtime_reference_message_is_skipped_with_its_metadata() {
        let mut doc = flow();
        doc["Actions"][0]["Parameters"]["Messages"][0]["PromptId"] = json!("$.Attributes.p");
        run(&mut doc, &rule());
        let audio = &doc["Metadata"]["ActionMetadata"]["loop-1"]["audio"];
        assert_eq!(audio[0]["id"], json!("p1"));
        assert_eq!(audio[1]["id"], json!("${loop_promptId_message2_loop-1}"));
    }

    #[test]
    fn test_plain_path_falls_through() {
        let mut doc = flow();
        let plain = VariableRule::new("loop", "text", "Parameters.Text");
        let (outcome, report) = run(&mut doc, &plain);
        assert_eq!(outcome, HandlerOutcome::Continue);
        assert!(report.substitutions.is_empty());
    }
}
