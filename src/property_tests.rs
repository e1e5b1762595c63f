//! Property-based tests for the flow transformation

#[cfg(test)]
mod tests {
    use crate::config::{ReverseMap, VariableRule};
    use crate::path::PathExpr;
    use crate::variableize::FlowVariableizer;
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn variableizer() -> FlowVariableizer {
        let map: ReverseMap = vec![
            (
                "MessageParticipant".to_string(),
                VariableRule::new("prompt", "text", "Parameters.Text")
                    .with_metadata_paths(["text"]),
            ),
            (
                "MessageParticipant".to_string(),
                VariableRule::new("prompt", "promptId", "Parameters.Messages[*].PromptId"),
            ),
        ]
        .into_iter()
        .collect();
        FlowVariableizer::new(Arc::new(map))
    }

    fn flow_with_texts(texts: &[String]) -> Value {
        let actions: Vec<Value> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                json!({"Identifier": format!("action {i}"), "Type": "MessageParticipant",
                       "Parameters": {"Text": text}})
            })
            .collect();
        let metadata: serde_json::Map<String, Value> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| (format!("action {i}"), json!({"text": text})))
            .collect();
        json!({"Actions": actions, "Metadata": {"ActionMetadata": metadata}})
    }

    // Property test: a second pass never changes anything
    proptest! {
        #[test]
        fn test_variableize_is_idempotent(
            texts in prop::collection::vec(".{0,12}", 1..6),
        ) {
            let variableizer = variableizer();
            let once = variableizer.variableize(&flow_with_texts(&texts)).unwrap();
            let twice = variableizer.variableize(&once.flow).unwrap();

            prop_assert_eq!(&twice.flow, &once.flow);
            prop_assert!(twice.report.substitutions.is_empty());
        }
    }

    // Property test: metadata always mirrors the action's placeholder
    proptest! {
        #[test]
        fn test_metadata_matches_action(
            texts in prop::collection::vec("[a-zA-Z][a-zA-Z ]{0,10}", 1..6),
        ) {
            let result = variableizer().variableize(&flow_with_texts(&texts)).unwrap();
            for i in 0..texts.len() {
                let id = format!("action {i}");
                prop_assert_eq!(
                    &result.flow["Metadata"]["ActionMetadata"][id.as_str()]["text"],
                    &result.flow["Actions"][i]["Parameters"]["Text"]
                );
            }
        }
    }

    // Property test: N messages give _message1 .. _messageN in order
    proptest! {
        #[test]
        fn test_positional_suffixes_follow_array_order(
            ids in prop::collection::vec("[a-z0-9]{1,8}", 1..20),
        ) {
            let messages: Vec<Value> = ids.iter().map(|id| json!({"PromptId": id})).collect();
            let flow = json!({
                "Version": "2019-10-30",
                "Actions": [{"Parameters": {"Messages": messages},
                             "Type": "MessageParticipant", "Identifier": "loop"}]
            });
            let result = variableizer().variableize(&flow).unwrap();

            for n in 0..ids.len() {
                let expected = format!("${{prompt_promptId_message{}_loop}}", n + 1);
                prop_assert_eq!(
                    result.flow["Actions"][0]["Parameters"]["Messages"][n]["PromptId"].as_str(),
                    Some(expected.as_str())
                );
            }
        }
    }

    // Property test: runtime references and blank values are never altered
    proptest! {
        #[test]
        fn test_ineligible_values_are_preserved(
            reference in "\\$\\.[A-Za-z.]{0,12}",
            blank in "[ \t]{0,4}",
        ) {
            let texts = vec![reference, blank];
            let flow = flow_with_texts(&texts);
            let result = variableizer().variableize(&flow).unwrap();
            prop_assert_eq!(&result.flow, &flow);
        }
    }

    // Property test: parsing is total
    proptest! {
        #[test]
        fn test_parse_never_panics(expr in ".{0,40}") {
            let parsed = PathExpr::parse(&expr);
            prop_assert_eq!(parsed.expression, expr);
        }
    }
}
