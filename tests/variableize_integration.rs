//! End-to-end tests for rule loading and flow transformation

mod common;

use common::{sample_flow, TestWorkspace, RULES};
use flow_variableizer::batch::{process_file, BatchOptions, BatchRunner};
use flow_variableizer::config::{load_reverse_map, BlockDefinitions, ReverseMap};
use flow_variableizer::error::ErrorCode;
use flow_variableizer::variableize::{FlowVariableizer, Variableized};
use serde_json::json;
use std::sync::Arc;

fn reverse_map() -> ReverseMap {
    ReverseMap::build(&BlockDefinitions::parse(RULES).unwrap())
}

fn transform() -> Variableized {
    FlowVariableizer::new(Arc::new(reverse_map()))
        .variableize(&sample_flow())
        .unwrap()
}

#[test]
fn test_reverse_map_from_commented_rules() {
    let map = reverse_map();
    let types: Vec<_> = map.iter().map(|(action_type, _)| action_type).collect();
    assert_eq!(
        types,
        vec![
            "MessageParticipant",
            "MessageParticipantIteratively",
            "SendMessage",
            "UpdateContactAttributes"
        ]
    );
    assert!(map.rules_for("UpdateContactTargetQueue").is_empty());
    assert_eq!(map.rules_for("MessageParticipant")[0].block_name, "prompt");
}

#[test]
fn test_prompt_text_and_metadata() {
    let result = transform();
    let flow = &result.flow;
    assert_eq!(
        flow["Actions"][0]["Parameters"]["Text"],
        json!("${prompt_text_Play-1}")
    );
    assert_eq!(
        flow["Metadata"]["ActionMetadata"]["Play 1"]["text"],
        json!("${prompt_text_Play-1}")
    );
    assert_eq!(
        flow["Metadata"]["ActionMetadata"]["Play 1"]["position"],
        json!({"x": 10, "y": 20})
    );
}

#[test]
fn test_loop_prompts_are_paired() {
    let flow = transform().flow;
    let messages = &flow["Actions"][1]["Parameters"]["Messages"];
    let audio = &flow["Metadata"]["ActionMetadata"]["loop-1"]["audio"];
    for (i, expected) in ["${loop_promptId_message1_loop-1}", "${loop_promptId_message2_loop-1}"]
        .iter()
        .enumerate()
    {
        assert_eq!(messages[i]["PromptId"], json!(expected));
        assert_eq!(audio[i]["id"], json!(expected));
    }
    assert_eq!(audio[1]["text"], json!("two"));
}

#[test]
fn test_draft_rules_do_not_apply() {
    let flow = transform().flow;
    assert_eq!(
        flow["Actions"][2]["Parameters"]["QueueId"],
        json!("arn:aws:connect:queue/1")
    );
}

#[test]
fn test_key_path_attributes() {
    let flow = transform().flow;
    let attributes = &flow["Actions"][3]["Parameters"]["Attributes"];
    assert_eq!(attributes["Tier"], json!("${attributes_attr_Tier_set-attrs}"));
    assert_eq!(attributes["Caller"], json!("$.CustomerEndpoint.Address"));
}

#[test]
fn test_email_display_name_is_kept() {
    let flow = transform().flow;
    let expected = json!("Support Team <${email_from_notify}>");
    assert_eq!(flow["Actions"][4]["Parameters"]["From"], expected);
    assert_eq!(flow["Metadata"]["ActionMetadata"]["notify"]["from"], expected);
}

#[test]
fn test_runtime_references_survive() {
    let flow = transform().flow;
    assert_eq!(
        flow["Actions"][5]["Parameters"]["Text"],
        json!("$.Attributes.Greeting")
    );
    assert_eq!(
        flow["Metadata"]["ActionMetadata"]["greeting"]["text"],
        json!("$.Attributes.Greeting")
    );
}

#[test]
fn test_report_counts() {
    let report = transform().report;
    assert_eq!(report.actions_visited, 6);
    assert_eq!(report.actions_skipped, 0);
    // text, two prompt ids, one attribute, one address
    assert_eq!(report.placeholder_count(), 5);
}

#[test]
fn test_transform_is_idempotent() {
    let variableizer = FlowVariableizer::new(Arc::new(reverse_map()));
    let once = variableizer.variableize(&sample_flow()).unwrap();
    let twice = variableizer.variableize(&once.flow).unwrap();
    assert_eq!(twice.flow, once.flow);
    assert!(twice.report.substitutions.is_empty());
}

#[tokio::test]
async fn test_rules_file_and_batch_round_trip() {
    let workspace = TestWorkspace::new();
    let rules = workspace.write_rules();
    workspace.write_flow("flows/a.json", &sample_flow());
    workspace.write("flows/broken.json", "{\"Actions\": [");

    let map = load_reverse_map(&rules).await.unwrap();
    let runner = BatchRunner::new(
        FlowVariableizer::new(Arc::new(map)),
        BatchOptions {
            output_dir: workspace.path().join("out"),
            ..BatchOptions::default()
        },
    );
    let inputs = vec![
        workspace.path().join("flows/a.json"),
        workspace.path().join("flows/broken.json"),
    ];
    let summary = runner.run(inputs).await.unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.placeholders, 5);

    let written = workspace.read_json("out/a_variableized.json");
    assert_eq!(written, transform().flow);
}

#[tokio::test]
async fn test_missing_rules_file_is_config_error() {
    let workspace = TestWorkspace::new();
    let err = load_reverse_map(&workspace.path().join("nope.jsonc"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::CONFIG_NOT_FOUND);
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_non_object_flow_is_reported() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("list.json", "[1, 2]");
    let variableizer = FlowVariableizer::new(Arc::new(reverse_map()));
    let err = process_file(
        &variableizer,
        &input,
        &workspace.path().join("list_variableized.json"),
        false,
    )
    .await
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::INPUT_NOT_AN_OBJECT);
}
