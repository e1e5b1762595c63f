//! Common test utilities and fixtures

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Block definitions covering every substitution mode
pub const RULES: &str = r#"{
  // Prompts played to the customer
  "prompt": [
    {
      "status": "complete",
      "exportedJsonBlockName": "MessageParticipant",
      "docs": "https://docs.example.com/blocks/prompt",
      "vars": [
        {
          "name": "text",
          "actionsRelativePathValue": "Parameters.Text",
          "metadataRelativePathKey": { "used": true, "paths": ["text"] }
        }
      ]
    }
  ],
  "loop": [
    {
      "status": "complete",
      "exportedJsonBlockName": "MessageParticipantIteratively",
      "vars": [
        {
          "name": "promptId",
          "actionsRelativePathValue": "Parameters.Messages[*].PromptId",
          "metadataRelativePathKey": { "used": true, "paths": ["audio[*].id"] }
        }
      ]
    }
  ],
  /* Not released yet */
  "queue": [
    {
      "status": "draft",
      "exportedJsonBlockName": "UpdateContactTargetQueue",
      "vars": [{ "name": "queueId", "actionsRelativePathValue": "Parameters.QueueId" }]
    }
  ],
  "attributes": [
    {
      "exportedJsonBlockName": "UpdateContactAttributes",
      "vars": [
        {
          "name": "attr_*",
          "actionsRelativePathValue": "Parameters.Attributes[*]",
          "actionsRelativePathKey": "Parameters.Attributes"
        }
      ]
    }
  ],
  "email": [
    {
      "status": "complete",
      "exportedJsonBlockName": "SendMessage",
      "vars": [
        {
          "name": "from",
          "actionsRelativePathValue": "Parameters.From",
          "metadataRelativePathKey": { "used": true, "paths": ["from"] }
        }
      ]
    }
  ]
}
"#;

/// A small exported flow touching every rule above
pub fn sample_flow() -> Value {
    json!({
        "Version": "2019-10-30",
        "StartAction": "Play 1",
        "Actions": [
            {
                "Identifier": "Play 1",
                "Type": "MessageParticipant",
                "Parameters": {"Text": "Welcome to Example Corp"},
                "Transitions": {"NextAction": "loop-1"}
            },
            {
                "Identifier": "loop-1",
                "Type": "MessageParticipantIteratively",
                "Parameters": {"Messages": [
                    {"PromptId": "arn:aws:connect:prompt/1"},
                    {"PromptId": "arn:aws:connect:prompt/2"}
                ]}
            },
            {
                "Identifier": "set-queue",
                "Type": "UpdateContactTargetQueue",
                "Parameters": {"QueueId": "arn:aws:connect:queue/1"}
            },
            {
                "Identifier": "set-attrs",
                "Type": "UpdateContactAttributes",
                "Parameters": {"Attributes": {
                    "Tier": "gold",
                    "Caller": "$.CustomerEndpoint.Address"
                }}
            },
            {
                "Identifier": "notify",
                "Type": "SendMessage",
                "Parameters": {"From": "Support Team <support@example.com>"}
            },
            {
                "Identifier": "greeting",
                "Type": "MessageParticipant",
                "Parameters": {"Text": "$.Attributes.Greeting"}
            }
        ],
        "Metadata": {
            "entryPointPosition": {"x": 40, "y": 40},
            "ActionMetadata": {
                "Play 1": {"position": {"x": 10, "y": 20}, "text": "Welcome to Example Corp"},
                "loop-1": {"audio": [
                    {"id": "arn:aws:connect:prompt/1", "text": "one"},
                    {"id": "arn:aws:connect:prompt/2", "text": "two"}
                ]},
                "notify": {"from": "Support Team <support@example.com>"},
                "greeting": {"text": "$.Attributes.Greeting"}
            }
        }
    })
}

/// Scratch directory with rules and flows laid out the way the tool expects
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to a path relative to the workspace
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(&path, content).expect("failed to write file");
        path
    }

    pub fn write_rules(&self) -> PathBuf {
        self.write("block-definitions.jsonc", RULES)
    }

    pub fn write_flow(&self, relative: &str, flow: &Value) -> PathBuf {
        self.write(
            relative,
            &serde_json::to_string_pretty(flow).expect("failed to serialize flow"),
        )
    }

    pub fn read_json(&self, relative: &str) -> Value {
        let content =
            fs::read_to_string(self.path().join(relative)).expect("failed to read output");
        serde_json::from_str(&content).expect("output is not JSON")
    }
}
