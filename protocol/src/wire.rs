//! Wire frames
//!
//! Frame bodies are serde-defined; the byte framing (newline-delimited JSON in
//! this workspace) belongs to the transport layer

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::sampling::{SampleOutcome, SampleRequest};

/// Error categories a tool result may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  NotFound,
  InvalidArguments,
  SamplingFailed,
  Domain,
  Internal,
}

/// Client-visible error detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
  pub kind: ErrorKind,
  pub message: String,
}

/// Result of one tool invocation. Exactly one arm is populated by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolResult {
  Success { payload: Value },
  Error { error: ErrorEnvelope },
}

impl ToolResult {
  pub fn success(payload: Value) -> Self {
    ToolResult::Success { payload }
  }

  pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
    ToolResult::Error {
      error: ErrorEnvelope {
        kind,
        message: message.into(),
      },
    }
  }

  pub fn is_success(&self) -> bool {
    matches!(self, ToolResult::Success { .. })
  }

  pub fn payload(&self) -> Option<&Value> {
    match self {
      ToolResult::Success { payload } => Some(payload),
      ToolResult::Error { .. } => None,
    }
  }

  pub fn error_envelope(&self) -> Option<&ErrorEnvelope> {
    match self {
      ToolResult::Success { .. } => None,
      ToolResult::Error { error } => Some(error),
    }
  }
}

/// Frames flowing caller to server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
  ToolCall {
    id: String,
    name: String,
    arguments: Value,
  },
  SampleResult {
    id: String,
    outcome: SampleOutcome,
  },
}

/// Frames flowing server to caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
  ToolResult {
    id: String,
    result: ToolResult,
  },
  SampleRequest {
    id: String,
    request: SampleRequest,
  },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn error_envelope_uses_snake_case_kinds() {
    let result = ToolResult::error(ErrorKind::InvalidArguments, "missing `b`");
    let value = serde_json::to_value(&result).expect("serializable");

    assert_eq!(value["status"], "error");
    assert_eq!(value["error"]["kind"], "invalid_arguments");
  }

  #[test]
  fn tool_call_frame_round_trips() {
    let frame = ClientFrame::ToolCall {
      id: "call-1".to_string(),
      name: "add".to_string(),
      arguments: serde_json::json!({ "a": 1, "b": 2 }),
    };

    let encoded = serde_json::to_string(&frame).expect("serializable");
    let decoded: ClientFrame = serde_json::from_str(&encoded).expect("decodable");

    assert_eq!(decoded, frame);
  }

  #[test]
  fn success_accessors_match_arm() {
    let ok = ToolResult::success(serde_json::json!(5.0));
    assert!(ok.is_success());
    assert_eq!(ok.payload(), Some(&serde_json::json!(5.0)));
    assert!(ok.error_envelope().is_none());
  }
}
