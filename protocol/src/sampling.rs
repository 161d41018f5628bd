//! Sampling types
//!
//! Conversation payloads exchanged between a suspended tool invocation and the
//! client-side handler that answers it

use serde::{Deserialize, Serialize};

/// Message role in a sampled conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  System,
  User,
  Assistant,
  /// Any role value this build does not recognize. Kept as an explicit variant
  /// so handlers decide what happens to the message instead of dropping it.
  #[serde(other)]
  Unknown,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Role::System => "system",
      Role::User => "user",
      Role::Assistant => "assistant",
      Role::Unknown => "unknown",
    }
  }
}

/// Message content. `Other` carries structured payloads verbatim; the textual
/// fallback is a single explicit code path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum MessageContent {
  Text(String),
  Other(serde_json::Value),
}

impl MessageContent {
  pub fn as_text(&self) -> Option<&str> {
    match self {
      MessageContent::Text(text) => Some(text),
      MessageContent::Other(_) => None,
    }
  }

  /// Text verbatim, anything else stringified.
  pub fn to_text(&self) -> String {
    match self {
      MessageContent::Text(text) => text.clone(),
      MessageContent::Other(value) => value.to_string(),
    }
  }
}

/// One role-tagged message of a sampled conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingMessage {
  pub role: Role,
  pub content: MessageContent,
}

impl SamplingMessage {
  pub fn system(text: impl Into<String>) -> Self {
    Self {
      role: Role::System,
      content: MessageContent::Text(text.into()),
    }
  }

  pub fn user(text: impl Into<String>) -> Self {
    Self {
      role: Role::User,
      content: MessageContent::Text(text.into()),
    }
  }

  pub fn assistant(text: impl Into<String>) -> Self {
    Self {
      role: Role::Assistant,
      content: MessageContent::Text(text.into()),
    }
  }
}

/// Generation parameters attached to a sample request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub system_prompt: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub temperature: Option<f32>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_tokens: Option<u32>,
}

/// A completion request a tool invocation routes back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRequest {
  pub messages: Vec<SamplingMessage>,

  #[serde(default)]
  pub params: SamplingParams,
}

impl SampleRequest {
  pub fn new(messages: Vec<SamplingMessage>, params: SamplingParams) -> Self {
    Self { messages, params }
  }

  /// The common case: a single user message with default parameters.
  pub fn from_prompt(prompt: impl Into<String>) -> Self {
    Self {
      messages: vec![SamplingMessage::user(prompt)],
      params: SamplingParams::default(),
    }
  }
}

/// Text produced by the client's handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResponse {
  pub text: String,
}

/// What the client reports back for one sample request. The handler may fail,
/// and that failure has to travel to the suspended invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SampleOutcome {
  Completed { text: String },
  Failed { message: String },
}
