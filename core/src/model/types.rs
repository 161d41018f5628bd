//! Chat types for the OpenAI-compatible completion endpoint

use serde::{Deserialize, Serialize};

/// Message in a chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role: String,
  pub content: String,
}

impl ChatMessage {
  pub fn system(content: impl Into<String>) -> Self {
    Self {
      role: "system".to_string(),
      content: content.into(),
    }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self {
      role: "user".to_string(),
      content: content.into(),
    }
  }

  pub fn assistant(content: impl Into<String>) -> Self {
    Self {
      role: "assistant".to_string(),
      content: content.into(),
    }
  }
}

/// Chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
  pub model: String,
  pub messages: Vec<ChatMessage>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub temperature: Option<f32>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_tokens: Option<u32>,
}

/// Chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
  pub choices: Vec<Choice>,
}

/// A completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
  pub message: ChoiceMessage,
}

/// Message in a choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
  #[serde(default)]
  pub content: Option<String>,
}
