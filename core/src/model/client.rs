//! Chat client
//!
//! Thin client for an OpenAI-compatible chat completion endpoint

use reqwest::Client;

use relay_config::ModelConfig;

use super::error::{ModelError, Result};
use super::types::{ChatMessage, ChatRequest, ChatResponse};

/// Chat client for one endpoint and model.
pub struct ChatClient {
  client: Client,
  base_url: String,
  api_key: String,
  model: String,
}

impl ChatClient {
  pub fn new(base_url: String, api_key: String, model: String) -> Self {
    Self {
      client: Client::new(),
      base_url,
      api_key,
      model,
    }
  }

  /// Build from configuration, reading the API key from the configured
  /// environment variable.
  pub fn from_config(config: &ModelConfig) -> Result<Self> {
    let api_key = config
      .api_key()
      .ok_or_else(|| ModelError::MissingApiKey(config.api_key_env.clone()))?;
    Ok(Self::new(
      config.base_url.clone(),
      api_key,
      config.model.clone(),
    ))
  }

  /// Get the API endpoint URL
  fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.base_url.trim_end_matches('/'), path)
  }

  /// Build authorization header
  fn auth_header(&self) -> String {
    format!("Bearer {}", self.api_key)
  }

  /// Send one chat completion request and return the first choice's text.
  pub async fn chat(
    &self,
    messages: Vec<ChatMessage>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
  ) -> Result<String> {
    let url = self.endpoint("chat/completions");
    let body = ChatRequest {
      model: self.model.clone(),
      messages,
      temperature,
      max_tokens,
    };

    let response = self
      .client
      .post(&url)
      .header("Authorization", self.auth_header())
      .header("Content-Type", "application/json")
      .json(&body)
      .send()
      .await
      .map_err(ModelError::NetworkError)?;

    if !response.status().is_success() {
      let status = response.status();
      let body = response.text().await.unwrap_or_default();
      return Err(ModelError::ApiError(format!("HTTP {status}: {body}")));
    }

    let parsed: ChatResponse = serde_json::from_str(&response.text().await?)?;
    parsed
      .choices
      .into_iter()
      .next()
      .and_then(|choice| choice.message.content)
      .ok_or_else(|| ModelError::InvalidResponse("no completion choices".to_string()))
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::matchers::{header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;

  fn client(base_url: String) -> ChatClient {
    ChatClient::new(base_url, "test-key".to_string(), "qwen-max".to_string())
  }

  #[tokio::test]
  async fn chat_returns_the_first_choice_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .and(header("Authorization", "Bearer test-key"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "choices": [
          { "message": { "role": "assistant", "content": "positive" } }
        ]
      })))
      .expect(1)
      .mount(&server)
      .await;

    let text = client(server.uri())
      .chat(vec![ChatMessage::user("classify")], None, None)
      .await
      .expect("chat succeeds");

    assert_eq!(text, "positive");
  }

  #[tokio::test]
  async fn non_success_status_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
      .mount(&server)
      .await;

    let result = client(server.uri())
      .chat(vec![ChatMessage::user("classify")], None, None)
      .await;

    assert!(matches!(result, Err(ModelError::ApiError(_))));
  }

  #[tokio::test]
  async fn empty_choices_is_an_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
      .mount(&server)
      .await;

    let result = client(server.uri())
      .chat(vec![ChatMessage::user("classify")], None, None)
      .await;

    assert!(matches!(result, Err(ModelError::InvalidResponse(_))));
  }
}
