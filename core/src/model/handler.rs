//! Model-backed sampling handler

use async_trait::async_trait;

use relay_protocol::{Role, SamplingMessage, SamplingParams};

use super::client::ChatClient;
use super::error::ModelError;
use super::types::ChatMessage;
use crate::client::SamplingHandler;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Answers sampling callbacks with a hosted model.
pub struct ModelSamplingHandler {
  client: ChatClient,
}

impl ModelSamplingHandler {
  pub fn new(client: ChatClient) -> Self {
    Self { client }
  }
}

/// Translate the wire conversation into provider chat messages.
///
/// A message with an unrecognized role is an error here, not a silent drop.
fn to_chat_messages(
  messages: &[SamplingMessage],
  params: &SamplingParams,
) -> Result<Vec<ChatMessage>, ModelError> {
  let system_prompt = params
    .system_prompt
    .as_deref()
    .unwrap_or(DEFAULT_SYSTEM_PROMPT);

  let mut chat = Vec::with_capacity(messages.len() + 1);
  chat.push(ChatMessage::system(system_prompt));

  for message in messages {
    let content = message.content.to_text();
    match message.role {
      Role::System => chat.push(ChatMessage::system(content)),
      Role::User => chat.push(ChatMessage::user(content)),
      Role::Assistant => chat.push(ChatMessage::assistant(content)),
      Role::Unknown => {
        return Err(ModelError::UnsupportedRole(
          "message with unrecognized role".to_string(),
        ));
      }
    }
  }

  Ok(chat)
}

#[async_trait]
impl SamplingHandler for ModelSamplingHandler {
  async fn sample(
    &self,
    messages: &[SamplingMessage],
    params: &SamplingParams,
  ) -> anyhow::Result<String> {
    let chat = to_chat_messages(messages, params)?;
    Ok(
      self
        .client
        .chat(chat, params.temperature, params.max_tokens)
        .await?,
    )
  }
}

#[cfg(test)]
mod tests {
  use relay_protocol::MessageContent;

  use super::*;

  #[test]
  fn default_system_prompt_is_prepended() {
    let messages = vec![SamplingMessage::user("hi")];

    let chat =
      to_chat_messages(&messages, &SamplingParams::default()).expect("translation succeeds");

    assert_eq!(chat[0], ChatMessage::system(DEFAULT_SYSTEM_PROMPT));
    assert_eq!(chat[1], ChatMessage::user("hi"));
  }

  #[test]
  fn explicit_system_prompt_wins() {
    let params = SamplingParams {
      system_prompt: Some("Answer in one word.".to_string()),
      ..Default::default()
    };

    let chat = to_chat_messages(&[SamplingMessage::user("hi")], &params)
      .expect("translation succeeds");

    assert_eq!(chat[0], ChatMessage::system("Answer in one word."));
  }

  #[test]
  fn unknown_role_is_rejected_not_dropped() {
    let messages = vec![SamplingMessage {
      role: Role::Unknown,
      content: MessageContent::Text("who said this".to_string()),
    }];

    let result = to_chat_messages(&messages, &SamplingParams::default());

    assert!(matches!(result, Err(ModelError::UnsupportedRole(_))));
  }
}
