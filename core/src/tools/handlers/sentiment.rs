//! Sentiment classification via the caller's model
//!
//! The canonical sampling tool: it never touches a model itself, it asks the
//! connected client to run the completion

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use relay_protocol::SampleRequest;

use crate::tools::context::{ToolCallError, ToolContext, ToolInvocation};
use crate::tools::registry::ToolHandler;

fn sentiment_prompt(text: &str) -> String {
  format!(
    "Analyze the sentiment of the following text as positive, negative, or neutral.\n\
     Just output a single word - 'positive', 'negative', or 'neutral'.\n\n\
     Text to analyze: {text}"
  )
}

/// Map a free-text model answer onto one of the three known labels.
///
/// Substring match, `positive` checked before `negative`, anything else falls
/// back to `neutral`.
pub fn normalize_sentiment(answer: &str) -> &'static str {
  let answer = answer.trim().to_lowercase();
  if answer.contains("positive") {
    "positive"
  } else if answer.contains("negative") {
    "negative"
  } else {
    "neutral"
  }
}

/// Run one sampling round-trip for `text` and normalize the answer.
pub async fn classify(text: &str, ctx: &ToolContext) -> Result<&'static str, ToolCallError> {
  let response = ctx
    .sample(SampleRequest::from_prompt(sentiment_prompt(text)))
    .await?;
  Ok(normalize_sentiment(&response.text))
}

#[derive(Debug, Deserialize)]
struct SentimentArgs {
  text: String,
}

pub struct AnalyzeSentimentHandler;

#[async_trait]
impl ToolHandler for AnalyzeSentimentHandler {
  async fn handle(
    &self,
    invocation: ToolInvocation,
    ctx: &ToolContext,
  ) -> Result<Value, ToolCallError> {
    let args: SentimentArgs = invocation.parse_arguments()?;
    let sentiment = classify(&args.text, ctx).await?;
    Ok(json!({ "text": args.text, "sentiment": sentiment }))
  }
}
