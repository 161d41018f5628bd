// Pipeline agents
// One agent per stage; only the collection agent talks to the tool server

use indexmap::IndexMap;
use serde_json::Value;
use tracing::info;

use relay_protocol::ToolResult;

use crate::pipeline::report::render_report;
use crate::pipeline::{StageResult, ToolCaller};

/// Aggregated sentiment counts for one feed.
#[derive(Debug, Clone)]
pub struct Aggregation {
  /// Insertion-ordered; order is the tie-break rule for the dominant label.
  pub distribution: IndexMap<String, u64>,
  pub total_count: u64,
}

/// Fetches the annotated feed through the tool server.
pub struct DataCollectionAgent;

impl DataCollectionAgent {
  pub const NAME: &'static str = "data-collection";

  pub async fn process<C: ToolCaller + ?Sized>(caller: &C, limit: usize) -> StageResult {
    info!(agent = Self::NAME, limit, "collecting posts");

    match caller
      .call_tool("fetch_posts", serde_json::json!({ "limit": limit }))
      .await
    {
      Ok(ToolResult::Success { payload }) => StageResult::success(Self::NAME, payload),
      Ok(ToolResult::Error { error }) => StageResult::error(Self::NAME, error.message),
      Err(err) => StageResult::error(Self::NAME, err.to_string()),
    }
  }
}

/// Counts sentiment labels across the collected posts.
pub struct SentimentAggregationAgent;

impl SentimentAggregationAgent {
  pub const NAME: &'static str = "sentiment-aggregation";

  pub fn process(data: &Value) -> Result<Aggregation, String> {
    let Some(posts) = data.as_array() else {
      return Err("collection stage did not produce a list of posts".to_string());
    };
    info!(agent = Self::NAME, posts = posts.len(), "aggregating sentiment");

    let mut distribution: IndexMap<String, u64> = IndexMap::new();
    for label in ["positive", "neutral", "negative"] {
      distribution.insert(label.to_string(), 0);
    }

    for post in posts {
      // an unannotated post counts as neutral
      let sentiment = post
        .get("sentiment")
        .and_then(Value::as_str)
        .unwrap_or("neutral");
      if let Some(count) = distribution.get_mut(sentiment) {
        *count += 1;
      }
    }

    Ok(Aggregation {
      distribution,
      total_count: posts.len() as u64,
    })
  }
}

/// Renders the final report text.
pub struct ReportGenerationAgent;

impl ReportGenerationAgent {
  pub const NAME: &'static str = "report-generation";

  pub fn process(aggregation: &Aggregation) -> String {
    info!(agent = Self::NAME, "rendering report");
    render_report(&aggregation.distribution, aggregation.total_count)
  }
}
