// Multi-agent pipeline demo
// Three sequential stages: collect, aggregate, report. The first failure
// absorbs the run; later stages are never attempted.

pub mod agents;
pub mod report;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use relay_protocol::ToolResult;

use crate::client::{ClientError, ToolClient};
use crate::pipeline::agents::{
  DataCollectionAgent, ReportGenerationAgent, SentimentAggregationAgent,
};

/// Anything that can invoke a named tool. `ToolClient` is the production
/// implementation; tests inject scripted stubs.
#[async_trait]
pub trait ToolCaller: Send + Sync {
  async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolResult, ClientError>;
}

#[async_trait]
impl ToolCaller for ToolClient {
  async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolResult, ClientError> {
    ToolClient::call_tool(self, name, arguments).await
  }
}

/// Stage progress states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
  Success,
  Error,
}

/// Result of one pipeline stage. Exactly one of `data`/`error` is populated.
#[derive(Debug, Clone, Serialize)]
pub struct StageResult {
  pub agent: String,
  pub status: StageStatus,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub data: Option<Value>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl StageResult {
  pub fn success(agent: &str, data: Value) -> Self {
    Self {
      agent: agent.to_string(),
      status: StageStatus::Success,
      data: Some(data),
      error: None,
    }
  }

  pub fn error(agent: &str, message: impl Into<String>) -> Self {
    Self {
      agent: agent.to_string(),
      status: StageStatus::Error,
      data: None,
      error: Some(message.into()),
    }
  }

  pub fn is_success(&self) -> bool {
    self.status == StageStatus::Success
  }
}

/// Outcome of a full pipeline run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PipelineOutcome {
  Completed {
    collection: StageResult,
    analysis: StageResult,
    report: StageResult,
  },
  Failed {
    stage: String,
    detail: StageResult,
  },
}

impl PipelineOutcome {
  /// The rendered report text, when the run completed.
  pub fn report_text(&self) -> Option<&str> {
    match self {
      PipelineOutcome::Completed { report, .. } => report
        .data
        .as_ref()
        .and_then(|data| data.get("report"))
        .and_then(Value::as_str),
      PipelineOutcome::Failed { .. } => None,
    }
  }
}

/// Drives the three stages in order.
pub struct PipelineCoordinator {
  caller: Arc<dyn ToolCaller>,
}

impl PipelineCoordinator {
  /// The tool caller is injected so the coordinator never constructs its own
  /// connection.
  pub fn new(caller: Arc<dyn ToolCaller>) -> Self {
    Self { caller }
  }

  pub async fn run(&self, limit: usize) -> PipelineOutcome {
    info!("starting the analysis pipeline");

    let collection = DataCollectionAgent::process(self.caller.as_ref(), limit).await;
    if !collection.is_success() {
      warn!(stage = DataCollectionAgent::NAME, "pipeline aborted");
      return PipelineOutcome::Failed {
        stage: DataCollectionAgent::NAME.to_string(),
        detail: collection,
      };
    }
    let data = collection.data.clone().unwrap_or(Value::Null);

    let aggregation = match SentimentAggregationAgent::process(&data) {
      Ok(aggregation) => aggregation,
      Err(message) => {
        warn!(stage = SentimentAggregationAgent::NAME, "pipeline aborted");
        return PipelineOutcome::Failed {
          stage: SentimentAggregationAgent::NAME.to_string(),
          detail: StageResult::error(SentimentAggregationAgent::NAME, message),
        };
      }
    };
    let analysis = StageResult::success(
      SentimentAggregationAgent::NAME,
      serde_json::json!({
        "sentiment_distribution": &aggregation.distribution,
        "total_count": aggregation.total_count,
      }),
    );

    let report_text = ReportGenerationAgent::process(&aggregation);
    let report = StageResult::success(
      ReportGenerationAgent::NAME,
      serde_json::json!({ "report": report_text }),
    );

    info!("pipeline completed");
    PipelineOutcome::Completed {
      collection,
      analysis,
      report,
    }
  }
}
