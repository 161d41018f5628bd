use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use relay_protocol::{ErrorKind, SampleRequest, SampleResponse};

use crate::sampling::Sampler;

/// Invocation payload passed to a tool handler.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
  pub id: String,
  pub name: String,
  pub arguments: Value,
}

impl ToolInvocation {
  pub fn parse_arguments<T: DeserializeOwned>(&self) -> Result<T, ToolCallError> {
    serde_json::from_value(self.arguments.clone()).map_err(|e| {
      ToolCallError::InvalidArguments(format!("invalid arguments for {}: {e}", self.name))
    })
  }
}

/// Per-invocation runtime context.
///
/// Carries the sampling channel when the invocation originates from a
/// connected client. A context without one fails any `sample` call, which the
/// gateway surfaces as a sampling error envelope.
#[derive(Clone, Default)]
pub struct ToolContext {
  sampler: Option<Arc<dyn Sampler>>,
}

impl ToolContext {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_sampler(sampler: Arc<dyn Sampler>) -> Self {
    Self {
      sampler: Some(sampler),
    }
  }

  /// Issue one sampling round-trip and suspend until the client answers.
  pub async fn sample(&self, request: SampleRequest) -> Result<SampleResponse, ToolCallError> {
    let sampler = self.sampler.as_ref().ok_or_else(|| {
      ToolCallError::SamplingFailed("no sampling channel for this invocation".to_string())
    })?;
    sampler
      .sample(request)
      .await
      .map_err(|e| ToolCallError::SamplingFailed(e.to_string()))
  }
}

/// Tool invocation failures, mapped onto wire error kinds at the gateway.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ToolCallError {
  #[error("unknown tool: {0}")]
  NotFound(String),

  #[error("{0}")]
  InvalidArguments(String),

  #[error("sampling failed: {0}")]
  SamplingFailed(String),

  #[error("{0}")]
  Domain(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ToolCallError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      ToolCallError::NotFound(_) => ErrorKind::NotFound,
      ToolCallError::InvalidArguments(_) => ErrorKind::InvalidArguments,
      ToolCallError::SamplingFailed(_) => ErrorKind::SamplingFailed,
      ToolCallError::Domain(_) => ErrorKind::Domain,
      ToolCallError::Internal(_) => ErrorKind::Internal,
    }
  }
}
