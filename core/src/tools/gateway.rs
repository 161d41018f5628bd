use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use relay_protocol::ToolResult;

use crate::tools::context::{ToolCallError, ToolContext, ToolInvocation};
use crate::tools::registry::ToolRegistry;
use crate::tools::spec::ToolSpec;
use crate::tools::validation::bind_arguments;

/// Single entry point remote callers use to execute a named tool.
pub struct ToolGateway {
  registry: Arc<ToolRegistry>,
}

impl ToolGateway {
  pub fn new(registry: Arc<ToolRegistry>) -> Self {
    Self { registry }
  }

  /// Execute `name` with `arguments`.
  ///
  /// Every failure mode becomes an error envelope; an invocation never
  /// propagates a fault to the connection loop.
  pub async fn invoke(&self, name: &str, arguments: Value, ctx: &ToolContext) -> ToolResult {
    match self.try_invoke(name, arguments, ctx).await {
      Ok(payload) => ToolResult::success(payload),
      Err(err) => {
        error!(tool = %name, kind = ?err.kind(), "tool invocation failed: {err}");
        ToolResult::error(err.kind(), err.to_string())
      }
    }
  }

  async fn try_invoke(
    &self,
    name: &str,
    arguments: Value,
    ctx: &ToolContext,
  ) -> Result<Value, ToolCallError> {
    let (spec, handler) = self.registry.resolve(name)?;
    bind_arguments(spec, &arguments)?;

    let invocation = ToolInvocation {
      id: Uuid::new_v4().to_string(),
      name: name.to_string(),
      arguments,
    };
    info!(tool = %name, id = %invocation.id, "invoking tool");

    let handler = Arc::clone(handler);
    match AssertUnwindSafe(handler.handle(invocation, ctx))
      .catch_unwind()
      .await
    {
      Ok(result) => result,
      Err(_) => Err(ToolCallError::Internal(format!("tool {name} panicked"))),
    }
  }

  pub fn list_available_tools(&self) -> Vec<ToolSpec> {
    self.registry.list_specs()
  }

  pub fn registry(&self) -> Arc<ToolRegistry> {
    Arc::clone(&self.registry)
  }
}

#[cfg(test)]
mod tests {
  use async_trait::async_trait;
  use serde_json::json;

  use super::*;
  use crate::tools::build_default_tools;
  use crate::tools::registry::ToolHandler;
  use crate::tools::spec::{JsonSchema, ToolSpec};
  use relay_protocol::ErrorKind;

  #[tokio::test]
  async fn add_returns_success_payload() {
    let (_registry, gateway) = build_default_tools();

    let result = gateway
      .invoke("add", json!({ "a": 2, "b": 3 }), &ToolContext::new())
      .await;

    assert_eq!(result.payload(), Some(&json!(5.0)));
  }

  #[tokio::test]
  async fn unknown_tool_is_a_not_found_envelope() {
    let (_registry, gateway) = build_default_tools();

    let result = gateway
      .invoke("no_such_tool", json!({}), &ToolContext::new())
      .await;

    let error = result.error_envelope().expect("error envelope");
    assert_eq!(error.kind, ErrorKind::NotFound);
  }

  #[tokio::test]
  async fn divide_by_zero_is_a_domain_envelope() {
    let (_registry, gateway) = build_default_tools();

    let result = gateway
      .invoke("divide", json!({ "a": 1, "b": 0 }), &ToolContext::new())
      .await;

    let error = result.error_envelope().expect("error envelope");
    assert_eq!(error.kind, ErrorKind::Domain);
    assert_eq!(error.message, "division by zero");
  }

  #[tokio::test]
  async fn argument_binding_failures_are_invalid_arguments() {
    let (_registry, gateway) = build_default_tools();

    let missing = gateway
      .invoke("add", json!({ "a": 1 }), &ToolContext::new())
      .await;
    let unknown = gateway
      .invoke("add", json!({ "a": 1, "b": 2, "c": 3 }), &ToolContext::new())
      .await;

    for result in [missing, unknown] {
      let error = result.error_envelope().expect("error envelope");
      assert_eq!(error.kind, ErrorKind::InvalidArguments);
    }
  }

  #[tokio::test]
  async fn sampling_tool_without_a_channel_fails_as_sampling_error() {
    let (_registry, gateway) = build_default_tools();

    let result = gateway
      .invoke(
        "analyze_sentiment",
        json!({ "text": "fine" }),
        &ToolContext::new(),
      )
      .await;

    let error = result.error_envelope().expect("error envelope");
    assert_eq!(error.kind, ErrorKind::SamplingFailed);
  }

  struct PanickingHandler;

  #[async_trait]
  impl ToolHandler for PanickingHandler {
    async fn handle(
      &self,
      _invocation: ToolInvocation,
      _ctx: &ToolContext,
    ) -> Result<Value, ToolCallError> {
      panic!("boom");
    }
  }

  #[tokio::test]
  async fn handler_panic_becomes_an_internal_envelope() {
    let mut registry = ToolRegistry::new();
    registry.register_tool(
      ToolSpec::new("explode", "test", "test", JsonSchema::Object {
        properties: Default::default(),
        required: None,
      }),
      Arc::new(PanickingHandler),
    );
    let gateway = ToolGateway::new(Arc::new(registry));

    let result = gateway.invoke("explode", json!({}), &ToolContext::new()).await;

    let error = result.error_envelope().expect("error envelope");
    assert_eq!(error.kind, ErrorKind::Internal);
  }
}
