use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::tools::context::{ToolCallError, ToolContext, ToolInvocation};
use crate::tools::spec::ToolSpec;

/// A named, remotely invokable function.
#[async_trait]
pub trait ToolHandler: Send + Sync {
  async fn handle(
    &self,
    invocation: ToolInvocation,
    ctx: &ToolContext,
  ) -> Result<Value, ToolCallError>;
}

/// Process-wide tool table. Registration happens once, single-threaded, before
/// the server accepts connections; afterwards the registry is read-only behind
/// an `Arc` and concurrent reads need no locking.
#[derive(Default)]
pub struct ToolRegistry {
  specs: HashMap<String, ToolSpec>,
  handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a tool. Re-registering a name replaces the previous entry; the
  /// shadowing is logged so it is never silent.
  pub fn register_tool(&mut self, spec: ToolSpec, handler: Arc<dyn ToolHandler>) {
    let name = spec.name.clone();
    if self.specs.contains_key(&name) {
      warn!(tool = %name, "tool re-registered, previous handler shadowed");
    }
    self.specs.insert(name.clone(), spec);
    self.handlers.insert(name.clone(), handler);
    debug!(tool = %name, "registered tool");
  }

  pub fn resolve(&self, name: &str) -> Result<(&ToolSpec, &Arc<dyn ToolHandler>), ToolCallError> {
    match (self.specs.get(name), self.handlers.get(name)) {
      (Some(spec), Some(handler)) => Ok((spec, handler)),
      _ => Err(ToolCallError::NotFound(name.to_string())),
    }
  }

  pub fn get_spec(&self, name: &str) -> Option<&ToolSpec> {
    self.specs.get(name)
  }

  /// Snapshot of every registered spec. Iteration order is unspecified.
  pub fn list_specs(&self) -> Vec<ToolSpec> {
    self.specs.values().cloned().collect()
  }

  pub fn len(&self) -> usize {
    self.specs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.specs.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::tools::spec::{JsonSchema, ToolSpec};

  struct FixedHandler(&'static str);

  #[async_trait]
  impl ToolHandler for FixedHandler {
    async fn handle(
      &self,
      _invocation: ToolInvocation,
      _ctx: &ToolContext,
    ) -> Result<Value, ToolCallError> {
      Ok(json!(self.0))
    }
  }

  fn spec(name: &str) -> ToolSpec {
    ToolSpec::new(name, "test tool", "test", JsonSchema::Object {
      properties: Default::default(),
      required: None,
    })
  }

  #[tokio::test]
  async fn duplicate_registration_resolves_to_latest() {
    let mut registry = ToolRegistry::new();
    registry.register_tool(spec("probe"), Arc::new(FixedHandler("first")));
    registry.register_tool(spec("probe"), Arc::new(FixedHandler("second")));

    assert_eq!(registry.len(), 1);

    let (_, handler) = registry.resolve("probe").expect("registered");
    let invocation = ToolInvocation {
      id: "i".to_string(),
      name: "probe".to_string(),
      arguments: json!({}),
    };
    let result = handler
      .handle(invocation, &ToolContext::new())
      .await
      .expect("handler runs");

    assert_eq!(result, json!("second"));
  }

  #[test]
  fn resolve_unknown_is_not_found() {
    let registry = ToolRegistry::new();

    assert!(matches!(
      registry.resolve("missing"),
      Err(ToolCallError::NotFound(_))
    ));
  }
}
