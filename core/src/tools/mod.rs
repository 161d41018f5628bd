pub mod context;
pub mod gateway;
pub mod handlers;
pub mod registry;
pub mod spec;
pub mod validation;

use std::sync::Arc;

use crate::tools::gateway::ToolGateway;
use crate::tools::registry::ToolRegistry;

/// Build the default registry and gateway.
///
/// Registration runs here, single-threaded, before any connection is accepted,
/// which is what lets the registry stay lock-free afterwards.
pub fn build_default_tools() -> (Arc<ToolRegistry>, Arc<ToolGateway>) {
  let mut registry = ToolRegistry::new();
  handlers::register_builtin_tools(&mut registry);

  let registry = Arc::new(registry);
  let gateway = Arc::new(ToolGateway::new(Arc::clone(&registry)));

  (registry, gateway)
}
