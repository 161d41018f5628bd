// End-to-end frame loop tests: a real server connection loop and a real client
// talking over an in-process duplex pipe, no sockets involved

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use relay_config::Config;
use relay_core::client::{SamplingHandler, ToolClient};
use relay_core::pipeline::{PipelineCoordinator, PipelineOutcome, ToolCaller};
use relay_core::server::ToolServer;
use relay_core::tools::context::{ToolCallError, ToolContext, ToolInvocation};
use relay_core::tools::gateway::ToolGateway;
use relay_core::tools::handlers::register_builtin_tools;
use relay_core::tools::registry::{ToolHandler, ToolRegistry};
use relay_core::tools::spec::{JsonSchema, ToolSpec};
use relay_protocol::{ErrorKind, SampleRequest, SamplingMessage, SamplingParams};

/// Spawn a server frame loop over one end of a duplex pipe and hand back the
/// other end for a client.
fn spawn_server<F>(configure: F, timeout_secs: u64) -> tokio::io::DuplexStream
where
  F: FnOnce(&mut ToolRegistry),
{
  let (client_io, server_io) = tokio::io::duplex(1 << 16);

  let mut registry = ToolRegistry::new();
  register_builtin_tools(&mut registry);
  configure(&mut registry);
  let gateway = Arc::new(ToolGateway::new(Arc::new(registry)));

  let mut config = Config::default();
  config.sampling.timeout_secs = timeout_secs;
  let server = ToolServer::new(gateway, &config);

  tokio::spawn(async move { server.handle_connection(server_io).await });

  client_io
}

fn spawn_default_server() -> tokio::io::DuplexStream {
  spawn_server(|_| {}, 30)
}

struct FixedHandler(&'static str);

#[async_trait]
impl SamplingHandler for FixedHandler {
  async fn sample(
    &self,
    _messages: &[SamplingMessage],
    _params: &SamplingParams,
  ) -> anyhow::Result<String> {
    Ok(self.0.to_string())
  }
}

/// Prefixes the first message's text with `echo:`.
struct EchoHandler;

#[async_trait]
impl SamplingHandler for EchoHandler {
  async fn sample(
    &self,
    messages: &[SamplingMessage],
    _params: &SamplingParams,
  ) -> anyhow::Result<String> {
    let text = messages
      .first()
      .map(|m| m.content.to_text())
      .unwrap_or_default();
    Ok(format!("echo:{text}"))
  }
}

struct FailingHandler;

#[async_trait]
impl SamplingHandler for FailingHandler {
  async fn sample(
    &self,
    _messages: &[SamplingMessage],
    _params: &SamplingParams,
  ) -> anyhow::Result<String> {
    anyhow::bail!("no model configured")
  }
}

/// Never answers; lets the server-side timeout fire.
struct SilentHandler;

#[async_trait]
impl SamplingHandler for SilentHandler {
  async fn sample(
    &self,
    _messages: &[SamplingMessage],
    _params: &SamplingParams,
  ) -> anyhow::Result<String> {
    std::future::pending::<()>().await;
    unreachable!()
  }
}

/// Replies with a scripted sequence of answers, then `neutral`.
struct ScriptedHandler {
  answers: Mutex<VecDeque<&'static str>>,
}

impl ScriptedHandler {
  fn new(answers: &[&'static str]) -> Self {
    Self {
      answers: Mutex::new(answers.iter().copied().collect()),
    }
  }
}

#[async_trait]
impl SamplingHandler for ScriptedHandler {
  async fn sample(
    &self,
    _messages: &[SamplingMessage],
    _params: &SamplingParams,
  ) -> anyhow::Result<String> {
    let answer = self.answers.lock().await.pop_front().unwrap_or("neutral");
    Ok(answer.to_string())
  }
}

#[tokio::test]
async fn calculator_tools_answer_without_sampling() {
  let client = ToolClient::new(spawn_default_server(), Arc::new(FixedHandler("unused")));

  let result = client
    .call_tool("add", json!({ "a": 2, "b": 3 }))
    .await
    .expect("call completes");

  assert_eq!(result.payload(), Some(&json!(5.0)));
}

#[tokio::test]
async fn unknown_tool_yields_a_not_found_envelope() {
  let client = ToolClient::new(spawn_default_server(), Arc::new(FixedHandler("unused")));

  let result = client
    .call_tool("no_such_tool", json!({}))
    .await
    .expect("call completes");

  let error = result.error_envelope().expect("error envelope");
  assert_eq!(error.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn sentiment_tool_samples_through_the_client_handler() {
  let client = ToolClient::new(
    spawn_default_server(),
    Arc::new(FixedHandler("POSITIVE, definitely")),
  );

  let result = client
    .call_tool("analyze_sentiment", json!({ "text": "what a day" }))
    .await
    .expect("call completes");

  assert_eq!(
    result.payload(),
    Some(&json!({ "text": "what a day", "sentiment": "positive" }))
  );
}

/// Test tool that issues one sample round-trip and returns the raw text.
struct ProbeHandler;

#[async_trait]
impl ToolHandler for ProbeHandler {
  async fn handle(
    &self,
    _invocation: ToolInvocation,
    ctx: &ToolContext,
  ) -> Result<Value, ToolCallError> {
    let response = ctx.sample(SampleRequest::from_prompt("hi")).await?;
    Ok(json!({ "sample": response.text }))
  }
}

fn probe_spec() -> ToolSpec {
  ToolSpec::new("probe", "sample once and return the text", "test", JsonSchema::Object {
    properties: Default::default(),
    required: None,
  })
}

#[tokio::test]
async fn tool_body_observes_exactly_the_handler_text() {
  let io = spawn_server(
    |registry| registry.register_tool(probe_spec(), Arc::new(ProbeHandler)),
    30,
  );
  let client = ToolClient::new(io, Arc::new(EchoHandler));

  let result = client
    .call_tool("probe", json!({}))
    .await
    .expect("call completes");

  assert_eq!(result.payload(), Some(&json!({ "sample": "echo:hi" })));
}

#[tokio::test]
async fn handler_failure_becomes_a_sampling_failed_envelope() {
  let client = ToolClient::new(spawn_default_server(), Arc::new(FailingHandler));

  let result = client
    .call_tool("analyze_sentiment", json!({ "text": "anything" }))
    .await
    .expect("call completes");

  let error = result.error_envelope().expect("error envelope");
  assert_eq!(error.kind, ErrorKind::SamplingFailed);
  assert!(error.message.contains("no model configured"));
}

#[tokio::test(start_paused = true)]
async fn silent_handler_trips_the_sampling_timeout() {
  let io = spawn_server(|_| {}, 1);
  let client = ToolClient::new(io, Arc::new(SilentHandler));

  let result = client
    .call_tool("analyze_sentiment", json!({ "text": "anything" }))
    .await
    .expect("call completes");

  let error = result.error_envelope().expect("error envelope");
  assert_eq!(error.kind, ErrorKind::SamplingFailed);
}

#[tokio::test]
async fn pipeline_runs_end_to_end_over_the_wire() {
  let handler = ScriptedHandler::new(&[
    "positive",
    "negative",
    "positive",
    "positive",
    "neutral",
  ]);
  let client = Arc::new(ToolClient::new(spawn_default_server(), Arc::new(handler)));
  let coordinator = PipelineCoordinator::new(client as Arc<dyn ToolCaller>);

  let outcome = coordinator.run(5).await;

  let report = outcome.report_text().expect("completed run has a report");
  assert!(report.contains("Total posts: 5"));
  assert!(report.contains("  positive: 3 条 (60.0%)"));
  assert!(report.contains("  neutral: 1 条 (20.0%)"));
  assert!(report.contains("  negative: 1 条 (20.0%)"));
  assert!(report.contains("Dominant sentiment: positive"));

  let PipelineOutcome::Completed { collection, .. } = outcome else {
    panic!("expected a completed outcome");
  };
  let posts = collection.data.expect("collection data");
  assert_eq!(posts.as_array().expect("array payload").len(), 5);
}
