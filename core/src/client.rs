// Tool Client
// Calls server tools and answers the server's sampling callbacks

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};
use uuid::Uuid;

use relay_protocol::{
  ClientFrame, SampleOutcome, SamplingMessage, SamplingParams, ServerFrame, ToolResult,
};

use crate::transport::frame_pair;

/// Client-side sampling capability: given a role-tagged conversation and
/// generation parameters, produce text. The server never learns which model,
/// if any, backs the implementation.
#[async_trait]
pub trait SamplingHandler: Send + Sync {
  async fn sample(
    &self,
    messages: &[SamplingMessage],
    params: &SamplingParams,
  ) -> anyhow::Result<String>;
}

/// Stand-in handler that does not call a model, it echoes the conversation
/// back. Useful for demos without credentials and for tests.
pub struct PlaceholderHandler;

#[async_trait]
impl SamplingHandler for PlaceholderHandler {
  async fn sample(
    &self,
    messages: &[SamplingMessage],
    _params: &SamplingParams,
  ) -> anyhow::Result<String> {
    let conversation: Vec<String> = messages
      .iter()
      .map(|m| format!("{}: {}", m.role.as_str(), m.content.to_text()))
      .collect();
    Ok(format!(
      "Response based on conversation: {}",
      conversation.join(" | ")
    ))
  }
}

/// Client-side failures.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
  #[error("connect failed: {0}")]
  Connect(#[source] std::io::Error),

  #[error("connection closed")]
  Closed,
}

type PendingCalls = Arc<Mutex<HashMap<String, oneshot::Sender<ToolResult>>>>;

/// Connection to a tool server.
///
/// Owns the frame loop for its connection: tool results are matched to pending
/// calls by id, and inbound sample requests are dispatched to the registered
/// sampling handler.
pub struct ToolClient {
  outbound: mpsc::Sender<ClientFrame>,
  pending: PendingCalls,
  _reader: JoinHandle<()>,
  _writer: JoinHandle<()>,
}

impl ToolClient {
  pub fn new<S>(io: S, handler: Arc<dyn SamplingHandler>) -> Self
  where
    S: AsyncRead + AsyncWrite + Send + 'static,
  {
    let (mut source, mut sink) = frame_pair(io);
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<ClientFrame>(64);
    let pending: PendingCalls = Arc::new(Mutex::new(HashMap::new()));

    let writer = tokio::spawn(async move {
      while let Some(frame) = outbound_rx.recv().await {
        if let Err(err) = sink.send(&frame).await {
          error!("failed to write frame: {err}");
          break;
        }
      }
    });

    let reader = {
      let pending = Arc::clone(&pending);
      let outbound = outbound_tx.clone();
      tokio::spawn(async move {
        while let Some(frame) = source.next::<ServerFrame>().await {
          match frame {
            Ok(ServerFrame::ToolResult { id, result }) => {
              match pending.lock().await.remove(&id) {
                Some(sender) => {
                  let _ = sender.send(result);
                }
                None => warn!(call_id = %id, "tool result without a pending call"),
              }
            }
            Ok(ServerFrame::SampleRequest { id, request }) => {
              let handler = Arc::clone(&handler);
              let outbound = outbound.clone();
              tokio::spawn(async move {
                let outcome = match handler.sample(&request.messages, &request.params).await {
                  Ok(text) => SampleOutcome::Completed { text },
                  Err(err) => SampleOutcome::Failed {
                    message: err.to_string(),
                  },
                };
                if outbound
                  .send(ClientFrame::SampleResult { id, outcome })
                  .await
                  .is_err()
                {
                  debug!("connection closed before sample delivery");
                }
              });
            }
            Err(err) => warn!("dropping malformed frame: {err}"),
          }
        }
        // Server side went away; dropping the senders unblocks every caller.
        pending.lock().await.clear();
      })
    };

    Self {
      outbound: outbound_tx,
      pending,
      _reader: reader,
      _writer: writer,
    }
  }

  pub async fn connect(addr: &str, handler: Arc<dyn SamplingHandler>) -> Result<Self, ClientError> {
    let socket = TcpStream::connect(addr).await.map_err(ClientError::Connect)?;
    Ok(Self::new(socket, handler))
  }

  /// Invoke a named tool and wait for its result envelope.
  pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolResult, ClientError> {
    let id = Uuid::new_v4().to_string();
    let (tx, rx) = oneshot::channel();
    self.pending.lock().await.insert(id.clone(), tx);

    let frame = ClientFrame::ToolCall {
      id: id.clone(),
      name: name.to_string(),
      arguments,
    };
    if self.outbound.send(frame).await.is_err() {
      self.pending.lock().await.remove(&id);
      return Err(ClientError::Closed);
    }

    rx.await.map_err(|_| ClientError::Closed)
  }
}
