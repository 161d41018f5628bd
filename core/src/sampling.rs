// Sampling Bridge
// Routes a tool invocation's sample request back to the connected client and
// parks the invocation until that client answers

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc, oneshot};
use tracing::warn;
use uuid::Uuid;

use relay_protocol::{SampleOutcome, SampleRequest, SampleResponse, ServerFrame};

/// Capability to run one sample round-trip.
///
/// Tool handlers only ever see this trait, which keeps them testable against a
/// stub instead of a live connection.
#[async_trait]
pub trait Sampler: Send + Sync {
  async fn sample(&self, request: SampleRequest) -> Result<SampleResponse, SamplingError>;
}

/// Sampling round-trip failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SamplingError {
  #[error("client disconnected before responding")]
  Disconnected,

  #[error("client did not respond within {0:?}")]
  TimedOut(Duration),

  #[error("client handler failed: {0}")]
  Rejected(String),
}

type PendingSample = oneshot::Sender<Result<SampleResponse, SamplingError>>;

/// Per-connection sampling channel.
///
/// Each request gets a fresh id and a parked oneshot; responses are matched by
/// id, so the protocol tolerates several outstanding requests even though the
/// demo tools issue them one at a time.
pub struct SamplingBridge {
  outbound: mpsc::Sender<ServerFrame>,
  pending: Mutex<HashMap<String, PendingSample>>,
  timeout: Duration,
}

impl SamplingBridge {
  pub fn new(outbound: mpsc::Sender<ServerFrame>, timeout: Duration) -> Self {
    Self {
      outbound,
      pending: Mutex::new(HashMap::new()),
      timeout,
    }
  }

  /// Complete the pending request matching `id`. Stray ids are dropped.
  pub async fn resolve(&self, id: &str, outcome: SampleOutcome) {
    let Some(sender) = self.pending.lock().await.remove(id) else {
      warn!(sample_id = %id, "sample response without a pending request");
      return;
    };
    let result = match outcome {
      SampleOutcome::Completed { text } => Ok(SampleResponse { text }),
      SampleOutcome::Failed { message } => Err(SamplingError::Rejected(message)),
    };
    // the invocation may have timed out in the meantime
    let _ = sender.send(result);
  }

  /// Fail every parked invocation. Called when the connection drops, so no
  /// tool body waits forever on a client that is gone.
  pub async fn fail_pending(&self) {
    let pending = std::mem::take(&mut *self.pending.lock().await);
    for (_, sender) in pending {
      let _ = sender.send(Err(SamplingError::Disconnected));
    }
  }
}

#[async_trait]
impl Sampler for SamplingBridge {
  async fn sample(&self, request: SampleRequest) -> Result<SampleResponse, SamplingError> {
    let id = Uuid::new_v4().to_string();
    let (tx, rx) = oneshot::channel();
    self.pending.lock().await.insert(id.clone(), tx);

    let frame = ServerFrame::SampleRequest {
      id: id.clone(),
      request,
    };
    if self.outbound.send(frame).await.is_err() {
      self.pending.lock().await.remove(&id);
      return Err(SamplingError::Disconnected);
    }

    match tokio::time::timeout(self.timeout, rx).await {
      Ok(Ok(result)) => result,
      // fail_pending dropped the sender
      Ok(Err(_)) => Err(SamplingError::Disconnected),
      Err(_) => {
        self.pending.lock().await.remove(&id);
        Err(SamplingError::TimedOut(self.timeout))
      }
    }
  }
}
