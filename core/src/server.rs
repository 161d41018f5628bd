// Tool Server
// Accepts connections and runs one frame loop per client

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use relay_config::Config;
use relay_protocol::{ClientFrame, ServerFrame};

use crate::sampling::{Sampler, SamplingBridge};
use crate::tools::context::ToolContext;
use crate::tools::gateway::ToolGateway;
use crate::transport::frame_pair;

pub struct ToolServer {
  gateway: Arc<ToolGateway>,
  sample_timeout: Duration,
}

impl ToolServer {
  pub fn new(gateway: Arc<ToolGateway>, config: &Config) -> Self {
    Self {
      gateway,
      sample_timeout: config.sampling.timeout(),
    }
  }

  /// Accept loop. Runs until the listener fails or the process stops.
  pub async fn serve(self: Arc<Self>, listener: TcpListener) -> std::io::Result<()> {
    info!(addr = %listener.local_addr()?, "tool server listening");
    loop {
      let (socket, peer) = listener.accept().await?;
      debug!(%peer, "client connected");
      let server = Arc::clone(&self);
      tokio::spawn(async move {
        server.handle_connection(socket).await;
        debug!(%peer, "client disconnected");
      });
    }
  }

  /// Frame loop for one connection. Also driven directly by in-process tests.
  pub async fn handle_connection<S>(&self, io: S)
  where
    S: AsyncRead + AsyncWrite + Send + 'static,
  {
    let (mut source, mut sink) = frame_pair(io);
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<ServerFrame>(64);

    let writer = tokio::spawn(async move {
      while let Some(frame) = outbound_rx.recv().await {
        if let Err(err) = sink.send(&frame).await {
          error!("failed to write frame: {err}");
          break;
        }
      }
    });

    let bridge = Arc::new(SamplingBridge::new(
      outbound_tx.clone(),
      self.sample_timeout,
    ));

    while let Some(frame) = source.next::<ClientFrame>().await {
      let frame = match frame {
        Ok(frame) => frame,
        Err(err) => {
          warn!("dropping malformed frame: {err}");
          continue;
        }
      };

      match frame {
        ClientFrame::ToolCall {
          id,
          name,
          arguments,
        } => {
          // Invocations run concurrently and independently; each one gets the
          // connection's sampling bridge through its context.
          let gateway = Arc::clone(&self.gateway);
          let ctx = ToolContext::with_sampler(Arc::clone(&bridge) as Arc<dyn Sampler>);
          let outbound = outbound_tx.clone();
          tokio::spawn(async move {
            let result = gateway.invoke(&name, arguments, &ctx).await;
            if outbound
              .send(ServerFrame::ToolResult { id, result })
              .await
              .is_err()
            {
              debug!("connection closed before result delivery");
            }
          });
        }
        ClientFrame::SampleResult { id, outcome } => bridge.resolve(&id, outcome).await,
      }
    }

    // Reader finished: the client is gone. Unpark any invocation still waiting
    // on a sample response.
    bridge.fail_pending().await;
    drop(outbound_tx);
    let _ = writer.await;
  }
}
