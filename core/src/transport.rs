// Transport
// Newline-delimited JSON frames over any async byte stream. TCP in the binary,
// an in-process duplex pipe in tests; the frame loop never knows which.

use futures::{SinkExt, StreamExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};

/// Transport failures.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
  #[error("framing error: {0}")]
  Codec(#[from] LinesCodecError),

  #[error("malformed frame: {0}")]
  Json(#[from] serde_json::Error),
}

/// Reading half of a framed connection.
pub struct FrameSource<S> {
  inner: FramedRead<ReadHalf<S>, LinesCodec>,
}

impl<S: AsyncRead> FrameSource<S> {
  /// Next frame, or `None` once the peer closes the stream.
  pub async fn next<T: DeserializeOwned>(&mut self) -> Option<Result<T, TransportError>> {
    match self.inner.next().await? {
      Ok(line) => Some(serde_json::from_str(&line).map_err(TransportError::from)),
      Err(err) => Some(Err(TransportError::from(err))),
    }
  }
}

/// Writing half of a framed connection.
pub struct FrameSink<S> {
  inner: FramedWrite<WriteHalf<S>, LinesCodec>,
}

impl<S: AsyncWrite> FrameSink<S> {
  pub async fn send<T: Serialize>(&mut self, frame: &T) -> Result<(), TransportError> {
    let line = serde_json::to_string(frame)?;
    self.inner.send(line).await?;
    Ok(())
  }
}

/// Split a byte stream into its framed halves.
pub fn frame_pair<S>(io: S) -> (FrameSource<S>, FrameSink<S>)
where
  S: AsyncRead + AsyncWrite,
{
  let (reader, writer) = tokio::io::split(io);
  (
    FrameSource {
      inner: FramedRead::new(reader, LinesCodec::new()),
    },
    FrameSink {
      inner: FramedWrite::new(writer, LinesCodec::new()),
    },
  )
}
