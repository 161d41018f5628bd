// Relay Protocol Layer
// Two message kinds per direction: tool calls flow caller to server, sample
// requests flow server to caller nested inside the handling of a tool call

pub mod sampling;
pub mod wire;

pub use sampling::{
  MessageContent, Role, SampleOutcome, SampleRequest, SampleResponse, SamplingMessage,
  SamplingParams,
};
pub use wire::{ClientFrame, ErrorEnvelope, ErrorKind, ServerFrame, ToolResult};
