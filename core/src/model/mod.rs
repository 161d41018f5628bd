//! Client-side model integration
//!
//! Lives entirely on the client half of the sampling protocol; the server and
//! its tools never talk to a hosted model directly.

pub mod client;
pub mod error;
pub mod handler;
pub mod types;

pub use client::ChatClient;
pub use error::{ModelError, Result};
pub use handler::ModelSamplingHandler;
pub use types::{ChatMessage, ChatRequest, ChatResponse};
