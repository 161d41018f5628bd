// Relay Configuration

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, ModelConfig, SamplingConfig, ServerConfig, TransportKind};
