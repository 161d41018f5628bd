// Configuration Types
// All configuration type definitions

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Server bind settings
  pub server: ServerConfig,
  /// Sampling round-trip settings
  pub sampling: SamplingConfig,
  /// Client-side model settings
  pub model: ModelConfig,
}

/// Server bind settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  /// Service name, used in logs
  pub name: String,
  /// Bind host
  pub host: String,
  /// Bind port
  pub port: u16,
  /// Transport kind
  pub transport: TransportKind,
}

impl ServerConfig {
  pub fn addr(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      name: "relay-sampling-server".to_string(),
      host: "127.0.0.1".to_string(),
      port: 8001,
      transport: TransportKind::Tcp,
    }
  }
}

/// Transport kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
  #[default]
  Tcp,
}

/// Sampling round-trip settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
  /// How long a suspended invocation waits for the client's answer
  pub timeout_secs: u64,
}

impl SamplingConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

impl Default for SamplingConfig {
  fn default() -> Self {
    Self { timeout_secs: 30 }
  }
}

/// Client-side model settings
///
/// Only the client half of the demo talks to a hosted model; the server never
/// holds these credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
  /// OpenAI-compatible base URL
  pub base_url: String,
  /// Model identifier
  pub model: String,
  /// Environment variable the API key is read from
  pub api_key_env: String,
}

impl ModelConfig {
  pub fn api_key(&self) -> Option<String> {
    std::env::var(&self.api_key_env).ok()
  }
}

impl Default for ModelConfig {
  fn default() -> Self {
    Self {
      base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string(),
      model: "qwen-max".to_string(),
      api_key_env: "DASHSCOPE_API_KEY".to_string(),
    }
  }
}
