//! Model layer error types

use thiserror::Error;

/// Model client errors
#[derive(Error, Debug)]
pub enum ModelError {
  /// Invalid request
  #[error("Invalid request: {0}")]
  InvalidRequest(String),

  /// Invalid response from the endpoint
  #[error("Invalid response: {0}")]
  InvalidResponse(String),

  /// Endpoint returned a non-success status
  #[error("Provider API error: {0}")]
  ApiError(String),

  /// Network error
  #[error("Network error: {0}")]
  NetworkError(#[from] reqwest::Error),

  /// JSON parse error
  #[error("JSON parse error: {0}")]
  JsonError(#[from] serde_json::Error),

  /// API key env var is not set
  #[error("Missing API key: {0} is not set")]
  MissingApiKey(String),

  /// Message role the endpoint cannot represent
  #[error("Unsupported message role: {0}")]
  UnsupportedRole(String),
}

/// Alias for Result<T, ModelError>
pub type Result<T> = std::result::Result<T, ModelError>;
