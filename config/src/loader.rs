// Configuration Loader

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::types::Config;

/// Configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("failed to read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

impl Config {
  /// Default location, `~/.relay/config.toml`.
  pub fn default_path() -> PathBuf {
    dirs::home_dir()
      .unwrap_or_else(|| PathBuf::from("."))
      .join(".relay")
      .join("config.toml")
  }

  /// Load configuration.
  ///
  /// An explicit path must exist and parse. Without one, the default location
  /// is used when present, otherwise built-in defaults apply.
  pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
      Some(path) => Self::load_file(path),
      None => {
        let path = Self::default_path();
        if path.exists() {
          Self::load_file(&path)
        } else {
          debug!("no configuration file, using defaults");
          Ok(Config::default())
        }
      }
    }
  }

  fn load_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
  }
}
