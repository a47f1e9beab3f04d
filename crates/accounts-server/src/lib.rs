//! Runtime wiring for the accounts server binary.
//!
//! Configuration is deserialised from `config.toml` layered with
//! `ACCOUNTS_*` environment variables; every key has a default so the server
//! starts with no file at all.

use std::path::{Path, PathBuf};

use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "0.0.0.0".to_string(),
      port:       8080,
      store_path: PathBuf::from("accounts.db"),
    }
  }
}

impl ServerConfig {
  /// Load from an optional TOML file, then override with `ACCOUNTS_*`
  /// environment variables.
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("ACCOUNTS"))
      .build()?
      .try_deserialize()
  }

  /// `host:port`, ready for a listener.
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Mount the JSON API under `/api` with request tracing.
pub fn app(api: Router) -> Router {
  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
