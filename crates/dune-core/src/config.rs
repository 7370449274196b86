//! Configuration management for the Dune client

use crate::error::{Error, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;

/// Credentials and connection settings for a Dune client.
///
/// Handed to the client at construction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
  /// Dune API key, sent as `x-dune-api-key`
  pub api_key: String,

  /// API version segment of every route (`v1`)
  pub api_version: String,

  /// Base URL the version and route are appended to
  pub base_url: String,

  /// Request timeout in seconds
  pub timeout_secs: u64,
}

impl Config {
  /// Load configuration from environment variables
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let api_key = env::var("DUNE_API_KEY")
      .map_err(|_| Error::ApiKey("DUNE_API_KEY not set".to_string()))?;

    let api_version =
      env::var("DUNE_API_VERSION").unwrap_or_else(|_| crate::DEFAULT_API_VERSION.to_string());

    let base_url = env::var("DUNE_API_BASE_URL").unwrap_or_else(|_| crate::DUNE_BASE_URL.to_string());

    let timeout_secs = env::var("DUNE_TIMEOUT_SECS")
      .unwrap_or_else(|_| crate::DEFAULT_TIMEOUT_SECS.to_string())
      .parse()
      .map_err(|_| Error::Config("Invalid DUNE_TIMEOUT_SECS".to_string()))?;

    Ok(Config { api_key, api_version, base_url, timeout_secs })
  }

  /// Create a config with default values
  pub fn default_with_key(api_key: impl Into<String>) -> Self {
    Config {
      api_key: api_key.into(),
      api_version: crate::DEFAULT_API_VERSION.to_string(),
      base_url: crate::DUNE_BASE_URL.to_string(),
      timeout_secs: crate::DEFAULT_TIMEOUT_SECS,
    }
  }

  /// Use another API version segment, e.g. `v2`
  pub fn with_version(mut self, api_version: impl Into<String>) -> Self {
    self.api_version = api_version.into();
    self
  }

  /// Point the client at another host, e.g. a local mock server
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into().trim_end_matches('/').to_string();
    self
  }
}
