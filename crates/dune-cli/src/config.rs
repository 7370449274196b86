use anyhow::{Context, Result};
use dune_client::DEFAULT_PING_FREQUENCY;
use dune_core::Config as CoreConfig;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
  pub api_config: CoreConfig,
  pub ping_frequency: Duration,
}

impl Config {
  pub fn from_env() -> Result<Self> {
    let api_config = CoreConfig::from_env().context("DUNE_API_KEY environment variable not set or invalid")?;

    let ping_frequency = match env::var("DUNE_PING_FREQUENCY_MS") {
      Ok(ms) => Duration::from_millis(ms.parse().context("Invalid DUNE_PING_FREQUENCY_MS")?),
      Err(_) => DEFAULT_PING_FREQUENCY,
    };

    Ok(Self { api_config, ping_frequency })
  }
}
