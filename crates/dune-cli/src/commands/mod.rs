pub mod execution;
pub mod query;

use anyhow::{bail, Result};
use dune_models::QueryParameter;
use serde::Serialize;

/// Parse `NAME=VALUE` into a text query parameter
pub fn parse_param(raw: &str) -> Result<QueryParameter> {
  let Some((name, value)) = raw.split_once('=') else {
    bail!("expected NAME=VALUE, got '{}'", raw);
  };
  if name.is_empty() {
    bail!("parameter name is empty in '{}'", raw);
  }
  Ok(QueryParameter::text(name, value))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
