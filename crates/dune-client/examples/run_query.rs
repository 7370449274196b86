//! Run Query Example
//!
//! This example demonstrates how to use dune-client to:
//! - Execute a saved query with parameters and wait for it
//! - Page through JSON results
//! - Export the latest stored result as CSV
//! - Handle server-reported errors
//!
//! Requires `DUNE_API_KEY` in the environment or a `.env` file.

use dune_client::{DuneClient, Error};
use dune_core::Config;
use dune_models::{ExecutionParams, ExecutionPerformance, GetResultParams, QueryParameter};

const QUERY_ID: u64 = 1215383;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  // Initialize logging
  tracing_subscriber::fmt::init();

  let config = Config::from_env().map_err(|e| {
    eprintln!("Set DUNE_API_KEY to run this example");
    e
  })?;
  let client = DuneClient::new(config)?;

  let params = ExecutionParams::with_parameters(vec![
    QueryParameter::text("TextField", "Plain Text"),
    QueryParameter::number("NumberField", 3.1415926535),
    QueryParameter::date("DateField", "2022-05-04 00:00:00"),
    QueryParameter::enum_("ListField", "Option 1"),
  ])
  .performance(ExecutionPerformance::Medium);

  let results = client.run_query(QUERY_ID, &params, DuneClient::default_ping()).await?;
  println!("execution {} finished: {}", results.info.execution_id, results.info.state);
  for row in results.rows() {
    println!("  {}", serde_json::Value::Object(row.clone()));
  }

  // A single page of the same execution
  let page = client
    .execution()
    .get_execution_results(&results.info.execution_id, &GetResultParams::page(1, 0))
    .await?;
  println!("first page has {} rows, more pages: {}", page.rows().len(), !page.is_last_page());

  let csv = client.execution().get_last_result_csv(QUERY_ID, &GetResultParams::default()).await?;
  println!("latest result as CSV:\n{}", csv.data);

  match client.execution().get_execution_status("Wonky Job ID").await {
    Err(Error::Response(message)) => println!("server refused: {}", message),
    Err(other) => return Err(other.into()),
    Ok(status) => println!("unexpected status {}", status.state()),
  }

  Ok(())
}
