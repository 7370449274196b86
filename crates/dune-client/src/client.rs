/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dune Analytics
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Client facade: endpoint groups and polling workflows

use crate::endpoints::{execution::ExecutionEndpoints, query::QueryEndpoints, table::TableEndpoints};
use crate::router::Router;
use dune_core::{Config, Error, Result};
use dune_models::{
  age_in_hours, CreateQueryParams, ExecutionParams, ExecutionResponseCsv, GetResultParams,
  GetStatusResponse, QueryParameter, ResultsResponse,
};
use std::sync::Arc;
use tokio::time::{sleep, Duration, Instant};
use tracing::{info, warn};

/// How often [`DuneClient::run_query`] polls the status route by default
pub const DEFAULT_PING_FREQUENCY: Duration = Duration::from_secs(1);

/// Name given to the throwaway query created by [`DuneClient::run_sql`]
pub const RUN_SQL_QUERY_NAME: &str = "API Query";

/// Main Dune API client
///
/// Provides access to all Dune API endpoints through organized endpoint groups
/// plus the polling workflows built on top of them.
///
/// # Examples
///
/// ```ignore
/// use dune_client::DuneClient;
/// use dune_core::Config;
/// use dune_models::ExecutionParams;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = DuneClient::new(Config::from_env()?)?;
///
///     let results = client
///         .run_query(1215383, &ExecutionParams::default(), DuneClient::default_ping())
///         .await?;
///     println!("{} rows", results.rows().len());
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DuneClient {
  router: Arc<Router>,
}

impl DuneClient {
  /// Create a new Dune API client
  ///
  /// # Errors
  ///
  /// Returns an error if the HTTP client cannot be created.
  pub fn new(config: Config) -> Result<Self> {
    Ok(Self { router: Arc::new(Router::new(&config)?) })
  }

  /// Create a client from `DUNE_API_KEY` and the other `DUNE_*` variables
  pub fn from_env() -> Result<Self> {
    Self::new(Config::from_env()?)
  }

  /// The shared request router, for routes without a typed wrapper
  pub fn router(&self) -> &Arc<Router> {
    &self.router
  }

  /// Default polling interval
  pub fn default_ping() -> Duration {
    DEFAULT_PING_FREQUENCY
  }

  /// Get access to execution endpoints
  pub fn execution(&self) -> ExecutionEndpoints {
    ExecutionEndpoints::new(self.router.clone())
  }

  /// Get access to saved query endpoints
  pub fn query(&self) -> QueryEndpoints {
    QueryEndpoints::new(self.router.clone())
  }

  /// Get access to table upload endpoints
  pub fn table(&self) -> TableEndpoints {
    TableEndpoints::new(self.router.clone())
  }

  /// Poll the status route until the execution reaches a terminal state
  ///
  /// # Arguments
  ///
  /// * `execution_id` - Execution to wait for
  /// * `ping_frequency` - Delay between status calls
  /// * `max_wait` - Give up with [`Error::Timeout`] after this long, `None` waits forever
  pub async fn wait_until_done(
    &self,
    execution_id: &str,
    ping_frequency: Duration,
    max_wait: Option<Duration>,
  ) -> Result<GetStatusResponse> {
    let started = Instant::now();
    let execution = self.execution();

    loop {
      let status = execution.get_execution_status(execution_id).await?;
      if status.state().is_terminal() {
        info!("execution {} finished with state {}", execution_id, status.state());
        return Ok(status);
      }

      if let Some(limit) = max_wait {
        if started.elapsed() >= limit {
          return Err(Error::Timeout(format!(
            "execution {} still {} after {}s",
            execution_id,
            status.state(),
            limit.as_secs()
          )));
        }
      }

      info!("waiting for execution {} (state {}), sleeping {}ms", execution_id, status.state(), ping_frequency.as_millis());
      sleep(ping_frequency).await;
    }
  }

  /// Execute a saved query, wait for it to finish and return every result row
  pub async fn run_query(
    &self,
    query_id: u64,
    params: &ExecutionParams,
    ping_frequency: Duration,
  ) -> Result<ResultsResponse> {
    let execution = self.execution();
    let submitted = execution.execute_query(query_id, params).await?;
    let status = self.wait_until_done(&submitted.execution_id, ping_frequency, None).await?;
    if !status.state().has_results() {
      warn!("execution {} ended in {}, result will be empty", submitted.execution_id, status.state());
    }

    let first_page = execution.get_execution_results(&submitted.execution_id, &GetResultParams::default()).await?;
    execution.fetch_entire_result(first_page).await
  }

  /// CSV counterpart of [`DuneClient::run_query`]
  pub async fn run_query_csv(
    &self,
    query_id: u64,
    params: &ExecutionParams,
    ping_frequency: Duration,
  ) -> Result<ExecutionResponseCsv> {
    let execution = self.execution();
    let submitted = execution.execute_query(query_id, params).await?;
    self.wait_until_done(&submitted.execution_id, ping_frequency, None).await?;

    let first_page = execution.get_result_csv(&submitted.execution_id, &GetResultParams::default()).await?;
    execution.fetch_entire_result_csv(first_page).await
  }

  /// Return the latest stored result of a query, re-running it when that result
  /// is older than `max_age_hours` or carries no end timestamp.
  pub async fn get_latest_result(
    &self,
    query_id: u64,
    parameters: Vec<QueryParameter>,
    max_age_hours: f64,
    ping_frequency: Duration,
  ) -> Result<ResultsResponse> {
    let execution = self.execution();
    let lookup = GetResultParams { query_parameters: parameters.clone(), ..Default::default() };
    let last = execution.get_last_execution_results(query_id, &lookup).await?;

    let fresh = last.info.execution_ended_at.map(|ended| age_in_hours(ended) <= max_age_hours).unwrap_or(false);
    if fresh {
      return execution.fetch_entire_result(last).await;
    }

    info!("stored result of query {} is stale, re-running", query_id);
    self.run_query(query_id, &ExecutionParams::with_parameters(parameters), ping_frequency).await
  }

  /// Run ad-hoc SQL through a temporary saved query
  ///
  /// The query is archived afterwards when `archive_after` is set, even if the run fails.
  pub async fn run_sql(
    &self,
    query_sql: &str,
    is_private: bool,
    archive_after: bool,
    params: &ExecutionParams,
    ping_frequency: Duration,
  ) -> Result<ResultsResponse> {
    let create = CreateQueryParams {
      is_private: Some(is_private),
      parameters: params.query_parameters.clone(),
      ..CreateQueryParams::new(RUN_SQL_QUERY_NAME, query_sql)
    };
    let query_id = self.query().create_query(&create).await?;

    let result = self.run_query(query_id, params, ping_frequency).await;

    if archive_after {
      if let Err(e) = self.query().archive_query(query_id).await {
        warn!("failed to archive temporary query {}: {}", query_id, e);
      }
    }

    result
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_client_creation() {
    let config = Config {
      api_key: "test_key".to_string(),
      api_version: "v1".to_string(),
      timeout_secs: 30,
      base_url: dune_core::DUNE_BASE_URL.to_string(),
    };

    let client = DuneClient::new(config).expect("Failed to create client");
    assert_eq!(client.router().api_version(), "v1");
    assert_eq!(client.router().timeout(), Duration::from_secs(30));
  }

  #[test]
  fn test_endpoint_groups_share_router() {
    let client = DuneClient::new(Config::default_with_key("test_key")).unwrap();
    let router = client.router().clone();
    assert_eq!(Arc::strong_count(&router), 2);

    let _execution = client.execution();
    assert_eq!(Arc::strong_count(&router), 3);
  }
}
