//! Query execution endpoints
//!
//! This module covers the execution lifecycle:
//! - Submitting a saved query for execution
//! - Polling execution status
//! - Fetching JSON results page by page or in full
//! - Exporting results as CSV
//! - Cancelling a running execution
//! - Reading the latest stored result of a saved query

use super::{impl_endpoint_base, EndpointBase};
use crate::router::{Payload, Router};
use dune_core::Result;
use dune_models::{
  ExecutionParams, ExecutionResponse, ExecutionResponseCsv, GetResultParams, GetStatusResponse,
  ResultsResponse, SuccessResponse,
};
use reqwest::Response;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Header carrying the absolute URL of the next CSV page
pub const NEXT_URI_HEADER: &str = "x-dune-next-uri";

/// Header carrying the row offset of the next CSV page
pub const NEXT_OFFSET_HEADER: &str = "x-dune-next-offset";

/// Execution endpoints for running saved queries and retrieving their results
pub struct ExecutionEndpoints {
  router: Arc<Router>,
}

impl_endpoint_base!(ExecutionEndpoints);

impl ExecutionEndpoints {
  /// Create a new execution endpoints instance
  pub fn new(router: Arc<Router>) -> Self {
    Self { router }
  }

  /// Submit a saved query for execution
  ///
  /// # Arguments
  ///
  /// * `query_id` - Identifier of the saved query
  /// * `params` - Query parameters and performance tier
  ///
  /// # Examples
  ///
  /// ```ignore
  /// let params = ExecutionParams::with_parameters(vec![QueryParameter::text("TextField", "Plain Text")]);
  /// let execution = client.execution().execute_query(1215383, &params).await?;
  /// println!("started {}", execution.execution_id);
  /// ```
  #[instrument(skip(self, params))]
  pub async fn execute_query(&self, query_id: u64, params: &ExecutionParams) -> Result<ExecutionResponse> {
    let payload = Payload::Json(params.to_payload());
    self.router().post(&format!("query/{}/execute", query_id), Some(&payload)).await
  }

  /// Get the current status of an execution
  #[instrument(skip(self))]
  pub async fn get_execution_status(&self, execution_id: &str) -> Result<GetStatusResponse> {
    self.router().get(&format!("execution/{}/status", execution_id), None).await
  }

  /// Get one page of an execution's JSON results
  ///
  /// Use [`ExecutionEndpoints::fetch_entire_result`] to follow the remaining pages.
  #[instrument(skip(self, params))]
  pub async fn get_execution_results(
    &self,
    execution_id: &str,
    params: &GetResultParams,
  ) -> Result<ResultsResponse> {
    let payload = Payload::Json(params.to_payload());
    self.router().get(&format!("execution/{}/results", execution_id), Some(&payload)).await
  }

  /// Get one page of an execution's results as CSV
  #[instrument(skip(self, params))]
  pub async fn get_result_csv(&self, execution_id: &str, params: &GetResultParams) -> Result<ExecutionResponseCsv> {
    let payload = Payload::Json(params.to_payload());
    let response = self.router().get_raw(&format!("execution/{}/results/csv", execution_id), Some(&payload)).await?;
    self.read_csv(response).await
  }

  /// Cancel a running execution. Returns whether the server accepted the cancellation.
  #[instrument(skip(self))]
  pub async fn cancel_execution(&self, execution_id: &str) -> Result<bool> {
    let response: SuccessResponse = self.router().post(&format!("execution/{}/cancel", execution_id), None).await?;
    Ok(response.success)
  }

  /// Get one page of the latest stored result of a saved query without executing it
  #[instrument(skip(self, params))]
  pub async fn get_last_execution_results(&self, query_id: u64, params: &GetResultParams) -> Result<ResultsResponse> {
    let payload = Payload::Json(params.to_payload());
    self.router().get(&format!("query/{}/results", query_id), Some(&payload)).await
  }

  /// CSV counterpart of [`ExecutionEndpoints::get_last_execution_results`]
  #[instrument(skip(self, params))]
  pub async fn get_last_result_csv(&self, query_id: u64, params: &GetResultParams) -> Result<ExecutionResponseCsv> {
    let payload = Payload::Json(params.to_payload());
    let response = self.router().get_raw(&format!("query/{}/results/csv", query_id), Some(&payload)).await?;
    self.read_csv(response).await
  }

  /// Follow `next_uri` links until the last page and merge all rows into `results`
  pub async fn fetch_entire_result(&self, mut results: ResultsResponse) -> Result<ResultsResponse> {
    while let Some(next_uri) = results.next_uri.clone() {
      debug!("fetching next result page {}", next_uri);
      let page: ResultsResponse = self.router().get_by_url(&next_uri, None).await?;
      results.append_page(page);
    }
    Ok(results)
  }

  /// Follow `x-dune-next-uri` links until the last page and concatenate the CSV
  pub async fn fetch_entire_result_csv(&self, mut results: ExecutionResponseCsv) -> Result<ExecutionResponseCsv> {
    while let Some(next_uri) = results.next_uri.clone() {
      debug!("fetching next CSV page {}", next_uri);
      let response = self.router().get_raw_by_url(&next_uri, None).await?;
      let page = self.read_csv(response).await?;
      results.append_page(page);
    }
    Ok(results)
  }

  async fn read_csv(&self, response: Response) -> Result<ExecutionResponseCsv> {
    let headers = response.headers();
    let next_uri = headers.get(NEXT_URI_HEADER).and_then(|v| v.to_str().ok()).map(str::to_string);
    let next_offset = headers.get(NEXT_OFFSET_HEADER).and_then(|v| v.to_str().ok()).and_then(|v| v.parse().ok());

    let data = self.router().handle_text_response(response).await?;
    Ok(ExecutionResponseCsv { data, next_uri, next_offset })
  }
}
