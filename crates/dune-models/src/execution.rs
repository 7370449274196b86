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

//! Execution lifecycle models: submission, status, results and CSV exports

use crate::common::Row;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-side state of a query execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionState {
  #[serde(rename = "QUERY_STATE_PENDING")]
  Pending,
  #[serde(rename = "QUERY_STATE_EXECUTING")]
  Executing,
  #[serde(rename = "QUERY_STATE_COMPLETED")]
  Completed,
  #[serde(rename = "QUERY_STATE_COMPLETED_PARTIAL")]
  CompletedPartial,
  #[serde(rename = "QUERY_STATE_FAILED")]
  Failed,
  #[serde(rename = "QUERY_STATE_CANCELLED")]
  Cancelled,
  #[serde(rename = "QUERY_STATE_EXPIRED")]
  Expired,
}

impl ExecutionState {
  /// No further state transitions will happen once this returns true
  pub fn is_terminal(&self) -> bool {
    !matches!(self, ExecutionState::Pending | ExecutionState::Executing)
  }

  /// Results can be fetched for this state
  pub fn has_results(&self) -> bool {
    matches!(self, ExecutionState::Completed | ExecutionState::CompletedPartial)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      ExecutionState::Pending => "QUERY_STATE_PENDING",
      ExecutionState::Executing => "QUERY_STATE_EXECUTING",
      ExecutionState::Completed => "QUERY_STATE_COMPLETED",
      ExecutionState::CompletedPartial => "QUERY_STATE_COMPLETED_PARTIAL",
      ExecutionState::Failed => "QUERY_STATE_FAILED",
      ExecutionState::Cancelled => "QUERY_STATE_CANCELLED",
      ExecutionState::Expired => "QUERY_STATE_EXPIRED",
    }
  }
}

impl fmt::Display for ExecutionState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Returned when an execution is submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResponse {
  /// Identifier used by every follow-up call
  pub execution_id: String,

  /// State at submission time, usually pending
  pub state: ExecutionState,
}

/// Failure details attached to a failed execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionError {
  /// Failure category, e.g. `FAILED_TYPE_EXECUTION_FAILED`
  #[serde(rename = "type")]
  pub kind: String,

  /// Human readable description
  #[serde(default)]
  pub message: Option<String>,

  /// Position of a SQL error, when the server provides one
  #[serde(default)]
  pub metadata: Option<serde_json::Value>,
}

/// Metadata describing a result set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
  /// Column names in result order
  #[serde(default)]
  pub column_names: Vec<String>,

  /// Column types in result order
  #[serde(default)]
  pub column_types: Vec<String>,

  /// Rows in this page
  #[serde(default)]
  pub row_count: u64,

  /// Bytes in this page
  #[serde(default)]
  pub result_set_bytes: u64,

  /// Rows in the whole result
  #[serde(default)]
  pub total_row_count: u64,

  /// Bytes in the whole result
  #[serde(default)]
  pub total_result_set_bytes: u64,

  /// Number of cells in this page
  #[serde(default)]
  pub datapoint_count: u64,

  /// Time spent queued
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pending_time_millis: Option<u64>,

  /// Time spent executing
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub execution_time_millis: Option<u64>,
}

/// Rows plus metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
  #[serde(default)]
  pub rows: Vec<Row>,

  #[serde(default)]
  pub metadata: ResultMetadata,
}

/// Timestamps and state shared by the status and results payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionInfo {
  pub execution_id: String,
  pub query_id: u64,
  pub state: ExecutionState,

  #[serde(default)]
  pub is_execution_finished: Option<bool>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub submitted_at: Option<DateTime<Utc>>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub expires_at: Option<DateTime<Utc>>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub execution_started_at: Option<DateTime<Utc>>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub execution_ended_at: Option<DateTime<Utc>>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cancelled_at: Option<DateTime<Utc>>,
}

/// Response of the execution status route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetStatusResponse {
  #[serde(flatten)]
  pub info: ExecutionInfo,

  /// Position in the queue while pending
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub queue_position: Option<u64>,

  /// Present once the execution has completed
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub result_metadata: Option<ResultMetadata>,
}

impl GetStatusResponse {
  pub fn state(&self) -> ExecutionState {
    self.info.state
  }
}

/// Response of the JSON result routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsResponse {
  #[serde(flatten)]
  pub info: ExecutionInfo,

  /// Absent until the execution has completed
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub result: Option<ExecutionResult>,

  /// Absolute URL of the next page
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub next_uri: Option<String>,

  /// Row offset of the next page
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub next_offset: Option<u64>,
}

impl ResultsResponse {
  /// Rows of this page, empty when no result is attached
  pub fn rows(&self) -> &[Row] {
    self.result.as_ref().map(|r| r.rows.as_slice()).unwrap_or(&[])
  }

  /// True when no further page exists
  pub fn is_last_page(&self) -> bool {
    self.next_uri.is_none()
  }

  /// Merge the next page into this one, taking over its paging cursor
  pub fn append_page(&mut self, page: ResultsResponse) {
    self.next_uri = page.next_uri;
    self.next_offset = page.next_offset;

    let Some(incoming) = page.result else {
      return;
    };
    match self.result.as_mut() {
      Some(current) => {
        current.metadata.row_count += incoming.metadata.row_count;
        current.metadata.result_set_bytes += incoming.metadata.result_set_bytes;
        current.metadata.datapoint_count += incoming.metadata.datapoint_count;
        current.rows.extend(incoming.rows);
      }
      None => self.result = Some(incoming),
    }
  }
}

/// CSV export of a result page together with its paging cursor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResponseCsv {
  /// Raw CSV text including the header row
  pub data: String,

  /// Absolute URL of the next page (`x-dune-next-uri`)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub next_uri: Option<String>,

  /// Row offset of the next page (`x-dune-next-offset`)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub next_offset: Option<u64>,
}

impl ExecutionResponseCsv {
  /// Merge the next page. Its header row is dropped.
  pub fn append_page(&mut self, page: ExecutionResponseCsv) {
    let body = match page.data.split_once('\n') {
      Some((_, rest)) => rest,
      None => "",
    };
    if !self.data.is_empty() && !self.data.ends_with('\n') {
      self.data.push('\n');
    }
    self.data.push_str(body);
    self.next_uri = page.next_uri;
    self.next_offset = page.next_offset;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_cancelled_results_payload() {
    let payload = json!({
      "execution_id": "01GEHEC1W8P1V5ENF66R2WY54V",
      "query_id": 1229120,
      "state": "QUERY_STATE_CANCELLED",
      "is_execution_finished": true,
      "submitted_at": "2022-10-04T12:08:47.753527Z",
      "expires_at": "2024-10-03T12:08:48.790332Z",
      "execution_started_at": "2022-10-04T12:08:47.756608607Z",
      "cancelled_at": "2022-10-04T12:08:48.790331383Z",
      "execution_ended_at": "2022-10-04T12:08:48.790331383Z"
    });

    let results: ResultsResponse = serde_json::from_value(payload).unwrap();
    assert_eq!(results.info.state, ExecutionState::Cancelled);
    assert_eq!(results.info.query_id, 1229120);
    assert!(results.info.cancelled_at.is_some());
    assert!(results.rows().is_empty());
    assert!(results.is_last_page());
  }

  #[test]
  fn test_state_terminal() {
    assert!(!ExecutionState::Pending.is_terminal());
    assert!(!ExecutionState::Executing.is_terminal());
    assert!(ExecutionState::Completed.is_terminal());
    assert!(ExecutionState::Failed.is_terminal());
    assert!(ExecutionState::CompletedPartial.has_results());
    assert!(!ExecutionState::Cancelled.has_results());
    assert_eq!(ExecutionState::Expired.to_string(), "QUERY_STATE_EXPIRED");
  }

  #[test]
  fn test_append_page() {
    let first: ResultsResponse = serde_json::from_value(json!({
      "execution_id": "e", "query_id": 1, "state": "QUERY_STATE_COMPLETED",
      "result": {"rows": [{"number": 1}], "metadata": {"column_names": ["number"], "row_count": 1, "total_row_count": 2}},
      "next_uri": "https://api.dune.com/api/v1/execution/e/results?offset=1&limit=1",
      "next_offset": 1
    }))
    .unwrap();
    let second: ResultsResponse = serde_json::from_value(json!({
      "execution_id": "e", "query_id": 1, "state": "QUERY_STATE_COMPLETED",
      "result": {"rows": [{"number": 2}], "metadata": {"column_names": ["number"], "row_count": 1, "total_row_count": 2}}
    }))
    .unwrap();

    let mut merged = first;
    merged.append_page(second);
    assert_eq!(merged.rows().len(), 2);
    assert_eq!(merged.rows()[1]["number"], json!(2));
    assert_eq!(merged.result.as_ref().unwrap().metadata.row_count, 2);
    assert!(merged.is_last_page());
    assert_eq!(merged.next_offset, None);
  }

  #[test]
  fn test_csv_append_drops_header() {
    let mut csv = ExecutionResponseCsv {
      data: "number\n2\n".to_string(),
      next_uri: Some("next".to_string()),
      next_offset: Some(1),
    };
    csv.append_page(ExecutionResponseCsv { data: "number\n3\n".to_string(), next_uri: None, next_offset: None });
    assert_eq!(csv.data, "number\n2\n3\n");
    assert!(csv.next_uri.is_none());
  }
}
