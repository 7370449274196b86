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

//! Request parameter types
//!
//! Dune expects query parameters as a `name -> value` object in POST bodies
//! and as `params.<name>=value` pairs on GET routes. The helpers here
//! produce both shapes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Type tag of a query parameter as declared on the saved query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
  Text,
  Number,
  Date,
  Enum,
}

/// A named value substituted into a saved query before it runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParameter {
  /// Parameter name as written in the query (`{{name}}`)
  #[serde(rename = "key", alias = "name")]
  pub name: String,

  /// Declared type
  #[serde(rename = "type")]
  pub kind: ParameterType,

  /// Value, always transmitted as a string
  pub value: String,
}

impl QueryParameter {
  fn new(name: impl Into<String>, kind: ParameterType, value: impl Into<String>) -> Self {
    Self { name: name.into(), kind, value: value.into() }
  }

  pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self::new(name, ParameterType::Text, value)
  }

  pub fn number(name: impl Into<String>, value: impl fmt::Display) -> Self {
    Self::new(name, ParameterType::Number, value.to_string())
  }

  /// Dates are passed as `YYYY-MM-DD hh:mm:ss`
  pub fn date(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self::new(name, ParameterType::Date, value)
  }

  /// `enum` is reserved, hence the trailing underscore
  pub fn enum_(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self::new(name, ParameterType::Enum, value)
  }

  /// The `(params.<name>, value)` pair used on GET routes
  pub fn to_search_param(&self) -> (String, String) {
    (format!("params.{}", self.name), self.value.clone())
  }
}

/// Compute tier an execution runs on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPerformance {
  #[default]
  Medium,
  Large,
}

/// Body of an execute request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionParams {
  pub query_parameters: Vec<QueryParameter>,
  pub performance: Option<ExecutionPerformance>,
}

impl ExecutionParams {
  pub fn with_parameters(query_parameters: Vec<QueryParameter>) -> Self {
    Self { query_parameters, performance: None }
  }

  pub fn performance(mut self, performance: ExecutionPerformance) -> Self {
    self.performance = Some(performance);
    self
  }

  /// JSON body sent to the execute route
  pub fn to_payload(&self) -> Value {
    let mut body = Map::new();
    if !self.query_parameters.is_empty() {
      body.insert("query_parameters".to_string(), parameter_map(&self.query_parameters));
    }
    if let Some(performance) = self.performance {
      body.insert("performance".to_string(), json!(performance));
    }
    Value::Object(body)
  }
}

fn parameter_map(parameters: &[QueryParameter]) -> Value {
  let map: Map<String, Value> =
    parameters.iter().map(|p| (p.name.clone(), Value::String(p.value.clone()))).collect();
  Value::Object(map)
}

/// Paging, filtering and sampling options for the result routes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetResultParams {
  /// Maximum rows per page
  pub limit: Option<u64>,

  /// Rows to skip
  pub offset: Option<u64>,

  /// Only return these columns
  pub columns: Vec<String>,

  /// Uniformly sample this many rows. Cannot be combined with `limit`/`offset`.
  pub sample_count: Option<u64>,

  /// SQL-like `WHERE` expression applied server side
  pub filters: Option<String>,

  /// SQL-like `ORDER BY` expressions
  pub sort_by: Vec<String>,

  /// Return truncated results instead of an error when the result is too large
  pub allow_partial_results: Option<bool>,

  /// Only used by the last-result routes on saved queries
  pub query_parameters: Vec<QueryParameter>,
}

impl GetResultParams {
  pub fn page(limit: u64, offset: u64) -> Self {
    Self { limit: Some(limit), offset: Some(offset), ..Default::default() }
  }

  /// Flat object sent as the GET query string
  pub fn to_payload(&self) -> Value {
    let mut query = Map::new();
    if let Some(limit) = self.limit {
      query.insert("limit".to_string(), json!(limit));
    }
    if let Some(offset) = self.offset {
      query.insert("offset".to_string(), json!(offset));
    }
    if !self.columns.is_empty() {
      query.insert("columns".to_string(), json!(self.columns.join(",")));
    }
    if let Some(sample_count) = self.sample_count {
      query.insert("sample_count".to_string(), json!(sample_count));
    }
    if let Some(filters) = &self.filters {
      query.insert("filters".to_string(), json!(filters));
    }
    if !self.sort_by.is_empty() {
      query.insert("sort_by".to_string(), json!(self.sort_by.join(",")));
    }
    if let Some(allow) = self.allow_partial_results {
      query.insert("allow_partial_results".to_string(), json!(allow));
    }
    for parameter in &self.query_parameters {
      let (key, value) = parameter.to_search_param();
      query.insert(key, Value::String(value));
    }
    Value::Object(query)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_execution_payload() {
    let params = ExecutionParams::with_parameters(vec![
      QueryParameter::text("TextField", "Plain Text"),
      QueryParameter::number("NumberField", 3.1415926535),
      QueryParameter::date("DateField", "2022-05-04 00:00:00"),
      QueryParameter::enum_("ListField", "Option 1"),
    ])
    .performance(ExecutionPerformance::Large);

    assert_eq!(
      params.to_payload(),
      json!({
        "query_parameters": {
          "TextField": "Plain Text",
          "NumberField": "3.1415926535",
          "DateField": "2022-05-04 00:00:00",
          "ListField": "Option 1"
        },
        "performance": "large"
      })
    );
  }

  #[test]
  fn test_empty_execution_payload() {
    assert_eq!(ExecutionParams::default().to_payload(), json!({}));
  }

  #[test]
  fn test_result_params_payload() {
    let params = GetResultParams {
      columns: vec!["a".into(), "b".into()],
      query_parameters: vec![QueryParameter::text("TextField", "Plain Text")],
      ..GetResultParams::page(2, 1)
    };

    assert_eq!(
      params.to_payload(),
      json!({
        "limit": 2,
        "offset": 1,
        "columns": "a,b",
        "params.TextField": "Plain Text"
      })
    );
  }

  #[test]
  fn test_parameter_wire_shape() {
    let p: QueryParameter =
      serde_json::from_value(json!({"key": "limit", "type": "number", "value": "10"})).unwrap();
    assert_eq!(p, QueryParameter::number("limit", 10));
    assert_eq!(
      serde_json::to_value(QueryParameter::enum_("ListField", "Option 1")).unwrap(),
      json!({"key": "ListField", "type": "enum", "value": "Option 1"})
    );
  }
}
