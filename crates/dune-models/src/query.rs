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

//! Saved query management models

use crate::params::QueryParameter;
use serde::{Deserialize, Serialize};

/// Body of the create-query route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateQueryParams {
  /// Display name
  pub name: String,

  /// SQL text
  pub query_sql: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub parameters: Vec<QueryParameter>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_private: Option<bool>,
}

impl CreateQueryParams {
  pub fn new(name: impl Into<String>, query_sql: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      query_sql: query_sql.into(),
      description: None,
      parameters: Vec::new(),
      is_private: None,
    }
  }
}

/// Body of the update-query route. Only fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateQueryParams {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub query_sql: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub parameters: Option<Vec<QueryParameter>>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tags: Option<Vec<String>>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_private: Option<bool>,
}

impl UpdateQueryParams {
  /// True when no field would be sent
  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }
}

/// Returned by the create, update and archive routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryIdResponse {
  pub query_id: u64,
}

/// A saved query as returned by the read route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuneQuery {
  pub query_id: u64,
  pub name: String,

  #[serde(default)]
  pub description: String,

  #[serde(default)]
  pub tags: Vec<String>,

  #[serde(default)]
  pub version: u64,

  #[serde(default)]
  pub parameters: Vec<QueryParameter>,

  /// Engine the query runs on (`v2 Dune SQL`)
  #[serde(default)]
  pub query_engine: String,

  pub query_sql: String,

  #[serde(default)]
  pub is_private: bool,

  #[serde(default)]
  pub is_archived: bool,

  #[serde(default)]
  pub is_unsaved: bool,

  /// Handle of the owning user or team
  #[serde(default)]
  pub owner: String,
}
