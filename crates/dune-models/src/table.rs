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

//! Uploaded table models

use serde::{Deserialize, Serialize};

/// One column of a table schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
  pub name: String,

  /// Dune SQL type name, e.g. `varchar`, `double`, `timestamp`
  #[serde(rename = "type")]
  pub kind: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub nullable: Option<bool>,
}

impl TableColumn {
  pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
    Self { name: name.into(), kind: kind.into(), nullable: None }
  }

  pub fn nullable(mut self, nullable: bool) -> Self {
    self.nullable = Some(nullable);
    self
  }
}

/// Body of the create-table route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTableParams {
  /// Owning user or team handle
  pub namespace: String,
  pub table_name: String,
  pub schema: Vec<TableColumn>,

  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub description: String,

  #[serde(default)]
  pub is_private: bool,
}

/// Returned by the create-table route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTableResult {
  pub namespace: String,
  pub table_name: String,

  /// `dune.<namespace>.<table_name>`
  pub full_name: String,

  #[serde(default)]
  pub example_query: String,

  /// The table was already present and left untouched
  #[serde(default)]
  pub already_existed: bool,

  #[serde(default)]
  pub message: String,
}

/// Returned by the insert route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertTableResult {
  pub rows_written: u64,
  pub bytes_written: u64,
}

/// Body of the CSV upload route. The table schema is inferred from `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadCsvParams {
  pub table_name: String,

  /// CSV text including the header row
  pub data: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_private: Option<bool>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_create_table_params() {
    let params = CreateTableParams {
      namespace: "bh2smith".into(),
      table_name: "dataset_three_column_table".into(),
      schema: vec![TableColumn::new("date", "timestamp"), TableColumn::new("dgs10", "double").nullable(true)],
      description: String::new(),
      is_private: false,
    };

    assert_eq!(
      serde_json::to_value(&params).unwrap(),
      json!({
        "namespace": "bh2smith",
        "table_name": "dataset_three_column_table",
        "schema": [
          {"name": "date", "type": "timestamp"},
          {"name": "dgs10", "type": "double", "nullable": true}
        ],
        "is_private": false
      })
    );
  }

  #[test]
  fn test_insert_result() {
    let result: InsertTableResult =
      serde_json::from_value(json!({"rows_written": 1, "bytes_written": 33})).unwrap();
    assert_eq!(result, InsertTableResult { rows_written: 1, bytes_written: 33 });
  }
}
