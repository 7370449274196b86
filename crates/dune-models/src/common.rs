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

//! Common types and helpers shared across Dune API responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single result row, keyed by column name
pub type Row = Map<String, Value>;

/// Acknowledgement returned by action routes (cancel, upload, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
  /// Whether the server accepted the action
  pub success: bool,

  /// Optional server message
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

/// Hours elapsed between `timestamp` and now
pub fn age_in_hours(timestamp: DateTime<Utc>) -> f64 {
  age_in_hours_at(timestamp, Utc::now())
}

/// Hours elapsed between `timestamp` and `now`. Negative if `timestamp` is in the future.
pub fn age_in_hours_at(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
  let millis = (now - timestamp).num_milliseconds() as f64;
  millis / (1000.0 * 60.0 * 60.0)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, TimeZone};

  #[test]
  fn test_age_in_hours() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let then = now - Duration::minutes(90);
    assert_eq!(age_in_hours_at(then, now), 1.5);
    assert_eq!(age_in_hours_at(now + Duration::hours(2), now), -2.0);
  }

  #[test]
  fn test_success_response() {
    let ok: SuccessResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
    assert!(ok.success);
    assert!(ok.message.is_none());
  }
}
