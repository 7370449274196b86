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
//! # dune-models
//!
//! Data models for Dune Analytics API requests and responses.
//!
//! This crate provides strongly-typed Rust structures for the payloads the
//! Dune API accepts and returns: query executions, their status and results,
//! query management and uploaded tables.
//!
//! ## Features
//!
//! - **Type Safety**: Execution states and parameters are enums, not strings
//! - **Serde Integration**: Built-in serialization/deserialization
//! - **Date Handling**: Timestamps are parsed into `chrono::DateTime<Utc>`
//!
//! ## Usage
//!
//! ```ignore
//! use dune_models::execution::ResultsResponse;
//!
//! let results: ResultsResponse = serde_json::from_str(&response_json)?;
//! for row in results.rows() {
//!     println!("{row:?}");
//! }
//! ```

#![warn(clippy::all)]

pub mod common;
pub mod execution;
pub mod params;
pub mod query;
pub mod table;

// Re-export common types for convenience
pub use common::*;

// Re-export all model types
pub use execution::*;
pub use params::*;
pub use query::*;
pub use table::*;
