//! # dune-client
//!
//! A Dune Analytics API client for Rust.
//!
//! ## Features
//!
//! - **Clean API**: Simple, idiomatic Rust interface
//! - **Async/Await**: Built on tokio and reqwest
//! - **Type Safe**: Strongly typed requests and responses using dune-models
//! - **Configurable**: Environment-based configuration via dune-core
//! - **CSV Export**: Result pages as raw CSV with paging headers
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dune_client::DuneClient;
//! use dune_core::Config;
//! use dune_models::{ExecutionParams, GetResultParams, QueryParameter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DuneClient::new(Config::from_env()?)?;
//!
//!     // Start an execution and check on it
//!     let params = ExecutionParams::with_parameters(vec![QueryParameter::text("TextField", "Plain Text")]);
//!     let execution = client.execution().execute_query(1215383, &params).await?;
//!     let status = client.execution().get_execution_status(&execution.execution_id).await?;
//!     println!("state: {}", status.state());
//!
//!     // Latest stored result as CSV
//!     let csv = client.execution().get_last_result_csv(1215383, &GetResultParams::default()).await?;
//!     println!("{}", csv.data);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All methods return `Result<T, dune_core::Error>`. Anything that goes wrong
//! while talking to the API, whether the server reported an `error` field or
//! the request itself failed, surfaces as `Error::Response` whose message is
//! the server description or the underlying failure. The HTTP status alone
//! never raises.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod endpoints;
pub mod router;

// Re-export the main client and common types
pub use client::{DuneClient, DEFAULT_PING_FREQUENCY};
pub use dune_core::{Config, Error, Result};
pub use dune_models::*;
pub use router::{ContentType, Decoded, ErrorField, Payload, RequestMethod, Router};

// Re-export endpoint modules for direct access if needed
pub use endpoints::{execution::ExecutionEndpoints, query::QueryEndpoints, table::TableEndpoints};
