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

use super::{parse_param, print_json};
use crate::config::Config;
use anyhow::Result;
use clap::Subcommand;
use dune_client::DuneClient;
use dune_models::{ExecutionParams, ExecutionPerformance, GetResultParams, QueryParameter};
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum ExecutionCommands {
  /// Start an execution of a saved query and print its id
  Execute {
    query_id: u64,

    /// Query parameter as NAME=VALUE, repeatable
    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<QueryParameter>,

    /// Run on the large performance tier
    #[arg(long)]
    large: bool,
  },

  /// Print the status of an execution
  Status { execution_id: String },

  /// Print one page of an execution's results
  Results {
    execution_id: String,

    #[arg(short, long)]
    limit: Option<u64>,

    #[arg(short, long)]
    offset: Option<u64>,

    /// Follow next_uri and print every row
    #[arg(long)]
    all: bool,
  },

  /// Print an execution's results as CSV
  Csv {
    execution_id: String,

    #[arg(short, long)]
    limit: Option<u64>,

    #[arg(short, long)]
    offset: Option<u64>,
  },

  /// Cancel a running execution
  Cancel { execution_id: String },

  /// Execute a saved query, wait for it and print all rows
  Run {
    query_id: u64,

    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<QueryParameter>,

    #[arg(long)]
    large: bool,

    /// Print CSV instead of JSON
    #[arg(long)]
    csv: bool,
  },

  /// Print the latest stored result, re-running the query when it is too old
  Latest {
    query_id: u64,

    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<QueryParameter>,

    /// Maximum acceptable age in hours
    #[arg(long, default_value = "24")]
    max_age_hours: f64,
  },
}

fn execution_params(params: Vec<QueryParameter>, large: bool) -> ExecutionParams {
  let exec = ExecutionParams::with_parameters(params);
  if large {
    exec.performance(ExecutionPerformance::Large)
  } else {
    exec
  }
}

pub async fn handle_execution(cmd: ExecutionCommands, config: Config) -> Result<()> {
  let client = DuneClient::new(config.api_config)?;
  let execution = client.execution();

  match cmd {
    ExecutionCommands::Execute { query_id, params, large } => {
      let response = execution.execute_query(query_id, &execution_params(params, large)).await?;
      info!("Started execution {} ({})", response.execution_id, response.state);
      print_json(&response)
    }
    ExecutionCommands::Status { execution_id } => {
      let status = execution.get_execution_status(&execution_id).await?;
      print_json(&status)
    }
    ExecutionCommands::Results { execution_id, limit, offset, all } => {
      let paging = GetResultParams { limit, offset, ..Default::default() };
      let mut results = execution.get_execution_results(&execution_id, &paging).await?;
      if all {
        results = execution.fetch_entire_result(results).await?;
      }
      print_json(&results)
    }
    ExecutionCommands::Csv { execution_id, limit, offset } => {
      let paging = GetResultParams { limit, offset, ..Default::default() };
      let csv = execution.get_result_csv(&execution_id, &paging).await?;
      print!("{}", csv.data);
      if let Some(next_offset) = csv.next_offset {
        info!("More rows available from offset {}", next_offset);
      }
      Ok(())
    }
    ExecutionCommands::Cancel { execution_id } => {
      let cancelled = execution.cancel_execution(&execution_id).await?;
      println!("{}", cancelled);
      Ok(())
    }
    ExecutionCommands::Run { query_id, params, large, csv } => {
      let exec = execution_params(params, large);
      if csv {
        let result = client.run_query_csv(query_id, &exec, config.ping_frequency).await?;
        print!("{}", result.data);
        Ok(())
      } else {
        let results = client.run_query(query_id, &exec, config.ping_frequency).await?;
        print_json(&results)
      }
    }
    ExecutionCommands::Latest { query_id, params, max_age_hours } => {
      let results = client.get_latest_result(query_id, params, max_age_hours, config.ping_frequency).await?;
      print_json(&results)
    }
  }
}
