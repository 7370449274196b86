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

use super::print_json;
use crate::config::Config;
use anyhow::Result;
use clap::{Args, Subcommand};
use dune_client::DuneClient;
use dune_models::{CreateQueryParams, UpdateQueryParams};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct QueryCommand {
  #[command(subcommand)]
  command: QuerySubcommands,
}

#[derive(Subcommand, Debug)]
enum QuerySubcommands {
  /// Print a saved query
  Read {
    query_id: u64,
  },

  /// Create a saved query from a SQL file
  Create {
    /// Display name
    #[arg(short, long)]
    name: String,

    /// File holding the SQL text
    sql_file: PathBuf,

    #[arg(long)]
    private: bool,
  },

  /// Replace the SQL of a saved query
  UpdateSql {
    query_id: u64,
    sql_file: PathBuf,
  },

  /// Archive a saved query
  Archive {
    query_id: u64,
  },

  /// Unarchive a saved query
  Unarchive {
    query_id: u64,
  },
}

pub async fn execute(cmd: QueryCommand, config: Config) -> Result<()> {
  let client = DuneClient::new(config.api_config)?;
  let queries = client.query();

  match cmd.command {
    QuerySubcommands::Read { query_id } => print_json(&queries.read_query(query_id).await?),
    QuerySubcommands::Create { name, sql_file, private } => {
      let sql = fs::read_to_string(&sql_file)?;
      let params = CreateQueryParams { is_private: Some(private), ..CreateQueryParams::new(name, sql) };
      println!("{}", queries.create_query(&params).await?);
      Ok(())
    }
    QuerySubcommands::UpdateSql { query_id, sql_file } => {
      let sql = fs::read_to_string(&sql_file)?;
      let params = UpdateQueryParams { query_sql: Some(sql), ..Default::default() };
      println!("{}", queries.update_query(query_id, &params).await?);
      Ok(())
    }
    QuerySubcommands::Archive { query_id } => {
      println!("{}", queries.archive_query(query_id).await?);
      Ok(())
    }
    QuerySubcommands::Unarchive { query_id } => {
      println!("{}", queries.unarchive_query(query_id).await?);
      Ok(())
    }
  }
}
