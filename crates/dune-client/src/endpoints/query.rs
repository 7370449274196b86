//! Saved query management endpoints

use super::{impl_endpoint_base, EndpointBase};
use crate::router::{Payload, Router};
use dune_core::Result;
use dune_models::{CreateQueryParams, DuneQuery, QueryIdResponse, UpdateQueryParams};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Endpoints for creating, reading, updating and archiving saved queries
pub struct QueryEndpoints {
  router: Arc<Router>,
}

impl_endpoint_base!(QueryEndpoints);

impl QueryEndpoints {
  /// Create a new query endpoints instance
  pub fn new(router: Arc<Router>) -> Self {
    Self { router }
  }

  /// Create a saved query and return its id
  #[instrument(skip(self, params), fields(name = %params.name))]
  pub async fn create_query(&self, params: &CreateQueryParams) -> Result<u64> {
    let payload = Payload::json(params)?;
    let response: QueryIdResponse = self.router().post("query", Some(&payload)).await?;
    Ok(response.query_id)
  }

  /// Read a saved query
  #[instrument(skip(self))]
  pub async fn read_query(&self, query_id: u64) -> Result<DuneQuery> {
    self.router().get(&format!("query/{}", query_id), None).await
  }

  /// Update the fields set in `params`. Nothing is sent when no field is set.
  #[instrument(skip(self, params))]
  pub async fn update_query(&self, query_id: u64, params: &UpdateQueryParams) -> Result<u64> {
    if params.is_empty() {
      warn!("update_query called with no proposed changes");
      return Ok(query_id);
    }

    let payload = Payload::json(params)?;
    let response: QueryIdResponse = self.router().patch(&format!("query/{}", query_id), Some(&payload)).await?;
    Ok(response.query_id)
  }

  /// Archive a query. Returns whether it is archived afterwards.
  pub async fn archive_query(&self, query_id: u64) -> Result<bool> {
    let query = self.change_query(query_id, "archive").await?;
    Ok(query.is_archived)
  }

  /// Unarchive a query. Returns whether it is active afterwards.
  pub async fn unarchive_query(&self, query_id: u64) -> Result<bool> {
    let query = self.change_query(query_id, "unarchive").await?;
    Ok(!query.is_archived)
  }

  /// Make a query private. Returns whether it is private afterwards.
  pub async fn make_private(&self, query_id: u64) -> Result<bool> {
    let query = self.change_query(query_id, "private").await?;
    Ok(query.is_private)
  }

  /// Make a query public. Returns whether it is public afterwards.
  pub async fn make_public(&self, query_id: u64) -> Result<bool> {
    let query = self.change_query(query_id, "unprivate").await?;
    Ok(!query.is_private)
  }

  /// POST a state change then read the query back
  #[instrument(skip(self))]
  async fn change_query(&self, query_id: u64, action: &str) -> Result<DuneQuery> {
    let response: QueryIdResponse = self.router().post(&format!("query/{}/{}", query_id, action), None).await?;
    self.read_query(response.query_id).await
  }
}
