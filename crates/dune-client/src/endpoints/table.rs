//! Uploaded table endpoints

use super::{impl_endpoint_base, EndpointBase};
use crate::router::{ContentType, Payload, Router};
use dune_core::{Error, Result};
use dune_models::{CreateTableParams, CreateTableResult, InsertTableResult, SuccessResponse, UploadCsvParams};
use std::sync::Arc;
use tracing::instrument;

/// Endpoints for uploading data into Dune tables
pub struct TableEndpoints {
  router: Arc<Router>,
}

impl_endpoint_base!(TableEndpoints);

impl TableEndpoints {
  /// Create a new table endpoints instance
  pub fn new(router: Arc<Router>) -> Self {
    Self { router }
  }

  /// Upload a CSV as a new table, schema inferred by the server
  #[instrument(skip(self, params), fields(table_name = %params.table_name))]
  pub async fn upload_csv(&self, params: &UploadCsvParams) -> Result<bool> {
    let payload = Payload::json(params)?;
    let response: SuccessResponse = self.router().post("table/upload/csv", Some(&payload)).await?;
    Ok(response.success)
  }

  /// Create an empty table with an explicit schema
  #[instrument(skip(self, params), fields(table_name = %params.table_name))]
  pub async fn create(&self, params: &CreateTableParams) -> Result<CreateTableResult> {
    let payload = Payload::json(params)?;
    self.router().post("table/create", Some(&payload)).await
  }

  /// Append rows to an existing table
  ///
  /// # Arguments
  ///
  /// * `namespace` - Owning user or team handle
  /// * `table_name` - Table created with [`TableEndpoints::create`]
  /// * `data` - CSV or newline-delimited JSON, sent unmodified
  /// * `content_type` - `Csv` or `NdJson`
  #[instrument(skip(self, data), fields(bytes = data.len()))]
  pub async fn insert(
    &self,
    namespace: &str,
    table_name: &str,
    data: Vec<u8>,
    content_type: ContentType,
  ) -> Result<InsertTableResult> {
    if content_type == ContentType::Json {
      return Err(Error::Config("table inserts take CSV or NDJSON data".to_string()));
    }

    let payload = Payload::Bytes(data);
    self
      .router()
      .post_with_content_type(&format!("table/{}/{}/insert", namespace, table_name), Some(&payload), content_type)
      .await
  }
}
