//! HTTP request router for Dune API calls
//!
//! Every endpoint method funnels through [`Router`]: it builds the URL,
//! encodes the payload, issues exactly one request and normalizes the
//! response into a [`Decoded`] value or an [`Error::Response`].

use dune_core::{Config, Error, Result};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};
use url::Url;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-dune-api-key";

/// HTTP methods the Dune API uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
  /// Payload goes into the query string
  Get,
  /// Payload goes into the body
  Post,
  /// Payload goes into the body
  Patch,
}

impl RequestMethod {
  fn as_reqwest(self) -> reqwest::Method {
    match self {
      RequestMethod::Get => reqwest::Method::GET,
      RequestMethod::Post => reqwest::Method::POST,
      RequestMethod::Patch => reqwest::Method::PATCH,
    }
  }
}

impl fmt::Display for RequestMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RequestMethod::Get => write!(f, "GET"),
      RequestMethod::Post => write!(f, "POST"),
      RequestMethod::Patch => write!(f, "PATCH"),
    }
  }
}

/// Value of the `Content-Type` header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentType {
  /// `application/json`
  #[default]
  Json,
  /// `text/csv`
  Csv,
  /// `application/x-ndjson`
  NdJson,
}

impl ContentType {
  /// MIME type string
  pub fn as_str(&self) -> &'static str {
    match self {
      ContentType::Json => "application/json",
      ContentType::Csv => "text/csv",
      ContentType::NdJson => "application/x-ndjson",
    }
  }
}

impl fmt::Display for ContentType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
  /// Structured payload: query string on GET, JSON body otherwise
  Json(Value),
  /// Sent as the body unmodified
  Bytes(Vec<u8>),
}

impl Payload {
  /// Serialize any value into a structured payload
  pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
    Ok(Payload::Json(serde_json::to_value(value)?))
  }

  fn body(&self) -> Result<Vec<u8>> {
    match self {
      Payload::Json(value) => Ok(serde_json::to_vec(value)?),
      Payload::Bytes(bytes) => Ok(bytes.clone()),
    }
  }
}

impl From<Value> for Payload {
  fn from(value: Value) -> Self {
    Payload::Json(value)
  }
}

impl From<Vec<u8>> for Payload {
  fn from(bytes: Vec<u8>) -> Self {
    Payload::Bytes(bytes)
  }
}

/// A response body after normalization
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
  /// The body was valid JSON
  Json(Value),
  /// The body was not JSON (CSV exports, plain text)
  Text(String),
}

impl Decoded {
  /// Try JSON first, fall back to the raw text
  pub fn from_body(body: String) -> Self {
    match serde_json::from_str::<Value>(&body) {
      Ok(value) => Decoded::Json(value),
      Err(_) => Decoded::Text(body),
    }
  }

  /// The `error` field of a JSON object body, if it signals an error
  pub fn error_field(&self) -> Option<ErrorField> {
    match self {
      Decoded::Json(Value::Object(map)) => map.get("error").and_then(ErrorField::from_value),
      _ => None,
    }
  }

  /// Deserialize into `T`. Text bodies deserialize as a JSON string.
  pub fn into_typed<T: DeserializeOwned>(self) -> Result<T> {
    let value = match self {
      Decoded::Json(value) => value,
      Decoded::Text(text) => Value::String(text),
    };
    serde_json::from_value(value).map_err(|e| Error::Response(format!("unexpected response shape: {}", e)))
  }
}

/// Shapes the server uses for the `error` field
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorField {
  /// `{"error": "message"}`
  Message(String),
  /// `{"error": {"type": "FAILED_TYPE_...", ...}}`
  Typed {
    /// Value of the `type` sub-field
    kind: String,
    /// The whole error object
    detail: Value,
  },
  /// Any other truthy value
  Other(Value),
}

impl ErrorField {
  /// Classify an `error` value. Null, false, zero and empty strings are not errors.
  pub fn from_value(value: &Value) -> Option<Self> {
    match value {
      Value::Null | Value::Bool(false) => None,
      Value::Number(n) if n.as_f64() == Some(0.0) => None,
      Value::String(s) if s.is_empty() => None,
      Value::String(s) => Some(ErrorField::Message(s.clone())),
      Value::Object(map) => match map.get("type") {
        Some(Value::String(kind)) => Some(ErrorField::Typed { kind: kind.clone(), detail: value.clone() }),
        Some(other) => Some(ErrorField::Typed { kind: other.to_string(), detail: value.clone() }),
        None => Some(ErrorField::Other(value.clone())),
      },
      other => Some(ErrorField::Other(other.clone())),
    }
  }

  /// Message surfaced to the caller
  pub fn message(&self) -> String {
    match self {
      ErrorField::Message(message) => message.clone(),
      ErrorField::Typed { kind, .. } => kind.clone(),
      ErrorField::Other(value) => value.to_string(),
    }
  }
}

/// Builds, sends and normalizes Dune API requests.
///
/// Holds only the immutable credentials and a shared HTTP client, so
/// concurrent calls are independent exchanges.
#[derive(Clone)]
pub struct Router {
  client: Client,
  base_url: String,
  api_key: String,
  api_version: String,
  timeout: Duration,
}

impl Router {
  /// Create a new router instance
  pub fn new(config: &Config) -> Result<Self> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      api_key: config.api_key.clone(),
      api_version: config.api_version.clone(),
      timeout,
    })
  }

  /// Versioned URL of a route, e.g. `https://api.dune.com/api/v1/query/1/execute`
  pub fn url(&self, route: &str) -> String {
    format!("{}/{}/{}", self.base_url, self.api_version, route.trim_start_matches('/'))
  }

  /// Value sent in the `User-Agent` header
  pub fn user_agent() -> String {
    format!("{}@{} ({})", dune_core::CLIENT_NAME, env!("CARGO_PKG_VERSION"), dune_core::CLIENT_URL)
  }

  /// Final request URL. On GET a structured payload is appended as query string.
  pub fn build_url(&self, method: RequestMethod, url: &str, payload: Option<&Payload>) -> Result<Url> {
    let mut url = Url::parse(url)?;

    if method != RequestMethod::Get {
      return Ok(url);
    }

    match payload {
      Some(Payload::Json(value)) => {
        let pairs = search_params(value);
        if !pairs.is_empty() {
          url.query_pairs_mut().extend_pairs(pairs);
        }
      }
      Some(Payload::Bytes(_)) => warn!("byte payload ignored on GET {}", url),
      None => {}
    }

    Ok(url)
  }

  fn prepare(
    &self,
    method: RequestMethod,
    url: &str,
    payload: Option<&Payload>,
    content_type: ContentType,
  ) -> Result<RequestBuilder> {
    let url = self.build_url(method, url, payload)?;
    debug!("Final request URL: {}", url);

    let mut request = self
      .client
      .request(method.as_reqwest(), url)
      .header(API_KEY_HEADER, &self.api_key)
      .header(USER_AGENT, Self::user_agent())
      .header(CONTENT_TYPE, content_type.as_str());

    if method != RequestMethod::Get {
      if let Some(payload) = payload {
        request = request.body(payload.body()?);
      }
    }

    Ok(request)
  }

  /// Raw mode: send the request and hand back the response untouched.
  ///
  /// Only a failure to send is converted into an error. Status, headers and
  /// body are left for the caller (CSV exports read paging headers this way).
  #[instrument(skip(self, payload))]
  pub async fn dispatch_raw(
    &self,
    method: RequestMethod,
    url: &str,
    payload: Option<&Payload>,
    content_type: ContentType,
  ) -> Result<Response> {
    log_payload(method, url, payload);
    let request = self.prepare(method, url, payload, content_type)?;

    request.send().await.map_err(|e| {
      error!("caught unhandled response error {}", e);
      Error::Response(e.to_string())
    })
  }

  /// Send the request and normalize the response
  pub async fn dispatch_decoded(
    &self,
    method: RequestMethod,
    url: &str,
    payload: Option<&Payload>,
    content_type: ContentType,
  ) -> Result<Decoded> {
    let response = self.dispatch_raw(method, url, payload, content_type).await?;
    self.handle_response(response).await
  }

  /// Send the request, normalize the response and deserialize it into `T`
  pub async fn dispatch<T>(
    &self,
    method: RequestMethod,
    url: &str,
    payload: Option<&Payload>,
    content_type: ContentType,
  ) -> Result<T>
  where
    T: DeserializeOwned,
  {
    self.dispatch_decoded(method, url, payload, content_type).await?.into_typed()
  }

  /// Normalize a response: decode JSON or fall back to text, then raise on an `error` field.
  ///
  /// A non-success status is logged but does not raise by itself.
  pub async fn handle_response(&self, response: Response) -> Result<Decoded> {
    let status = response.status();
    let body = read_body(response).await?;
    inspect(status, body)
  }

  /// Like [`Router::handle_response`] but returns the body text verbatim
  pub async fn handle_text_response(&self, response: Response) -> Result<String> {
    let status = response.status();
    let body = read_body(response).await?;
    inspect(status, body.clone())?;
    Ok(body)
  }

  /// GET a route
  pub async fn get<T: DeserializeOwned>(&self, route: &str, params: Option<&Payload>) -> Result<T> {
    self.dispatch(RequestMethod::Get, &self.url(route), params, ContentType::Json).await
  }

  /// GET an absolute URL, e.g. a `next_uri` paging link
  pub async fn get_by_url<T: DeserializeOwned>(&self, url: &str, params: Option<&Payload>) -> Result<T> {
    self.dispatch(RequestMethod::Get, url, params, ContentType::Json).await
  }

  /// GET a route in raw mode
  pub async fn get_raw(&self, route: &str, params: Option<&Payload>) -> Result<Response> {
    self.dispatch_raw(RequestMethod::Get, &self.url(route), params, ContentType::Json).await
  }

  /// GET an absolute URL in raw mode
  pub async fn get_raw_by_url(&self, url: &str, params: Option<&Payload>) -> Result<Response> {
    self.dispatch_raw(RequestMethod::Get, url, params, ContentType::Json).await
  }

  /// POST a JSON payload to a route
  pub async fn post<T: DeserializeOwned>(&self, route: &str, params: Option<&Payload>) -> Result<T> {
    self.post_with_content_type(route, params, ContentType::Json).await
  }

  /// POST with an explicit content type, used for byte uploads
  pub async fn post_with_content_type<T: DeserializeOwned>(
    &self,
    route: &str,
    params: Option<&Payload>,
    content_type: ContentType,
  ) -> Result<T> {
    self.dispatch(RequestMethod::Post, &self.url(route), params, content_type).await
  }

  /// PATCH a route
  pub async fn patch<T: DeserializeOwned>(&self, route: &str, params: Option<&Payload>) -> Result<T> {
    self.dispatch(RequestMethod::Patch, &self.url(route), params, ContentType::Json).await
  }

  /// Get the base URL being used
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Get the API version segment
  pub fn api_version(&self) -> &str {
    &self.api_version
  }

  /// Get request timeout duration
  pub fn timeout(&self) -> Duration {
    self.timeout
  }
}

impl fmt::Debug for Router {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Router")
      .field("base_url", &self.base_url)
      .field("api_version", &self.api_version)
      .field("api_key", &"<redacted>")
      .field("timeout", &self.timeout)
      .finish()
  }
}

/// Flatten a structured payload into query pairs.
///
/// Arrays repeat their key per element, nested values are JSON-encoded and
/// nulls are skipped.
pub fn search_params(payload: &Value) -> Vec<(String, String)> {
  let Value::Object(map) = payload else {
    warn!("non-object GET payload ignored: {}", payload);
    return Vec::new();
  };

  let mut pairs = Vec::with_capacity(map.len());
  for (key, value) in map {
    match value {
      Value::Array(items) => {
        pairs.extend(items.iter().filter_map(query_value).map(|v| (key.clone(), v)));
      }
      other => {
        if let Some(v) = query_value(other) {
          pairs.push((key.clone(), v));
        }
      }
    }
  }
  pairs
}

fn query_value(value: &Value) -> Option<String> {
  match value {
    Value::Null => None,
    Value::String(s) => Some(s.clone()),
    Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
    Value::Array(_) | Value::Object(_) => Some(value.to_string()),
  }
}

fn log_payload(method: RequestMethod, url: &str, payload: Option<&Payload>) {
  match payload {
    Some(Payload::Json(value)) => debug!("{} received input url={}, payload={}", method, url, value),
    Some(Payload::Bytes(bytes)) => {
      debug!("{} received input url={}, payload=<{} bytes>", method, url, bytes.len())
    }
    None => debug!("{} received input url={}", method, url),
  }
}

async fn read_body(response: Response) -> Result<String> {
  response.text().await.map_err(|e| {
    error!("caught unhandled response error {}", e);
    Error::Response(e.to_string())
  })
}

fn inspect(status: StatusCode, body: String) -> Result<Decoded> {
  if !status.is_success() {
    error!("response error {} - {}", status.as_u16(), status.canonical_reason().unwrap_or("unknown"));
  }

  let decoded = Decoded::from_body(body);
  debug!("resolved response: {:?}", decoded);

  if let Some(field) = decoded.error_field() {
    if let Decoded::Json(value) = &decoded {
      error!("error contained in response {}", value);
    }
    return Err(Error::Response(field.message()));
  }

  Ok(decoded)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn router() -> Router {
    Router::new(&Config::default_with_key("test_key")).unwrap()
  }

  #[test]
  fn test_url() {
    let router = router();
    assert_eq!(router.url("query/1/execute"), "https://api.dune.com/api/v1/query/1/execute");

    let v2 = Router::new(&Config::default_with_key("k").with_version("v2")).unwrap();
    assert_eq!(v2.url("/execution/abc/status"), "https://api.dune.com/api/v2/execution/abc/status");
  }

  #[test]
  fn test_get_flattens_payload() {
    let router = router();
    let payload = Payload::Json(json!({"a": 1, "b": [2, 3]}));
    let url = router.build_url(RequestMethod::Get, &router.url("x"), Some(&payload)).unwrap();
    assert_eq!(url.query(), Some("a=1&b=2&b=3"));
  }

  #[test]
  fn test_post_keeps_url() {
    let router = router();
    let payload = Payload::Json(json!({"a": 1}));
    let url = router.build_url(RequestMethod::Post, &router.url("x"), Some(&payload)).unwrap();
    assert_eq!(url.query(), None);
  }

  #[test]
  fn test_search_params_shapes() {
    let pairs = search_params(&json!({
      "filters": "number > 2",
      "nested": {"k": "v"},
      "missing": null,
      "partial": true
    }));
    assert_eq!(
      pairs,
      vec![
        ("filters".to_string(), "number > 2".to_string()),
        ("nested".to_string(), r#"{"k":"v"}"#.to_string()),
        ("partial".to_string(), "true".to_string()),
      ]
    );
    assert!(search_params(&json!([1, 2])).is_empty());
  }

  #[test]
  fn test_empty_payload_adds_no_query() {
    let router = router();
    let url = router.build_url(RequestMethod::Get, &router.url("x"), Some(&Payload::Json(json!({})))).unwrap();
    assert_eq!(url.as_str(), "https://api.dune.com/api/v1/x");
  }

  #[test]
  fn test_decoded_from_body() {
    assert_eq!(Decoded::from_body(r#"{"a":1}"#.to_string()), Decoded::Json(json!({"a": 1})));
    let csv = "number\n3\n".to_string();
    assert_eq!(Decoded::from_body(csv.clone()), Decoded::Text(csv));
  }

  #[test]
  fn test_error_field_shapes() {
    let plain = Decoded::Json(json!({"error": "invalid API Key"}));
    assert_eq!(plain.error_field().unwrap().message(), "invalid API Key");

    let typed = Decoded::Json(json!({"error": {"type": "FAILED_TYPE_EXECUTION_FAILED", "message": "boom"}}));
    assert_eq!(typed.error_field().unwrap().message(), "FAILED_TYPE_EXECUTION_FAILED");

    assert!(Decoded::Json(json!({"error": null})).error_field().is_none());
    assert!(Decoded::Json(json!({"error": ""})).error_field().is_none());
    assert!(Decoded::Json(json!({"error": false})).error_field().is_none());
    assert!(Decoded::Json(json!({"error": 0, "ok": 1})).error_field().is_none());
    assert!(Decoded::Json(json!({"error": 0.0})).error_field().is_none());
    assert_eq!(Decoded::Json(json!({"error": 7})).error_field().unwrap().message(), "7");
    assert!(Decoded::Json(json!([{"error": "x"}])).error_field().is_none());
    assert!(Decoded::Text("error".to_string()).error_field().is_none());
  }

  #[test]
  fn test_inspect_logs_status_without_raising() {
    let decoded = inspect(StatusCode::INTERNAL_SERVER_ERROR, r#"{"ok":true}"#.to_string()).unwrap();
    assert_eq!(decoded, Decoded::Json(json!({"ok": true})));

    let zero = inspect(StatusCode::OK, r#"{"error":0,"ok":1}"#.to_string()).unwrap();
    assert_eq!(zero, Decoded::Json(json!({"error": 0, "ok": 1})));

    let err = inspect(StatusCode::OK, r#"{"error":"Query not found"}"#.to_string()).unwrap_err();
    assert_eq!(err.to_string(), "Response Error: Query not found");
  }

  #[test]
  fn test_text_into_string() {
    let text: String = Decoded::Text("a,b\n".to_string()).into_typed().unwrap();
    assert_eq!(text, "a,b\n");
    let err = Decoded::Text("a,b\n".to_string()).into_typed::<u64>().unwrap_err();
    assert!(err.is_response());
  }

  #[test]
  fn test_debug_redacts_key() {
    let debug = format!("{:?}", router());
    assert!(!debug.contains("test_key"));
  }
}
