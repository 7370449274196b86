use dune_client::{Config, ContentType, Decoded, Error, Payload, RequestMethod, Router};
use serde_json::{json, Value};
use wiremock::matchers::{header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, Router) {
  let server = MockServer::start().await;
  let config = Config::default_with_key("test_key").with_base_url(format!("{}/api", server.uri()));
  let router = Router::new(&config).expect("router");
  (server, router)
}

#[tokio::test]
async fn test_json_response_returned_unchanged() {
  let (server, router) = setup().await;
  let body = json!({"execution_id": "01H", "state": "QUERY_STATE_PENDING", "nested": {"list": [1, 2.5, null]}});

  Mock::given(method("GET"))
    .and(path("/api/v1/echo"))
    .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
    .expect(1)
    .mount(&server)
    .await;

  let decoded = router.dispatch_decoded(RequestMethod::Get, &router.url("echo"), None, ContentType::Json).await.unwrap();
  assert_eq!(decoded, Decoded::Json(body));
}

#[tokio::test]
async fn test_non_json_body_falls_back_to_text() {
  let (server, router) = setup().await;
  let csv = "text_field,number_field\nPlain Text,3.1415926535\n";

  Mock::given(method("GET"))
    .and(path("/api/v1/execution/abc/results/csv"))
    .respond_with(ResponseTemplate::new(200).set_body_string(csv))
    .mount(&server)
    .await;

  let text: String = router.get("execution/abc/results/csv", None).await.unwrap();
  assert_eq!(text, csv);
}

#[tokio::test]
async fn test_error_string_raises_with_message() {
  let (server, router) = setup().await;

  Mock::given(method("POST"))
    .and(path("/api/v1/query/999999999/execute"))
    .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Query not found"})))
    .mount(&server)
    .await;

  let err = router.post::<Value>("query/999999999/execute", None).await.unwrap_err();
  assert!(matches!(err, Error::Response(_)));
  assert_eq!(err.message(), "Query not found");
  assert_eq!(err.to_string(), "Response Error: Query not found");
}

#[tokio::test]
async fn test_error_object_raises_with_type() {
  let (server, router) = setup().await;

  Mock::given(method("GET"))
    .and(path("/api/v1/execution/01GEHG4AY1Z9JBR3BYB20E7RGH/results"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "execution_id": "01GEHG4AY1Z9JBR3BYB20E7RGH",
      "state": "QUERY_STATE_FAILED",
      "error": {"type": "FAILED_TYPE_EXECUTION_FAILED", "message": "line 1:8: mismatched input"}
    })))
    .mount(&server)
    .await;

  let err = router.get::<Value>("execution/01GEHG4AY1Z9JBR3BYB20E7RGH/results", None).await.unwrap_err();
  assert_eq!(err.message(), "FAILED_TYPE_EXECUTION_FAILED");
  assert_eq!(err.to_string(), "Response Error: FAILED_TYPE_EXECUTION_FAILED");
}

#[tokio::test]
async fn test_invalid_api_key_surfaces_verbatim() {
  let (server, router) = setup().await;

  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid API Key"})))
    .mount(&server)
    .await;

  let err = router.post::<Value>("query/1/execute", None).await.unwrap_err();
  assert_eq!(err.to_string(), "Response Error: invalid API Key");
}

#[tokio::test]
async fn test_failure_status_without_error_field_is_not_raised() {
  let (server, router) = setup().await;

  Mock::given(method("GET"))
    .and(path("/api/v1/flaky"))
    .respond_with(ResponseTemplate::new(503).set_body_json(json!({"message": "try later"})))
    .mount(&server)
    .await;

  let value: Value = router.get("flaky", None).await.unwrap();
  assert_eq!(value, json!({"message": "try later"}));
}

#[tokio::test]
async fn test_get_payload_becomes_query_string() {
  let (server, router) = setup().await;

  Mock::given(method("GET"))
    .and(path("/api/v1/items"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
    .mount(&server)
    .await;

  let payload = Payload::Json(json!({"a": 1, "b": [2, 3]}));
  let _: Value = router.get("items", Some(&payload)).await.unwrap();

  let requests = server.received_requests().await.unwrap();
  assert_eq!(requests.len(), 1);
  assert_eq!(requests[0].url.query(), Some("a=1&b=2&b=3"));
  assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_post_json_body_and_headers() {
  let (server, router) = setup().await;
  let payload = json!({"query_parameters": {"TextField": "Plain Text"}, "performance": "large"});

  Mock::given(method("POST"))
    .and(path("/api/v1/query/1215383/execute"))
    .and(header("x-dune-api-key", "test_key"))
    .and(header("content-type", "application/json"))
    .and(header_regex("user-agent", r"^dune-client@\d+\.\d+\.\d+ \(https://crates\.io/crates/dune-client\)$"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"execution_id": "01H", "state": "QUERY_STATE_PENDING"})))
    .expect(1)
    .mount(&server)
    .await;

  let _: Value = router.post("query/1215383/execute", Some(&Payload::Json(payload.clone()))).await.unwrap();

  let requests = server.received_requests().await.unwrap();
  let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
  assert_eq!(sent, payload);
  assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_post_bytes_pass_through_unmodified() {
  let (server, router) = setup().await;
  let data = b"date,dgs10\n2020-12-01T23:33:00,10\n".to_vec();

  Mock::given(method("POST"))
    .and(path("/api/v1/table/bh2smith/ds/insert"))
    .and(header("content-type", "text/csv"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rows_written": 1, "bytes_written": 33})))
    .mount(&server)
    .await;

  let _: Value = router
    .post_with_content_type("table/bh2smith/ds/insert", Some(&Payload::Bytes(data.clone())), ContentType::Csv)
    .await
    .unwrap();

  let requests = server.received_requests().await.unwrap();
  assert_eq!(requests[0].body, data);
}

#[tokio::test]
async fn test_patch_sends_json_body() {
  let (server, router) = setup().await;

  Mock::given(method("PATCH"))
    .and(path("/api/v1/query/42"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"query_id": 42})))
    .mount(&server)
    .await;

  let value: Value = router.patch("query/42", Some(&Payload::Json(json!({"name": "renamed"})))).await.unwrap();
  assert_eq!(value, json!({"query_id": 42}));

  let requests = server.received_requests().await.unwrap();
  assert_eq!(requests[0].method.as_str(), "PATCH");
  assert_eq!(serde_json::from_slice::<Value>(&requests[0].body).unwrap(), json!({"name": "renamed"}));
}

#[tokio::test]
async fn test_raw_mode_skips_normalization() {
  let (server, router) = setup().await;

  Mock::given(method("GET"))
    .and(path("/api/v1/execution/bad/results/csv"))
    .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "bad execution"})))
    .mount(&server)
    .await;

  let response = router.get_raw("execution/bad/results/csv", None).await.unwrap();
  assert_eq!(response.status().as_u16(), 400);

  let err = router.handle_response(response).await.unwrap_err();
  assert_eq!(err.message(), "bad execution");
}

#[tokio::test]
async fn test_single_attempt_on_failure() {
  let (server, router) = setup().await;

  Mock::given(method("GET"))
    .and(path("/api/v1/broken"))
    .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "internal"})))
    .expect(1)
    .mount(&server)
    .await;

  assert!(router.get::<Value>("broken", None).await.is_err());
}

#[tokio::test]
async fn test_transport_failure_is_wrapped() {
  let config = Config::default_with_key("test_key").with_base_url("http://127.0.0.1:9/api");
  let router = Router::new(&config).unwrap();

  let err = router.get::<Value>("execution/abc/status", None).await.unwrap_err();
  assert!(err.is_response());
  assert!(!err.message().is_empty());
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
  let (server, router) = setup().await;

  Mock::given(method("GET"))
    .and(path("/api/v1/one"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"n": 1})))
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/api/v1/two"))
    .respond_with(ResponseTemplate::new(200).set_body_string("two"))
    .mount(&server)
    .await;

  let (one, two) = tokio::join!(router.get::<Value>("one", None), router.get::<String>("two", None));
  assert_eq!(one.unwrap(), json!({"n": 1}));
  assert_eq!(two.unwrap(), "two");
}
