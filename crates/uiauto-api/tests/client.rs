use axum::{Form, Json, Router};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use uiauto_api::{ApiClient, ApiError, DEFAULT_CONTENT_TYPE, RequestOptions};
use uiauto_config::ResolvedConfig;
use uiauto_test_utils::sample_config;

fn header(headers: &HeaderMap, name: &str) -> Value {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| Value::String(value.to_string()))
        .unwrap_or(Value::Null)
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route(
            "/ok",
            get(|| async { Json(json!({ "code": 0, "data": { "name": "x" } })) }),
        )
        .route(
            "/denied",
            get(|| async { Json(json!({ "code": 1001, "msg": "denied" })) }),
        )
        .route(
            "/echo",
            get(|headers: HeaderMap| async move {
                Json(json!({
                    "success": true,
                    "auth": header(&headers, "authorization"),
                    "tenant": header(&headers, "x-tenant-id"),
                    "content_type": header(&headers, "content-type"),
                }))
            }),
        )
        .route(
            "/users",
            post(|Json(body): Json<Value>| async move {
                (
                    StatusCode::CREATED,
                    Json(json!({ "success": true, "id": 7, "name": body["name"].clone() })),
                )
            }),
        )
        .route(
            "/login",
            post(
                |headers: HeaderMap, Form(fields): Form<BTreeMap<String, String>>| async move {
                    Json(json!({
                        "code": "SUCCESS",
                        "fields": fields,
                        "content_type": header(&headers, "content-type"),
                    }))
                },
            ),
        )
        .route("/users/7", delete(|| async { StatusCode::NO_CONTENT }))
        .route("/text", get(|| async { "hello" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

/// GET decodes the JSON body once the business check passes.
#[tokio::test]
async fn get_returns_json_after_business_check() {
    let client = ApiClient::new(spawn_server().await).expect("client");
    let data = client.get("/ok", RequestOptions::new()).await.expect("get");
    assert_eq!(data["data"]["name"], "x");
}

/// Business failures are errors unless the request opts out.
#[tokio::test]
async fn business_failure_is_an_error_unless_disabled() {
    let client = ApiClient::new(spawn_server().await).expect("client");
    let err = client.get("/denied", RequestOptions::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::Business { field: "code", .. }), "{err}");

    let data = client
        .get("/denied", RequestOptions::new().check_business(false))
        .await
        .expect("unchecked");
    assert_eq!(data["msg"], "denied");

    let lenient = client.clone().with_business_check(false);
    lenient
        .get("/denied", RequestOptions::new())
        .await
        .expect("client-wide switch");
}

/// Default headers and the bearer token reach the server.
#[tokio::test]
async fn default_headers_and_token_are_sent() {
    let mut client = ApiClient::new(spawn_server().await).expect("client");
    client.set_bearer_token("t0ken");
    client.set_common_header("X-Tenant-Id", "10001");

    let data = client.get("/echo", RequestOptions::new()).await.expect("echo");
    assert_eq!(data["auth"], "Bearer t0ken");
    assert_eq!(data["tenant"], "10001");
    assert_eq!(data["content_type"], DEFAULT_CONTENT_TYPE);

    let data = client
        .get("/echo", RequestOptions::new().header("X-Tenant-Id", "20002"))
        .await
        .expect("echo");
    assert_eq!(data["tenant"], "20002");
}

/// POST compares the response status with the expected one.
#[tokio::test]
async fn post_checks_expected_status() {
    let client = ApiClient::new(spawn_server().await).expect("client");
    let options = || RequestOptions::new().json(json!({ "name": "alice" }));

    let err = client.post("/users", options()).await.unwrap_err();
    assert!(
        matches!(
            err,
            ApiError::UnexpectedStatus {
                expected: 200,
                actual: 201,
                ..
            }
        ),
        "{err}"
    );

    let data = client
        .post("/users", options().expect_status(201))
        .await
        .expect("created");
    assert_eq!(data["id"], 7);
    assert_eq!(data["name"], "alice");
}

/// Empty bodies decode to null and non-JSON bodies are errors.
#[tokio::test]
async fn delete_without_body_and_non_json_bodies() {
    let client = ApiClient::new(spawn_server().await).expect("client");
    let data = client
        .delete("/users/7", RequestOptions::new().expect_status(204))
        .await
        .expect("deleted");
    assert_eq!(data, Value::Null);

    let err = client.get("/text", RequestOptions::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::NotJson { status: 200, .. }), "{err}");
}

/// Form fields are sent URL-encoded instead of the default JSON content type.
#[tokio::test]
async fn post_sends_form_fields() {
    let client = ApiClient::new(spawn_server().await).expect("client");
    let data = client
        .post(
            "/login",
            RequestOptions::new()
                .form("username", "x")
                .form("password", "secret value"),
        )
        .await
        .expect("post");
    assert_eq!(
        data["fields"],
        json!({ "username": "x", "password": "secret value" })
    );
    assert_eq!(data["content_type"], "application/x-www-form-urlencoded");
}

/// The `api` section wins over `app.base_url`.
#[test]
fn client_prefers_api_section_over_app_base_url() {
    let client = ApiClient::from_config(&sample_config()).expect("client");
    assert_eq!(client.base_url(), "http://example.com");

    let config = ResolvedConfig::from_yaml_str(
        r#"
app: { base_url: "http://app" }
api:
  base_url: "http://api"
  default_headers: { X-Request-Source: "ui-tests" }
"#,
    )
    .expect("config");
    let client = ApiClient::from_config(&config).expect("client");
    assert_eq!(client.base_url(), "http://api");
    let headers = client.merged_headers(&Default::default());
    assert_eq!(headers["X-Request-Source"], "ui-tests");
    assert!(!headers.contains_key("Content-Type"));
}
