//! Thin HTTP client with default headers and response assertions.

use crate::ApiError;
use log::{debug, info, warn};
use reqwest::Method;
use serde_json::Value;
use std::collections::BTreeMap;
use uiauto_config::ResolvedConfig;

/// Content type sent when the config does not define default headers.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json;charset=utf-8";

const BODY_PREVIEW_LIMIT: usize = 500;
const SUCCESS_CODES: &[&str] = &["0", "SUCCESS", "SUCCESSFUL", "OK"];

/// Per-request settings.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub json: Option<Value>,
    /// URL-encoded form fields; ignored when a JSON body is set.
    pub form: Vec<(String, String)>,
    /// Headers for this request only; they win over client defaults.
    pub headers: BTreeMap<String, String>,
    /// Expected HTTP status, 200 when unset.
    pub expected_status: Option<u16>,
    /// Overrides the client-wide business check switch.
    pub check_business: Option<bool>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Add a URL-encoded form field to the body.
    pub fn form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((key.into(), value.into()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn expect_status(mut self, status: u16) -> Self {
        self.expected_status = Some(status);
        self
    }

    pub fn check_business(mut self, enabled: bool) -> Self {
        self.check_business = Some(enabled);
        self
    }
}

/// HTTP client bound to one base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    default_headers: BTreeMap<String, String>,
    auth_token: Option<String>,
    business_check: bool,
}

impl ApiClient {
    /// Client for `base_url` with the default JSON content type.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let mut default_headers = BTreeMap::new();
        default_headers.insert("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string());
        Self::with_headers(base_url, default_headers)
    }

    /// Client for `base_url` sending `default_headers` on every request.
    pub fn with_headers(
        base_url: impl Into<String>,
        default_headers: BTreeMap<String, String>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            default_headers,
            auth_token: None,
            business_check: true,
        })
    }

    /// Client using `api.base_url` (or `app.base_url`) and `api.default_headers`.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ApiError> {
        let base_url = config
            .api
            .base_url
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| config.app.base_url.clone());
        let client = if config.api.default_headers.is_empty() {
            Self::new(base_url)?
        } else {
            Self::with_headers(base_url, config.api.default_headers.clone())?
        };
        info!(
            "api client created (base_url={}, headers={:?})",
            client.base_url,
            client.default_headers.keys().collect::<Vec<_>>()
        );
        Ok(client)
    }

    /// Enable or disable the business check for requests that do not choose.
    pub fn with_business_check(mut self, enabled: bool) -> Self {
        self.business_check = enabled;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send `Authorization: Bearer <token>` on every request.
    pub fn set_bearer_token(&mut self, token: impl Into<String>) {
        self.auth_token = Some(token.into());
        info!("bearer token set");
    }

    /// Add or replace a header sent on every request.
    pub fn set_common_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        info!("default header set: {key}");
        self.default_headers.insert(key, value.into());
    }

    /// Defaults, then the bearer token, then `extra`; later entries win.
    pub fn merged_headers(&self, extra: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut headers = self.default_headers.clone();
        if let Some(token) = &self.auth_token {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }
        headers.extend(extra.iter().map(|(key, value)| (key.clone(), value.clone())));
        headers
    }

    /// Absolute URL for `path`; absolute inputs are returned unchanged.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.is_empty() {
            return self.base_url.clone();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        self.send(Method::GET, path, options).await
    }

    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        self.send(Method::POST, path, options).await
    }

    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        self.send(Method::PUT, path, options).await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        self.send(Method::DELETE, path, options).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let url = self.url(path);
        let headers = self.merged_headers(&options.headers);
        info!("{method} {url}");
        debug!(
            "request headers={:?} query={:?} json={} form_fields={}",
            headers.keys().collect::<Vec<_>>(),
            options.query,
            options.json.is_some(),
            options.form.len()
        );

        let mut request = self.http.request(method, &url);
        for (key, value) in &headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = &options.json {
            request = request.json(body);
        } else if !options.form.is_empty() {
            request = request.form(&options.form);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        handle_response(
            status,
            &body,
            options.expected_status.unwrap_or(200),
            options.check_business.unwrap_or(self.business_check),
        )
    }
}

/// Check the status, decode the JSON body and optionally run the business check.
///
/// An empty body with the expected status decodes to `Value::Null` and skips
/// the business check.
pub fn handle_response(
    status: u16,
    body: &str,
    expected_status: u16,
    check_business: bool,
) -> Result<Value, ApiError> {
    if status != expected_status {
        return Err(ApiError::UnexpectedStatus {
            expected: expected_status,
            actual: status,
            body_preview: body_preview(body),
        });
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    let data: Value = serde_json::from_str(body).map_err(|source| {
        warn!("response is not JSON (status={status}): {}", body_preview(body));
        ApiError::NotJson { status, source }
    })?;
    debug!("response json: {data}");
    if check_business {
        check_business_success(&data)?;
    }
    Ok(data)
}

/// Generic business success rule.
///
/// A `code` field must be `0`, `"0"`, `"SUCCESS"`, `"SUCCESSFUL"` or `"OK"`;
/// otherwise a `success` field must be `true`. Bodies with neither pass.
pub fn check_business_success(data: &Value) -> Result<(), ApiError> {
    if let Some(code) = data.get("code") {
        let ok = match code {
            Value::Number(number) => number.as_f64() == Some(0.0),
            Value::String(code) => SUCCESS_CODES.contains(&code.as_str()),
            _ => false,
        };
        if ok {
            return Ok(());
        }
        return Err(ApiError::Business {
            field: "code",
            value: code.to_string(),
            message: business_message(data, &["msg", "message"]),
        });
    }

    if let Some(success) = data.get("success") {
        if success == &Value::Bool(true) {
            return Ok(());
        }
        return Err(ApiError::Business {
            field: "success",
            value: success.to_string(),
            message: business_message(data, &["message", "msg"]),
        });
    }

    warn!("response has neither 'code' nor 'success'; skipping business check");
    Ok(())
}

fn business_message(data: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| data.get(*key).and_then(Value::as_str))
        .find(|message| !message.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn body_preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW_LIMIT) {
        Some((idx, _)) => format!("{}...(truncated)", &body[..idx]),
        None => body.to_string(),
    }
}
