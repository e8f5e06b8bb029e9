//! HTTP transport implementation
//!
//! This module provides the reqwest-backed [`Transport`] used by the SDK,
//! with optional retries, error classification and request/response logging.

use crate::config::SdkConfig;
use crate::error::{SdkError, SdkResult};
use crate::transport::Transport;
use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// The HTTP transport for making API requests
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<SdkConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut extra: Vec<(String, String)> = Vec::new();
        if let Some(org) = &config.organization_id {
            extra.push(("OpenAI-Organization".to_string(), org.clone()));
        }
        if let Some(project) = &config.project_id {
            extra.push(("OpenAI-Project".to_string(), project.clone()));
        }
        extra.extend(config.custom_headers.iter().cloned());

        for (name, value) in &extra {
            match (
                header::HeaderName::try_from(name.as_str()),
                header::HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => {
                    return Err(SdkError::ConfigurationError(format!(
                        "Invalid header: {}",
                        name
                    )))
                }
            }
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(SdkError::NetworkError)?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Build the full URL for an endpoint.
    ///
    /// The path is appended verbatim; identifiers are not escaped.
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Query-string pairs for a parameters value, plus `api-version` when configured
    fn query_pairs(&self, params: Option<&Value>) -> Vec<(String, String)> {
        let mut pairs = params.map(flatten_query).unwrap_or_default();
        if let Some(version) = &self.config.api_version {
            pairs.push(("api-version".to_string(), version.clone()));
        }
        pairs
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: Option<&Value>,
        body: Option<&Value>,
    ) -> SdkResult<Value> {
        let url = self.url(path);
        let query_pairs = self.query_pairs(query);
        let body_json = body.map(serde_json::to_string).transpose()?;

        let mut attempts = 0;
        let mut backoff = self.config.retry_initial_backoff;

        loop {
            if attempts > 0 {
                info!(
                    "Retrying request (attempt {}/{}), waiting {:?}",
                    attempts, self.config.max_retries, backoff
                );
                tokio::time::sleep(backoff).await;
                backoff = std::cmp::min(backoff * 2, self.config.retry_max_backoff);
            }

            let mut request = self.client.request(method.clone(), &url);
            request = self.add_auth(request);

            if !query_pairs.is_empty() {
                request = request.query(&query_pairs);
            }

            if let Some(ref body_str) = body_json {
                request = request
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body_str.clone());
            }

            if self.config.enable_logging {
                debug!("Request: {} {}", method, url);
                if let Some(ref body_str) = body_json {
                    debug!("Request body: {}", body_str);
                }
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    error!("Request failed: {}", e);

                    let retryable = e.is_timeout() || e.is_connect();
                    let err = if e.is_timeout() {
                        SdkError::Timeout(self.config.timeout.as_secs())
                    } else {
                        SdkError::NetworkError(e)
                    };

                    if retryable && attempts < self.config.max_retries {
                        attempts += 1;
                        continue;
                    }
                    return Err(err);
                }
            };

            let status = response.status();
            let request_id = header_str(response.headers(), "x-request-id");
            let retry_after =
                header_str(response.headers(), "retry-after").and_then(|v| v.parse::<u64>().ok());

            let text = response.text().await.map_err(SdkError::NetworkError)?;

            if self.config.enable_logging {
                debug!("Response {}: {}", status, text);
            }

            if status.is_success() {
                return Ok(decode_body(&text));
            }

            if self.config.log_errors {
                error!(status = %status, request_id = ?request_id, "API error response: {}", text);
            }

            let err = SdkError::from_response(status.as_u16(), &text, request_id, retry_after);

            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if retryable && attempts < self.config.max_retries {
                warn!("Received {}, will retry", status);
                if let Some(secs) = retry_after {
                    backoff = std::cmp::min(Duration::from_secs(secs), self.config.retry_max_backoff);
                }
                attempts += 1;
                continue;
            }

            return Err(err);
        }
    }

    /// Add authentication to a request
    fn add_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.auth.to_header() {
            Some((name, value)) => request.header(name, value),
            None => request,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: Option<&Value>) -> SdkResult<Value> {
        self.execute(Method::GET, path, query, None).await
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> SdkResult<Value> {
        self.execute(Method::POST, path, None, body).await
    }

    async fn json_post(&self, path: &str, body: Option<&Value>) -> SdkResult<Value> {
        let empty = Value::Object(serde_json::Map::new());
        self.execute(Method::POST, path, None, Some(body.unwrap_or(&empty)))
            .await
    }

    async fn delete(&self, path: &str, params: Option<&Value>) -> SdkResult<Value> {
        self.execute(Method::DELETE, path, params, None).await
    }
}

fn header_str(headers: &header::HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Flatten a parameters value into query pairs.
///
/// Nulls are skipped, arrays repeat their key, nested objects are sent as JSON.
fn flatten_query(params: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = params else {
        return Vec::new();
    };

    let mut pairs = Vec::new();
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(s) = scalar_to_string(item) {
                        pairs.push((key.clone(), s));
                    }
                }
            }
            other => {
                if let Some(s) = scalar_to_string(other) {
                    pairs.push((key.clone(), s));
                }
            }
        }
    }
    pairs
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Decode a response body.
///
/// Empty bodies become `Null`; JSON-lines bodies become an array; anything
/// that is not JSON is returned as a string.
pub(crate) fn decode_body(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }

    if let Ok(value) = serde_json::from_str(trimmed) {
        return value;
    }

    let lines: Result<Vec<Value>, _> = trimmed
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(serde_json::from_str)
        .collect();

    match lines {
        Ok(items) => Value::Array(items),
        Err(_) => Value::String(text.to_string()),
    }
}

/// Sort direction for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(SdkError::ConfigurationError(format!(
                "Invalid sort order: {}. Valid values: asc, desc",
                other
            ))),
        }
    }
}

/// Cursor pagination and filter parameters for list requests.
///
/// Only the fields that are set are sent; none are checked client-side.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}
