//! Backend HTTP client
//!
//! One call issues exactly one request: no retry, no timeout, no cancellation.
//! Every failure is normalized into an [`ApiError`] carrying a display message.

use crate::api::endpoints::HttpMethod;
use crate::config::Config;
use crate::error::{ApiError, ApiResult, AppError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

/// Per-call overrides for [`ApiClient::request`]
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Option<HttpMethod>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `data` as the JSON body
    pub fn json<T: Serialize + ?Sized>(self, data: &T) -> ApiResult<Self> {
        let body = serde_json::to_string(data)
            .map_err(|e| ApiError::transport(format!("Failed to serialize request body: {}", e)))?;
        Ok(self.body(body))
    }

    /// Caller headers as a map; a later duplicate name replaces an earlier one
    fn header_map(&self) -> ApiResult<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::transport(format!("Invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::transport(format!("Invalid value for header '{}': {}", name, e)))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

/// Overlay `overrides` on `defaults`, replacing whole entries per header name
pub fn merge_headers(defaults: &HeaderMap, overrides: &HeaderMap) -> HeaderMap {
    let mut merged = defaults.clone();
    for name in overrides.keys() {
        merged.remove(name);
        for value in overrides.get_all(name) {
            merged.append(name.clone(), value.clone());
        }
    }
    merged
}

/// Turn a status and raw body into the call result
pub fn normalize_response(status: StatusCode, body: &[u8]) -> ApiResult<Value> {
    if status.is_success() {
        return serde_json::from_slice(body)
            .map_err(|e| ApiError::decode(Some(status.as_u16()), e.to_string()));
    }

    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| error_detail(&v))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    Err(ApiError::application(status.as_u16(), message))
}

fn error_detail(body: &Value) -> Option<String> {
    let detail = body.get("detail")?;
    match detail {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn decode_value<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::decode(None, e.to_string()))
}

/// HTTP client for the Stock AI backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    default_headers: HeaderMap,
}

impl ApiClient {
    /// Create a client for the configured backend
    pub fn new(config: &Config) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(auth) = &config.api_auth {
            let mut value = HeaderValue::from_str(auth)
                .map_err(|e| AppError::Config(format!("Invalid API authorization value: {}", e)))?;
            value.set_sensitive(true);
            default_headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.api_base_url.clone(),
            client,
            default_headers,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers sent with every request before caller overrides
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Issue one request and return the decoded JSON body
    pub async fn request(&self, path: &str, options: RequestOptions) -> ApiResult<Value> {
        let method = options.method.unwrap_or_default();

        let result = self.send(method, path, options).await;
        if let Err(e) = &result {
            error!("API Error: {} {} - {}", method, path, e);
        }
        result
    }

    async fn send(&self, method: HttpMethod, path: &str, options: RequestOptions) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let headers = merge_headers(&self.default_headers, &options.header_map()?);

        debug!("{} {}", method, url);

        let mut builder = self.client.request(method.into(), &url).headers(headers);
        if let Some(body) = options.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;

        debug!("{} {} -> {}", method, path, status.as_u16());

        normalize_response(status, &body)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let value = self
            .request(path, RequestOptions::new().method(HttpMethod::Get))
            .await?;
        decode_value(value)
    }

    pub async fn post<B, T>(&self, path: &str, data: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::new().method(HttpMethod::Post).json(data)?;
        decode_value(self.request(path, options).await?)
    }

    pub async fn put<B, T>(&self, path: &str, data: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::new().method(HttpMethod::Put).json(data)?;
        decode_value(self.request(path, options).await?)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let value = self
            .request(path, RequestOptions::new().method(HttpMethod::Delete))
            .await?;
        decode_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(pairs: &[(&str, &str)]) -> HeaderMap {
        let options = pairs
            .iter()
            .fold(RequestOptions::new(), |o, (k, v)| o.header(k, v));
        options.header_map().unwrap()
    }

    #[test]
    fn test_merge_caller_wins() {
        let defaults = map(&[("Content-Type", "application/json"), ("Authorization", "Bearer x")]);
        let overrides = map(&[("content-type", "text/plain")]);

        let merged = merge_headers(&defaults, &overrides);
        let values: Vec<_> = merged.get_all(CONTENT_TYPE).iter().collect();
        assert_eq!(values, vec![&HeaderValue::from_static("text/plain")]);
        assert_eq!(merged.get(AUTHORIZATION).unwrap(), "Bearer x");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let defaults = map(&[("Content-Type", "application/json")]);
        let overrides = map(&[("X-Trace", "1"), ("Content-Type", "text/csv")]);

        let once = merge_headers(&defaults, &overrides);
        let twice = merge_headers(&once, &overrides);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn test_last_caller_header_wins() {
        let headers = map(&[("X-Mode", "a"), ("x-mode", "b")]);
        assert_eq!(headers.get("X-Mode").unwrap(), "b");
    }

    #[test]
    fn test_invalid_header_is_transport_error() {
        let err = RequestOptions::new()
            .header("bad header", "v")
            .header_map()
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_success_body_returned_unchanged() {
        let value = normalize_response(StatusCode::OK, br#"{"value": 42}"#).unwrap();
        assert_eq!(value, json!({"value": 42}));
    }

    #[test]
    fn test_success_with_bad_json_is_decode_error() {
        let err = normalize_response(StatusCode::OK, b"<html>").unwrap_err();
        assert!(err.is_decode());
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn test_failure_uses_detail() {
        let err = normalize_response(StatusCode::NOT_FOUND, br#"{"detail": "not found"}"#)
            .unwrap_err();
        assert_eq!(err.message(), "not found");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_application());
    }

    #[test]
    fn test_failure_with_unparseable_body() {
        let err = normalize_response(StatusCode::INTERNAL_SERVER_ERROR, b"Internal Server Error")
            .unwrap_err();
        assert_eq!(err.message(), "HTTP 500");
        assert!(err.is_application());
    }

    #[test]
    fn test_failure_without_detail_field() {
        let err = normalize_response(StatusCode::BAD_REQUEST, br#"{"error": "x"}"#).unwrap_err();
        assert_eq!(err.message(), "HTTP 400");

        let err = normalize_response(StatusCode::BAD_REQUEST, br#"{"detail": null}"#).unwrap_err();
        assert_eq!(err.message(), "HTTP 400");
    }

    #[test]
    fn test_message_field_is_not_a_detail() {
        let err = normalize_response(StatusCode::BAD_REQUEST, br#"{"message": "bad"}"#).unwrap_err();
        assert_eq!(err.message(), "HTTP 400");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_structured_detail_is_rendered_as_json() {
        let err = normalize_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"detail": [{"msg": "field required"}]}"#,
        )
        .unwrap_err();
        assert!(err.message().contains("field required"));
    }

    #[test]
    fn test_client_default_headers() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::with_base_url("http://localhost:8000", dir.path()).unwrap();
        config.api_auth = Some("Bearer token".to_string());

        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.default_headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(client.default_headers().get(AUTHORIZATION).unwrap(), "Bearer token");
    }

    #[test]
    fn test_client_without_auth() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_base_url("http://localhost:8000", dir.path()).unwrap();
        let client = ApiClient::new(&config).unwrap();
        assert!(client.default_headers().get(AUTHORIZATION).is_none());
    }
}
