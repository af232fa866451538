//! Stateless JSON-over-HTTP client for the catalog service.

use std::time::Duration;

use reqwest::Url;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use thiserror::Error;

use crate::config::CatalogConfig;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("request timed out")]
    TimedOut,
    #[error("HTTP {code}: {status_text}")]
    Status { code: u16, status_text: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl HttpError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::TimedOut
        } else {
            HttpError::Network(err.to_string())
        }
    }
}

/// Ordered query parameters. `None` values are dropped from the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, Option<String>)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.0.push((key.to_string(), Some(value.to_string())));
        self
    }

    pub fn with_opt<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        self.0.push((key.to_string(), value.map(|v| v.to_string())));
        self
    }

    fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }
}

/// Issues timed-out GET requests with the static catalog credentials attached.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    api_key: String,
    default_timeout: Duration,
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            default_timeout: config.timeout(),
            inner: reqwest::Client::new(),
        }
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Base URL + endpoint path + present query parameters.
    pub fn build_url(&self, endpoint: &str, params: &QueryParams) -> Result<Url, HttpError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint))
            .map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
        let mut present = params.present().peekable();
        if present.peek().is_some() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in present {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    fn credential_headers(&self) -> Result<HeaderMap, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("apikey"),
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| HttpError::InvalidHeader(e.to_string()))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| HttpError::InvalidHeader(e.to_string()))?,
        );
        Ok(headers)
    }

    /// GET `endpoint` and return the JSON body verbatim.
    pub async fn request(
        &self,
        endpoint: &str,
        params: &QueryParams,
        timeout: Duration,
    ) -> Result<Value, HttpError> {
        self.request_with_headers(endpoint, params, timeout, &HeaderMap::new())
            .await
    }

    /// Like [`request`](Self::request), with caller headers layered over the
    /// credential headers. Callers can replace a credential header's value but
    /// never drop it.
    pub async fn request_with_headers(
        &self,
        endpoint: &str,
        params: &QueryParams,
        timeout: Duration,
        extra: &HeaderMap,
    ) -> Result<Value, HttpError> {
        let url = self.build_url(endpoint, params)?;

        let mut headers = self.credential_headers()?;
        for (name, value) in extra {
            headers.insert(name.clone(), value.clone());
        }

        tracing::debug!(%url, timeout_ms = timeout.as_millis() as u64, "catalog request");

        // The per-request timeout covers connect, headers and body; on expiry
        // reqwest drops the connection.
        let resp = self
            .inner
            .get(url)
            .headers(headers)
            .timeout(timeout)
            .send()
            .await
            .map_err(HttpError::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                code: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = resp.bytes().await.map_err(HttpError::from_reqwest)?;
        serde_json::from_slice(&body).map_err(|e| HttpError::Decode(e.to_string()))
    }
}
