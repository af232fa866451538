//! Typed catalog API over the `{success, data, error}` response envelope.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use quotelink_core::{Manufacturer, ProductPage, SearchQuery};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::config::{CatalogConfig, Endpoints};
use crate::http::{HttpClient, HttpError, QueryParams};

const INVALID_RESPONSE: &str = "Invalid response format";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Http(#[from] HttpError),
    /// The service answered, but not with usable data.
    #[error("catalog rejected request: {message}")]
    Rejected { message: String },
}

impl CatalogError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, CatalogError::Http(HttpError::TimedOut))
    }
}

/// Which backing lookup a product search goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductEndpoint {
    /// Catalog-only search.
    Search,
    /// Catalog blended with CRM-local products.
    Hybrid,
}

impl ProductEndpoint {
    pub fn from_hybrid_flag(hybrid: bool) -> Self {
        if hybrid {
            ProductEndpoint::Hybrid
        } else {
            ProductEndpoint::Search
        }
    }
}

/// Catalog operations the interaction controller depends on.
pub trait CatalogApi: Send + Sync + 'static {
    fn manufacturers(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Manufacturer>, CatalogError>> + Send;

    fn products(
        &self,
        endpoint: ProductEndpoint,
        query: SearchQuery,
        limit: u32,
    ) -> impl Future<Output = Result<ProductPage, CatalogError>> + Send;
}

impl<T: CatalogApi> CatalogApi for Arc<T> {
    fn manufacturers(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Manufacturer>, CatalogError>> + Send {
        (**self).manufacturers(limit)
    }

    fn products(
        &self,
        endpoint: ProductEndpoint,
        query: SearchQuery,
        limit: u32,
    ) -> impl Future<Output = Result<ProductPage, CatalogError>> + Send {
        (**self).products(endpoint, query, limit)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ManufacturerData {
    #[serde(default)]
    manufacturers: Option<Vec<Manufacturer>>,
}

impl Envelope {
    /// Unwrap `data`, or fail with the service's error message.
    fn into_data(self) -> Result<Value, CatalogError> {
        let message = self.error.and_then(|e| e.message);
        match self.data {
            Some(data) if self.success && !data.is_null() => Ok(data),
            _ => Err(CatalogError::rejected(
                message.unwrap_or_else(|| INVALID_RESPONSE.to_string()),
            )),
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, CatalogError> {
    serde_json::from_value(value).map_err(|e| CatalogError::Http(HttpError::Decode(e.to_string())))
}

/// [`CatalogApi`] backed by the real service.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: HttpClient,
    endpoints: Endpoints,
    timeout: Duration,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Self {
        let http = HttpClient::new(config);
        Self {
            timeout: http.default_timeout(),
            http,
            endpoints: config.endpoints.clone(),
        }
    }

    pub fn endpoint_path(&self, endpoint: ProductEndpoint) -> &str {
        match endpoint {
            ProductEndpoint::Search => &self.endpoints.product_search,
            ProductEndpoint::Hybrid => &self.endpoints.hybrid_lookup,
        }
    }

    async fn fetch_data(&self, path: &str, params: QueryParams) -> Result<Value, CatalogError> {
        let body = self.http.request(path, &params, self.timeout).await?;
        decode::<Envelope>(body)?.into_data()
    }

    pub async fn fetch_manufacturers(&self, limit: u32) -> Result<Vec<Manufacturer>, CatalogError> {
        let params = QueryParams::new().with("limit", limit);
        let data = self
            .fetch_data(&self.endpoints.manufacturer_lookup, params)
            .await?;

        decode::<ManufacturerData>(data)?
            .manufacturers
            .ok_or_else(|| CatalogError::rejected(INVALID_RESPONSE))
    }

    pub async fn fetch_products(
        &self,
        endpoint: ProductEndpoint,
        query: &SearchQuery,
        limit: u32,
    ) -> Result<ProductPage, CatalogError> {
        let params = QueryParams::new()
            .with("manufacturer", query.manufacturer())
            .with("search", query.term())
            .with("limit", limit);
        let data = self.fetch_data(self.endpoint_path(endpoint), params).await?;
        decode(data)
    }
}

impl CatalogApi for CatalogClient {
    async fn manufacturers(&self, limit: u32) -> Result<Vec<Manufacturer>, CatalogError> {
        self.fetch_manufacturers(limit).await
    }

    async fn products(
        &self,
        endpoint: ProductEndpoint,
        query: SearchQuery,
        limit: u32,
    ) -> Result<ProductPage, CatalogError> {
        self.fetch_products(endpoint, &query, limit).await
    }
}
