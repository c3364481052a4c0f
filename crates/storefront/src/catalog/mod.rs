//! Catalog API client.
//!
//! # Architecture
//!
//! - Plain REST + JSON over `reqwest`; the remote catalog is the source of
//!   truth and exposes four read-only endpoints
//! - Every failure mode (transport, non-success status, body decode)
//!   collapses into [`CatalogError`]; callers treat all of them as a single
//!   "fetch failed" condition
//! - No retries, no timeouts, no caching here - the product detail cache
//!   lives in the [store](crate::store) where it is persisted
//!
//! # Example
//!
//! ```rust,ignore
//! use driftwood_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog);
//!
//! let products = client.get_products().await?;
//! let product = client.get_product(ProductId::new(1)).await?;
//! let categories = client.get_categories().await?;
//! ```

mod types;

pub use types::{Product, Rating};

use std::sync::Arc;

use driftwood_core::ProductId;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use crate::config::CatalogConfig;

/// Errors that can occur when fetching from the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP transport failed (connection, DNS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog responded with a non-success status.
    #[error("catalog returned HTTP {status}")]
    Status {
        /// Response status code.
        status: StatusCode,
    },

    /// The response body was not catalog-shaped JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the remote product catalog.
///
/// Cheaply cloneable; the underlying `reqwest::Client` and endpoint are
/// shared behind an `Arc`.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.as_str().trim_end_matches('/').to_owned(),
            }),
        }
    }

    /// Execute a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}/{path}", self.inner.base_url);

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "catalog returned non-success status"
            );
            return Err(CatalogError::Status { status });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(200).collect::<String>(),
                "failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decode fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.get_json("products").await
    }

    /// Fetch a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decode fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.get_json(&format!("products/{id}")).await
    }

    /// Fetch the list of category labels.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decode fails.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<String>, CatalogError> {
        self.get_json("products/categories").await
    }

    /// Fetch the products belonging to a single category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decode fails.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn get_products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, CatalogError> {
        self.get_json(&format!(
            "products/category/{}",
            urlencoding::encode(category)
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::Status {
            status: StatusCode::NOT_FOUND,
        };
        assert_eq!(err.to_string(), "catalog returned HTTP 404 Not Found");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = CatalogConfig {
            base_url: "https://fakestoreapi.com/".parse().expect("valid url"),
        };
        let client = CatalogClient::new(&config);
        assert_eq!(client.inner.base_url, "https://fakestoreapi.com");
    }
}
