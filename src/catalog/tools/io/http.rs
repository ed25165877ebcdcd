//! HTTP access to the catalog.
//!
//! The exporters only ever need "GET this URL and hand me the body", so both
//! the async and the blocking flavour are expressed as one-method traits.
//! Tests plug in in-memory implementations.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::catalog::tools::error::{Result, ToolError};

/// Async text fetcher used by the concurrent exporter.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String>;
}

/// Blocking text fetcher used by the sequential exporter.
pub trait BlockingCatalogClient {
    fn get_text(&self, url: &str) -> Result<String>;
}

/// [`CatalogClient`] backed by `reqwest`. Every request is bounded by the
/// configured timeout and gets exactly one attempt.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: reqwest::Client,
}

impl HttpCatalogClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn get_text(&self, url: &str) -> Result<String> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// [`BlockingCatalogClient`] backed by `reqwest::blocking`.
#[derive(Debug, Clone)]
pub struct BlockingHttpCatalogClient {
    client: reqwest::blocking::Client,
}

impl BlockingHttpCatalogClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl BlockingCatalogClient for BlockingHttpCatalogClient {
    fn get_text(&self, url: &str) -> Result<String> {
        debug!(%url, "GET");
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text()?)
    }
}
