//! HTTP page retriever
//!
//! Bridges a request planner to the [`PageRetriever`] contract. The planner
//! looks at the prior context and says which request fetches the next page;
//! the retriever sends it and hands back the raw [`HttpPage`].

use super::client::{HttpClient, RequestConfig};
use super::page::HttpPage;
use super::query::with_query_params;
use crate::error::Result;
use crate::pagination::{PageRetriever, PriorContext};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::marker::PhantomData;
use tokio_util::sync::CancellationToken;
use url::Url;

/// The request that fetches one page
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// HTTP method
    pub method: Method,
    /// Target URL, query included
    pub url: Url,
    /// Headers, body, and per-request overrides
    pub config: RequestConfig,
}

impl PageRequest {
    /// Create a request
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            config: RequestConfig::default(),
        }
    }

    /// Create a GET request
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Add or replace a query parameter
    #[must_use]
    pub fn query(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.url = with_query_params(&self.url, [(key, value)]);
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config = self.config.header(key, value);
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.config = self.config.json(body);
        self
    }
}

/// [`PageRetriever`] that plans a request per page and sends it over HTTP
pub struct HttpPageRetriever<C, F> {
    client: HttpClient,
    planner: F,
    _context: PhantomData<fn(&C)>,
}

impl<C, F> HttpPageRetriever<C, F>
where
    F: Fn(&PriorContext<C>) -> Result<PageRequest>,
{
    /// Create a retriever from a client and a request planner
    pub fn new(client: HttpClient, planner: F) -> Self {
        Self {
            client,
            planner,
            _context: PhantomData,
        }
    }
}

impl<C, F> std::fmt::Debug for HttpPageRetriever<C, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageRetriever")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C, F> PageRetriever<C, HttpPage> for HttpPageRetriever<C, F>
where
    C: Sync + 'static,
    F: Fn(&PriorContext<C>) -> Result<PageRequest> + Send + Sync + 'static,
{
    async fn fetch(
        &self,
        prior: &PriorContext<C>,
        cancel: &CancellationToken,
    ) -> Result<HttpPage> {
        let request = (self.planner)(prior)?;
        self.client.fetch_page(&request, cancel).await
    }
}
