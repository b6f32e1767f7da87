//! JSON strategies

use super::path::extract_records;
use crate::error::Result;
use crate::http::HttpPage;
use crate::pagination::{ContextExtractor, ItemExtractor};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Context Extraction
// ============================================================================

/// Context extractor that deserializes an [`HttpPage`] body into `D`
pub struct JsonContextExtractor<D> {
    _target: PhantomData<fn() -> D>,
}

impl<D> JsonContextExtractor<D> {
    /// Create a new extractor
    pub fn new() -> Self {
        Self {
            _target: PhantomData,
        }
    }
}

impl<D> Default for JsonContextExtractor<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for JsonContextExtractor<D> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<D> std::fmt::Debug for JsonContextExtractor<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JsonContextExtractor")
    }
}

#[async_trait]
impl<D> ContextExtractor<HttpPage, D> for JsonContextExtractor<D>
where
    D: DeserializeOwned + Send + 'static,
{
    async fn extract_context(&self, page: HttpPage, _cancel: &CancellationToken) -> Result<D> {
        page.json()
    }
}

// ============================================================================
// Item Extraction
// ============================================================================

/// Item extractor that lists the records found at a path in a JSON context
#[derive(Debug, Clone, Default)]
pub struct JsonRecords {
    path: Option<String>,
}

impl JsonRecords {
    /// Records at `path`
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// The context itself is the record list
    pub fn root() -> Self {
        Self::default()
    }

    /// Extract records from a value
    pub fn extract(&self, value: &Value) -> Result<Vec<Value>> {
        extract_records(value, self.path.as_deref())
    }
}

#[async_trait]
impl ItemExtractor<Value, Value> for JsonRecords {
    async fn extract_items(
        &self,
        context: &Value,
        _cancel: &CancellationToken,
    ) -> Result<Vec<Value>> {
        self.extract(context)
    }
}
