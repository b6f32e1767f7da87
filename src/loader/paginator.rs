//! Paginators for declarative JSON APIs
//!
//! A [`PaginatorDefinition`] becomes a `Paginator<JsonPage, Value>`: a
//! [`JsonApiRetriever`] plans each request from the previous page, and the
//! termination policy follows the pagination type.
//!
//! | type          | next request                  | continues while                           |
//! |---------------|-------------------------------|-------------------------------------------|
//! | `cursor`      | cursor from the previous body | the body carries a cursor                 |
//! | `offset`      | offset + records received     | `offset < total` and the page had records |
//! | `page_number` | previous page number + 1      | the has-more flag is true                 |
//! | `link_header` | `Link` header target          | the header has the relation               |
//! | `next_url`    | URL from the previous body    | the body carries a URL                    |

use crate::decode::{extract_path, extract_records, extract_string, extract_u64};
use crate::engine::Paginator;
use crate::error::{Error, Result};
use crate::http::{with_query_params, HttpClient, PageRequest};
use crate::loader::types::{CursorLocation, PaginationDefinition, PaginatorDefinition};
use crate::pagination::{OffsetState, PageRetriever, PriorContext};
use crate::types::OptionStringExt;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// Context of one fetched JSON page
#[derive(Debug, Clone)]
pub struct JsonPage {
    /// URL the page was requested from
    pub url: Url,
    /// Parsed body; `Null` for an empty body
    pub body: Value,
    /// Records found at the definition's records path
    pub records: Vec<Value>,
    /// Offset or page number this page was requested with
    pub position: u64,
    /// Target of the followed `Link` relation, if any
    pub next_link: Option<Url>,
}

impl JsonPage {
    /// Number of records on this page
    pub fn record_count(&self) -> u64 {
        self.records.len() as u64
    }
}

/// Build the client a definition asks for
pub fn client_for(definition: &PaginatorDefinition) -> Result<HttpClient> {
    HttpClient::with_config(definition.http.client_config(&definition.headers))
}

/// Assemble a paginator from a definition
pub fn build_paginator(
    definition: &PaginatorDefinition,
    client: HttpClient,
) -> Result<Paginator<JsonPage, Value>> {
    let retriever = JsonApiRetriever::new(definition, client)?;
    let builder = Paginator::<JsonPage, Value>::builder()
        .page_retriever(retriever)
        .item_extractor_fn(|page: &JsonPage| Ok(page.records.clone()));

    let builder = match definition.pagination.clone() {
        PaginationDefinition::Cursor { cursor_path, .. } => {
            builder.cursor_extractor_fn(move |page: &JsonPage| {
                Ok(extract_string(&page.body, &cursor_path).none_if_empty())
            })
        }
        PaginationDefinition::Offset { total_path, .. } => {
            builder.offset_state_extractor_fn(move |page: &JsonPage| {
                let total = extract_u64(&page.body, &total_path).ok_or_else(|| {
                    Error::extraction(format!(
                        "No total count at '{total_path}' in page {}",
                        page.url
                    ))
                })?;
                if page.records.is_empty() {
                    // No progress; the next request would repeat this offset
                    debug!(
                        "Empty page at offset {} of {total}, stopping",
                        page.position
                    );
                    return Ok(OffsetState::new(total, total));
                }
                Ok(OffsetState::new(page.position + page.record_count(), total))
            })
        }
        PaginationDefinition::PageNumber { has_more_path, .. } => {
            builder.termination_predicate_fn(move |page: &JsonPage| {
                Ok(has_more(&page.body, &has_more_path))
            })
        }
        PaginationDefinition::LinkHeader { .. } => {
            builder.termination_predicate_fn(|page: &JsonPage| Ok(page.next_link.is_some()))
        }
        PaginationDefinition::NextUrl { next_url_path } => {
            builder.cursor_extractor_fn(move |page: &JsonPage| {
                Ok(extract_string(&page.body, &next_url_path).none_if_empty())
            })
        }
    };

    builder.build()
}

/// Read a has-more flag, accepting booleans and `"true"`/`"false"` strings
fn has_more(body: &Value, path: &str) -> bool {
    match extract_path(body, path) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

// ============================================================================
// Retriever
// ============================================================================

/// Page retriever for a declarative JSON API
pub struct JsonApiRetriever {
    client: HttpClient,
    definition: Arc<PaginatorDefinition>,
    first_url: Url,
}

impl JsonApiRetriever {
    /// Create a retriever for a definition
    pub fn new(definition: &PaginatorDefinition, client: HttpClient) -> Result<Self> {
        let url = Url::parse(&definition.url)?;
        Ok(Self {
            client,
            first_url: with_query_params(&url, &definition.query),
            definition: Arc::new(definition.clone()),
        })
    }

    /// Plan the request for the page after `prior`
    fn plan(&self, prior: &PriorContext<JsonPage>) -> Result<(PageRequest, u64)> {
        let def = &self.definition;
        let previous = prior.context();

        let (url, position, cursor_header) = match &def.pagination {
            PaginationDefinition::Cursor {
                cursor_param,
                cursor_path,
                location,
            } => {
                let cursor = match previous {
                    None => None,
                    Some(page) => Some(
                        extract_string(&page.body, cursor_path)
                            .none_if_empty()
                            .ok_or_else(|| missing_continuation("cursor", cursor_path, page))?,
                    ),
                };
                match (cursor, location) {
                    (None, _) => (self.first_url.clone(), 0, None),
                    (Some(cursor), CursorLocation::Query) => (
                        with_query_params(&self.first_url, [(cursor_param, cursor)]),
                        0,
                        None,
                    ),
                    (Some(cursor), CursorLocation::Header) => {
                        (self.first_url.clone(), 0, Some((cursor_param, cursor)))
                    }
                }
            }
            PaginationDefinition::Offset {
                offset_param,
                limit_param,
                limit,
                start_offset,
                ..
            } => {
                let offset = previous.map_or(*start_offset, |page| {
                    page.position + page.record_count()
                });
                let url = with_query_params(
                    &self.first_url,
                    [
                        (offset_param.as_str(), offset.to_string()),
                        (limit_param.as_str(), limit.to_string()),
                    ],
                );
                (url, offset, None)
            }
            PaginationDefinition::PageNumber {
                page_param,
                start_page,
                page_size_param,
                page_size,
                ..
            } => {
                let number = previous.map_or(*start_page, |page| page.position + 1);
                let mut url =
                    with_query_params(&self.first_url, [(page_param, number.to_string())]);
                if let (Some(param), Some(size)) = (page_size_param, page_size) {
                    url = with_query_params(&url, [(param, size.to_string())]);
                }
                (url, number, None)
            }
            PaginationDefinition::LinkHeader { rel } => match previous {
                None => (self.first_url.clone(), 0, None),
                Some(page) => {
                    let next = page
                        .next_link
                        .clone()
                        .ok_or_else(|| missing_continuation("link", rel, page))?;
                    (next, 0, None)
                }
            },
            PaginationDefinition::NextUrl { next_url_path } => match previous {
                None => (self.first_url.clone(), 0, None),
                Some(page) => {
                    let next = extract_string(&page.body, next_url_path)
                        .none_if_empty()
                        .ok_or_else(|| missing_continuation("next URL", next_url_path, page))?;
                    (page.url.join(&next)?, 0, None)
                }
            },
        };

        let mut request = PageRequest::new(def.method.into(), url);
        if let Some((name, value)) = cursor_header {
            request = request.header(name.as_str(), value);
        }
        if let Some(ref body) = def.body {
            request = request.json(body.clone());
        }
        Ok((request, position))
    }
}

impl std::fmt::Debug for JsonApiRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonApiRetriever")
            .field("name", &self.definition.name)
            .field("pagination", &self.definition.pagination.kind())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PageRetriever<JsonPage> for JsonApiRetriever {
    async fn fetch(
        &self,
        prior: &PriorContext<JsonPage>,
        cancel: &CancellationToken,
    ) -> Result<JsonPage> {
        let (request, position) = self.plan(prior)?;
        debug!("{}: requesting {}", self.definition.name, request.url);

        let page = self.client.fetch_page(&request, cancel).await?;
        let body = if page.body().is_empty() {
            Value::Null
        } else {
            page.json()?
        };
        let records = extract_records(&body, self.definition.records_path.as_deref())?;
        let next_link = match &self.definition.pagination {
            PaginationDefinition::LinkHeader { rel } => page.link(rel),
            _ => None,
        };

        Ok(JsonPage {
            url: request.url,
            body,
            records,
            position,
            next_link,
        })
    }
}

fn missing_continuation(what: &str, at: &str, page: &JsonPage) -> Error {
    Error::extraction(format!(
        "No {what} at '{at}' in page {} to continue from",
        page.url
    ))
}
