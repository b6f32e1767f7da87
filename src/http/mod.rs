//! HTTP module
//!
//! Transport for paginated HTTP sources.
//!
//! # Features
//!
//! - **Automatic Retries**: Transient failures are retried with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Raw Pages**: [`HttpPage`] keeps status, headers, and body for decoding
//! - **Retriever**: [`HttpPageRetriever`] plugs a request planner into the
//!   paginator

mod client;
mod page;
mod query;
mod rate_limit;
mod retriever;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use page::{parse_link_header, HttpPage};
pub use query::with_query_params;
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use retriever::{HttpPageRetriever, PageRequest};
