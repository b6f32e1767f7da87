//! Loader types
//!
//! Declarative paginator definitions for YAML or JSON documents.

use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{BackoffType, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

// ============================================================================
// Paginator Definition
// ============================================================================

/// A paginated JSON API endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PaginatorDefinition {
    /// Name used in logs
    pub name: String,
    /// Absolute URL of the first page
    pub url: String,
    /// HTTP method
    #[serde(default)]
    pub method: Method,
    /// Headers sent with every page request
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Static query parameters sent with every page request
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    /// JSON request body
    #[serde(default)]
    pub body: Option<Value>,
    /// Path to the records in each page; the whole body when absent
    #[serde(default)]
    pub records_path: Option<String>,
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpDefinition,
    /// How pages follow each other
    pub pagination: PaginationDefinition,
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpDefinition {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum retries per page request
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Backoff between retries
    #[serde(default)]
    pub backoff: BackoffType,
    /// Initial backoff in milliseconds
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,
    /// Rate limit; unlimited when absent
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpDefinition {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff(),
            rate_limit: None,
            user_agent: None,
        }
    }
}

impl HttpDefinition {
    /// Build the client configuration these settings describe
    pub fn client_config(&self, headers: &HashMap<String, String>) -> HttpClientConfig {
        let defaults = HttpClientConfig::default();
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff,
                Duration::from_millis(self.initial_backoff_ms),
                defaults.max_backoff,
            )
            .no_rate_limit();

        if let Some(ref rate_limit) = self.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }
        if let Some(ref agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    3
}

fn default_initial_backoff() -> u64 {
    100
}

// ============================================================================
// Pagination Definition
// ============================================================================

/// How the next page is requested and when the traversal stops
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaginationDefinition {
    /// Opaque continuation token; stops when the token is absent
    Cursor {
        /// Name of the query parameter (or header) carrying the cursor
        cursor_param: String,
        /// Path to the next cursor in the response body
        cursor_path: String,
        /// Where the cursor is sent
        #[serde(default)]
        location: CursorLocation,
    },
    /// Offset and limit; stops once the offset reaches the reported total
    Offset {
        /// Offset parameter name
        offset_param: String,
        /// Limit parameter name
        limit_param: String,
        /// Page size
        limit: u64,
        /// Path to the total item count in the response body
        total_path: String,
        /// Offset of the first page
        #[serde(default)]
        start_offset: u64,
    },
    /// Page number; stops when the has-more flag is false
    PageNumber {
        /// Page parameter name
        page_param: String,
        /// First page number (usually 0 or 1)
        #[serde(default = "default_start_page")]
        start_page: u64,
        /// Page size parameter name
        #[serde(default)]
        page_size_param: Option<String>,
        /// Page size
        #[serde(default)]
        page_size: Option<u64>,
        /// Path to the boolean has-more flag in the response body
        has_more_path: String,
    },
    /// RFC 5988 `Link` header; stops when no link with the relation is present
    LinkHeader {
        /// Relation to follow
        #[serde(default = "default_link_rel")]
        rel: String,
    },
    /// URL of the next page in the response body; stops when absent
    NextUrl {
        /// Path to the next URL in the response body
        next_url_path: String,
    },
}

impl PaginationDefinition {
    /// Short name of the pagination type
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cursor { .. } => "cursor",
            Self::Offset { .. } => "offset",
            Self::PageNumber { .. } => "page_number",
            Self::LinkHeader { .. } => "link_header",
            Self::NextUrl { .. } => "next_url",
        }
    }
}

fn default_start_page() -> u64 {
    1
}

fn default_link_rel() -> String {
    "next".to_string()
}

/// Where a cursor is sent on the next request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorLocation {
    /// As a query parameter
    #[default]
    Query,
    /// As a request header
    Header,
}
