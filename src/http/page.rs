//! Raw HTTP page

use crate::error::{Error, Result};
use bytes::Bytes;
use reqwest::header::{HeaderMap, LINK};
use reqwest::Response;
use serde::de::DeserializeOwned;
use url::Url;

/// One fetched page as the server returned it
///
/// The body is buffered so a page can be decoded more than once.
#[derive(Debug, Clone)]
pub struct HttpPage {
    url: Url,
    status: u16,
    headers: HeaderMap,
    body: Bytes,
}

impl HttpPage {
    /// Create a page from its parts
    pub fn new(url: Url, status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            url,
            status,
            headers,
            body: body.into(),
        }
    }

    /// Buffer a response into a page
    pub async fn from_response(response: Response) -> Result<Self> {
        let url = response.url().clone();
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(Self::new(url, status, headers, body))
    }

    /// Final URL of the page, after redirects
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Raw body
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Deserialize the body as JSON
    pub fn json<D: DeserializeOwned>(&self) -> Result<D> {
        serde_json::from_slice(&self.body)
            .map_err(|e| Error::decode(format!("Invalid JSON body from {}: {e}", self.url)))
    }

    /// Body as UTF-8 text
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| Error::decode(format!("Body from {} is not UTF-8: {e}", self.url)))
    }

    /// Target of the `Link` header entry with relation `rel`
    ///
    /// Relative targets are resolved against the page URL.
    pub fn link(&self, rel: &str) -> Option<Url> {
        self.headers
            .get_all(LINK)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|header| parse_link_header(header, rel))
            .and_then(|target| self.url.join(&target).ok())
    }
}

/// Find the target with relation `rel` in an RFC 5988 `Link` header
///
/// `<https://api.example.com/items?page=2>; rel="next", <...>; rel="last"`
pub fn parse_link_header(header: &str, rel: &str) -> Option<String> {
    header
        .split(',')
        .filter_map(|entry| {
            let (target, params) = entry.trim().split_once(';')?;
            let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
            let rels = params
                .split(';')
                .find_map(|param| param.trim().strip_prefix("rel="))?;
            Some((target, rels.trim_matches(|c| c == '"' || c == '\'')))
        })
        .find(|(_, rels)| {
            rels.split_whitespace()
                .any(|candidate| candidate.eq_ignore_ascii_case(rel))
        })
        .map(|(target, _)| target.to_string())
}
