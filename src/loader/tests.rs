//! Tests for definition loader module

use super::*;
use crate::error::Error;
use crate::http::HttpClient;
use crate::types::{BackoffType, Method};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::Write;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Parsing Tests
// ============================================================================

#[test]
fn test_load_minimal_definition() {
    let yaml = r#"
name: issues
url: https://api.example.com/issues
pagination:
  type: link_header
"#;

    let def = load_definition_from_str(yaml).unwrap();
    assert_eq!(def.name, "issues");
    assert_eq!(def.url, "https://api.example.com/issues");
    assert_eq!(def.method, Method::GET);
    assert!(def.records_path.is_none());
    assert_eq!(def.http.timeout_secs, 30);
    assert_eq!(def.http.max_retries, 3);
    assert!(matches!(
        def.pagination,
        PaginationDefinition::LinkHeader { ref rel } if rel == "next"
    ));
}

#[test]
fn test_load_cursor_definition() {
    let yaml = r#"
name: events
url: https://api.example.com/events
method: POST
body: {"filter": "all"}
headers:
  Authorization: Bearer token
query:
  limit: "50"
records_path: data.events
http:
  timeout_secs: 10
  max_retries: 1
  backoff: constant
  rate_limit:
    requests_per_second: 5
pagination:
  type: cursor
  cursor_param: after
  cursor_path: meta.next
  location: header
"#;

    let def = load_definition_from_str(yaml).unwrap();
    assert_eq!(def.method, Method::POST);
    assert_eq!(def.body, Some(json!({"filter": "all"})));
    assert_eq!(def.query.get("limit").map(String::as_str), Some("50"));
    assert_eq!(def.records_path.as_deref(), Some("data.events"));
    assert_eq!(def.http.backoff, BackoffType::Constant);
    assert_eq!(
        def.http.rate_limit.as_ref().map(|r| r.requests_per_second),
        Some(5)
    );
    match def.pagination {
        PaginationDefinition::Cursor {
            cursor_param,
            cursor_path,
            location,
        } => {
            assert_eq!(cursor_param, "after");
            assert_eq!(cursor_path, "meta.next");
            assert_eq!(location, CursorLocation::Header);
        }
        other => panic!("unexpected pagination {other:?}"),
    }
}

#[test]
fn test_load_offset_definition() {
    let yaml = r#"
name: users
url: https://api.example.com/users
pagination:
  type: offset
  offset_param: offset
  limit_param: limit
  limit: 100
  total_path: total
"#;

    let def = load_definition_from_str(yaml).unwrap();
    assert_eq!(def.pagination.kind(), "offset");
    assert!(matches!(
        def.pagination,
        PaginationDefinition::Offset {
            limit: 100,
            start_offset: 0,
            ..
        }
    ));
}

#[test]
fn test_load_page_number_definition_defaults() {
    let yaml = r#"
name: orders
url: https://api.example.com/orders
pagination:
  type: page_number
  page_param: page
  has_more_path: has_more
"#;

    let def = load_definition_from_str(yaml).unwrap();
    assert!(matches!(
        def.pagination,
        PaginationDefinition::PageNumber {
            start_page: 1,
            page_size: None,
            ..
        }
    ));
}

#[test]
fn test_load_json_definition() {
    let json = r#"{
        "name": "items",
        "url": "https://api.example.com/items",
        "pagination": {"type": "next_url", "next_url_path": "links.next"}
    }"#;

    let def = load_definition_from_str(json).unwrap();
    assert_eq!(def.pagination.kind(), "next_url");
}

#[test]
fn test_client_config_from_definition() {
    let yaml = r#"
name: items
url: https://api.example.com/items
headers:
  X-Api-Key: secret
http:
  timeout_secs: 5
  max_retries: 7
  initial_backoff_ms: 250
  user_agent: custom/1.0
pagination:
  type: link_header
"#;

    let def = load_definition_from_str(yaml).unwrap();
    let config = def.http.client_config(&def.headers);
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.max_retries, 7);
    assert_eq!(config.initial_backoff, Duration::from_millis(250));
    assert_eq!(config.user_agent, "custom/1.0");
    assert!(config.rate_limit.is_none());
    assert_eq!(
        config.default_headers.get("X-Api-Key").map(String::as_str),
        Some("secret")
    );
}

// ============================================================================
// Validation Tests
// ============================================================================

fn assert_invalid(yaml: &str, expected_field: &str) {
    match load_definition_from_str(yaml).unwrap_err() {
        Error::InvalidConfigValue { field, .. } => assert_eq!(field, expected_field),
        other => panic!("expected invalid value for {expected_field}, got {other:?}"),
    }
}

#[test]
fn test_validation_rejects_empty_name() {
    assert_invalid(
        r#"
name: ""
url: https://api.example.com/items
pagination: {type: link_header}
"#,
        "name",
    );
}

#[test]
fn test_validation_rejects_bad_url() {
    assert_invalid(
        r#"
name: items
url: /items
pagination: {type: link_header}
"#,
        "url",
    );
    assert_invalid(
        r#"
name: items
url: ftp://files.example.com/items
pagination: {type: link_header}
"#,
        "url",
    );
}

#[test]
fn test_validation_rejects_zero_limit() {
    assert_invalid(
        r#"
name: items
url: https://api.example.com/items
pagination:
  type: offset
  offset_param: offset
  limit_param: limit
  limit: 0
  total_path: total
"#,
        "pagination.limit",
    );
}

#[test]
fn test_validation_rejects_empty_cursor_path() {
    assert_invalid(
        r#"
name: items
url: https://api.example.com/items
pagination:
  type: cursor
  cursor_param: after
  cursor_path: ""
"#,
        "pagination.cursor_path",
    );
}

#[test]
fn test_validation_requires_page_size_pair() {
    assert_invalid(
        r#"
name: items
url: https://api.example.com/items
pagination:
  type: page_number
  page_param: page
  page_size_param: per_page
  has_more_path: has_more
"#,
        "pagination.page_size",
    );
}

#[test]
fn test_unknown_pagination_type_is_config_error() {
    let err = load_definition_from_str(
        r#"
name: items
url: https://api.example.com/items
pagination: {type: telepathy}
"#,
    )
    .unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("Failed to parse paginator definition"));
}

// ============================================================================
// File Loading Tests
// ============================================================================

#[test]
fn test_load_definition_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "name: items\nurl: https://api.example.com/items\npagination:\n  type: link_header"
    )
    .unwrap();

    let def = load_definition(file.path()).unwrap();
    assert_eq!(def.name, "items");
}

#[test]
fn test_load_definition_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_definition(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

// ============================================================================
// Paginator Tests
// ============================================================================

fn client() -> HttpClient {
    let config = crate::http::HttpClientConfig::builder()
        .max_retries(0)
        .no_rate_limit()
        .build();
    HttpClient::with_config(config).unwrap()
}

async fn collect(yaml: &str) -> Vec<Value> {
    let def = load_definition_from_str(yaml).unwrap();
    build_paginator(&def, client())
        .unwrap()
        .collect_items(CancellationToken::new())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_cursor_in_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(header("X-Cursor", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 3}],
            "next": null
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1}, {"id": 2}],
            "next": "c2"
        })))
        .mount(&server)
        .await;

    let yaml = format!(
        r#"
name: events
url: {}/events
records_path: data
pagination:
  type: cursor
  cursor_param: X-Cursor
  cursor_path: next
  location: header
"#,
        server.uri()
    );

    let items = collect(&yaml).await;
    assert_eq!(items, vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]);
}

#[tokio::test]
async fn test_empty_cursor_string_ends_traversal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [1, 2],
            "next": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let yaml = format!(
        r#"
name: events
url: {}/events
records_path: data
pagination: {{type: cursor, cursor_param: after, cursor_path: next}}
"#,
        server.uri()
    );

    assert_eq!(collect(&yaml).await, vec![json!(1), json!(2)]);
}

#[tokio::test]
async fn test_page_number_with_has_more_flag() {
    let server = MockServer::start().await;
    for (page, more) in [("1", true), ("2", true), ("3", false)] {
        Mock::given(method("GET"))
            .and(path("/orders"))
            .and(query_param("page", page))
            .and(query_param("per_page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "orders": [format!("p{page}")],
                "has_more": more
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let yaml = format!(
        r#"
name: orders
url: {}/orders
records_path: orders
pagination:
  type: page_number
  page_param: page
  page_size_param: per_page
  page_size: 2
  has_more_path: has_more
"#,
        server.uri()
    );

    assert_eq!(
        collect(&yaml).await,
        vec![json!("p1"), json!("p2"), json!("p3")]
    );
}

#[tokio::test]
async fn test_next_url_relative_to_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [3],
            "links": {"next": null}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [1, 2],
            "links": {"next": "/items?page=2"}
        })))
        .mount(&server)
        .await;

    let yaml = format!(
        r#"
name: items
url: {}/items
records_path: items
pagination:
  type: next_url
  next_url_path: links.next
"#,
        server.uri()
    );

    assert_eq!(collect(&yaml).await, vec![json!(1), json!(2), json!(3)]);
}

#[tokio::test]
async fn test_offset_without_total_is_extraction_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": [1]})))
        .mount(&server)
        .await;

    let yaml = format!(
        r#"
name: users
url: {}/users
records_path: users
pagination:
  type: offset
  offset_param: offset
  limit_param: limit
  limit: 1
  total_path: total
"#,
        server.uri()
    );

    let def = load_definition_from_str(&yaml).unwrap();
    let results: Vec<_> = futures::StreamExt::collect::<Vec<_>>(
        build_paginator(&def, client()).unwrap().all_items(),
    )
    .await;
    assert_eq!(results.len(), 2);
    assert_eq!(*results[0].as_ref().unwrap(), json!(1));
    assert!(matches!(results[1], Err(Error::Extraction { .. })));
}

fn offset_yaml(uri: &str) -> String {
    format!(
        r#"
name: users
url: {uri}/users
records_path: items
pagination:
  type: offset
  offset_param: offset
  limit_param: limit
  limit: 2
  total_path: total
"#
    )
}

#[tokio::test]
async fn test_offset_empty_page_with_stale_total_stops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [1, 2],
            "total": 5
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [],
            "total": 5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = tokio::time::timeout(Duration::from_secs(5), collect(&offset_yaml(&server.uri())))
        .await
        .expect("traversal should end");
    assert_eq!(items, vec![json!(1), json!(2)]);
}

#[tokio::test]
async fn test_offset_empty_first_page_is_single_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [],
            "total": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = tokio::time::timeout(Duration::from_secs(5), collect(&offset_yaml(&server.uri())))
        .await
        .expect("traversal should end");
    assert!(items.is_empty());
}
