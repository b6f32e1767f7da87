//! Tests for decode module

use super::*;
use crate::error::Error;
use crate::http::HttpPage;
use crate::pagination::{ContextExtractor, ItemExtractor};
use pretty_assertions::assert_eq;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

fn sample() -> Value {
    json!({
        "data": {
            "items": [{"id": 1}, {"id": 2}, {"id": 3}],
            "empty": [],
            "nothing": null
        },
        "meta": {
            "next_cursor": "abc",
            "total": 42,
            "offset": "10",
            "has_more": true
        }
    })
}

// ============================================================================
// Path Tests
// ============================================================================

#[test]
fn test_extract_path_dot_notation() {
    let value = sample();
    assert_eq!(extract_path(&value, "meta.total"), Some(&json!(42)));
    assert_eq!(extract_path(&value, "$.meta.total"), Some(&json!(42)));
    assert_eq!(extract_path(&value, "meta.missing"), None);
    assert_eq!(extract_path(&value, "$"), Some(&value));
    assert_eq!(extract_path(&value, ""), Some(&value));
}

#[test]
fn test_extract_path_array_indices() {
    let value = sample();
    assert_eq!(extract_path(&value, "data.items[0].id"), Some(&json!(1)));
    assert_eq!(extract_path(&value, "data.items[-1].id"), Some(&json!(3)));
    assert_eq!(extract_path(&value, "data.items[3]"), None);
    assert_eq!(extract_path(&value, "data.items[-4]"), None);
    assert_eq!(extract_path(&value, "meta[0]"), None);

    let nested = json!({"grid": [[1, 2], [3, 4]]});
    assert_eq!(extract_path(&nested, "grid[1][0]"), Some(&json!(3)));
}

#[test]
fn test_extract_string() {
    let value = sample();
    assert_eq!(extract_string(&value, "meta.next_cursor").as_deref(), Some("abc"));
    assert_eq!(extract_string(&value, "meta.total").as_deref(), Some("42"));
    assert_eq!(extract_string(&value, "meta.has_more").as_deref(), Some("true"));
    assert_eq!(extract_string(&value, "data.nothing"), None);
    assert_eq!(extract_string(&value, "data.items"), None);
    assert_eq!(extract_string(&value, "meta.absent"), None);
}

#[test]
fn test_extract_u64() {
    let value = sample();
    assert_eq!(extract_u64(&value, "meta.total"), Some(42));
    assert_eq!(extract_u64(&value, "meta.offset"), Some(10));
    assert_eq!(extract_u64(&value, "meta.next_cursor"), None);
    assert_eq!(extract_u64(&json!({"n": -1}), "n"), None);
}

#[test]
fn test_extract_records() {
    let value = sample();
    assert_eq!(
        extract_records(&value, Some("data.items")).unwrap(),
        vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]
    );
    assert!(extract_records(&value, Some("data.empty")).unwrap().is_empty());
    assert!(extract_records(&value, Some("data.nothing")).unwrap().is_empty());
    assert!(extract_records(&value, Some("data.absent")).unwrap().is_empty());
    assert_eq!(
        extract_records(&value, Some("meta.total")).unwrap(),
        vec![json!(42)]
    );
}

#[test]
fn test_extract_records_without_path() {
    assert_eq!(
        extract_records(&json!([1, 2]), None).unwrap(),
        vec![json!(1), json!(2)]
    );
    assert_eq!(
        extract_records(&json!({"id": 1}), None).unwrap(),
        vec![json!({"id": 1})]
    );
}

#[test]
fn test_extract_records_wildcard() {
    let value = sample();
    let ids = extract_records(&value, Some("$.data.items[*].id")).unwrap();
    assert_eq!(ids.len(), 3);
}

// ============================================================================
// Strategy Tests
// ============================================================================

#[derive(Debug, Deserialize, PartialEq)]
struct Listing {
    items: Vec<u32>,
    next: Option<String>,
}

fn page(body: &'static str) -> HttpPage {
    HttpPage::new(
        url::Url::parse("https://api.example.com/items").unwrap(),
        200,
        HeaderMap::new(),
        body,
    )
}

#[tokio::test]
async fn test_json_context_extractor() {
    let extractor = JsonContextExtractor::<Listing>::new();
    let listing = extractor
        .extract_context(page(r#"{"items": [1, 2], "next": "n2"}"#), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(
        listing,
        Listing {
            items: vec![1, 2],
            next: Some("n2".into())
        }
    );
}

#[tokio::test]
async fn test_json_context_extractor_rejects_bad_body() {
    let extractor = JsonContextExtractor::<Listing>::new();
    let err = extractor
        .extract_context(page("<html>oops</html>"), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("https://api.example.com/items"));
}

#[tokio::test]
async fn test_json_records_item_extractor() {
    let cancel = CancellationToken::new();
    let items = JsonRecords::at("data.items")
        .extract_items(&sample(), &cancel)
        .await
        .unwrap();
    assert_eq!(items.len(), 3);

    let root = JsonRecords::root()
        .extract_items(&json!([1, 2, 3, 4]), &cancel)
        .await
        .unwrap();
    assert_eq!(root.len(), 4);
}
