//! Integration tests using mock HTTP server
//!
//! Tests the full flow: JSON:API endpoint → JsonApiFetcher → lazy lists

use futures::TryStreamExt;
use pagewise::fetch::{BlockingFetcher, FromJson, Mapped};
use pagewise::http::{Filters, HttpClient, HttpClientConfig, JsonApiFetcher};
use pagewise::{AsyncLazyPagedList, Error, ErrorKind, LazyPagedList, ListOptions};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn document(ids: &[&str], next: Option<String>) -> Value {
    let data: Vec<Value> = ids
        .iter()
        .map(|id| json!({"type": "transactions", "id": id, "attributes": {"amount": 10}}))
        .collect();
    json!({"data": data, "links": {"prev": null, "next": next}})
}

fn next_link(server: &MockServer, after: &str, size: usize) -> String {
    format!(
        "{}/transactions?page%5Bafter%5D={after}&page%5Bsize%5D={size}",
        server.uri()
    )
}

fn fetcher_for(server: &MockServer) -> JsonApiFetcher {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .token("up:yeah:test")
        .build();
    JsonApiFetcher::new(Arc::new(HttpClient::with_config(config).unwrap()), "transactions")
}

fn ids(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|item| item["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

// ============================================================================
// Async List Tests
// ============================================================================

#[tokio::test]
async fn test_async_list_follows_next_links() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .and(header("Authorization", "Bearer up:yeah:test"))
        .and(query_param("page[size]", "2"))
        .and(query_param("filter[status]", "SETTLED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document(
            &["t1", "t2"],
            Some(next_link(&mock_server, "p2", 2)),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .and(query_param("page[after]", "p2"))
        .and(query_param("page[size]", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document(&["t3"], None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher =
        fetcher_for(&mock_server).with_filters(Filters::new().filter("status", "SETTLED"));
    let mut list =
        AsyncLazyPagedList::with_options(fetcher, ListOptions::new().page_size(2)).unwrap();

    let items: Vec<Value> = list.stream().try_collect().await.unwrap();
    assert_eq!(ids(&items), vec!["t1", "t2", "t3"]);
    assert!(list.is_exhausted());
    assert_eq!(list.len().await.unwrap(), 3);
}

#[tokio::test]
async fn test_limit_caps_requested_page_size() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .and(query_param("page[size]", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document(
            &["t1", "t2", "t3"],
            Some(next_link(&mock_server, "p2", 3)),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .and(query_param("page[after]", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document(&[], None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut list =
        AsyncLazyPagedList::with_options(fetcher_for(&mock_server), ListOptions::new().limit(3))
            .unwrap();

    assert_eq!(list.page_size(), 3);
    assert_eq!(list.len().await.unwrap(), 3);
    assert!(list.get(3).await.is_err());
}

#[tokio::test]
async fn test_limit_shrinks_follow_up_requests() {
    let mock_server = MockServer::start().await;

    // Server serves at most two items per page
    Mock::given(method("GET"))
        .and(path("/transactions"))
        .and(query_param("page[size]", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document(
            &["t1", "t2"],
            Some(next_link(&mock_server, "p2", 5)),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .and(query_param("page[after]", "p2"))
        .and(query_param("page[size]", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document(
            &["t3", "t4"],
            Some(next_link(&mock_server, "p3", 3)),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .and(query_param("page[after]", "p3"))
        .and(query_param("page[size]", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document(
            &["t5"],
            Some(next_link(&mock_server, "p4", 1)),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut list =
        AsyncLazyPagedList::with_options(fetcher_for(&mock_server), ListOptions::new().limit(5))
            .unwrap();

    let items = list.collect_all().await.unwrap();
    assert_eq!(ids(&items), vec!["t1", "t2", "t3", "t4", "t5"]);
    assert_eq!(list.fetch_count(), 3);
}

#[tokio::test]
async fn test_slice_reads_through_http_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .and(query_param_is_missing("page[after]"))
        .and(query_param("page[size]", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document(
            &["t1", "t2"],
            Some(next_link(&mock_server, "p2", 2)),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .and(query_param("page[after]", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document(
            &["t3", "t4"],
            Some(next_link(&mock_server, "p3", 2)),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut list =
        AsyncLazyPagedList::with_options(fetcher_for(&mock_server), ListOptions::new().page_size(2))
            .unwrap();

    let mut view = list.slice(1..3).unwrap();
    let items = view.collect().await.unwrap();
    assert_eq!(ids(&items), vec!["t2", "t3"]);
    assert_eq!(list.fetch_count(), 2);
    assert!(list.has_next());
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_failed_page_is_retried_from_same_cursor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .and(query_param("page[size]", "2"))
        .and(query_param("filter[status]", "HELD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document(
            &["t1", "t2"],
            Some(next_link(&mock_server, "p2", 2)),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Second page fails once, then succeeds
    Mock::given(method("GET"))
        .and(path("/transactions"))
        .and(query_param("page[after]", "p2"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .and(query_param("page[after]", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document(&["t3"], None)))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_for(&mock_server).with_filters(Filters::new().filter("status", "HELD"));
    let mut list =
        AsyncLazyPagedList::with_options(fetcher, ListOptions::new().page_size(2)).unwrap();

    let err = list.get(2).await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 502, .. }));
    assert_eq!(list.buffered(), 2);

    assert_eq!(list.get(2).await.unwrap()["id"], "t3");
    assert_eq!(list.fetch_count(), 2);
}

#[tokio::test]
async fn test_unauthorized_surfaces_as_auth_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{"status": "401", "title": "Not Authorized", "detail": "The request was not authenticated"}]
        })))
        .mount(&mock_server)
        .await;

    let mut list = AsyncLazyPagedList::new(fetcher_for(&mock_server));
    let err = list.get(0).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AuthFailure);
    assert_eq!(list.buffered(), 0);
    assert_eq!(list.fetch_count(), 0);
}

#[tokio::test]
async fn test_rate_limit_passes_through_without_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(429).insert_header("X-RateLimit-Remaining", "0"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut list = AsyncLazyPagedList::new(fetcher_for(&mock_server));
    let err = list.len().await.unwrap_err();

    assert!(matches!(err, Error::RateLimitExceeded { remaining: Some(0) }));
    assert_eq!(list.fetcher().client().rate_limit_remaining(), Some(0));
}

// ============================================================================
// Typed Items and Blocking Access
// ============================================================================

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct Transaction {
    id: String,
    attributes: Attributes,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct Attributes {
    amount: i64,
}

#[tokio::test]
async fn test_items_mapped_to_typed_values() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document(&["t1", "t2"], None)))
        .mount(&mock_server)
        .await;

    let fetcher = Mapped::new(fetcher_for(&mock_server), FromJson::<Transaction>::new());
    let mut list = AsyncLazyPagedList::new(fetcher);

    let first = list.get(0).await.unwrap();
    assert_eq!(first.id, "t1");
    assert_eq!(first.attributes.amount, 10);
    assert_eq!(list.len().await.unwrap(), 2);
}

#[test]
fn test_blocking_list_over_http() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mock_server = runtime.block_on(MockServer::start());

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/transactions"))
            .and(query_param_is_missing("page[after]"))
            .and(query_param("page[size]", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(document(
                &["t1", "t2"],
                Some(next_link(&mock_server, "p2", 2)),
            )))
            .mount(&mock_server),
    );
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/transactions"))
            .and(query_param("page[after]", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(document(&["t3"], None)))
            .mount(&mock_server),
    );

    let fetcher = BlockingFetcher::new(fetcher_for(&mock_server)).unwrap();
    let list = LazyPagedList::with_options(fetcher, ListOptions::new().page_size(2)).unwrap();

    let items: Vec<Value> = list.iter().collect::<pagewise::Result<_>>().unwrap();
    assert_eq!(ids(&items), vec!["t1", "t2", "t3"]);
    assert_eq!(list.fetch_count(), 2);
}
