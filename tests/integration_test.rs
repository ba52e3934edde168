//! Integration tests for entity-feed
//!
//! These tests run the HTTP backend and the feed controller against a local
//! mock search service and check complete paging workflows.

use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

use entity_feed::backend::HttpBackend;
use entity_feed::feed::{FeedController, FeedOptions, FeedPhase, FeedUpdate, PageExtractor, TransportError};
use entity_feed::query::{EntityKind, PageSettings, SearchQuery, SortOrder};
use entity_feed::resolver::NameResolver;
use entity_feed::session::{EntityFeed, FeedEvent};
use entity_feed::trigger::ContinuationTrigger;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to build a `/companies` page body
fn companies_page(names: &[&str], first_id: u64, total: u64, has_next: bool) -> Value {
    let companies: Vec<Value> = names
        .iter()
        .zip(first_id..)
        .map(|(name, id)| json!({"id": id, "name": name, "industry": "Energy"}))
        .collect();
    json!({"companies": companies, "total": total, "has_next": has_next})
}

/// Helper function to create a controller pointed at the mock server
fn controller(server: &MockServer, timeout: Option<Duration>, page: PageSettings) -> FeedController {
    controller_with_abort(server, timeout, page, true)
}

/// Like [`controller`], choosing whether superseded requests are aborted
fn controller_with_abort(
    server: &MockServer,
    timeout: Option<Duration>,
    page: PageSettings,
    abort_superseded: bool,
) -> FeedController {
    let backend = HttpBackend::new(server.uri(), timeout).unwrap();
    FeedController::new(
        Arc::new(backend),
        Arc::new(NameResolver::default()),
        PageExtractor::for_kind(EntityKind::Company),
        FeedOptions {
            kind: EntityKind::Company,
            page,
            abort_superseded,
        },
    )
}

#[tokio::test]
async fn test_pages_through_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/companies"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(companies_page(
            &["MTN Ghana", "Tullow Oil Ghana Ltd"],
            1,
            3,
            true,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/companies"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(companies_page(
            &["Acme Unknown Holdings"],
            3,
            3,
            false,
        )))
        .mount(&server)
        .await;

    let mut feed = controller(&server, Some(Duration::from_secs(5)), PageSettings::default());
    feed.reset_and_fetch(SearchQuery::default());
    assert!(matches!(feed.next_update().await, Some(FeedUpdate::Loaded { appended: 2, .. })));

    assert!(feed.fetch_next_page());
    assert!(matches!(feed.next_update().await, Some(FeedUpdate::Loaded { page: 2, .. })));

    assert_eq!(feed.phase(), FeedPhase::Exhausted);
    assert_eq!(feed.state().total_count(), 3);

    let names: Vec<&str> = feed.items().iter().map(|entity| entity.name()).collect();
    assert_eq!(names, vec!["MTN Ghana", "Tullow Oil Ghana Ltd", "Acme Unknown Holdings"]);
    assert_eq!(feed.items()[2].asset_ref(), "/companies/default-company.svg");
    assert_eq!(feed.items()[0].attribute("industry").as_deref(), Some("Energy"));
}

#[tokio::test]
async fn test_request_carries_query_filters_and_sort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/companies"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "20"))
        .and(query_param("sort_by", "risk_score"))
        .and(query_param("sort_order", "desc"))
        .and(query_param("query", "tullow"))
        .and(query_param("region", "Western"))
        .respond_with(ResponseTemplate::new(200).set_body_json(companies_page(
            &["Tullow Oil Ghana Ltd"],
            1,
            1,
            false,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let page = PageSettings {
        limit: 20,
        sort_by: "risk_score".to_string(),
        sort_order: SortOrder::Desc,
    };
    let mut feed = controller(&server, None, page);
    feed.reset_and_fetch(
        SearchQuery::new(" tullow ")
            .with_filter("region", "Western")
            .with_filter("industry", ""),
    );

    let update = feed.next_update().await.unwrap();
    assert!(matches!(update, FeedUpdate::Loaded { .. }));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].url.query().unwrap_or_default().contains("industry"));
}

#[tokio::test]
async fn test_server_error_moves_feed_to_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/companies"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut feed = controller(&server, None, PageSettings::default());
    feed.reset_and_fetch(SearchQuery::new("x"));

    let update = feed.next_update().await.unwrap();
    assert!(matches!(
        update,
        FeedUpdate::Failed {
            error: TransportError::Status(500),
            ..
        }
    ));
    assert_eq!(feed.phase(), FeedPhase::Error);
    assert!(feed.items().is_empty());
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/companies"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let mut feed = controller(&server, None, PageSettings::default());
    feed.reset_and_fetch(SearchQuery::default());

    let update = feed.next_update().await.unwrap();
    assert!(matches!(
        update,
        FeedUpdate::Failed {
            error: TransportError::Decode(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/companies"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(companies_page(&["Late Co"], 1, 1, false))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut feed = controller(&server, Some(Duration::from_millis(200)), PageSettings::default());
    feed.reset_and_fetch(SearchQuery::default());

    let update = feed.next_update().await.unwrap();
    assert!(matches!(
        update,
        FeedUpdate::Failed {
            error: TransportError::Timeout,
            ..
        }
    ));
    assert_eq!(feed.phase(), FeedPhase::Error);
}

#[tokio::test]
async fn test_slow_superseded_query_never_shows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/companies"))
        .and(query_param("query", "old"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(companies_page(&["Old Result"], 1, 1, false))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/companies"))
        .and(query_param("query", "new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(companies_page(
            &["New Result"],
            2,
            1,
            false,
        )))
        .mount(&server)
        .await;

    // Left running, so the late body really arrives and must be rejected
    let mut feed = controller_with_abort(&server, None, PageSettings::default(), false);
    feed.reset_and_fetch(SearchQuery::new("old"));
    feed.reset_and_fetch(SearchQuery::new("new"));

    feed.next_update().await.unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(feed.next_update().await, None);

    let names: Vec<&str> = feed.items().iter().map(|entity| entity.name()).collect();
    assert_eq!(names, vec!["New Result"]);
}

#[tokio::test]
async fn test_superseded_response_arriving_first_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/companies"))
        .and(query_param("query", "old"))
        .respond_with(ResponseTemplate::new(200).set_body_json(companies_page(
            &["Old Result"],
            1,
            1,
            false,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/companies"))
        .and(query_param("query", "new"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(companies_page(&["New Result"], 2, 1, false))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let mut feed = controller_with_abort(&server, None, PageSettings::default(), false);
    feed.reset_and_fetch(SearchQuery::new("old"));
    let generation = feed.reset_and_fetch(SearchQuery::new("new"));

    let update = feed.next_update().await.unwrap();
    assert_eq!(update.generation(), generation);

    let names: Vec<&str> = feed.items().iter().map(|entity| entity.name()).collect();
    assert_eq!(names, vec!["New Result"]);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_session_scrolls_while_sentinel_visible() {
    let server = MockServer::start().await;
    for page in 1..=3u64 {
        Mock::given(method("GET"))
            .and(path("/companies"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "companies": [{"id": page, "name": format!("Company {page}")}],
                "total": 3,
                "has_next": page < 3
            })))
            .mount(&server)
            .await;
    }

    let mut feed = EntityFeed::new(
        controller(&server, None, PageSettings::default()),
        Duration::from_millis(10),
        ContinuationTrigger::default(),
    );
    feed.start(SearchQuery::default());
    feed.on_visibility(1.0);

    let mut pages = Vec::new();
    while let Some(event) = feed.next_event().await {
        if let FeedEvent::Page(FeedUpdate::Loaded { page, .. }) = event {
            pages.push(page);
        }
    }

    assert_eq!(pages, vec![1, 2, 3]);
    assert_eq!(feed.items().len(), 3);
    assert_eq!(feed.phase(), FeedPhase::Exhausted);
}
