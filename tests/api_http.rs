// tests/api_http.rs
//
// HTTP-level tests against the public Router, no sockets involved:
// requests go through tower::ServiceExt::oneshot.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _;

use coursecove::api::{router, AppState};
use coursecove::articles::ArticleAggregator;
use coursecove::catalog::source::CatalogSource;
use coursecove::catalog::store::{CatalogStore, LoadState};
use coursecove::catalog::CatalogItem;
use coursecove::config::CatalogSpec;
use coursecove::jobs::JobBoard;

const BODY_LIMIT: usize = 1024 * 1024;

struct FixedJobs(Vec<CatalogItem>);

#[async_trait]
impl CatalogSource for FixedJobs {
    async fn fetch(&self) -> Result<Vec<CatalogItem>> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

fn course(i: usize, provider: &str) -> CatalogItem {
    CatalogItem {
        title: format!("Course {i:02}"),
        url: format!("https://edu.test/{i}"),
        provider: Some(provider.to_string()),
        ..CatalogItem::default()
    }
}

fn spec(slug: &str, page_size: usize, facets: &[&str]) -> CatalogSpec {
    CatalogSpec {
        slug: slug.to_string(),
        title: format!("{slug} catalog"),
        data_url: format!("https://edu.test/{slug}.json"),
        page_size,
        search_fields: Vec::new(),
        facets: facets.iter().map(|f| f.to_string()).collect(),
    }
}

/// Same Router the binary serves, seeded with in-memory data.
fn test_router(jobs_dir: &tempfile::TempDir) -> Router {
    let store = CatalogStore::new();

    // 37 items at page size 12 -> 4 pages.
    let items: Vec<CatalogItem> = (0..37)
        .map(|i| course(i, if i % 2 == 0 { "Coursera" } else { "Udemy" }))
        .collect();
    store.insert(
        spec("math", 12, &["provider", "duration"]),
        LoadState::Ready(items),
    );
    store.insert(spec("news", 9, &["provider"]), LoadState::Failed("HTTP 500".into()));

    // Declares only the provider facet; durations exist on the items but
    // the dimension is not exposed.
    let arts: Vec<CatalogItem> = [("Sketching", "1"), ("Oil Painting", "3"), ("Sculpture", "10")]
        .into_iter()
        .map(|(title, hours)| CatalogItem {
            title: title.to_string(),
            url: format!("https://edu.test/arts/{title}"),
            provider: Some("Domestika".to_string()),
            duration: Some(hours.to_string()),
            ..CatalogItem::default()
        })
        .collect();
    store.insert(spec("arts", 12, &["provider"]), LoadState::Ready(arts));

    let jobs = JobBoard::with_sources(
        vec![Box::new(FixedJobs(vec![CatalogItem {
            title: "Rust Engineer".into(),
            url: "https://jobs.test/rust".into(),
            company: Some("Ferrous".into()),
            tags: vec!["rust".into()],
            ..CatalogItem::default()
        }]))],
        jobs_dir.path().join("jobs.json"),
    );

    let state = AppState {
        store: Arc::new(store),
        articles: Arc::new(ArticleAggregator::new(reqwest::Client::new())),
        jobs: Arc::new(jobs),
    };
    router(state, "ui")
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Json::Null);
    (status, json)
}

#[tokio::test]
async fn health_returns_ok() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(&dir);

    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(String::from_utf8_lossy(&bytes).trim(), "OK");
}

#[tokio::test]
async fn catalog_list_reports_load_states() {
    let dir = tempfile::tempdir().unwrap();
    let (status, v) = get_json(test_router(&dir), "/api/catalogs").await;
    assert_eq!(status, StatusCode::OK);

    let list = v.as_array().expect("array");
    assert_eq!(list.len(), 3);
    assert_eq!(list[0]["slug"], "arts");
    assert_eq!(list[1]["slug"], "math");
    assert_eq!(list[1]["item_count"], 37);
    assert_eq!(list[1]["loaded"], true);
    assert_eq!(list[2]["slug"], "news");
    assert_eq!(list[2]["loaded"], false);
}

#[tokio::test]
async fn catalog_grid_paginates_and_clamps() {
    let dir = tempfile::tempdir().unwrap();

    let (status, v) = get_json(test_router(&dir), "/api/catalogs/math").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["state"], "ready");
    assert_eq!(v["total_items"], 37);
    assert_eq!(v["cards"].as_array().unwrap().len(), 12);
    assert_eq!(v["pagination"]["total_pages"], 4);
    assert_eq!(v["pagination"]["prev_disabled"], true);

    // Out-of-range page clamps to the last page (one leftover item).
    let (_, v) = get_json(test_router(&dir), "/api/catalogs/math?page=5").await;
    assert_eq!(v["pagination"]["current"], 4);
    assert_eq!(v["cards"].as_array().unwrap().len(), 1);
    assert_eq!(v["pagination"]["next_disabled"], true);
}

#[tokio::test]
async fn catalog_grid_filters_by_query_and_provider() {
    let dir = tempfile::tempdir().unwrap();

    let (_, v) = get_json(test_router(&dir), "/api/catalogs/math?q=course%2003").await;
    assert_eq!(v["total_items"], 1);
    assert_eq!(v["cards"][0]["title"], "Course 03");

    let (_, v) = get_json(test_router(&dir), "/api/catalogs/math?provider=coursera").await;
    assert_eq!(v["total_items"], 19);

    let (_, v) = get_json(test_router(&dir), "/api/catalogs/math?q=zzz-no-match").await;
    assert_eq!(v["state"], "empty");
    assert_eq!(v["notice"], "No results found.");
    assert!(v.get("pagination").is_none());
}

#[tokio::test]
async fn failed_catalog_degrades_instead_of_500() {
    let dir = tempfile::tempdir().unwrap();
    let (status, v) = get_json(test_router(&dir), "/api/catalogs/news").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["state"], "failed");
    assert_eq!(v["notice"], "Failed to load news catalog.");
}

#[tokio::test]
async fn unknown_catalog_is_404_and_bad_duration_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _) = get_json(test_router(&dir), "/api/catalogs/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, v) = get_json(test_router(&dir), "/api/catalogs/math?duration=7-9").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(v["message"]
        .as_str()
        .unwrap()
        .contains("unknown duration bucket"));
}

#[tokio::test]
async fn undeclared_facet_parameters_are_inert() {
    let dir = tempfile::tempdir().unwrap();

    // "arts" declares only the provider facet, so a duration selection
    // filters nothing even though the items carry durations.
    let (status, v) = get_json(test_router(&dir), "/api/catalogs/arts?duration=%3C2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["total_items"], 3);

    // The declared provider facet still constrains.
    let (_, v) = get_json(test_router(&dir), "/api/catalogs/arts?provider=domestika").await;
    assert_eq!(v["total_items"], 3);
    let (_, v) = get_json(test_router(&dir), "/api/catalogs/arts?provider=udemy").await;
    assert_eq!(v["state"], "empty");

    // The facets endpoint omits the undeclared dimensions too.
    let (_, v) = get_json(test_router(&dir), "/api/catalogs/arts/facets").await;
    assert_eq!(v["providers"], serde_json::json!(["Domestika"]));
    assert!(v.get("durations").is_none());
    assert!(v.get("levels").is_none());
}

#[tokio::test]
async fn facets_list_values_from_loaded_data() {
    let dir = tempfile::tempdir().unwrap();
    let (status, v) = get_json(test_router(&dir), "/api/catalogs/math/facets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["providers"], serde_json::json!(["Coursera", "Udemy"]));
    assert_eq!(v["durations"], serde_json::json!(["<2", "2-5", ">5"]));
}

#[tokio::test]
async fn jobs_grid_serves_snapshot_with_last_updated() {
    let dir = tempfile::tempdir().unwrap();
    let (status, v) = get_json(test_router(&dir), "/api/jobs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["state"], "ready");
    assert_eq!(v["cards"][0]["title"], "Rust Engineer");
    assert_eq!(v["cards"][0]["company"], "Ferrous");
    assert!(v.get("last_updated").is_some());

    // Company names are searchable on the jobs grid.
    let (_, v) = get_json(test_router(&dir), "/api/jobs?q=ferrous").await;
    assert_eq!(v["total_items"], 1);
    let (_, v) = get_json(test_router(&dir), "/api/jobs?q=unknown-co").await;
    assert_eq!(v["state"], "empty");
}
