// tests/providers_jobs.rs
//
// Fixture-based parser tests for the job board sources.

use coursecove::jobs::providers::{RemoteOkSource, RemotiveSource, RssFeedSource};

#[test]
fn remoteok_skips_legal_header_and_incomplete_rows() {
    let payload = include_str!("fixtures/remoteok.json");
    let items = RemoteOkSource::parse_payload(payload).expect("parse remoteok");

    assert_eq!(items.len(), 2, "header row and empty-position row dropped");
    assert_eq!(items[0].title, "Senior Rust Engineer");
    assert_eq!(items[0].company.as_deref(), Some("Ferrous Systems"));
    assert_eq!(items[0].location.as_deref(), Some("Worldwide"));
    assert_eq!(items[0].tags, vec!["rust", "backend"]);
    assert_eq!(items[0].provider.as_deref(), Some("RemoteOK"));
}

#[test]
fn remotive_maps_job_fields() {
    let payload = include_str!("fixtures/remotive.json");
    let items = RemotiveSource::parse_payload(payload).expect("parse remotive");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Backend Developer");
    assert_eq!(items[0].company.as_deref(), Some("Acme Remote"));
    assert_eq!(items[0].location.as_deref(), Some("USA Only"));
    assert!(items[1].tags.is_empty());
}

#[test]
fn rss2json_feed_items_become_listings() {
    let payload = include_str!("fixtures/rss2json_wwr.json");
    let items =
        RssFeedSource::parse_payload("WWR - Programming", payload).expect("parse rss2json");

    assert_eq!(items.len(), 1, "item without a link is dropped");
    let job = &items[0];
    assert_eq!(job.title, "Staff Engineer at Example Co");
    assert_eq!(job.provider.as_deref(), Some("WWR - Programming"));
    assert_eq!(job.company.as_deref(), Some("Example Co"));
    assert_eq!(job.location.as_deref(), Some("programming, full-time"));
    assert_eq!(job.tags, vec!["programming", "full-time"]);
}

#[test]
fn malformed_payloads_error_out() {
    assert!(RemoteOkSource::parse_payload("{}").is_err());
    assert!(RemotiveSource::parse_payload("[1,2]").is_err());
    assert!(RssFeedSource::parse_payload("WWR", "nope").is_err());
}
