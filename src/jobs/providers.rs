// src/jobs/providers.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;
use serde_json::Value;

use crate::catalog::source::{ensure_metrics_described, CatalogSource};
use crate::catalog::CatalogItem;

pub const REMOTEOK_URL: &str = "https://remoteok.io/remote-jobs.json";
pub const REMOTIVE_URL: &str = "https://remotive.io/api/remote-jobs";
pub const RSS2JSON_URL: &str = "https://api.rss2json.com/v1/api.json";

/// WeWorkRemotely category feeds, fetched through the rss2json proxy.
pub const WWR_FEEDS: [(&str, &str); 8] = [
    ("WWR - Programming", "https://weworkremotely.com/categories/remote-programming-jobs.rss"),
    ("WWR - Design", "https://weworkremotely.com/categories/remote-design-jobs.rss"),
    ("WWR - Marketing", "https://weworkremotely.com/categories/remote-marketing-jobs.rss"),
    ("WWR - Customer Support", "https://weworkremotely.com/categories/remote-customer-support-jobs.rss"),
    ("WWR - Sales", "https://weworkremotely.com/categories/remote-sales-jobs.rss"),
    ("WWR - DevOps", "https://weworkremotely.com/categories/remote-devops-sysadmin-jobs.rss"),
    ("WWR - Finance/Legal", "https://weworkremotely.com/categories/remote-finance-legal-jobs.rss"),
    ("WWR - Copywriting/Content", "https://weworkremotely.com/categories/remote-copywriting-content-jobs.rss"),
];

fn record_parsed(source: &str, count: usize, t0: std::time::Instant) {
    histogram!("source_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    counter!("source_items_total", "source" => source.to_string()).increment(count as u64);
}

/// RemoteOK's JSON array: the first element is legal boilerplate, the rest
/// are job records.
pub struct RemoteOkSource {
    client: reqwest::Client,
}

impl RemoteOkSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn parse_payload(payload: &str) -> Result<Vec<CatalogItem>> {
        ensure_metrics_described();
        let t0 = std::time::Instant::now();

        let rows: Vec<Value> = serde_json::from_str(payload).context("parsing remoteok json")?;
        let mut out = Vec::new();
        for row in rows.iter().skip(1) {
            let Some(title) = str_of(row, "position") else {
                continue;
            };
            let Some(url) = str_of(row, "url") else {
                continue;
            };
            out.push(CatalogItem {
                title,
                url,
                provider: Some("RemoteOK".to_string()),
                company: str_of(row, "company"),
                location: str_of(row, "location"),
                tags: strings_of(row, "tags"),
                ..CatalogItem::default()
            });
        }

        record_parsed("RemoteOK", out.len(), t0);
        Ok(out)
    }
}

#[async_trait]
impl CatalogSource for RemoteOkSource {
    async fn fetch(&self) -> Result<Vec<CatalogItem>> {
        let body = get_text(&self.client, REMOTEOK_URL, "remoteok").await?;
        Self::parse_payload(&body)
    }

    fn name(&self) -> &str {
        "RemoteOK"
    }
}

#[derive(Debug, Deserialize)]
struct RemotiveResponse {
    #[serde(default)]
    jobs: Vec<RemotiveJob>,
}

#[derive(Debug, Deserialize)]
struct RemotiveJob {
    title: Option<String>,
    url: Option<String>,
    company_name: Option<String>,
    candidate_required_location: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

pub struct RemotiveSource {
    client: reqwest::Client,
}

impl RemotiveSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn parse_payload(payload: &str) -> Result<Vec<CatalogItem>> {
        ensure_metrics_described();
        let t0 = std::time::Instant::now();

        let resp: RemotiveResponse =
            serde_json::from_str(payload).context("parsing remotive json")?;
        let mut out = Vec::new();
        for job in resp.jobs {
            let (Some(title), Some(url)) = (job.title, job.url) else {
                continue;
            };
            out.push(CatalogItem {
                title,
                url,
                provider: Some("Remotive".to_string()),
                company: job.company_name,
                location: job.candidate_required_location,
                tags: job.tags,
                ..CatalogItem::default()
            });
        }

        record_parsed("Remotive", out.len(), t0);
        Ok(out)
    }
}

#[async_trait]
impl CatalogSource for RemotiveSource {
    async fn fetch(&self) -> Result<Vec<CatalogItem>> {
        let body = get_text(&self.client, REMOTIVE_URL, "remotive").await?;
        Self::parse_payload(&body)
    }

    fn name(&self) -> &str {
        "Remotive"
    }
}

#[derive(Debug, Deserialize)]
struct Rss2JsonResponse {
    #[serde(default)]
    items: Vec<Rss2JsonItem>,
}

#[derive(Debug, Deserialize)]
struct Rss2JsonItem {
    title: Option<String>,
    link: Option<String>,
    author: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
}

/// An RSS feed flattened to JSON by the rss2json proxy.
pub struct RssFeedSource {
    name: String,
    feed_url: String,
    client: reqwest::Client,
}

impl RssFeedSource {
    pub fn new(name: impl Into<String>, feed_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            name: name.into(),
            feed_url: feed_url.into(),
            client,
        }
    }

    pub fn parse_payload(name: &str, payload: &str) -> Result<Vec<CatalogItem>> {
        ensure_metrics_described();
        let t0 = std::time::Instant::now();

        let resp: Rss2JsonResponse =
            serde_json::from_str(payload).with_context(|| format!("parsing {name} rss2json"))?;
        let mut out = Vec::new();
        for item in resp.items {
            let (Some(title), Some(url)) = (item.title, item.link) else {
                continue;
            };
            out.push(CatalogItem {
                title,
                url,
                provider: Some(name.to_string()),
                company: item.author.filter(|a| !a.trim().is_empty()),
                location: (!item.categories.is_empty())
                    .then(|| item.categories.join(", ")),
                tags: item.categories,
                ..CatalogItem::default()
            });
        }

        record_parsed(name, out.len(), t0);
        Ok(out)
    }
}

#[async_trait]
impl CatalogSource for RssFeedSource {
    async fn fetch(&self) -> Result<Vec<CatalogItem>> {
        let url = format!(
            "{RSS2JSON_URL}?rss_url={}",
            urlencoding::encode(&self.feed_url)
        );
        let body = get_text(&self.client, &url, &self.name).await?;
        Self::parse_payload(&self.name, &body)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

async fn get_text(client: &reqwest::Client, url: &str, what: &str) -> Result<String> {
    client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("{what} http get"))?
        .text()
        .await
        .with_context(|| format!("{what} http .text()"))
}

fn str_of(v: &Value, key: &str) -> Option<String> {
    v.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn strings_of(v: &Value, key: &str) -> Vec<String> {
    v.get(key)
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
