// src/catalog/source.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use super::CatalogItem;

/// Anything that can produce a batch of catalog items: a static JSON
/// resource, a job board, an RSS-proxied feed.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<CatalogItem>>;
    fn name(&self) -> &str;
}

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("source_items_total", "Items parsed from sources.");
        describe_counter!("source_errors_total", "Source fetch/parse errors.");
        describe_histogram!("source_parse_ms", "Source parse time in milliseconds.");
    });
}

/// Fetches a configured JSON resource and normalizes whatever item shape
/// it holds. Used for the static per-category catalogs.
pub struct StaticJsonSource {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl StaticJsonSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            client,
        }
    }

    /// Append a `t=<unix-millis>` query parameter so intermediaries never
    /// serve a stale copy of the catalog file.
    fn cache_busted_url(&self) -> String {
        let ts = chrono::Utc::now().timestamp_millis();
        if self.url.contains('?') {
            format!("{}&t={ts}", self.url)
        } else {
            format!("{}?t={ts}", self.url)
        }
    }

    pub fn parse_payload(name: &str, payload: &str) -> Result<Vec<CatalogItem>> {
        ensure_metrics_described();
        let t0 = std::time::Instant::now();

        let value: serde_json::Value =
            serde_json::from_str(payload).with_context(|| format!("parsing {name} json"))?;
        let items = super::clean_records(super::extract_records(&value));

        histogram!("source_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("source_items_total", "source" => name.to_string()).increment(items.len() as u64);
        Ok(items)
    }
}

#[async_trait]
impl CatalogSource for StaticJsonSource {
    async fn fetch(&self) -> Result<Vec<CatalogItem>> {
        let url = self.cache_busted_url();
        let body = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("{} http get", self.name))?
            .text()
            .await
            .with_context(|| format!("{} http .text()", self.name))?;
        Self::parse_payload(&self.name, &body)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
