use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::articles::{categorize, strip_html_tags, ArticleSource, PAGE_SIZE};
use crate::catalog::CatalogItem;

const API_URL: &str = "https://api.crossref.org/works";
const SOURCE: &str = "CrossRef";

#[derive(Debug, Deserialize)]
struct WorksResponse {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    items: Vec<Work>,
}

#[derive(Debug, Deserialize)]
struct Work {
    #[serde(default)]
    title: Vec<String>,
    #[serde(rename = "abstract")]
    summary: Option<String>,
    #[serde(default)]
    author: Vec<Author>,
    #[serde(rename = "URL")]
    url: Option<String>,
    #[serde(default)]
    subject: Vec<String>,
    #[serde(rename = "container-title", default)]
    container_title: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Author {
    given: Option<String>,
    family: Option<String>,
}

pub struct CrossRefSource {
    client: reqwest::Client,
}

impl CrossRefSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn parse_payload(payload: &str) -> Result<Vec<CatalogItem>> {
        crate::catalog::source::ensure_metrics_described();
        let t0 = std::time::Instant::now();

        let resp: WorksResponse =
            serde_json::from_str(payload).context("parsing crossref json")?;

        let mut out = Vec::with_capacity(resp.message.items.len());
        for work in resp.message.items {
            let Some(url) = work.url else {
                continue;
            };
            let title = work
                .title
                .first()
                .cloned()
                .unwrap_or_else(|| "Untitled".to_string());
            // Abstracts arrive as JATS XML; keep text only.
            let summary = work
                .summary
                .as_deref()
                .map(strip_html_tags)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "No abstract available.".to_string());
            let authors = work
                .author
                .iter()
                .map(|a| {
                    format!(
                        "{} {}",
                        a.given.as_deref().unwrap_or_default(),
                        a.family.as_deref().unwrap_or_default()
                    )
                    .trim()
                    .to_string()
                })
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            let category_text = format!(
                "{} {}",
                work.subject.join(" "),
                work.container_title.first().map(String::as_str).unwrap_or_default()
            );

            out.push(CatalogItem {
                category: Some(categorize(&category_text, SOURCE).label().to_string()),
                title,
                url,
                provider: Some(SOURCE.to_string()),
                description: Some(summary),
                instructor: (!authors.is_empty()).then_some(authors),
                ..CatalogItem::default()
            });
        }

        histogram!("source_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("source_items_total", "source" => SOURCE.to_string()).increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl ArticleSource for CrossRefSource {
    async fn search(&self, query: &str, page: usize) -> Result<Vec<CatalogItem>> {
        let url = format!(
            "{API_URL}?query={}&rows={PAGE_SIZE}&offset={}",
            urlencoding::encode(query),
            page * PAGE_SIZE,
        );
        let body = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .context("crossref http get")?
            .text()
            .await
            .context("crossref http .text()")?;
        Self::parse_payload(&body)
    }

    fn name(&self) -> &str {
        SOURCE
    }
}
