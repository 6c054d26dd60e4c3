use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::articles::{categorize, ArticleSource, PAGE_SIZE};
use crate::catalog::CatalogItem;

const API_URL: &str = "https://api.semanticscholar.org/graph/v1/paper/search";
const SOURCE: &str = "Semantic Scholar";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Paper>,
}

#[derive(Debug, Deserialize)]
struct Paper {
    title: Option<String>,
    #[serde(rename = "abstract")]
    summary: Option<String>,
    url: Option<String>,
    #[serde(default)]
    authors: Vec<Author>,
    venue: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: Option<String>,
}

pub struct SemanticScholarSource {
    client: reqwest::Client,
}

impl SemanticScholarSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn parse_payload(payload: &str) -> Result<Vec<CatalogItem>> {
        crate::catalog::source::ensure_metrics_described();
        let t0 = std::time::Instant::now();

        let resp: SearchResponse =
            serde_json::from_str(payload).context("parsing semantic scholar json")?;

        let mut out = Vec::with_capacity(resp.data.len());
        for paper in resp.data {
            let (Some(title), Some(url)) = (paper.title, paper.url) else {
                continue;
            };
            let authors = paper
                .authors
                .iter()
                .filter_map(|a| a.name.as_deref())
                .collect::<Vec<_>>()
                .join(", ");
            let summary = paper
                .summary
                .unwrap_or_else(|| "No abstract available.".to_string());
            let category_text = format!(
                "{title} {} {summary}",
                paper.venue.as_deref().unwrap_or_default()
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
impl ArticleSource for SemanticScholarSource {
    async fn search(&self, query: &str, page: usize) -> Result<Vec<CatalogItem>> {
        let url = format!(
            "{API_URL}?query={}&offset={}&limit={PAGE_SIZE}&fields=title,abstract,url,authors,year,venue",
            urlencoding::encode(query),
            page * PAGE_SIZE,
        );
        let body = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .context("semantic scholar http get")?
            .text()
            .await
            .context("semantic scholar http .text()")?;
        Self::parse_payload(&body)
    }

    fn name(&self) -> &str {
        SOURCE
    }
}
