use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::articles::{categorize, ArticleSource, PAGE_SIZE};
use crate::catalog::CatalogItem;

const API_URL: &str = "https://export.arxiv.org/api/query";
const SOURCE: &str = "arXiv";

// Atom feed subset; unknown elements are ignored.
#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    title: Option<String>,
    summary: Option<String>,
    #[serde(rename = "author", default)]
    authors: Vec<Author>,
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: Option<String>,
}

pub struct ArxivSource {
    client: reqwest::Client,
}

impl ArxivSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn parse_feed(xml: &str) -> Result<Vec<CatalogItem>> {
        crate::catalog::source::ensure_metrics_described();
        let t0 = std::time::Instant::now();

        let feed: Feed = from_str(xml).context("parsing arxiv atom xml")?;

        let mut out = Vec::with_capacity(feed.entries.len());
        for entry in feed.entries {
            let (Some(title), Some(url)) = (entry.title, entry.id) else {
                continue;
            };
            let title = collapse_ws(&title);
            let summary = entry
                .summary
                .as_deref()
                .map(collapse_ws)
                .unwrap_or_else(|| "No abstract available.".to_string());
            let authors = entry
                .authors
                .iter()
                .filter_map(|a| a.name.as_deref())
                .collect::<Vec<_>>()
                .join(", ");
            let category_text = format!("{summary} {title}");

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
impl ArticleSource for ArxivSource {
    async fn search(&self, query: &str, page: usize) -> Result<Vec<CatalogItem>> {
        let url = format!(
            "{API_URL}?search_query=all:{}&start={}&max_results={PAGE_SIZE}",
            urlencoding::encode(query),
            page * PAGE_SIZE,
        );
        let body = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .context("arxiv http get")?
            .text()
            .await
            .context("arxiv http .text()")?;
        Self::parse_feed(&body)
    }

    fn name(&self) -> &str {
        SOURCE
    }
}

// Atom titles/summaries wrap across indented lines.
fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
