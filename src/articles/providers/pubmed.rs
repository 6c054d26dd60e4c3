use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;
use serde_json::Value;

use crate::articles::{categorize, ArticleSource, PAGE_SIZE};
use crate::catalog::CatalogItem;

const ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";
const ESUMMARY_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esummary.fcgi";
const SOURCE: &str = "PubMed";

#[derive(Debug, Deserialize)]
struct EsearchResponse {
    esearchresult: Option<EsearchResult>,
}

#[derive(Debug, Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

/// Two-phase E-utilities lookup: esearch for an id list, esummary for the
/// article records.
pub struct PubMedSource {
    client: reqwest::Client,
}

impl PubMedSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn parse_id_list(payload: &str) -> Result<Vec<String>> {
        let resp: EsearchResponse =
            serde_json::from_str(payload).context("parsing pubmed esearch json")?;
        Ok(resp.esearchresult.map(|r| r.idlist).unwrap_or_default())
    }

    pub fn parse_summary_payload(payload: &str) -> Result<Vec<CatalogItem>> {
        crate::catalog::source::ensure_metrics_described();
        let t0 = std::time::Instant::now();

        let value: Value =
            serde_json::from_str(payload).context("parsing pubmed esummary json")?;

        // The `result` object mixes article records with a `uids` index;
        // records are the values carrying a `uid` field.
        let mut out = Vec::new();
        if let Some(result) = value.get("result").and_then(Value::as_object) {
            for record in result.values() {
                let Some(uid) = record.get("uid").and_then(Value::as_str) else {
                    continue;
                };
                let title = record
                    .get("title")
                    .and_then(Value::as_str)
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or("Untitled")
                    .to_string();
                let venue = record
                    .get("source")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let authors = record
                    .get("authors")
                    .and_then(Value::as_array)
                    .map(|list| {
                        list.iter()
                            .filter_map(|a| a.get("name").and_then(Value::as_str))
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default();
                let category_text = format!("{title} {venue}");

                out.push(CatalogItem {
                    category: Some(categorize(&category_text, SOURCE).label().to_string()),
                    title,
                    url: format!("https://pubmed.ncbi.nlm.nih.gov/{uid}/"),
                    provider: Some(SOURCE.to_string()),
                    description: (!venue.is_empty()).then_some(venue),
                    instructor: (!authors.is_empty()).then_some(authors),
                    ..CatalogItem::default()
                });
            }
        }

        histogram!("source_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("source_items_total", "source" => SOURCE.to_string()).increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl ArticleSource for PubMedSource {
    async fn search(&self, query: &str, page: usize) -> Result<Vec<CatalogItem>> {
        let url = format!(
            "{ESEARCH_URL}?db=pubmed&retmode=json&retmax={PAGE_SIZE}&retstart={}&term={}",
            page * PAGE_SIZE,
            urlencoding::encode(query),
        );
        let body = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .context("pubmed esearch http get")?
            .text()
            .await
            .context("pubmed esearch http .text()")?;

        let ids = Self::parse_id_list(&body)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let summary_url = format!(
            "{ESUMMARY_URL}?db=pubmed&retmode=json&id={}",
            ids.join(",")
        );
        let summary_body = self
            .client
            .get(&summary_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .context("pubmed esummary http get")?
            .text()
            .await
            .context("pubmed esummary http .text()")?;
        Self::parse_summary_payload(&summary_body)
    }

    fn name(&self) -> &str {
        SOURCE
    }
}
