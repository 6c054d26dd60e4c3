// src/articles/mod.rs
pub mod providers;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::join_all;
use metrics::counter;
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::catalog::CatalogItem;
use providers::{ArxivSource, CrossRefSource, PubMedSource, SemanticScholarSource};

/// Upstream page size shared by all four article APIs.
pub const PAGE_SIZE: usize = 10;

/// Subject category derived from an article's text, used as its grid facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    ComputerScience,
    Economics,
    Biology,
    Medicine,
    Physics,
    SocialSciences,
    General,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Self::ComputerScience => "Computer Science",
            Self::Economics => "Economics",
            Self::Biology => "Biology",
            Self::Medicine => "Medicine",
            Self::Physics => "Physics",
            Self::SocialSciences => "Social Sciences",
            Self::General => "General",
        }
    }
}

/// Keyword heuristic mapping an article's venue/abstract/title to a subject
/// category. PubMed results are always medical.
pub fn categorize(text: &str, provider: &str) -> Category {
    let t = text.to_lowercase();
    if provider == "PubMed" {
        return Category::Medicine;
    }
    if t.contains("econom") || t.contains("finance") {
        return Category::Economics;
    }
    if t.contains("biology") || t.contains("genetics") {
        return Category::Biology;
    }
    if t.contains("medicine") || t.contains("clinical") {
        return Category::Medicine;
    }
    if t.contains("physics") || t.contains("quantum") {
        return Category::Physics;
    }
    if t.contains("computer")
        || t.contains("machine learning")
        || t.contains("artificial intelligence")
        || t.contains("algorithm")
    {
        return Category::ComputerScience;
    }
    if t.contains("sociology")
        || t.contains("political")
        || t.contains("education")
        || t.contains("social")
    {
        return Category::SocialSciences;
    }
    Category::General
}

/// Strip markup from abstracts that arrive as embedded HTML/JATS and
/// decode any character entities left behind.
pub fn strip_html_tags(s: &str) -> String {
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    let stripped = re.replace_all(s, "");
    html_escape::decode_html_entities(stripped.trim()).into_owned()
}

/// One queryable article API: a page of results for a search term.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// `page` is zero-based, matching the upstream offset parameters.
    async fn search(&self, query: &str, page: usize) -> Result<Vec<CatalogItem>>;
    fn name(&self) -> &str;
}

/// Fan-out/fan-in over the article APIs for one search request.
///
/// Required sources (Semantic Scholar, arXiv) fail the whole search when
/// they fail. Optional sources (CrossRef, PubMed) are best-effort; their
/// failures are logged and contribute nothing. Aggregation runs to
/// completion before the response is built, so a slow source can never
/// overwrite a newer render.
pub struct ArticleAggregator {
    required: Vec<Box<dyn ArticleSource>>,
    optional: Vec<Box<dyn ArticleSource>>,
}

impl ArticleAggregator {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_sources(
            vec![
                Box::new(SemanticScholarSource::new(client.clone())) as Box<dyn ArticleSource>,
                Box::new(ArxivSource::new(client.clone())),
            ],
            vec![
                Box::new(CrossRefSource::new(client.clone())) as Box<dyn ArticleSource>,
                Box::new(PubMedSource::new(client)),
            ],
        )
    }

    /// Test seam: inject arbitrary required/optional sources.
    pub fn with_sources(
        required: Vec<Box<dyn ArticleSource>>,
        optional: Vec<Box<dyn ArticleSource>>,
    ) -> Self {
        Self { required, optional }
    }

    pub async fn search(&self, query: &str, page: usize) -> Result<Vec<CatalogItem>> {
        let mut items = Vec::new();

        let results = join_all(self.required.iter().map(|s| s.search(query, page))).await;
        for (source, result) in self.required.iter().zip(results) {
            items.extend(result.with_context(|| format!("{} search", source.name()))?);
        }

        let results = join_all(self.optional.iter().map(|s| s.search(query, page))).await;
        for (source, result) in self.optional.iter().zip(results) {
            match result {
                Ok(extra) => items.extend(extra),
                Err(e) => {
                    tracing::warn!(source = source.name(), error = ?e, "optional article source failed");
                    counter!("source_errors_total", "source" => source.name().to_string())
                        .increment(1);
                }
            }
        }

        Ok(items)
    }
}
