// src/catalog/store.rs
//
// In-memory store of the loaded per-category catalogs. Items are immutable
// once loaded; a failed load is remembered so the grid can degrade to its
// "failed to load" state instead of erroring.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use metrics::gauge;
use serde::Serialize;

use super::filter::DurationBucket;
use super::source::{CatalogSource, StaticJsonSource};
use super::CatalogItem;
use crate::config::CatalogSpec;

#[derive(Debug, Clone)]
pub enum LoadState {
    Ready(Vec<CatalogItem>),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub spec: CatalogSpec,
    pub state: LoadState,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub slug: String,
    pub title: String,
    pub item_count: usize,
    pub loaded: bool,
}

/// Distinct facet values derived from a loaded catalog, restricted to the
/// dimensions the catalog declares. Undeclared dimensions are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct FacetSets {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub durations: Vec<&'static str>,
}

#[derive(Default)]
pub struct CatalogStore {
    catalogs: RwLock<HashMap<String, LoadedCatalog>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, spec: CatalogSpec, state: LoadState) {
        let mut guard = self.catalogs.write().expect("catalog store poisoned");
        guard.insert(spec.slug.clone(), LoadedCatalog { spec, state });
    }

    pub fn get(&self, slug: &str) -> Option<LoadedCatalog> {
        let guard = self.catalogs.read().expect("catalog store poisoned");
        guard.get(slug).cloned()
    }

    pub fn summaries(&self) -> Vec<CatalogSummary> {
        let guard = self.catalogs.read().expect("catalog store poisoned");
        let mut out: Vec<CatalogSummary> = guard
            .values()
            .map(|cat| CatalogSummary {
                slug: cat.spec.slug.clone(),
                title: cat.spec.title.clone(),
                item_count: match &cat.state {
                    LoadState::Ready(items) => items.len(),
                    LoadState::Failed(_) => 0,
                },
                loaded: matches!(cat.state, LoadState::Ready(_)),
            })
            .collect();
        out.sort_by(|a, b| a.slug.cmp(&b.slug));
        out
    }

    pub fn facets(&self, slug: &str) -> Option<FacetSets> {
        let cat = self.get(slug)?;
        let items: &[CatalogItem] = match &cat.state {
            LoadState::Ready(items) => items,
            LoadState::Failed(_) => &[],
        };

        let mut providers = BTreeSet::new();
        let mut levels = BTreeSet::new();
        let mut tags = BTreeSet::new();
        for it in items {
            if let Some(p) = &it.provider {
                providers.insert(p.clone());
            }
            if let Some(l) = &it.level {
                levels.insert(l.clone());
            }
            for t in &it.tags {
                tags.insert(t.clone());
            }
        }

        let declared = |dim: &str, values: BTreeSet<String>| {
            if cat.spec.has_facet(dim) {
                values.into_iter().collect()
            } else {
                Vec::new()
            }
        };
        Some(FacetSets {
            providers: declared("provider", providers),
            levels: declared("level", levels),
            tags: declared("tag", tags),
            durations: if cat.spec.has_facet("duration") {
                DurationBucket::ALL.iter().map(|b| b.label()).collect()
            } else {
                Vec::new()
            },
        })
    }

    /// Fetch every configured catalog once. Per-catalog failures degrade to
    /// `LoadState::Failed`; nothing here is fatal to the service.
    pub async fn load_all(&self, client: &reqwest::Client, specs: &[CatalogSpec]) {
        for spec in specs {
            let source = StaticJsonSource::new(spec.slug.clone(), spec.data_url.clone(), client.clone());
            let state = match source.fetch().await {
                Ok(items) => {
                    tracing::info!(catalog = %spec.slug, items = items.len(), "catalog loaded");
                    gauge!("catalog_items", "catalog" => spec.slug.clone()).set(items.len() as f64);
                    LoadState::Ready(items)
                }
                Err(e) => {
                    tracing::warn!(catalog = %spec.slug, error = ?e, "catalog load failed");
                    metrics::counter!("source_errors_total", "source" => spec.slug.clone())
                        .increment(1);
                    LoadState::Failed(e.to_string())
                }
            };
            self.insert(spec.clone(), state);
        }
    }
}
