// src/api.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::articles::ArticleAggregator;
use crate::catalog::filter::{DurationBucket, FilterQuery, SearchField};
use crate::catalog::store::{CatalogStore, CatalogSummary, FacetSets, LoadState};
use crate::catalog::view::{CardGridView, CatalogView, DEFAULT_DELTA};
use crate::error::{ApiError, ApiResult};
use crate::jobs::JobBoard;

/// Default search when the articles page loads without a query.
const DEFAULT_ARTICLE_QUERY: &str = "machine learning";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CatalogStore>,
    pub articles: Arc<ArticleAggregator>,
    pub jobs: Arc<JobBoard>,
}

pub fn router(state: AppState, ui_dir: &str) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/catalogs", get(list_catalogs))
        .route("/api/catalogs/{slug}", get(catalog_grid))
        .route("/api/catalogs/{slug}/facets", get(catalog_facets))
        .route("/api/articles", get(article_grid))
        .route("/api/jobs", get(job_grid))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
        .fallback_service(ServeDir::new(ui_dir))
}

/// Query parameters shared by the grid endpoints. Multi-valued facets are
/// comma-separated, matching the checkbox groups they stand in for.
#[derive(Debug, Default, Deserialize)]
pub struct GridParams {
    pub q: Option<String>,
    pub provider: Option<String>,
    pub level: Option<String>,
    pub duration: Option<String>,
    pub tag: Option<String>,
    pub page: Option<u32>,
    pub delta: Option<u32>,
}

impl GridParams {
    /// Drop the facet parameters the catalog does not declare, leaving the
    /// free-text query and paging untouched.
    fn scoped(mut self, spec: &crate::config::CatalogSpec) -> Self {
        if !spec.has_facet("provider") {
            self.provider = None;
        }
        if !spec.has_facet("level") {
            self.level = None;
        }
        if !spec.has_facet("duration") {
            self.duration = None;
        }
        if !spec.has_facet("tag") {
            self.tag = None;
        }
        self
    }

    fn filter_query(&self, fields: Vec<SearchField>) -> ApiResult<FilterQuery> {
        let mut durations = Vec::new();
        for token in csv(&self.duration) {
            let bucket = DurationBucket::parse(&token).ok_or_else(|| {
                ApiError::BadRequest(format!("unknown duration bucket: {token}"))
            })?;
            durations.push(bucket);
        }
        Ok(FilterQuery {
            query: self.q.clone().unwrap_or_default(),
            fields,
            providers: csv(&self.provider),
            levels: csv(&self.level),
            tags: csv(&self.tag),
            durations,
        })
    }

    fn delta(&self) -> u32 {
        self.delta.unwrap_or(DEFAULT_DELTA)
    }
}

fn csv(raw: &Option<String>) -> Vec<String> {
    raw.as_deref()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

async fn list_catalogs(State(state): State<AppState>) -> Json<Vec<CatalogSummary>> {
    Json(state.store.summaries())
}

async fn catalog_grid(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<GridParams>,
) -> ApiResult<Json<CardGridView>> {
    let catalog = state
        .store
        .get(&slug)
        .ok_or_else(|| ApiError::UnknownCatalog(slug.clone()))?;

    let items = match catalog.state {
        LoadState::Failed(_) => {
            return Ok(Json(CardGridView::failed(format!(
                "Failed to load {}.",
                catalog.spec.title
            ))));
        }
        LoadState::Ready(items) => items,
    };

    let fields = catalog
        .spec
        .search_fields
        .iter()
        .filter_map(|f| SearchField::parse(f))
        .collect();
    let params = params.scoped(&catalog.spec);

    let mut view = CatalogView::new(items, catalog.spec.page_size);
    view.set_filter(params.filter_query(fields)?);
    view.goto_page(params.page.unwrap_or(1));

    Ok(Json(CardGridView::from_view(&view, params.delta())))
}

async fn catalog_facets(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<FacetSets>> {
    state
        .store
        .facets(&slug)
        .map(Json)
        .ok_or(ApiError::UnknownCatalog(slug))
}

/// Aggregated article search. The upstream page is selected by the same
/// 1-indexed `page` parameter as the static grids; category selections
/// filter the fetched page locally.
async fn article_grid(
    State(state): State<AppState>,
    Query(params): Query<GridParams>,
) -> ApiResult<Json<CardGridView>> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or(DEFAULT_ARTICLE_QUERY);
    let upstream_page = params.page.unwrap_or(1).saturating_sub(1) as usize;

    let items = match state.articles.search(query, upstream_page).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = ?e, "article aggregation failed");
            return Ok(Json(CardGridView::failed("Failed to load articles.")));
        }
    };

    let selected = csv(&params.tag);
    let items: Vec<_> = if selected.is_empty() {
        items
    } else {
        items
            .into_iter()
            .filter(|it| {
                it.category
                    .as_deref()
                    .map(|c| {
                        let folded = c.to_lowercase();
                        selected.iter().any(|s| s.to_lowercase() == folded)
                    })
                    .unwrap_or(false)
            })
            .collect()
    };

    // One upstream page per response; no local re-pagination.
    let view = CatalogView::new(items, usize::MAX);
    Ok(Json(CardGridView::from_view(&view, params.delta())))
}

async fn job_grid(
    State(state): State<AppState>,
    Query(params): Query<GridParams>,
) -> ApiResult<Json<CardGridView>> {
    let snap = match state.jobs.snapshot().await {
        Ok(snap) => snap,
        Err(e) => {
            tracing::warn!(error = ?e, "job aggregation failed");
            return Ok(Json(CardGridView::failed("Failed to load jobs.")));
        }
    };

    let fields = vec![SearchField::Company, SearchField::Tags];
    let mut view = CatalogView::new(snap.jobs, crate::jobs::PAGE_SIZE);
    view.set_filter(params.filter_query(fields)?);
    view.goto_page(params.page.unwrap_or(1));

    Ok(Json(
        CardGridView::from_view(&view, params.delta()).with_last_updated(snap.fetched_at),
    ))
}
