// src/catalog/view.rs
//
// Explicit view state for one rendered grid (items + filter + current
// page) and the pure transformation into the card-grid view model the UI
// consumes. No markup is produced here.

use super::filter::FilterQuery;
use super::page::{self, PageToken};
use super::CatalogItem;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Default neighbor radius for the pagination window.
pub const DEFAULT_DELTA: u32 = 2;

/// Placeholder shown for absent display-only fields.
const PLACEHOLDER: &str = "\u{2014}";

/// The state that used to live in browser globals (`allCourses`,
/// `filteredCourses`, `currentPage`), as one testable value.
#[derive(Debug, Clone)]
pub struct CatalogView {
    items: Vec<CatalogItem>,
    filtered: Vec<CatalogItem>,
    filter: FilterQuery,
    page: u32,
    page_size: usize,
}

impl CatalogView {
    pub fn new(items: Vec<CatalogItem>, page_size: usize) -> Self {
        let filtered = items.clone();
        Self {
            items,
            filtered,
            filter: FilterQuery::default(),
            page: 1,
            page_size,
        }
    }

    /// Replace the filter, recompute the matching subset and reset to
    /// page 1 (any filter change invalidates the old page position).
    pub fn set_filter(&mut self, filter: FilterQuery) {
        self.filtered = self
            .items
            .iter()
            .filter(|it| filter.matches(it))
            .cloned()
            .collect();
        self.filter = filter;
        self.page = 1;
    }

    /// Clamp and move to `target`. Returns false when the clamped target
    /// equals the current page (navigation is a no-op then).
    pub fn goto_page(&mut self, target: u32) -> bool {
        let clamped = page::clamp_page(target, self.total_pages());
        if clamped == self.page {
            return false;
        }
        self.page = clamped;
        true
    }

    pub fn current_page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        page::total_pages(self.filtered.len(), self.page_size)
    }

    pub fn match_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn page_items(&self) -> &[CatalogItem] {
        page::page_slice(&self.filtered, self.page, self.page_size)
    }
}

/// One card in the grid, with placeholder fallbacks already applied.
#[derive(Debug, Clone, Serialize)]
pub struct Card {
    pub title: String,
    pub url: String,
    pub provider: String,
    pub level: String,
    pub duration: String,
    pub rating: String,
    pub price: String,
    pub description: String,
    pub instructor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl From<&CatalogItem> for Card {
    fn from(item: &CatalogItem) -> Self {
        let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| PLACEHOLDER.to_string());
        Self {
            title: item.title.clone(),
            url: item.url.clone(),
            provider: or_dash(&item.provider),
            level: or_dash(&item.level),
            duration: or_dash(&item.duration),
            rating: or_dash(&item.rating),
            price: or_dash(&item.price),
            description: item.description.clone().unwrap_or_default(),
            instructor: or_dash(&item.instructor),
            image: item.image.clone(),
            company: item.company.clone(),
            location: item.location.clone(),
            category: item.category.clone(),
            tags: item.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TokenView {
    Page { page: u32, active: bool },
    Gap { gap: bool },
}

/// Pagination controls: the token strip plus boundary-disabled flags for
/// the first/prev/next/last buttons.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationView {
    pub current: u32,
    pub total_pages: u32,
    pub tokens: Vec<TokenView>,
    pub first_disabled: bool,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub last_disabled: bool,
}

impl PaginationView {
    pub fn build(current: u32, total: u32, delta: u32) -> Self {
        let tokens = page::page_tokens(current, total, delta)
            .into_iter()
            .map(|t| match t {
                PageToken::Page(p) => TokenView::Page {
                    page: p,
                    active: p == current,
                },
                PageToken::Gap => TokenView::Gap { gap: true },
            })
            .collect();
        Self {
            current,
            total_pages: total,
            tokens,
            first_disabled: current == 1,
            prev_disabled: current == 1,
            next_disabled: current == total,
            last_disabled: current == total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GridState {
    Ready,
    Empty,
    Failed,
}

/// The complete response for one grid request. Failures and empty results
/// degrade to an inert notice instead of an HTTP error.
#[derive(Debug, Clone, Serialize)]
pub struct CardGridView {
    pub state: GridState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub total_items: usize,
    pub cards: Vec<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl CardGridView {
    pub fn from_view(view: &CatalogView, delta: u32) -> Self {
        if view.match_count() == 0 {
            // Empty result: notice shown, pagination controls cleared.
            return Self {
                state: GridState::Empty,
                notice: Some("No results found.".to_string()),
                total_items: 0,
                cards: Vec::new(),
                pagination: None,
                last_updated: None,
            };
        }
        Self {
            state: GridState::Ready,
            notice: None,
            total_items: view.match_count(),
            cards: view.page_items().iter().map(Card::from).collect(),
            pagination: Some(PaginationView::build(
                view.current_page(),
                view.total_pages(),
                delta,
            )),
            last_updated: None,
        }
    }

    pub fn failed(notice: impl Into<String>) -> Self {
        Self {
            state: GridState::Failed,
            notice: Some(notice.into()),
            total_items: 0,
            cards: Vec::new(),
            pagination: None,
            last_updated: None,
        }
    }

    pub fn with_last_updated(mut self, ts: DateTime<Utc>) -> Self {
        self.last_updated = Some(ts);
        self
    }
}
