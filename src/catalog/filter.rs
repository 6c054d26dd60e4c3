// src/catalog/filter.rs
//
// Free-text + facet filtering over catalog items. A facet dimension with
// zero selections imposes no constraint; the text query matches when it is
// a case-insensitive substring of at least one searchable field.

use super::CatalogItem;
use serde::{Deserialize, Serialize};

/// Hour-count bucket used for the duration facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationBucket {
    /// Under two hours.
    Short,
    /// Two to five hours inclusive.
    Medium,
    /// More than five hours.
    Long,
}

impl DurationBucket {
    /// Parse a facet token as exposed to the UI: `<2`, `2-5`, `>5`.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "<2" => Some(Self::Short),
            "2-5" | "2\u{2013}5" => Some(Self::Medium),
            ">5" => Some(Self::Long),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Short => "<2",
            Self::Medium => "2-5",
            Self::Long => ">5",
        }
    }

    pub fn contains(self, hours: f64) -> bool {
        match self {
            Self::Short => hours < 2.0,
            Self::Medium => (2.0..=5.0).contains(&hours),
            Self::Long => hours > 5.0,
        }
    }

    pub const ALL: [DurationBucket; 3] = [Self::Short, Self::Medium, Self::Long];
}

/// Parse a duration field into hours: the leading numeric prefix of the
/// string, or 0.0 when there is none ("abc" counts as zero hours). The
/// prefix stops at a second decimal point so "2.5.0" reads as 2.5.
pub fn parse_hours(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in trimmed.char_indices() {
        if c.is_ascii_digit() {
            end = i + 1;
        } else if c == '.' && !seen_dot {
            seen_dot = true;
            end = i + 1;
        } else {
            break;
        }
    }
    trimmed[..end].parse::<f64>().unwrap_or(0.0)
}

/// A searchable item field. The title is always searched; the rest are
/// opted in per catalog via configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Url,
    Provider,
    Description,
    Instructor,
    Company,
    Tags,
}

impl SearchField {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "url" => Some(Self::Url),
            "provider" => Some(Self::Provider),
            "description" => Some(Self::Description),
            "instructor" => Some(Self::Instructor),
            "company" => Some(Self::Company),
            "tags" | "keywords" => Some(Self::Tags),
            // "title" is implicit, not an error
            "title" => None,
            _ => None,
        }
    }
}

/// The full filter state for one grid view.
#[derive(Debug, Clone, Default)]
pub struct FilterQuery {
    pub query: String,
    pub fields: Vec<SearchField>,
    pub providers: Vec<String>,
    pub levels: Vec<String>,
    pub tags: Vec<String>,
    pub durations: Vec<DurationBucket>,
}

impl FilterQuery {
    /// True when this filter accepts every item.
    pub fn is_open(&self) -> bool {
        self.query.trim().is_empty()
            && self.providers.is_empty()
            && self.levels.is_empty()
            && self.tags.is_empty()
            && self.durations.is_empty()
    }

    pub fn matches(&self, item: &CatalogItem) -> bool {
        self.matches_query(item)
            && selection_matches(&self.providers, item.provider.as_deref())
            && selection_matches(&self.levels, item.level.as_deref())
            && self.matches_tags(item)
            && self.matches_duration(item)
    }

    fn matches_query(&self, item: &CatalogItem) -> bool {
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        if item.title.to_lowercase().contains(&query) {
            return true;
        }
        self.fields.iter().any(|field| match field {
            SearchField::Url => contains_ci(Some(&item.url), &query),
            SearchField::Provider => contains_ci(item.provider.as_deref(), &query),
            SearchField::Description => contains_ci(item.description.as_deref(), &query),
            SearchField::Instructor => contains_ci(item.instructor.as_deref(), &query),
            SearchField::Company => contains_ci(item.company.as_deref(), &query),
            SearchField::Tags => item
                .tags
                .iter()
                .any(|t| t.to_lowercase().contains(&query)),
        })
    }

    fn matches_tags(&self, item: &CatalogItem) -> bool {
        if self.tags.is_empty() {
            return true;
        }
        item.tags.iter().any(|t| {
            let folded = t.to_lowercase();
            self.tags.iter().any(|sel| sel.to_lowercase() == folded)
        })
    }

    fn matches_duration(&self, item: &CatalogItem) -> bool {
        if self.durations.is_empty() {
            return true;
        }
        let hours = item.duration.as_deref().map(parse_hours).unwrap_or(0.0);
        self.durations.iter().any(|b| b.contains(hours))
    }
}

fn contains_ci(haystack: Option<&str>, needle_lower: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(needle_lower))
        .unwrap_or(false)
}

/// Facet dimension check: no selections is an open filter, otherwise the
/// case-folded field value must be among the selections. Items missing the
/// field never match a constrained dimension.
fn selection_matches(selected: &[String], value: Option<&str>) -> bool {
    if selected.is_empty() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    let folded = value.to_lowercase();
    selected.iter().any(|s| s.to_lowercase() == folded)
}
