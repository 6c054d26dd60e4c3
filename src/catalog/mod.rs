// src/catalog/mod.rs
pub mod filter;
pub mod page;
pub mod source;
pub mod store;
pub mod view;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// One displayable record: a course, article, job posting, news item or
/// blog post. Only `title` and `url` are guaranteed; everything else is
/// an optional facet or display-only field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Pull the item array out of whatever shape a catalog file uses: a bare
/// array, `{categories: [{courses: [...]}]}`, `{courses: [...]}`, or any
/// object whose values contain arrays (all concatenated).
pub fn extract_records(payload: &Value) -> Vec<Value> {
    if let Some(arr) = payload.as_array() {
        return arr.clone();
    }

    let Some(obj) = payload.as_object() else {
        return Vec::new();
    };

    if let Some(cats) = obj.get("categories").and_then(Value::as_array) {
        let mut out = Vec::new();
        for cat in cats {
            if let Some(courses) = cat.get("courses").and_then(Value::as_array) {
                out.extend(courses.iter().cloned());
            }
        }
        return out;
    }

    if let Some(courses) = obj.get("courses").and_then(Value::as_array) {
        return courses.clone();
    }

    let mut candidates = Vec::new();
    for v in obj.values() {
        if let Some(arr) = v.as_array() {
            candidates.extend(arr.iter().cloned());
        }
    }
    candidates
}

/// Drop records without a usable title/url, normalize scheme-less URLs and
/// de-duplicate by the normalized URL. First occurrence wins.
pub fn clean_records(records: Vec<Value>) -> Vec<CatalogItem> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for rec in records {
        if !rec.is_object() {
            continue;
        }
        let Some(title) = str_field(&rec, &["title"]) else {
            continue;
        };
        let Some(raw_url) = str_field(&rec, &["url", "link"]) else {
            continue;
        };
        let url = normalize_url(&raw_url);
        if !seen.insert(url.clone()) {
            continue;
        }

        out.push(CatalogItem {
            title,
            url,
            provider: str_field(&rec, &["provider", "source"]),
            level: str_field(&rec, &["level"]),
            duration: str_field(&rec, &["duration"]),
            description: str_field(&rec, &["description", "snippet"]),
            instructor: str_field(&rec, &["instructor", "authors"]),
            rating: str_field(&rec, &["rating"]),
            price: str_field(&rec, &["price"]),
            image: str_field(&rec, &["image"]),
            company: str_field(&rec, &["company"]),
            location: str_field(&rec, &["location"]),
            category: str_field(&rec, &["category"]),
            tags: list_field(&rec, &["tags", "categories", "keywords"]),
        });
    }

    out
}

fn normalize_url(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{}", url.trim_start_matches('/'))
    }
}

/// First non-empty string (or number rendered as string) among `keys`.
fn str_field(rec: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match rec.get(key) {
            Some(Value::String(s)) => {
                let t = s.trim();
                if !t.is_empty() {
                    return Some(t.to_string());
                }
            }
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn list_field(rec: &Value, keys: &[&str]) -> Vec<String> {
    for key in keys {
        if let Some(arr) = rec.get(key).and_then(Value::as_array) {
            let out: Vec<String> = arr
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !out.is_empty() {
                return out;
            }
        }
    }
    Vec::new()
}
