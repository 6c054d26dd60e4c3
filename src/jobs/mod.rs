// src/jobs/mod.rs
pub mod providers;
pub mod scheduler;

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::catalog::source::CatalogSource;
use crate::catalog::CatalogItem;
use providers::{RemoteOkSource, RemotiveSource, RssFeedSource, WWR_FEEDS};

/// Jobs grid page size.
pub const PAGE_SIZE: usize = 8;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("jobs_refresh_total", "Completed job board refreshes.");
        describe_counter!("jobs_cache_hits_total", "Job requests served from the same-day cache.");
        describe_gauge!("jobs_listings", "Job listings in the current snapshot.");
    });
}

/// The merged job list together with when it was fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub jobs: Vec<CatalogItem>,
}

/// On-disk cache format, keyed by the local fetch date so a restart on the
/// same day skips the network entirely.
#[derive(Debug, Serialize, Deserialize)]
struct CachedJobs {
    fetched_on: String,
    fetched_at: DateTime<Utc>,
    jobs: Vec<CatalogItem>,
}

fn today_string() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Aggregates the configured job boards, merges and sorts their listings,
/// and maintains the same-day snapshot (in memory + cache file).
pub struct JobBoard {
    sources: Vec<Box<dyn CatalogSource>>,
    cache_path: PathBuf,
    snapshot: RwLock<Option<JobsSnapshot>>,
}

impl JobBoard {
    pub fn new(client: reqwest::Client, cache_path: PathBuf) -> Self {
        let mut sources: Vec<Box<dyn CatalogSource>> = Vec::new();
        for (name, feed) in WWR_FEEDS {
            sources.push(Box::new(RssFeedSource::new(name, feed, client.clone())));
        }
        sources.push(Box::new(RemoteOkSource::new(client.clone())));
        sources.push(Box::new(RemotiveSource::new(client)));
        Self::with_sources(sources, cache_path)
    }

    /// Test seam: inject arbitrary sources.
    pub fn with_sources(sources: Vec<Box<dyn CatalogSource>>, cache_path: PathBuf) -> Self {
        ensure_metrics_described();
        Self {
            sources,
            cache_path,
            snapshot: RwLock::new(None),
        }
    }

    /// Current snapshot, served from memory or the cache file when either
    /// was fetched today, otherwise refreshed from the job boards.
    pub async fn snapshot(&self) -> Result<JobsSnapshot> {
        let today = today_string();

        {
            let guard = self.snapshot.read().expect("jobs snapshot poisoned");
            if let Some(snap) = guard.as_ref() {
                if snap.fetched_at.with_timezone(&Local).format("%Y-%m-%d").to_string() == today {
                    return Ok(snap.clone());
                }
            }
        }

        if let Some(snap) = self.load_cache_for(&today) {
            counter!("jobs_cache_hits_total").increment(1);
            tracing::info!(jobs = snap.jobs.len(), "job snapshot restored from cache");
            *self.snapshot.write().expect("jobs snapshot poisoned") = Some(snap.clone());
            return Ok(snap);
        }

        self.refresh().await
    }

    /// Fetch every source best-effort, merge, sort by title and persist.
    /// A single failing board only loses its own listings.
    pub async fn refresh(&self) -> Result<JobsSnapshot> {
        let mut jobs: Vec<CatalogItem> = Vec::new();
        for source in &self.sources {
            match source.fetch().await {
                Ok(mut items) => jobs.append(&mut items),
                Err(e) => {
                    tracing::warn!(source = source.name(), error = ?e, "job source failed");
                    counter!("source_errors_total", "source" => source.name().to_string())
                        .increment(1);
                }
            }
        }
        jobs.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));

        let snap = JobsSnapshot {
            fetched_at: Utc::now(),
            jobs,
        };

        if let Err(e) = self.write_cache(&snap) {
            tracing::warn!(error = ?e, path = %self.cache_path.display(), "jobs cache write failed");
        }

        counter!("jobs_refresh_total").increment(1);
        gauge!("jobs_listings").set(snap.jobs.len() as f64);
        tracing::info!(jobs = snap.jobs.len(), "job boards refreshed");

        *self.snapshot.write().expect("jobs snapshot poisoned") = Some(snap.clone());
        Ok(snap)
    }

    fn load_cache_for(&self, today: &str) -> Option<JobsSnapshot> {
        let cached = read_cache(&self.cache_path).ok()?;
        if cached.fetched_on != today {
            return None;
        }
        Some(JobsSnapshot {
            fetched_at: cached.fetched_at,
            jobs: cached.jobs,
        })
    }

    fn write_cache(&self, snap: &JobsSnapshot) -> Result<()> {
        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let cached = CachedJobs {
            fetched_on: today_string(),
            fetched_at: snap.fetched_at,
            jobs: snap.jobs.clone(),
        };
        let json = serde_json::to_string(&cached).context("serializing jobs cache")?;
        std::fs::write(&self.cache_path, json)
            .with_context(|| format!("writing {}", self.cache_path.display()))?;
        Ok(())
    }
}

fn read_cache(path: &Path) -> Result<CachedJobs> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading jobs cache {}", path.display()))?;
    serde_json::from_str(&content).context("parsing jobs cache")
}
