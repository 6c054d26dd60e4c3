// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod articles;
pub mod catalog;
pub mod config;
pub mod error;
pub mod jobs;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::catalog::CatalogItem;
