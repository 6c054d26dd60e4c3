// src/articles/providers/mod.rs
pub mod arxiv;
pub mod crossref;
pub mod pubmed;
pub mod semantic_scholar;

pub use arxiv::ArxivSource;
pub use crossref::CrossRefSource;
pub use pubmed::PubMedSource;
pub use semantic_scholar::SemanticScholarSource;
