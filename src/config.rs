// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CATALOGS_PATH: &str = "COURSECOVE_CATALOGS_PATH";
pub const DEFAULT_CATALOGS_PATH: &str = "config/catalogs.toml";

/// One configured content category: where its JSON lives, which fields the
/// text search covers beyond the title, which facet dimensions the UI
/// exposes, and the grid page size.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSpec {
    pub slug: String,
    pub title: String,
    pub data_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub search_fields: Vec<String>,
    #[serde(default)]
    pub facets: Vec<String>,
}

fn default_page_size() -> usize {
    12
}

impl CatalogSpec {
    /// Whether this catalog declares the named facet dimension. Undeclared
    /// dimensions are inert: their query parameters are ignored and they
    /// are absent from the facets endpoint.
    pub fn has_facet(&self, dimension: &str) -> bool {
        let want = canonical_facet(dimension.trim());
        self.facets.iter().any(|f| {
            let f = f.trim().to_ascii_lowercase();
            canonical_facet(&f) == want
        })
    }
}

fn canonical_facet(name: &str) -> &str {
    match name {
        "tags" => "tag",
        other => other,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Server settings from the environment (`.env` supported via dotenvy).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub ui_dir: String,
    pub jobs_cache_path: PathBuf,
    pub jobs_refresh_secs: u64,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("parsing PORT")?,
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_ascii_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            ui_dir: env::var("UI_DIR").unwrap_or_else(|_| "ui".to_string()),
            jobs_cache_path: env::var("JOBS_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("cache/jobs.json")),
            jobs_refresh_secs: env::var("JOBS_REFRESH_SECS")
                .unwrap_or_else(|_| (24 * 3600).to_string())
                .parse()
                .context("parsing JOBS_REFRESH_SECS")?,
        })
    }
}

/// Load catalog definitions from an explicit TOML file.
pub fn load_catalogs_from(path: &Path) -> Result<Vec<CatalogSpec>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading catalogs from {}", path.display()))?;
    parse_catalogs(&content)
}

/// Load catalog definitions using env var + fallback:
/// 1) $COURSECOVE_CATALOGS_PATH
/// 2) config/catalogs.toml
/// An absent default file yields an empty catalog set, not an error.
pub fn load_catalogs_default() -> Result<Vec<CatalogSpec>> {
    if let Ok(p) = env::var(ENV_CATALOGS_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_catalogs_from(&pb);
        }
        return Err(anyhow!(
            "{ENV_CATALOGS_PATH} points to non-existent path"
        ));
    }
    let default = PathBuf::from(DEFAULT_CATALOGS_PATH);
    if default.exists() {
        return load_catalogs_from(&default);
    }
    Ok(Vec::new())
}

fn parse_catalogs(s: &str) -> Result<Vec<CatalogSpec>> {
    #[derive(Deserialize)]
    struct CatalogsFile {
        #[serde(default)]
        catalog: Vec<CatalogSpec>,
    }
    let file: CatalogsFile = toml::from_str(s).context("parsing catalogs toml")?;

    for spec in &file.catalog {
        if spec.slug.trim().is_empty() || spec.data_url.trim().is_empty() {
            return Err(anyhow!("catalog entry missing slug or data_url"));
        }
    }
    Ok(file.catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_entries_with_defaults() {
        let toml = r#"
            [[catalog]]
            slug = "math"
            title = "Math Courses"
            data_url = "https://x.test/json/math-courses.json"

            [[catalog]]
            slug = "ai-ml"
            title = "AI & ML Courses"
            data_url = "https://x.test/json/ai-ml-courses.json"
            page_size = 9
            search_fields = ["description", "instructor"]
            facets = ["provider", "level", "duration"]
        "#;
        let specs = parse_catalogs(toml).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].page_size, 12);
        assert!(specs[0].facets.is_empty());
        assert_eq!(specs[1].page_size, 9);
        assert_eq!(specs[1].search_fields, vec!["description", "instructor"]);
    }

    #[test]
    fn facet_declarations_are_case_and_alias_tolerant() {
        let spec = CatalogSpec {
            slug: "blog".into(),
            title: "Blog".into(),
            data_url: "https://x.test/blog.json".into(),
            page_size: 12,
            search_fields: Vec::new(),
            facets: vec!["Provider".into(), "tags".into()],
        };
        assert!(spec.has_facet("provider"));
        assert!(spec.has_facet("tag"));
        assert!(spec.has_facet("tags"));
        assert!(!spec.has_facet("duration"));
        assert!(!spec.has_facet("level"));
    }

    #[test]
    fn rejects_entry_without_data_url() {
        let toml = r#"
            [[catalog]]
            slug = "math"
            title = "Math Courses"
            data_url = ""
        "#;
        assert!(parse_catalogs(toml).is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallback() {
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();
        env::remove_var(ENV_CATALOGS_PATH);

        // No files in temp CWD yields empty set.
        let specs = load_catalogs_default().unwrap();
        assert!(specs.is_empty());

        // Env var takes precedence.
        let p = tmp.path().join("cats.toml");
        fs::write(
            &p,
            "[[catalog]]\nslug = \"x\"\ntitle = \"X\"\ndata_url = \"https://x.test/x.json\"\n",
        )
        .unwrap();
        env::set_var(ENV_CATALOGS_PATH, p.display().to_string());
        let specs = load_catalogs_default().unwrap();
        assert_eq!(specs.len(), 1);
        env::remove_var(ENV_CATALOGS_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
