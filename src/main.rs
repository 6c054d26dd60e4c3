//! CourseCove — Binary Entrypoint
//! Boots the Axum HTTP server: loads the catalog configuration, fetches
//! every configured catalog once, wires the article/job aggregators and
//! serves the API plus the static UI shell.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coursecove::api::{router, AppState};
use coursecove::articles::ArticleAggregator;
use coursecove::catalog::store::CatalogStore;
use coursecove::config::{self, LogFormat, ServerConfig};
use coursecove::jobs::{scheduler, JobBoard};
use coursecove::metrics::Metrics;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    let server = ServerConfig::from_env()?;
    init_logging(&server);

    tracing::info!(host = %server.host, port = server.port, "starting coursecove");

    let specs = config::load_catalogs_default()?;
    if specs.is_empty() {
        tracing::warn!("no catalogs configured; only articles/jobs endpoints will have data");
    }

    let metrics = Metrics::init();
    let client = reqwest::Client::new();

    let store = Arc::new(CatalogStore::new());
    store.load_all(&client, &specs).await;

    let jobs = Arc::new(JobBoard::new(client.clone(), server.jobs_cache_path.clone()));
    scheduler::spawn_refresh_task(jobs.clone(), Duration::from_secs(server.jobs_refresh_secs));

    let state = AppState {
        store,
        articles: Arc::new(ArticleAggregator::new(client)),
        jobs,
    };

    let app = router(state, &server.ui_dir).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &ServerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "coursecove=debug,tower_http=debug".into());
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
