//! Good First Issues API Server
//!
//! Aggregates "good first issue" tickets from blockchain repositories on GitHub
//! into a key-value snapshot and serves it to the browsing front-end.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use axum::{middleware, routing::get, Json, Router};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{GitHubClientImpl, MemoryKvStore, RestKvStore};
use app::{AggregatorOptions, AggregatorService, SnapshotReader};
use config::Config;
use domain::entities::{CategoryMap, Registry};
use domain::ports::{GitHubClient, KeyValueStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<AggregatorService<dyn GitHubClient, dyn KeyValueStore>>,
    pub snapshots: Arc<SnapshotReader<dyn KeyValueStore>>,
    pub categories: Arc<CategoryMap>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        config: Config,
        github: Arc<dyn GitHubClient>,
        store: Arc<dyn KeyValueStore>,
        registry: Registry,
    ) -> Self {
        let options = AggregatorOptions {
            fetch_delay: config.fetch_delay,
            enrich: config.enrich_repo_stats,
        };

        Self {
            aggregator: Arc::new(AggregatorService::new(
                github,
                store.clone(),
                registry,
                options,
            )),
            snapshots: Arc::new(SnapshotReader::new(store)),
            categories: Arc::new(CategoryMap::default()),
            config,
        }
    }
}

/// Good First Issues aggregator
#[derive(Parser)]
#[command(name = "gfi-api")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Run one aggregation and write the issues to a JSON file
    Export {
        /// Destination file, overwritten
        #[arg(short, long, default_value = "issues.json")]
        output: PathBuf,
    },
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    // Aggregation triggers (scheduler marker header or shared secret)
    let mut trigger_routes = Router::new()
        .route("/api/cron/update-issues", get(handlers::update_issues))
        .route("/api/test-cron", get(handlers::test_cron))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::trigger_auth_middleware,
        ));

    // One run per minute per peer IP, burst of 2
    // Uses PeerIpKeyExtractor, so the server must be started with connect info
    if state.config.rate_limit_triggers {
        let governor_config = Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(PeerIpKeyExtractor)
                .per_second(60)
                .burst_size(2)
                .finish()
                .context("Failed to build governor config")?,
        );
        trigger_routes = trigger_routes.layer(GovernorLayer {
            config: governor_config,
        });
    }

    let app = Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        // Snapshot reads (public)
        .route("/api/get-issues", get(handlers::get_issues))
        .route("/api/get-last-update", get(handlers::get_last_update))
        .route("/api/verify-timestamp", get(handlers::verify_timestamp))
        .route("/api/issues/search", get(handlers::search_issues))
        .route("/api/tags", get(handlers::list_tags))
        .route("/issues.json", get(handlers::issues_json))
        .merge(trigger_routes)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn build_store(config: &Config) -> Arc<dyn KeyValueStore> {
    match (&config.kv_rest_api_url, &config.kv_rest_api_token) {
        (Some(url), Some(token)) => {
            tracing::info!(url = %url, "Using REST key-value store");
            Arc::new(RestKvStore::new(url.clone(), token.clone()))
        }
        _ => {
            tracing::warn!(
                "KV_REST_API_URL / KV_REST_API_TOKEN not set; using in-memory store (lost on restart)"
            );
            Arc::new(MemoryKvStore::new())
        }
    }
}

fn load_registry(config: &Config) -> anyhow::Result<Registry> {
    let registry = match &config.registry_path {
        Some(path) => Registry::from_file(path)
            .with_context(|| format!("Failed to load registry from {}", path.display()))?,
        None => Registry::builtin(),
    };
    if registry.is_empty() {
        tracing::warn!("Registry has no sources; every run will store an empty issue list");
    }
    tracing::info!(sources = registry.len(), "Registry loaded");
    Ok(registry)
}

fn build_state(config: Config) -> anyhow::Result<AppState> {
    if config.github_token.is_none() {
        tracing::warn!("GITHUB_TOKEN not set; GitHub requests are unauthenticated");
    }

    let github: Arc<dyn GitHubClient> = Arc::new(
        GitHubClientImpl::new(config.github_api_url.clone(), config.github_token.clone())
            .context("Failed to build GitHub client")?,
    );
    let store = build_store(&config);
    let registry = load_registry(&config)?;

    Ok(AppState::new(config, github, store, registry))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let port = config.port;
    let state = build_state(config)?;
    let app = build_router(state)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

async fn export(config: Config, output: &Path) -> anyhow::Result<()> {
    let state = build_state(config)?;
    let report = state
        .aggregator
        .run()
        .await
        .context("Aggregation failed")?;

    let json = serde_json::to_string_pretty(&report.issues)?;
    tokio::fs::write(output, json)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        issues = report.issues.len(),
        path = %output.display(),
        "Exported issues"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gfi_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            tracing::info!("Starting Good First Issues API...");
            serve(config).await
        }
        Commands::Export { output } => export(config, &output).await,
    }
}
