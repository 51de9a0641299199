//! # Move Quote
//!
//! Main entry point for the moving-quote service.

use anyhow::Context;
use clap::Parser;
use move_quote::api::rest::{AppState, create_router};
use move_quote::application::services::{PricingCache, PricingRefreshDaemon, QuoteOrchestrator};
use move_quote::config::{AppConfig, GeoConfig, GeoProvider, LogConfig, LogFormat, PricingConfig};
use move_quote::domain::entities::PricingFeedRecord;
use move_quote::domain::services::QuoteEngineRegistry;
use move_quote::infrastructure::geo::{GeoResolver, HttpGeoResolver, InMemoryGeoResolver};
use move_quote::infrastructure::http::HttpClient;
use move_quote::infrastructure::notifications::LoggingQuotePublisher;
use move_quote::infrastructure::persistence::{
    DirectorySeed, DispatcherDirectory, InMemoryDispatcherDirectory,
};
use move_quote::infrastructure::pricing_feed::{HttpPricingFeed, InMemoryPricingFeed, PricingFeed};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Pricing served when no feed URL is configured.
const SAMPLE_PRICING: &str = include_str!("../config/pricing_sample.json");

/// Multi-vendor moving quote service.
#[derive(Debug, Parser)]
#[command(name = "move-quote", version, about)]
struct Cli {
    /// Configuration file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dispatcher directory seed (TOML); overrides `directory.seed_file`.
    #[arg(long)]
    directory_seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(seed) = cli.directory_seed {
        config.directory.seed_file = Some(seed);
    }
    config.validate().context("invalid configuration")?;

    init_tracing(&config.log);
    info!("Starting move-quote v{}", env!("CARGO_PKG_VERSION"));

    let directory = build_directory(&config)?;
    let geo = build_geo(&config.geo)?;
    let feed = build_feed(&config.pricing)?;
    let cache = Arc::new(PricingCache::new(feed, config.pricing.cache_config()));

    let orchestrator = QuoteOrchestrator::new(
        directory,
        geo,
        Arc::clone(&cache),
        QuoteEngineRegistry::standard(),
        config.orchestrator.orchestrator_config(),
    )
    .with_publisher(Arc::new(LoggingQuotePublisher));
    orchestrator
        .register_pricing_locations()
        .await
        .context("registering pricing locations")?;

    let shutdown = CancellationToken::new();
    let refresh = PricingRefreshDaemon::new(cache)
        .with_interval(config.pricing.refresh_interval())
        .with_warm_start(config.pricing.warm_on_start)
        .spawn(shutdown.clone());

    let addr = config.rest.socket_addr()?;
    let router = create_router(Arc::new(AppState::new(orchestrator)), config.rest.cors);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "REST server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("serving REST API")?;

    shutdown.cancel();
    if let Err(e) = refresh.await {
        warn!(error = %e, "pricing refresh daemon did not stop cleanly");
    }
    info!("Shutting down move-quote");

    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "failed to listen for ctrl-c");
            }
            info!("shutdown requested");
        }
        () = shutdown.cancelled() => {}
    }
    shutdown.cancel();
}

fn init_tracing(log: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

fn build_directory(config: &AppConfig) -> anyhow::Result<Arc<dyn DispatcherDirectory>> {
    let directory = match &config.directory.seed_file {
        Some(path) => {
            let seed = DirectorySeed::from_file(path)
                .with_context(|| format!("loading directory seed {}", path.display()))?;
            InMemoryDispatcherDirectory::from_seed(&seed)?
        }
        None => InMemoryDispatcherDirectory::builtin()?,
    };
    Ok(Arc::new(directory))
}

fn build_geo(config: &GeoConfig) -> anyhow::Result<Arc<dyn GeoResolver>> {
    match config.provider {
        GeoProvider::InMemory => {
            info!("using built-in geo resolver");
            Ok(Arc::new(InMemoryGeoResolver::new()))
        }
        GeoProvider::Http => {
            let base_url = config
                .base_url
                .as_deref()
                .context("geo.base_url is required for the http provider")?;
            let client = match config.api_key.as_deref() {
                Some(key) => HttpClient::with_bearer_token(config.timeout_ms, key)?,
                None => HttpClient::new(config.timeout_ms)?,
            };
            info!(base_url, rps = config.requests_per_second, "using HTTP geo resolver");
            Ok(Arc::new(HttpGeoResolver::new(
                client,
                base_url,
                config.requests_per_second,
            )))
        }
    }
}

fn build_feed(config: &PricingConfig) -> anyhow::Result<Arc<dyn PricingFeed>> {
    if let Some(url) = config.feed_base_url.as_deref() {
        info!(url, "using HTTP pricing feed");
        let client = HttpClient::new(config.fetch_timeout_ms)?;
        return Ok(Arc::new(HttpPricingFeed::new(client, url)));
    }

    let records: BTreeMap<String, PricingFeedRecord> =
        serde_json::from_str(SAMPLE_PRICING).context("parsing sample pricing")?;
    warn!(
        locations = records.len(),
        "no pricing feed configured, serving sample pricing"
    );
    let feed = InMemoryPricingFeed::new();
    for (key, record) in records {
        feed.publish(key, record);
    }
    Ok(Arc::new(feed))
}
