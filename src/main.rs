//! itemsmith - LLM-driven game item generator
//!
//! Drives a local Ollama model to propose weapons, ammo, food, drinks,
//! materials and weapon components, then merges the accepted items into
//! per-type JSON catalogs without id collisions.

mod application;
mod domain;
mod infrastructure;

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::ports::inbound::GenerateItemsUseCase;
use crate::application::services::{GenerationError, GenerationService};
use crate::infrastructure::catalog_store::JsonCatalogStore;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::ollama::OllamaClient;
use crate::infrastructure::templates::FileTemplateSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "itemsmith=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting itemsmith");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Ollama: {} ({})", config.ollama_base_url, config.ollama_model);
    tracing::info!("  Catalogs: {}", config.catalog_dir.display());
    tracing::info!("  Preset: {}", config.preset);

    let llm = OllamaClient::new(&config.ollama_base_url, &config.ollama_model)
        .with_timeout(config.generation.request_timeout());
    let service: Arc<dyn GenerateItemsUseCase> = Arc::new(GenerationService::new(
        Arc::new(llm),
        Arc::new(JsonCatalogStore::new(&config.catalog_dir)),
        Arc::new(FileTemplateSource::new(config.template_dir.clone())),
        config.generation.clone(),
    ));

    // Ctrl+C stops every run at its next batch boundary
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received, cancelling runs...");
            let _ = cancel_tx.send(true);
        }
    });

    let runs = config.requests.into_iter().map(|request| {
        let service = service.clone();
        let cancel = cancel_rx.clone();
        tokio::spawn(async move {
            let item_type = request.item_type;
            (item_type, service.run(request, cancel).await)
        })
    });

    let mut failures = 0;
    for joined in join_all(runs).await {
        let (item_type, outcome) = match joined {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Generation task panicked: {}", e);
                failures += 1;
                continue;
            }
        };

        match outcome {
            Ok(report) => {
                tracing::info!(
                    "{}: {} ({} of {} accepted, {} rejected, {} batches)",
                    report.item_type,
                    report.status,
                    report.accepted,
                    report.requested,
                    report.rejected,
                    report.batches_attempted
                );
                if report.recovered > 0 {
                    tracing::info!("  merged {} items left over from an earlier run", report.recovered);
                }
                if let Some(write) = &report.write {
                    tracing::info!("  {} now holds {} items", write.path.display(), write.total);
                }
                match serde_json::to_string(&report) {
                    Ok(json) => tracing::info!("Report: {}", json),
                    Err(e) => tracing::warn!("Could not serialize report: {}", e),
                }
            }
            Err(GenerationError::PersistFailed {
                items,
                pending,
                source,
            }) => {
                tracing::error!(
                    "{}: could not write {} accepted items: {}",
                    item_type,
                    items.len(),
                    source
                );
                match pending {
                    Some(path) => tracing::warn!(
                        "  items parked in {}; the next {} run merges them",
                        path.display(),
                        item_type
                    ),
                    None => tracing::error!("  items could not be parked and are lost"),
                }
                failures += 1;
            }
            Err(e) => {
                tracing::error!("{}: generation failed: {}", item_type, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} generation run(s) failed", failures);
    }
    Ok(())
}
