//! Generation Service - batch orchestration of item generation
//!
//! This service drives the model in batches until enough items have been
//! accepted or the batch ceiling is hit. It handles:
//!
//! - Building one prompt per batch from the preset and template
//! - Retrying transport failures and timeouts a bounded number of times
//! - Tolerant parsing of responses, with one narrower retry on garbage
//! - Rejecting items without id/name and items whose id is already taken
//! - Merging the accepted items into the catalog once, at the end of a run
//!
//! A failing batch never aborts the run; its items are counted as rejected
//! and the next batch is attempted.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::{watch, Mutex};

use crate::application::dto::{GenerationBatchResult, GenerationReport, GenerationRequest};
use crate::application::ports::inbound::GenerateItemsUseCase;
use crate::application::ports::outbound::{
    CatalogError, CatalogPort, ChatMessage, LlmError, LlmPort, LlmRequest, TemplateError,
    TemplatePort, WriteResult,
};
use crate::application::services::llm::{
    build_prompt, build_system_prompt, parse_item_objects, PromptRequest,
};
use crate::domain::entities::{ItemRecord, ItemType};
use crate::domain::value_objects::{BatchId, GenerationSettings, Preset, RunId};

/// Errors that end a generation run
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The template cannot produce a prompt; no batch was attempted
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// The catalog could not be loaded; no batch was attempted
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// Generation finished but the merge-write failed. The catalog on disk is
    /// unchanged; the accepted items are handed back and, when `pending` is
    /// set, parked there for the next run of this type to merge.
    #[error("Failed to persist {} accepted items: {source}", .items.len())]
    PersistFailed {
        items: Vec<ItemRecord>,
        pending: Option<PathBuf>,
        #[source]
        source: CatalogError,
    },
}

/// Service for generating items and merging them into catalogs
pub struct GenerationService<L: LlmPort, C: CatalogPort, T: TemplatePort> {
    llm: Arc<L>,
    catalog: Arc<C>,
    templates: Arc<T>,
    settings: GenerationSettings,
    /// Single writer per item type: a run holds its type's lock from catalog
    /// load until the merge-write completes
    type_locks: HashMap<ItemType, Arc<Mutex<()>>>,
}

impl<L: LlmPort, C: CatalogPort, T: TemplatePort> GenerationService<L, C, T> {
    pub fn new(llm: Arc<L>, catalog: Arc<C>, templates: Arc<T>, settings: GenerationSettings) -> Self {
        let type_locks = ItemType::ALL
            .into_iter()
            .map(|item_type| (item_type, Arc::new(Mutex::new(()))))
            .collect();

        Self {
            llm,
            catalog,
            templates,
            settings,
            type_locks,
        }
    }

    /// Load the catalog, generate, and merge-write the accepted items.
    ///
    /// Items parked by an earlier failed write are merged along with the new
    /// ones. Cancelled runs and runs with nothing to write leave the catalog
    /// file untouched.
    pub async fn generate_and_persist(
        &self,
        request: GenerationRequest,
        cancel: watch::Receiver<bool>,
    ) -> Result<GenerationReport, GenerationError> {
        let run_id = RunId::new();
        let started_at = Utc::now();
        let item_type = request.item_type;

        let _guard = self.type_locks[&item_type].lock().await;
        tracing::info!(
            "Run {}: generating {} {} with preset '{}'",
            run_id,
            request.count,
            item_type,
            request.preset
        );

        let catalog = self.catalog.load(item_type).await?;
        let template = self.templates.load(item_type).await?;
        let mut existing_ids = catalog.ids().clone();
        if catalog.is_empty() {
            tracing::debug!("Run {}: starting a new {} catalog", run_id, item_type);
        } else {
            tracing::debug!("Run {}: {} existing {} items", run_id, catalog.len(), item_type);
        }

        let recovered = self.recover_pending(item_type, &mut existing_ids).await?;

        let result = self
            .generate_items(
                item_type,
                request.count,
                &request.preset,
                &template,
                &mut existing_ids,
                &cancel,
            )
            .await?;

        let to_write: Vec<ItemRecord> = recovered.iter().chain(&result.items).cloned().collect();
        let write = if result.cancelled {
            tracing::info!(
                "Run {}: cancelled, discarding {} accepted items without writing",
                run_id,
                result.accepted()
            );
            None
        } else if to_write.is_empty() {
            None
        } else {
            match self.write_with_retry(item_type, &to_write).await {
                Ok(write) => {
                    if !recovered.is_empty() {
                        if let Err(e) = self.catalog.clear_pending(item_type).await {
                            // Already merged, so the next run drops them as collisions
                            tracing::warn!("Run {}: could not clear pending items: {}", run_id, e);
                        }
                    }
                    Some(write)
                }
                Err(source) => {
                    tracing::error!("Run {}: catalog write failed: {}", run_id, source);
                    let pending = match self.catalog.save_pending(item_type, &to_write).await {
                        Ok(path) => {
                            tracing::warn!(
                                "Run {}: parked {} items in {} for the next run",
                                run_id,
                                to_write.len(),
                                path.display()
                            );
                            Some(path)
                        }
                        Err(e) => {
                            tracing::error!("Run {}: could not park accepted items: {}", run_id, e);
                            None
                        }
                    };
                    return Err(GenerationError::PersistFailed {
                        items: to_write,
                        pending,
                        source,
                    });
                }
            }
        };

        let report = GenerationReport::from_result(
            run_id,
            item_type,
            &result,
            recovered.len(),
            write,
            started_at,
        );
        tracing::info!(
            "Run {}: {} - requested {}, accepted {}, rejected {} in {} batches",
            run_id,
            report.status,
            report.requested,
            report.accepted,
            report.rejected,
            report.batches_attempted
        );
        Ok(report)
    }

    /// Pending items not yet in the catalog; their ids join `existing_ids`
    async fn recover_pending(
        &self,
        item_type: ItemType,
        existing_ids: &mut HashSet<String>,
    ) -> Result<Vec<ItemRecord>, CatalogError> {
        let pending = self.catalog.load_pending(item_type).await?;
        let total = pending.len();
        let recovered: Vec<ItemRecord> = pending
            .into_iter()
            .filter(|item| existing_ids.insert(item.id.clone()))
            .collect();

        if total > 0 {
            tracing::info!(
                "Recovered {} pending {} items ({} already in the catalog)",
                recovered.len(),
                item_type,
                total - recovered.len()
            );
        }
        Ok(recovered)
    }

    /// Merge-write with one retry after `retry_delay`
    async fn write_with_retry(
        &self,
        item_type: ItemType,
        items: &[ItemRecord],
    ) -> Result<WriteResult, CatalogError> {
        match self.catalog.merge_and_persist(item_type, items).await {
            Ok(write) => Ok(write),
            Err(e) => {
                tracing::warn!("Catalog write for {} failed, retrying once: {}", item_type, e);
                tokio::time::sleep(self.settings.retry_delay()).await;
                self.catalog.merge_and_persist(item_type, items).await
            }
        }
    }

    /// Generate up to `requested` new items of `item_type`.
    ///
    /// `existing_ids` must hold every id already taken; accepted ids are added
    /// to it as they are accepted, so later batches collide against earlier
    /// ones too. Reaching the batch ceiling is a partial success, not an
    /// error. Fails only if the template cannot produce a prompt.
    pub async fn generate_items(
        &self,
        item_type: ItemType,
        requested: usize,
        preset: &Preset,
        template: &str,
        existing_ids: &mut HashSet<String>,
        cancel: &watch::Receiver<bool>,
    ) -> Result<GenerationBatchResult, GenerationError> {
        let mut result = GenerationBatchResult::new(requested);
        if requested == 0 {
            return Ok(result);
        }

        // Placeholders are checked once here; every later build uses the
        // same template and cannot fail
        self.batch_prompt(item_type, preset, template, 1, existing_ids, false)?;

        let batch_size = self.settings.effective_batch_size();
        let ceiling = self.settings.batch_ceiling(requested);

        while result.remaining() > 0 {
            if *cancel.borrow() {
                tracing::info!("Generation of {} cancelled at batch boundary", item_type);
                result.cancelled = true;
                break;
            }
            if result.batches_attempted >= ceiling {
                tracing::warn!(
                    "Batch ceiling ({}) reached for {} with {}/{} items accepted",
                    ceiling,
                    item_type,
                    result.accepted(),
                    requested
                );
                break;
            }

            let count = batch_size.min(result.remaining());
            result.batches_attempted += 1;
            let batch_id = BatchId::new();
            tracing::debug!(
                "Batch {} ({}/{}): requesting {} {}",
                batch_id,
                result.batches_attempted,
                ceiling,
                count,
                item_type
            );

            let prompt = self.batch_prompt(item_type, preset, template, count, existing_ids, false)?;
            let content = match self.call_with_retries(&prompt).await {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Batch {} abandoned after retries: {}", batch_id, e);
                    result.rejected += count;
                    continue;
                }
            };

            match parse_item_objects(&content) {
                Ok(values) => self.accept_items(item_type, values, existing_ids, &mut result),
                Err(e) => {
                    tracing::warn!("Batch {}: unparseable response: {}", batch_id, e);
                    result.rejected += count;

                    if self.settings.retry_malformed && !*cancel.borrow() {
                        self.retry_narrow(item_type, preset, template, count, existing_ids, &mut result)
                            .await?;
                    }
                }
            }
        }

        Ok(result)
    }

    /// One more attempt for a malformed batch, asking for fewer items with a
    /// strict output reminder
    async fn retry_narrow(
        &self,
        item_type: ItemType,
        preset: &Preset,
        template: &str,
        count: usize,
        existing_ids: &mut HashSet<String>,
        result: &mut GenerationBatchResult,
    ) -> Result<(), GenerationError> {
        let narrow_count = (count / 2).max(1).min(result.remaining());
        let prompt = self.batch_prompt(item_type, preset, template, narrow_count, existing_ids, true)?;

        match self.call_with_retries(&prompt).await {
            Ok(content) => match parse_item_objects(&content) {
                Ok(values) => self.accept_items(item_type, values, existing_ids, result),
                Err(e) => {
                    tracing::warn!("Narrow retry for {} also unparseable: {}", item_type, e);
                    result.rejected += narrow_count;
                }
            },
            Err(e) => {
                tracing::warn!("Narrow retry for {} abandoned: {}", item_type, e);
                result.rejected += narrow_count;
            }
        }
        Ok(())
    }

    fn batch_prompt(
        &self,
        item_type: ItemType,
        preset: &Preset,
        template: &str,
        count: usize,
        existing_ids: &HashSet<String>,
        narrow: bool,
    ) -> Result<String, TemplateError> {
        let request = PromptRequest {
            item_type,
            preset,
            count,
            avoid_ids: existing_ids.iter().cloned().collect(),
            narrow,
        };
        build_prompt(&request, template)
    }

    /// Call the model, retrying transport failures and timeouts
    async fn call_with_retries(&self, prompt: &str) -> Result<String, LlmError> {
        let attempts = self.settings.transport_retries + 1;
        let timeout = self.settings.request_timeout();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let request = LlmRequest::new(vec![ChatMessage::user(prompt)])
                .with_system_prompt(build_system_prompt())
                .with_temperature(self.settings.temperature)
                .with_max_tokens(self.settings.max_tokens);

            let error = match tokio::time::timeout(timeout, self.llm.generate(request)).await {
                Ok(Ok(response)) => {
                    tracing::debug!(
                        "Model {} answered with {} tokens",
                        response.model,
                        response.tokens_used
                    );
                    return Ok(response.content);
                }
                Ok(Err(e)) => e,
                Err(_) => LlmError::Timeout(timeout),
            };

            if attempt >= attempts {
                return Err(error);
            }
            tracing::warn!("Model call failed (attempt {}/{}): {}", attempt, attempts, error);
            tokio::time::sleep(self.settings.retry_delay()).await;
        }
    }

    fn accept_items(
        &self,
        item_type: ItemType,
        values: Vec<Value>,
        existing_ids: &mut HashSet<String>,
        result: &mut GenerationBatchResult,
    ) {
        let proposed = values.len();
        let mut ignored = 0;

        for value in values {
            if result.remaining() == 0 {
                ignored += 1;
                continue;
            }

            let record = match ItemRecord::from_untrusted(item_type, &value) {
                Ok(record) => record,
                Err(reason) => {
                    tracing::debug!("Rejected {} item: {}", item_type, reason);
                    result.rejected += 1;
                    continue;
                }
            };

            if !existing_ids.insert(record.id.clone()) {
                tracing::debug!("Rejected {} '{}': id already taken", item_type, record.id);
                result.rejected += 1;
                continue;
            }

            result.items.push(record);
        }

        if ignored > 0 {
            tracing::debug!("Ignored {} surplus {} items out of {}", ignored, item_type, proposed);
        }
    }
}

#[async_trait]
impl<L: LlmPort, C: CatalogPort, T: TemplatePort> GenerateItemsUseCase for GenerationService<L, C, T> {
    async fn run(
        &self,
        request: GenerationRequest,
        cancel: watch::Receiver<bool>,
    ) -> Result<GenerationReport, GenerationError> {
        self.generate_and_persist(request, cancel).await
    }
}
