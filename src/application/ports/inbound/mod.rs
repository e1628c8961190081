//! Inbound ports - Interfaces that the application exposes to the outside world

use async_trait::async_trait;
use tokio::sync::watch;

use crate::application::dto::{GenerationReport, GenerationRequest};
use crate::application::services::GenerationError;

/// Generate items for one request and merge them into that type's catalog
#[async_trait]
pub trait GenerateItemsUseCase: Send + Sync {
    /// `cancel` flips to `true` to stop the run at the next batch boundary
    async fn run(
        &self,
        request: GenerationRequest,
        cancel: watch::Receiver<bool>,
    ) -> Result<GenerationReport, GenerationError>;
}
