use async_trait::async_trait;

use crate::domain::entities::ItemType;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// The template is missing a placeholder the prompt cannot do without
    #[error("Template is missing required placeholder {{{{{0}}}}}")]
    MissingPlaceholder(String),
    #[error("Template could not be loaded: {0}")]
    Io(String),
}

#[async_trait]
pub trait TemplatePort: Send + Sync {
    /// Template text for generating items of `item_type`
    async fn load(&self, item_type: ItemType) -> Result<String, TemplateError>;
}
