//! Outbound ports - Interfaces that the application requires from external systems

mod catalog_port;
mod llm_port;
mod template_port;

pub use catalog_port::{CatalogError, CatalogPort, WriteResult};
pub use llm_port::{ChatMessage, LlmError, LlmPort, LlmRequest, LlmResponse};
pub use template_port::{TemplateError, TemplatePort};
