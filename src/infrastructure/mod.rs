//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Catalog store: atomic JSON catalog files
//! - Ollama: LLM integration for item generation
//! - Templates: prompt template files
//! - Config: Application configuration

pub mod catalog_store;
pub mod config;
pub mod ollama;
pub mod templates;
