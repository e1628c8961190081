//! Application services - Use case implementations
//!
//! The generation service accepts its model, catalog, and template
//! dependencies as ports and returns DTOs, following hexagonal architecture
//! principles.

pub mod generation_service;
pub mod llm;

pub use generation_service::{GenerationError, GenerationService};
