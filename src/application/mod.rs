//! Application layer - Use cases and the ports they depend on
//!
//! This layer contains:
//! - Ports: model service, catalog storage, template source
//! - Services: prompt building and the generation pipeline
//! - DTOs: batch results and run reports

pub mod dto;
pub mod ports;
pub mod services;
