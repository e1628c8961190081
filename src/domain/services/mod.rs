//! Domain services - Pure operations shared across the pipeline

pub mod safe_json;
