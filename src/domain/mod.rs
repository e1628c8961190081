//! Domain layer - Core item model with no external I/O
//!
//! This layer contains:
//! - Entities: item types, the generic item record, catalogs
//! - Value Objects: presets, generation settings, run identifiers
//! - Domain Services: defaulting accessors for untrusted JSON

pub mod entities;
pub mod services;
pub mod value_objects;
