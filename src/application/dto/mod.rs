//! Data Transfer Objects - What crosses the application boundary
//!
//! DTOs live in the application layer so the binary can log and serialize
//! run reports without pulling reporting concerns into the domain model.

pub mod generation;

pub use generation::*;
