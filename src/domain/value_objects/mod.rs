//! Value objects - Immutable objects defined by their attributes

mod ids;
mod preset;
mod settings;

pub use ids::*;
pub use preset::{Preset, PresetType};
pub use settings::GenerationSettings;
