//! Generation presets
//!
//! A preset biases the tone and content of generated items. Built-in presets
//! carry fixed flavor text; custom presets are user-authored.

use std::fmt;
use std::str::FromStr;

/// Built-in presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetType {
    Standard,
    PostApocalyptic,
    Military,
    Wilderness,
    Fantasy,
    SciFi,
}

impl PresetType {
    pub const ALL: [PresetType; 6] = [
        Self::Standard,
        Self::PostApocalyptic,
        Self::Military,
        Self::Wilderness,
        Self::Fantasy,
        Self::SciFi,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::PostApocalyptic => "post_apocalyptic",
            Self::Military => "military",
            Self::Wilderness => "wilderness",
            Self::Fantasy => "fantasy",
            Self::SciFi => "sci_fi",
        }
    }

    pub fn flavor(&self) -> &'static str {
        match self {
            Self::Standard => {
                "A grounded survival setting. Items should feel practical, \
                 believable, and useful to someone trying to stay alive."
            }
            Self::PostApocalyptic => {
                "The world ended decades ago. Items are scavenged, patched \
                 together from scrap, worn, and often dangerous to use."
            }
            Self::Military => {
                "Standard-issue and surplus military equipment. Items are \
                 rugged, utilitarian, and labelled with designations."
            }
            Self::Wilderness => {
                "Deep wilderness far from civilization. Items are hand-made \
                 from natural materials, foraged, or hunted."
            }
            Self::Fantasy => {
                "A low-magic medieval world. Items are forged, brewed, or \
                 enchanted, with names that hint at their history."
            }
            Self::SciFi => {
                "A frontier colony on a distant planet. Items are \
                 manufactured, synthetic, and sometimes experimental."
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown preset: {0}")]
pub struct UnknownPreset(pub String);

impl FromStr for PresetType {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == normalized)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

/// A user-authored preset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomPreset {
    pub name: String,
    pub description: String,
}

/// Preset applied to a generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preset {
    BuiltIn(PresetType),
    Custom(CustomPreset),
}

impl Preset {
    pub fn custom(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Custom(CustomPreset {
            name: name.into(),
            description: description.into(),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::BuiltIn(preset) => preset.name(),
            Self::Custom(custom) => &custom.name,
        }
    }

    pub fn flavor(&self) -> &str {
        match self {
            Self::BuiltIn(preset) => preset.flavor(),
            Self::Custom(custom) => &custom.description,
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::BuiltIn(PresetType::Standard)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
