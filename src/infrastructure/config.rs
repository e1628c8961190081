//! Application configuration

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::application::dto::GenerationRequest;
use crate::domain::entities::ItemType;
use crate::domain::value_objects::{GenerationSettings, Preset, PresetType};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Ollama API base URL (OpenAI-compatible)
    pub ollama_base_url: String,
    /// Model used for item generation
    pub ollama_model: String,

    /// Directory holding one `<type>.json` catalog per item type
    pub catalog_dir: PathBuf,
    /// Optional directory of prompt templates
    pub template_dir: Option<PathBuf>,

    pub preset: Preset,
    /// One generation run per entry
    pub requests: Vec<GenerationRequest>,

    pub generation: GenerationSettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let preset = parse_preset(
            &env::var("ITEMSMITH_PRESET").unwrap_or_else(|_| "standard".to_string()),
            env::var("ITEMSMITH_PRESET_FLAVOR").ok(),
        )?;

        let requests = parse_requests(
            &env::var("ITEMSMITH_REQUESTS").unwrap_or_else(|_| "weapon=5".to_string()),
            &preset,
        )
        .context("ITEMSMITH_REQUESTS must look like weapon=5,food=3")?;

        Ok(Self {
            ollama_base_url: env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434/v1".to_string()),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.1:8b".to_string()),

            catalog_dir: env::var("ITEMSMITH_CATALOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("catalogs")),
            template_dir: env::var("ITEMSMITH_TEMPLATE_DIR").ok().map(PathBuf::from),

            preset,
            requests,

            generation: GenerationSettings::from_env(),
        })
    }
}

/// A built-in preset name, or a custom preset when a flavor text is given
pub fn parse_preset(name: &str, flavor: Option<String>) -> Result<Preset> {
    match flavor.filter(|f| !f.trim().is_empty()) {
        Some(flavor) => Ok(Preset::custom(name.trim(), flavor.trim())),
        None => {
            let preset: PresetType = name
                .parse()
                .with_context(|| format!("ITEMSMITH_PRESET '{}' is not a built-in preset", name))?;
            Ok(Preset::BuiltIn(preset))
        }
    }
}

/// Parse `weapon=5,food=3` into one request per entry
pub fn parse_requests(raw: &str, preset: &Preset) -> Result<Vec<GenerationRequest>> {
    let mut requests = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((type_name, count)) = entry.split_once('=') else {
            bail!("Entry '{}' has no '='", entry);
        };
        let item_type: ItemType = type_name.trim().parse()?;
        let count: usize = count
            .trim()
            .parse()
            .with_context(|| format!("Count for '{}' is not a number", type_name.trim()))?;

        if requests
            .iter()
            .any(|r: &GenerationRequest| r.item_type == item_type)
        {
            bail!("{} is requested more than once", item_type);
        }
        requests.push(GenerationRequest::new(item_type, count, preset.clone()));
    }

    if requests.is_empty() {
        bail!("No item types requested");
    }
    Ok(requests)
}
