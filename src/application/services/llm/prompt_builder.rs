//! Prompt building functions for item generation requests

use serde_json::{Map, Value};

use crate::application::ports::outbound::TemplateError;
use crate::domain::entities::ItemType;
use crate::domain::value_objects::Preset;

/// Placeholders a template must contain
pub const REQUIRED_PLACEHOLDERS: [&str; 3] = ["item_type", "count", "preset_flavor"];

/// Cap on how many existing ids are listed in a prompt
pub const AVOID_ID_LIMIT: usize = 50;

/// Template used when no template file is configured for an item type
pub const DEFAULT_TEMPLATE: &str = r#"Create {{count}} new {{item_type}} for a game.

SETTING ({{preset_name}}):
{{preset_flavor}}

Each item is a JSON object with these fields:
{{schema}}

Do not reuse any of these existing ids: {{avoid_ids}}

Respond with a JSON array of {{count}} objects and nothing else."#;

/// Everything a single batch prompt is built from
#[derive(Debug, Clone)]
pub struct PromptRequest<'a> {
    pub item_type: ItemType,
    pub preset: &'a Preset,
    pub count: usize,
    pub avoid_ids: Vec<String>,
    /// Append a strict output reminder; used when retrying a malformed batch
    pub narrow: bool,
}

/// System prompt shared by every generation call
pub fn build_system_prompt() -> String {
    r#"You are a game content designer who writes item definitions as JSON.

Rules:
- Output valid JSON only. No markdown fences, no commentary.
- Every item needs a short unique "id" (lowercase letters, digits, underscores) and a "name".
- Use integers for numeric fields and true/false for boolean fields.
- Keep values plausible for the setting; do not invent extra fields."#
        .to_string()
}

/// Fill `template` for `request`.
///
/// Fails only when the template lacks one of [`REQUIRED_PLACEHOLDERS`], which
/// means the template asset is misconfigured. Unknown placeholders are left
/// untouched.
pub fn build_prompt(request: &PromptRequest<'_>, template: &str) -> Result<String, TemplateError> {
    for name in REQUIRED_PLACEHOLDERS {
        if !template.contains(&format!("{{{{{}}}}}", name)) {
            return Err(TemplateError::MissingPlaceholder(name.to_string()));
        }
    }

    let count = request.count.to_string();
    let schema = describe_schema(request.item_type);
    let avoid_ids = format_avoid_ids(&request.avoid_ids);

    let mut prompt = render(template, |name| match name {
        "item_type" => Some(request.item_type.display_plural()),
        "count" => Some(count.as_str()),
        "preset_name" => Some(request.preset.name()),
        "preset_flavor" => Some(request.preset.flavor()),
        "schema" => Some(schema.as_str()),
        "avoid_ids" => Some(avoid_ids.as_str()),
        _ => None,
    });

    if request.narrow {
        prompt.push_str(&format!(
            "\n\nIMPORTANT: Your previous answer could not be parsed. Reply with ONLY a JSON array \
             of exactly {} objects. Start with '[' and end with ']'.",
            request.count
        ));
    }

    Ok(prompt)
}

/// Field list plus an example object for `item_type`
pub fn describe_schema(item_type: ItemType) -> String {
    let mut lines = vec![
        "- id (string, required, unique)".to_string(),
        "- name (string, required)".to_string(),
    ];

    let mut example = Map::new();
    example.insert("id".to_string(), Value::String(format!("{}_001", item_type.type_name())));
    example.insert("name".to_string(), Value::String("...".to_string()));

    for spec in item_type.schema() {
        lines.push(format!(
            "- {} ({}, default {})",
            spec.name,
            spec.default.kind_name(),
            spec.default.to_value()
        ));
        example.insert(spec.name.to_string(), spec.default.to_value());
    }

    lines.push(String::new());
    lines.push(format!("Example: {}", Value::Object(example)));
    lines.join("\n")
}

fn format_avoid_ids(ids: &[String]) -> String {
    if ids.is_empty() {
        return "none".to_string();
    }

    let mut sorted: Vec<&str> = ids.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let shown = &sorted[..sorted.len().min(AVOID_ID_LIMIT)];
    let mut out = shown.join(", ");
    if sorted.len() > shown.len() {
        out.push_str(&format!(" (and {} more)", sorted.len() - shown.len()));
    }
    out
}

/// Single-pass `{{name}}` substitution, so substituted text is never rescanned
fn render<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        match after_open.find("}}") {
            Some(end) => {
                let name = after_open[..end].trim();
                match lookup(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after_open[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
