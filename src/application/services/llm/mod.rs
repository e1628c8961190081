//! LLM helpers - prompt construction and response parsing

pub mod prompt_builder;
pub mod response_parser;

pub use prompt_builder::{build_prompt, build_system_prompt, PromptRequest, DEFAULT_TEMPLATE};
pub use response_parser::parse_item_objects;
