//! Prompt template files

use std::path::PathBuf;

use async_trait::async_trait;

use crate::application::ports::outbound::{TemplateError, TemplatePort};
use crate::application::services::llm::DEFAULT_TEMPLATE;
use crate::domain::entities::ItemType;

/// Reads `<dir>/<type>.txt`, then `<dir>/default.txt`, then the built-in template
#[derive(Debug, Clone, Default)]
pub struct FileTemplateSource {
    dir: Option<PathBuf>,
}

impl FileTemplateSource {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    fn candidates(&self, item_type: ItemType) -> Vec<PathBuf> {
        match &self.dir {
            Some(dir) => vec![
                dir.join(format!("{}.txt", item_type.type_name())),
                dir.join("default.txt"),
            ],
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl TemplatePort for FileTemplateSource {
    async fn load(&self, item_type: ItemType) -> Result<String, TemplateError> {
        for path in self.candidates(item_type) {
            match tokio::fs::read_to_string(&path).await {
                Ok(template) => {
                    tracing::debug!("Using template {} for {}", path.display(), item_type);
                    return Ok(template);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(TemplateError::Io(format!("{}: {}", path.display(), e)));
                }
            }
        }

        tracing::debug!("Using built-in template for {}", item_type);
        Ok(DEFAULT_TEMPLATE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_dir_uses_builtin() {
        let source = FileTemplateSource::default();
        assert_eq!(source.load(ItemType::Food).await.unwrap(), DEFAULT_TEMPLATE);
    }

    #[tokio::test]
    async fn test_type_file_wins_over_default_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("weapon.txt"), "weapon {{count}}").unwrap();
        std::fs::write(dir.path().join("default.txt"), "default {{count}}").unwrap();
        let source = FileTemplateSource::new(Some(dir.path().to_path_buf()));

        assert_eq!(source.load(ItemType::Weapon).await.unwrap(), "weapon {{count}}");
        assert_eq!(source.load(ItemType::Drink).await.unwrap(), "default {{count}}");
    }

    #[tokio::test]
    async fn test_empty_dir_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileTemplateSource::new(Some(dir.path().to_path_buf()));
        assert_eq!(source.load(ItemType::Ammo).await.unwrap(), DEFAULT_TEMPLATE);
    }

    #[tokio::test]
    async fn test_unreadable_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where a file is expected cannot be read as text
        std::fs::create_dir(dir.path().join("material.txt")).unwrap();
        let source = FileTemplateSource::new(Some(dir.path().to_path_buf()));

        assert!(matches!(
            source.load(ItemType::Material).await,
            Err(TemplateError::Io(_))
        ));
    }
}
