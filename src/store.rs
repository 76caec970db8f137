// src/store.rs
//! Editor save files carrying the profile image next to the rest of the document.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::app_log;

/// Persisted shape of the profile image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedImage {
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub profile_image_type: Option<String>,
}

/// A whole save file: the image fields plus whatever else the editor stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    #[serde(flatten)]
    pub image: SavedImage,
    #[serde(flatten)]
    pub document: Map<String, Value>,
}

impl SaveFile {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse save file")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize save file")
    }

    /// Load a save file; a missing file yields an empty document.
    pub async fn load(path: &Path) -> Result<Self> {
        if tokio::fs::metadata(path).await.is_err() {
            app_log!(info, "No save file at {}, starting empty", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read save file: {}", path.display()))?;
        Self::from_json(&content)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        tokio::fs::write(path, self.to_json()?)
            .await
            .with_context(|| format!("Failed to write save file: {}", path.display()))?;

        app_log!(info, "Saved {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_absent_image_serializes_as_null() {
        let json = serde_json::to_value(SavedImage::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "profileImage": null, "profileImageType": null })
        );
    }

    #[test]
    fn test_other_document_fields_survive() {
        let save = SaveFile::from_json(
            r#"{"name":"Ada","profileImage":"data:image/png;base64,AA==","profileImageType":"image/png","skills":["rust"]}"#,
        )
        .unwrap();
        assert_eq!(
            save.image.profile_image.as_deref(),
            Some("data:image/png;base64,AA==")
        );
        assert_eq!(save.document.get("name"), Some(&Value::from("Ada")));
        assert!(save.document.get("profileImage").is_none());

        let reparsed = SaveFile::from_json(&save.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, save);
    }

    #[test]
    fn test_missing_keys_load_as_none() {
        let save = SaveFile::from_json(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(save.image, SavedImage::default());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = TempDir::new("cv-store").unwrap();
        let save = SaveFile::load(&dir.path().join("absent.json")).await.unwrap();
        assert_eq!(save, SaveFile::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new("cv-store").unwrap();
        let path = dir.path().join("nested").join("cv.json");

        let mut save = SaveFile::default();
        save.image.profile_image = Some("data:image/jpeg;base64,/9j/".to_string());
        save.image.profile_image_type = Some("image/jpeg".to_string());
        save.document.insert("title".to_string(), Value::from("Engineer"));
        save.save(&path).await.unwrap();

        assert_eq!(SaveFile::load(&path).await.unwrap(), save);
    }
}
