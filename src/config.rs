// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::app_log;

/// Upload limits and PDF layout for the profile image.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub max_upload_bytes: u64,
    /// Side of the square the image occupies in the document.
    pub image_size: f64,
    /// How far above the header line the image top sits.
    pub top_offset: f64,
    /// Offset subtracted from the header start when computing the bottom edge.
    pub header_offset: f64,
    pub fallback_format: String,
    pub loaded_label: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 5 * 1024 * 1024,
            image_size: 70.0,
            top_offset: 28.0,
            header_offset: 30.0,
            fallback_format: "JPEG".to_string(),
            loaded_label: "Loaded from file".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: ImageConfig,
    #[serde(default)]
    production: ImageConfig,
}

impl ImageConfig {
    /// Load the section matching the current environment, or defaults when
    /// the file does not exist.
    pub fn load(config_path: &Path) -> Result<Self> {
        let environment = Self::get_environment();
        app_log!(info, "Loading image configuration for environment: {}", environment);

        if !config_path.exists() {
            app_log!(info,
                "No configuration at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_yaml(&content, &environment)
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse image configuration")?;

        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    fn get_environment() -> String {
        std::env::var("CV_EDITOR_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }
}
