// src/renderer.rs
use anyhow::Result;
use serde::Serialize;

/// A document that can place a bitmap at given coordinates.
pub trait DocumentRenderer {
    /// `data` is a data URI; `format` is a media type or a short hint such as `"JPEG"`.
    fn add_image(
        &mut self,
        data: &str,
        format: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()>;
}

/// Space reserved for the profile image in the document layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePlacement {
    pub width: f64,
    pub height: f64,
    pub has_image: bool,
}

impl ImagePlacement {
    pub const NONE: ImagePlacement = ImagePlacement {
        width: 0.0,
        height: 0.0,
        has_image: false,
    };
}
