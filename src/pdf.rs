// src/pdf.rs
//! Single-page PDF output for the rendered CV header.

use anyhow::{Context, Result};
use image::ImageFormat;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::path::Path;

use crate::app_log;
use crate::data_uri::DataUri;
use crate::renderer::DocumentRenderer;

const POINTS_PER_MM: f64 = 72.0 / 25.4;
const A4_WIDTH_MM: f64 = 210.0;
const A4_HEIGHT_MM: f64 = 297.0;

/// A4 page in millimetres with the origin at the top-left corner.
pub struct PdfDocument {
    doc: Document,
    operations: Vec<Operation>,
    xobjects: Dictionary,
    image_count: usize,
    width_mm: f64,
    height_mm: f64,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::a4()
    }
}

impl PdfDocument {
    pub fn a4() -> Self {
        Self::with_size(A4_WIDTH_MM, A4_HEIGHT_MM)
    }

    pub fn with_size(width_mm: f64, height_mm: f64) -> Self {
        Self {
            doc: Document::with_version("1.5"),
            operations: Vec::new(),
            xobjects: Dictionary::new(),
            image_count: 0,
            width_mm,
            height_mm,
        }
    }

    pub fn image_count(&self) -> usize {
        self.image_count
    }

    /// Assemble the page and serialize the document.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        let mut doc = self.finish()?;
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .context("Failed to serialize PDF document")?;
        Ok(buffer)
    }

    pub fn save(self, path: &Path) -> Result<()> {
        let bytes = self.into_bytes()?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write PDF: {}", path.display()))
    }

    fn finish(self) -> Result<Document> {
        let Self {
            mut doc,
            operations,
            xobjects,
            width_mm,
            height_mm,
            ..
        } = self;

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().context("Failed to encode page content")?,
        ));
        let resources_id = doc.add_object(dictionary! {
            "XObject" => xobjects,
        });

        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                real(width_mm * POINTS_PER_MM),
                real(height_mm * POINTS_PER_MM),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        Ok(doc)
    }
}

impl DocumentRenderer for PdfDocument {
    fn add_image(
        &mut self,
        data: &str,
        format: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        let image_format = image_format(format)
            .ok_or_else(|| anyhow::anyhow!("Unsupported image format: {}", format))?;
        let uri = DataUri::parse(data)?;
        let bitmap = image::load_from_memory_with_format(&uri.bytes, image_format)
            .with_context(|| format!("Failed to decode {} image", format))?
            .to_rgb8();
        let (pixel_width, pixel_height) = bitmap.dimensions();

        let image_id = self.doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => pixel_width as i64,
                "Height" => pixel_height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            bitmap.into_raw(),
        ));

        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        self.xobjects.set(name.clone(), image_id);

        // PDF space is bottom-left, in points.
        let bottom = (self.height_mm - y - height) * POINTS_PER_MM;
        self.operations.push(Operation::new("q", vec![]));
        self.operations.push(Operation::new(
            "cm",
            vec![
                real(width * POINTS_PER_MM),
                0.into(),
                0.into(),
                real(height * POINTS_PER_MM),
                real(x * POINTS_PER_MM),
                real(bottom),
            ],
        ));
        self.operations
            .push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        self.operations.push(Operation::new("Q", vec![]));

        app_log!(debug,
            "Placed {}x{} px image at ({}, {}) size {}x{} mm",
            pixel_width, pixel_height, x, y, width, height
        );
        Ok(())
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Accepts media types (`image/png`) and short hints (`PNG`, `JPEG`).
pub fn image_format(hint: &str) -> Option<ImageFormat> {
    let hint = hint.trim().to_ascii_lowercase();
    let short = hint.strip_prefix("image/").unwrap_or(&hint);
    match short {
        "jpeg" | "jpg" | "pjpeg" => Some(ImageFormat::Jpeg),
        "png" => Some(ImageFormat::Png),
        "gif" => Some(ImageFormat::Gif),
        "webp" => Some(ImageFormat::WebP),
        "bmp" => Some(ImageFormat::Bmp),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_uri;
    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_data_uri() -> String {
        let bitmap = RgbImage::from_pixel(4, 4, Rgb([200, 30, 30]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(bitmap)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        data_uri::encode("image/png", &bytes)
    }

    #[test]
    fn test_image_format_hints() {
        assert_eq!(image_format("JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(image_format("image/jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(image_format("image/png"), Some(ImageFormat::Png));
        assert_eq!(image_format(" PNG "), Some(ImageFormat::Png));
        assert_eq!(image_format("image/svg+xml"), None);
    }

    #[test]
    fn test_add_image_and_serialize() {
        let mut pdf = PdfDocument::a4();
        pdf.add_image(&png_data_uri(), "image/png", 10.0, 72.0, 70.0, 70.0)
            .unwrap();
        assert_eq!(pdf.image_count(), 1);

        let bytes = pdf.into_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 1);
    }

    #[test]
    fn test_add_image_rejects_mismatched_format() {
        let mut pdf = PdfDocument::a4();
        assert!(pdf
            .add_image(&png_data_uri(), "JPEG", 0.0, 0.0, 70.0, 70.0)
            .is_err());
        assert!(pdf
            .add_image(&png_data_uri(), "image/tiff", 0.0, 0.0, 70.0, 70.0)
            .is_err());
        assert!(pdf
            .add_image("not a data uri", "PNG", 0.0, 0.0, 70.0, 70.0)
            .is_err());
        assert_eq!(pdf.image_count(), 0);
    }

    #[test]
    fn test_empty_document_still_serializes() {
        let bytes = PdfDocument::a4().into_bytes().unwrap();
        assert!(Document::load_mem(&bytes).is_ok());
    }
}
