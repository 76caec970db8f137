// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::app_log;
use crate::config::ImageConfig;
use crate::image_handler::ImageHandler;
use crate::pdf::PdfDocument;
use crate::store::SaveFile;
use crate::ui::{ElementId, FileSource, MemorySurface, SelectedFile, UiEvent};

#[derive(Parser)]
#[command(name = "cv-profile-image")]
#[command(about = "Manage the profile image stored in a CV editor save file")]
pub struct ProfileImageCli {
    #[command(subcommand)]
    pub command: ProfileImageCommand,

    #[arg(long, default_value = "cv-editor.yaml")]
    pub config: PathBuf,

    #[arg(long, default_value = "/tmp/cv-profile-image.log")]
    pub log_file: PathBuf,
}

#[derive(Subcommand)]
pub enum ProfileImageCommand {
    /// Upload an image file into a save file
    Attach {
        save: PathBuf,
        image: PathBuf,
        /// Declared content type; guessed from the extension when omitted
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Remove the image from a save file
    Remove { save: PathBuf },
    /// Describe the image stored in a save file
    Show { save: PathBuf },
    /// Render the image into a PDF header
    Render {
        save: PathBuf,
        output: PathBuf,
        #[arg(long, default_value_t = 10.0)]
        margin_left: f64,
        #[arg(long, default_value_t = 100.0)]
        y: f64,
        #[arg(long, default_value_t = 5.0)]
        padding: f64,
    },
}

pub async fn handle_command(cli: ProfileImageCli) -> Result<()> {
    let config = ImageConfig::load(&cli.config)?;

    match cli.command {
        ProfileImageCommand::Attach {
            save,
            image,
            content_type,
        } => attach(config, &save, &image, content_type).await,
        ProfileImageCommand::Remove { save } => remove(config, &save).await,
        ProfileImageCommand::Show { save } => show(config, &save).await,
        ProfileImageCommand::Render {
            save,
            output,
            margin_left,
            y,
            padding,
        } => render(config, &save, &output, margin_left, y, padding).await,
    }
}

fn open_session(config: ImageConfig, save: &SaveFile) -> ImageHandler<MemorySurface> {
    let mut handler = ImageHandler::with_config(MemorySurface::full(), config);
    handler.initialize();
    handler.load_from_saved(&save.image);
    handler
}

pub async fn attach(
    config: ImageConfig,
    save_path: &Path,
    image_path: &Path,
    content_type: Option<String>,
) -> Result<()> {
    let mut save = SaveFile::load(save_path).await?;
    let mut handler = open_session(config, &save);

    let metadata = tokio::fs::metadata(image_path)
        .await
        .with_context(|| format!("Failed to read image metadata: {}", image_path.display()))?;
    let name = image_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    let file = SelectedFile {
        content_type: content_type.or_else(|| Some(guess_content_type(image_path).to_string())),
        name,
        size: metadata.len(),
        source: FileSource::Path(image_path.to_path_buf()),
    };

    // Start from an empty session so a failed read cannot pass for the stored image.
    // Nothing is written back on failure.
    handler.remove_image();
    handler
        .dispatch(UiEvent::Change(ElementId::FileInput, Some(file)))
        .await;

    if let Some(alert) = handler.surface().alerts().last() {
        anyhow::bail!("{}", alert);
    }
    if !handler.has_image() {
        anyhow::bail!("Could not read image: {}", image_path.display());
    }

    save.image = handler.export_for_save();
    save.save(save_path).await?;

    app_log!(
        info,
        "Attached {} to {}",
        image_path.display(),
        save_path.display()
    );
    println!(
        "✓ Attached {} ({}) to {}",
        image_path.display(),
        handler.media_type().unwrap_or_default(),
        save_path.display()
    );
    Ok(())
}

pub async fn remove(config: ImageConfig, save_path: &Path) -> Result<()> {
    let mut save = SaveFile::load(save_path).await?;
    let mut handler = open_session(config, &save);

    handler.dispatch(UiEvent::Click(ElementId::RemoveButton)).await;

    save.image = handler.export_for_save();
    save.save(save_path).await?;
    println!("✓ Removed profile image from {}", save_path.display());
    Ok(())
}

pub async fn show(config: ImageConfig, save_path: &Path) -> Result<()> {
    let save = SaveFile::load(save_path).await?;
    let handler = open_session(config, &save);

    match handler.data_string() {
        Some(data) => println!(
            "Profile image: {} ({} characters encoded)",
            handler.media_type().unwrap_or_default(),
            data.len()
        ),
        None => println!("No profile image in {}", save_path.display()),
    }
    Ok(())
}

pub async fn render(
    config: ImageConfig,
    save_path: &Path,
    output: &Path,
    margin_left: f64,
    y: f64,
    padding: f64,
) -> Result<()> {
    let save = SaveFile::load(save_path).await?;
    let handler = open_session(config, &save);

    let mut pdf = PdfDocument::a4();
    let placement = handler.add_to_document(&mut pdf, margin_left, y);
    let bottom = handler.compute_bottom_position(y, placement.height, padding);
    pdf.save(output)?;

    let summary = serde_json::json!({
        "placement": placement,
        "bottom": bottom,
        "output": output.display().to_string(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Content type from the file extension, as a browser would declare it.
pub fn guess_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use tempdir::TempDir;

    fn write_png(path: &Path) {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 3, Rgb([10, 20, 30])))
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("me.PNG")), "image/png");
        assert_eq!(guess_content_type(Path::new("me.jpeg")), "image/jpeg");
        assert_eq!(guess_content_type(Path::new("cv.txt")), "application/octet-stream");
        assert_eq!(guess_content_type(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_attach_render_remove() {
        let dir = TempDir::new("cv-cli").unwrap();
        let save_path = dir.path().join("cv.json");
        let image_path = dir.path().join("me.png");
        let pdf_path = dir.path().join("cv.pdf");
        write_png(&image_path);
        std::fs::write(&save_path, r#"{"name":"Ada"}"#).unwrap();

        attach(ImageConfig::default(), &save_path, &image_path, None)
            .await
            .unwrap();
        let saved = SaveFile::load(&save_path).await.unwrap();
        assert_eq!(saved.image.profile_image_type.as_deref(), Some("image/png"));
        assert!(saved.document.contains_key("name"));

        render(ImageConfig::default(), &save_path, &pdf_path, 10.0, 100.0, 5.0)
            .await
            .unwrap();
        assert!(std::fs::read(&pdf_path).unwrap().starts_with(b"%PDF"));

        remove(ImageConfig::default(), &save_path).await.unwrap();
        let cleared = SaveFile::load(&save_path).await.unwrap();
        assert_eq!(cleared.image.profile_image, None);
        assert_eq!(cleared.image.profile_image_type, None);
    }

    #[tokio::test]
    async fn test_attach_rejects_non_image() {
        let dir = TempDir::new("cv-cli").unwrap();
        let save_path = dir.path().join("cv.json");
        let text_path = dir.path().join("notes.txt");
        std::fs::write(&text_path, "hello").unwrap();

        let err = attach(ImageConfig::default(), &save_path, &text_path, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("image"));
        assert!(!save_path.exists());
    }

    #[tokio::test]
    async fn test_attach_unreadable_file_keeps_previous_image() {
        let dir = TempDir::new("cv-cli").unwrap();
        let save_path = dir.path().join("cv.json");
        let unreadable = dir.path().join("new.png");
        std::fs::create_dir(&unreadable).unwrap();
        let original = r#"{"profileImage":"data:image/gif;base64,R0lG","profileImageType":"image/gif"}"#;
        std::fs::write(&save_path, original).unwrap();

        let err = attach(ImageConfig::default(), &save_path, &unreadable, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Could not read image"));

        let saved = SaveFile::load(&save_path).await.unwrap();
        assert_eq!(
            saved.image.profile_image.as_deref(),
            Some("data:image/gif;base64,R0lG")
        );
        assert_eq!(saved.image.profile_image_type.as_deref(), Some("image/gif"));
        assert_eq!(std::fs::read_to_string(&save_path).unwrap(), original);
    }

    #[tokio::test]
    async fn test_attach_same_image_twice_succeeds() {
        let dir = TempDir::new("cv-cli").unwrap();
        let save_path = dir.path().join("cv.json");
        let image_path = dir.path().join("me.png");
        write_png(&image_path);

        attach(ImageConfig::default(), &save_path, &image_path, None)
            .await
            .unwrap();
        let first = SaveFile::load(&save_path).await.unwrap();
        attach(ImageConfig::default(), &save_path, &image_path, None)
            .await
            .unwrap();
        assert_eq!(SaveFile::load(&save_path).await.unwrap(), first);
    }
}
