// src/image_handler.rs
//! Profile image state for one editor session.

use crate::app_log;
use crate::config::ImageConfig;
use crate::data_uri::{self, DataUri};
use crate::image_validator::ImageValidator;
use crate::renderer::{DocumentRenderer, ImagePlacement};
use crate::store::SavedImage;
use crate::ui::{ElementId, EventKind, SelectedFile, UiEvent, UiSurface};

/// Encoded image and its media type; always present together.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileImage {
    pub data: String,
    pub media_type: String,
}

pub type RerenderHook = Box<dyn Fn() + Send + Sync>;

pub struct ImageHandler<S: UiSurface> {
    surface: S,
    config: ImageConfig,
    image: Option<ProfileImage>,
    rerender: Option<RerenderHook>,
    upload_bound: bool,
    remove_bound: bool,
}

impl<S: UiSurface> ImageHandler<S> {
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, ImageConfig::default())
    }

    pub fn with_config(surface: S, config: ImageConfig) -> Self {
        Self {
            surface,
            config,
            image: None,
            rerender: None,
            upload_bound: false,
            remove_bound: false,
        }
    }

    /// Called after every upload and removal.
    pub fn with_rerender_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.rerender = Some(Box::new(hook));
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// Bind upload and removal to the file input and remove button, when present.
    pub fn initialize(&mut self) {
        self.upload_bound = self.surface.bind(ElementId::FileInput, EventKind::Change);
        self.remove_bound = self.surface.bind(ElementId::RemoveButton, EventKind::Click);
        app_log!(debug,
            "Image handler initialized (upload bound: {}, remove bound: {})",
            self.upload_bound, self.remove_bound
        );
    }

    /// Route a UI event to the bound operation. Unbound events are ignored.
    pub async fn dispatch(&mut self, event: UiEvent) {
        match event {
            UiEvent::Change(ElementId::FileInput, selection) if self.upload_bound => {
                self.upload(selection).await;
            }
            UiEvent::Click(ElementId::RemoveButton) if self.remove_bound => {
                self.remove_image();
            }
            other => app_log!(debug, "Ignoring unbound UI event: {:?}", other),
        }
    }

    pub async fn upload(&mut self, selection: Option<SelectedFile>) {
        let Some(file) = selection else {
            return;
        };

        if let Err(validation_error) = ImageValidator::validate_upload(
            &file.name,
            file.content_type.as_deref(),
            file.size,
            self.config.max_upload_bytes,
        ) {
            self.surface.alert(&validation_error.user_message());
            return;
        }

        let bytes = match file.read().await {
            Ok(bytes) => bytes,
            Err(e) => {
                let read_error = ImageValidator::unreadable(&file.name, &e);
                app_log!(warn,
                    "[{}] {}: {}",
                    read_error.error_type.code(),
                    file.name,
                    read_error.message
                );
                return;
            }
        };

        // The validator guarantees a declared image type here.
        let media_type = file.content_type.clone().unwrap_or_default();
        self.image = Some(ProfileImage {
            data: data_uri::encode(&media_type, &bytes),
            media_type,
        });
        app_log!(info, "Profile image uploaded: {} ({} bytes)", file.name, bytes.len());

        self.show_preview(&file.name);
        self.notify_rerender();
    }

    /// Fill and reveal the preview. Does nothing unless all four preview elements exist.
    pub fn show_preview(&mut self, display_name: &str) {
        let required = [
            ElementId::PreviewContainer,
            ElementId::PreviewImage,
            ElementId::FileNameLabel,
            ElementId::RemoveButton,
        ];
        if !required.iter().all(|id| self.surface.has_element(*id)) {
            return;
        }

        let source = self.data_string().unwrap_or_default().to_string();
        self.surface.set_image_source(ElementId::PreviewImage, &source);
        self.surface.set_text(ElementId::FileNameLabel, display_name);
        self.surface.set_visible(ElementId::PreviewContainer, true);
        self.surface.set_visible(ElementId::RemoveButton, true);
    }

    pub fn remove_image(&mut self) {
        self.image = None;

        if self.surface.has_element(ElementId::PreviewContainer) {
            self.surface.set_visible(ElementId::PreviewContainer, false);
        }
        if self.surface.has_element(ElementId::RemoveButton) {
            self.surface.set_visible(ElementId::RemoveButton, false);
        }
        if self.surface.has_element(ElementId::FileInput) {
            self.surface.clear_value(ElementId::FileInput);
        }

        self.notify_rerender();
    }

    /// Draw the image at `(margin_left, y - top_offset)`. Renderer failures are
    /// logged and the attempted placement is still returned.
    pub fn add_to_document<R>(&self, renderer: &mut R, margin_left: f64, y: f64) -> ImagePlacement
    where
        R: DocumentRenderer + ?Sized,
    {
        let Some(image) = &self.image else {
            return ImagePlacement::NONE;
        };

        let size = self.config.image_size;
        let format = if image.media_type.is_empty() {
            self.config.fallback_format.as_str()
        } else {
            image.media_type.as_str()
        };

        if let Err(e) = renderer.add_image(
            &image.data,
            format,
            margin_left,
            y - self.config.top_offset,
            size,
            size,
        ) {
            app_log!(error, "Failed to add profile image to document: {:#}", e);
        }

        ImagePlacement {
            width: size,
            height: size,
            has_image: true,
        }
    }

    pub fn compute_bottom_position(&self, header_start_y: f64, image_height: f64, padding: f64) -> f64 {
        if !self.has_image() {
            return 0.0;
        }
        (header_start_y - self.config.header_offset) + image_height + padding
    }

    pub fn load_from_saved(&mut self, saved: &SavedImage) {
        let Some(data) = saved.profile_image.as_deref().filter(|d| !d.is_empty()) else {
            self.remove_image();
            return;
        };

        let media_type = saved
            .profile_image_type
            .clone()
            .or_else(|| DataUri::media_type_of(data))
            .unwrap_or_default();
        self.image = Some(ProfileImage {
            data: data.to_string(),
            media_type,
        });

        let label = self.config.loaded_label.clone();
        self.show_preview(&label);
    }

    pub fn export_for_save(&self) -> SavedImage {
        match &self.image {
            Some(image) => SavedImage {
                profile_image: Some(image.data.clone()),
                profile_image_type: Some(image.media_type.clone()),
            },
            None => SavedImage::default(),
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn data_string(&self) -> Option<&str> {
        self.image.as_ref().map(|i| i.data.as_str())
    }

    pub fn media_type(&self) -> Option<&str> {
        self.image.as_ref().map(|i| i.media_type.as_str())
    }

    fn notify_rerender(&self) {
        if let Some(hook) = &self.rerender {
            hook();
        }
    }
}
