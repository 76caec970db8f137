//! Profile image handling for the CV editor: upload validation, preview,
//! PDF embedding and save-file persistence.

pub mod cli;
pub mod config;
pub mod data_uri;
pub mod image_handler;
pub mod image_validator;
pub mod logging;
pub mod pdf;
pub mod renderer;
pub mod store;
pub mod ui;

pub use config::ImageConfig;
pub use image_handler::{ImageHandler, ProfileImage};
pub use image_validator::{ImageErrorType, ImageValidationError, ImageValidator};
pub use pdf::PdfDocument;
pub use renderer::{DocumentRenderer, ImagePlacement};
pub use store::{SaveFile, SavedImage};
pub use ui::{ElementId, EventKind, MemorySurface, SelectedFile, UiEvent, UiSurface};
