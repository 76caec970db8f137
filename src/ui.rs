// src/ui.rs
//! Editor UI elements the profile image touches.

use std::collections::HashMap;
use std::path::PathBuf;

/// Stable identifiers of the editor elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    FileInput,
    PreviewContainer,
    PreviewImage,
    FileNameLabel,
    RemoveButton,
}

impl ElementId {
    pub const ALL: [ElementId; 5] = [
        ElementId::FileInput,
        ElementId::PreviewContainer,
        ElementId::PreviewImage,
        ElementId::FileNameLabel,
        ElementId::RemoveButton,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Change,
    Click,
}

/// Where the bytes of a selected file come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub size: u64,
    pub source: FileSource,
}

impl SelectedFile {
    pub fn from_bytes(name: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            content_type: Some(content_type.to_string()),
            size: bytes.len() as u64,
            source: FileSource::Bytes(bytes),
        }
    }

    /// Read the file contents.
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => tokio::fs::read(path).await,
            FileSource::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    /// File input changed; `None` when the selection was cancelled.
    Change(ElementId, Option<SelectedFile>),
    Click(ElementId),
}

/// Host UI. Setters on elements that do not exist are no-ops.
pub trait UiSurface {
    fn has_element(&self, id: ElementId) -> bool;
    fn set_visible(&mut self, id: ElementId, visible: bool);
    fn set_image_source(&mut self, id: ElementId, source: &str);
    fn set_text(&mut self, id: ElementId, text: &str);
    fn clear_value(&mut self, id: ElementId);
    /// Returns false when the element is missing.
    fn bind(&mut self, id: ElementId, event: EventKind) -> bool;
    /// Blocking user notification.
    fn alert(&mut self, message: &str);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementState {
    pub visible: bool,
    pub text: String,
    pub image_source: Option<String>,
    pub value: Option<String>,
    pub bound: Vec<EventKind>,
}

/// UI surface backed by a plain element table.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    elements: HashMap<ElementId, ElementState>,
    alerts: Vec<String>,
}

impl MemorySurface {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every element present; the file input is visible, the rest hidden.
    pub fn full() -> Self {
        let mut surface = Self::default();
        for id in ElementId::ALL {
            surface = surface.with_element(id);
        }
        surface.set_visible(ElementId::FileInput, true);
        surface
    }

    pub fn with_element(mut self, id: ElementId) -> Self {
        self.elements.entry(id).or_default();
        self
    }

    pub fn without_element(mut self, id: ElementId) -> Self {
        self.elements.remove(&id);
        self
    }

    pub fn element(&self, id: ElementId) -> Option<&ElementState> {
        self.elements.get(&id)
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.element(id).map_or(false, |e| e.visible)
    }

    pub fn set_value(&mut self, id: ElementId, value: &str) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.value = Some(value.to_string());
        }
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }
}

impl UiSurface for MemorySurface {
    fn has_element(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    fn set_visible(&mut self, id: ElementId, visible: bool) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.visible = visible;
        }
    }

    fn set_image_source(&mut self, id: ElementId, source: &str) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.image_source = Some(source.to_string());
        }
    }

    fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.text = text.to_string();
        }
    }

    fn clear_value(&mut self, id: ElementId) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.value = None;
        }
    }

    fn bind(&mut self, id: ElementId, event: EventKind) -> bool {
        match self.elements.get_mut(&id) {
            Some(element) => {
                if !element.bound.contains(&event) {
                    element.bound.push(event);
                }
                true
            }
            None => false,
        }
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
