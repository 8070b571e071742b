use serde::{Deserialize, Serialize};

/// Raw image content (base64 text) plus how to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub data: String,
    pub mime_type: String,
}

impl ImagePayload {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Self-describing encoding: `data:<mime>;base64,<data>`.
    pub fn to_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// The image currently staged for an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub payload: ImagePayload,
    pub preview_uri: String,
}

/// A file handed over by the browser (picker or drag-and-drop).
#[derive(Debug, Clone)]
pub struct FileBlob {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    Generate,
    Edit,
}

impl AppMode {
    pub fn label(&self) -> &'static str {
        match self {
            AppMode::Generate => "Generate",
            AppMode::Edit => "Edit",
        }
    }

    pub fn all() -> &'static [AppMode] {
        &[AppMode::Generate, AppMode::Edit]
    }
}

impl Default for AppMode {
    fn default() -> Self {
        AppMode::Generate
    }
}

/// File extension for a MIME type, used for download names.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        _ => "img",
    }
}
