use serde::{Deserialize, Serialize};

use crate::image::extension_for_mime;

/// One durable generation result. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    pub image_uri: String,
    pub prompt: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl HistoryRecord {
    pub fn new(image_uri: String, prompt: String) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self {
            // Timestamp prefix keeps ids sortable by creation time.
            id: format!("{:013}-{}", now, &suffix[..8]),
            image_uri,
            prompt,
            created_at: now,
        }
    }

    /// MIME type taken from the ImageURI header, if present.
    pub fn mime_type(&self) -> Option<&str> {
        let header = self.image_uri.strip_prefix("data:")?;
        let end = header.find(';')?;
        Some(&header[..end])
    }

    pub fn download_file_name(&self) -> String {
        let ext = extension_for_mime(self.mime_type().unwrap_or_default());
        format!("image-studio-{}.{}", self.id, ext)
    }

    pub fn created_at_label(&self) -> String {
        chrono::DateTime::from_timestamp_millis(self.created_at)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }
}
