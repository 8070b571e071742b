//! Port traits — the hexagonal architecture boundary.
//!
//! These traits are defined here in `studio-core` (pure Rust).
//! Implementations live in `studio-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use async_trait::async_trait;
use studio_types::{image::ImagePayload, Result, StorageError};

// ─── Image Model Port ────────────────────────────────────────

/// One request to the remote generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    /// Present for edits: the source image sent inline with the prompt
    pub image: Option<ImagePayload>,
}

/// Response from the remote service, reduced to what the core reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageResponse {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePart {
    Text(String),
    InlineImage(ImagePayload),
}

impl ImageResponse {
    /// First inline image across all candidates.
    pub fn into_first_image(self) -> Option<ImagePayload> {
        self.candidates
            .into_iter()
            .flat_map(|c| c.parts)
            .find_map(|part| match part {
                ResponsePart::InlineImage(payload) => Some(payload),
                ResponsePart::Text(_) => None,
            })
    }

    /// All text parts joined, used by text-only calls.
    pub fn text(&self) -> String {
        self.candidates
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|part| match part {
                ResponsePart::Text(t) => Some(t.as_str()),
                ResponsePart::InlineImage(_) => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

#[async_trait(?Send)]
pub trait ImageModelPort {
    /// Perform a single generation or edit call (no retries).
    async fn generate_content(&self, req: ImageRequest) -> Result<ImageResponse>;

    /// Model identifier (for logging/debug)
    fn model_name(&self) -> &str;
}

// ─── Inspiration Port ────────────────────────────────────────

#[async_trait(?Send)]
pub trait InspirationPort {
    /// Produce a prompt idea for Generate mode.
    async fn inspire(&self) -> Result<String>;
}

// ─── Storage Port ────────────────────────────────────────────

/// Durable string key/value storage. Writes are synchronous at the point
/// of the write (localStorage semantics).
pub trait StoragePort {
    /// Get a value by key
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value. Capacity failures are reported as `QuotaExceeded`.
    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError>;

    /// Delete a value
    fn delete(&self, key: &str) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Delay Port ──────────────────────────────────────────────

#[async_trait(?Send)]
pub trait DelayPort {
    /// Suspend for `ms` milliseconds. `0` yields to the event loop.
    async fn sleep(&self, ms: u64);
}
