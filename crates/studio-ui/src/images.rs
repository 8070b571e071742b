//! Decoded image bytes keyed by ImageURI, so base64 payloads are decoded
//! once rather than every frame.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use egui::load::Bytes;
use studio_core::codec;
use studio_types::image::extension_for_mime;

#[derive(Default)]
pub struct ImageCache {
    /// ImageURI → (egui texture uri, decoded bytes)
    entries: HashMap<String, (String, Bytes)>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Image widget for `image_uri`, or `None` when the URI does not decode.
    pub fn image(&mut self, image_uri: &str) -> Option<egui::Image<'static>> {
        if !self.entries.contains_key(image_uri) {
            match codec::image_bytes(image_uri) {
                Ok(bytes) => {
                    self.entries.insert(
                        image_uri.to_string(),
                        (texture_uri(image_uri), Bytes::from(bytes)),
                    );
                }
                Err(e) => {
                    log::warn!("Cannot render image: {}", e);
                    return None;
                }
            }
        }
        let (uri, bytes) = self.entries.get(image_uri)?;
        Some(egui::Image::from_bytes(uri.clone(), bytes.clone()))
    }

    /// Drop entries not in `live` and release their textures.
    pub fn retain<'a>(&mut self, ctx: &egui::Context, live: impl IntoIterator<Item = &'a str>) {
        let live: Vec<&str> = live.into_iter().collect();
        self.entries.retain(|image_uri, (uri, _)| {
            let keep = live.contains(&image_uri.as_str());
            if !keep {
                ctx.forget_image(uri);
            }
            keep
        });
    }
}

fn texture_uri(image_uri: &str) -> String {
    let mut hasher = DefaultHasher::new();
    image_uri.hash(&mut hasher);
    let mime = image_uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .unwrap_or_default();
    format!(
        "bytes://studio/{:016x}.{}",
        hasher.finish(),
        extension_for_mime(mime)
    )
}
