//! Gemini `generateContent` adapter.
//!
//! Speaks the REST form of the API: image generation and edits go to the
//! image model with `responseModalities: ["IMAGE"]`, prompt inspiration
//! goes to the text model. Uses browser `fetch()` via gloo-net.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde::Deserialize;
use serde_json::{json, Value};

use studio_core::ports::{
    Candidate, ImageModelPort, ImageRequest, ImageResponse, InspirationPort, ResponsePart,
};
use studio_types::{config::ModelConfig, image::ImagePayload, Result, StudioError};

pub const MISSING_API_KEY: &str = "The API key is not set. Open Settings to add one.";

const INSPIRE_INSTRUCTION: &str = "Write one vivid, original prompt for an AI image generator. \
Describe a subject, an art style, the lighting, a color palette and the mood in a single \
sentence. Reply with the prompt only.";

pub struct GeminiProvider {
    config: ModelConfig,
    base_url: String,
}

impl GeminiProvider {
    /// Fails when no API key is configured; nothing is contacted here.
    pub fn new(config: ModelConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(StudioError::Config(MISSING_API_KEY.to_string()));
        }
        let base_url = config.base_url().to_string();
        Ok(Self { config, base_url })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    async fn post(&self, model: &str, body: &Value) -> Result<ImageResponse> {
        let response = Request::post(&self.endpoint(model))
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", self.config.api_key.trim())
            .json(body)
            .map_err(|e| StudioError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| StudioError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(StudioError::Network(format!("HTTP {}: {}", status, text)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| StudioError::Network(e.to_string()))?;
        parse_response(&text)
    }
}

/// Request body for an image call. The source image, when present,
/// precedes the prompt text.
pub fn build_image_body(req: &ImageRequest) -> Value {
    let mut parts = Vec::new();
    if let Some(image) = &req.image {
        parts.push(json!({
            "inlineData": {
                "mimeType": image.mime_type,
                "data": image.data,
            }
        }));
    }
    parts.push(json!({ "text": req.prompt }));

    json!({
        "contents": [{ "parts": parts }],
        "generationConfig": { "responseModalities": ["IMAGE"] },
    })
}

fn build_text_body(prompt: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
    })
}

/// Reduce a raw `generateContent` response to the parts the core reads.
pub fn parse_response(text: &str) -> Result<ImageResponse> {
    let data: ApiResponse = serde_json::from_str(text)?;
    let candidates = data
        .candidates
        .into_iter()
        .map(|c| Candidate {
            parts: c
                .content
                .map(|content| content.parts)
                .unwrap_or_default()
                .into_iter()
                .filter_map(ApiPart::into_part)
                .collect(),
        })
        .collect();
    Ok(ImageResponse { candidates })
}

#[async_trait(?Send)]
impl ImageModelPort for GeminiProvider {
    async fn generate_content(&self, req: ImageRequest) -> Result<ImageResponse> {
        log::debug!(
            "generateContent: model={}, edit={}",
            self.config.image_model,
            req.image.is_some()
        );
        self.post(&self.config.image_model, &build_image_body(&req))
            .await
    }

    fn model_name(&self) -> &str {
        &self.config.image_model
    }
}

#[async_trait(?Send)]
impl InspirationPort for GeminiProvider {
    async fn inspire(&self) -> Result<String> {
        let response = self
            .post(&self.config.text_model, &build_text_body(INSPIRE_INSTRUCTION))
            .await?;
        Ok(response.text().trim().trim_matches('"').to_string())
    }
}

// ─── API response types ─────────────────────────────────────

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
}

#[derive(Deserialize)]
struct ApiCandidate {
    content: Option<ApiContent>,
}

#[derive(Deserialize)]
struct ApiContent {
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPart {
    text: Option<String>,
    #[serde(alias = "inline_data")]
    inline_data: Option<ApiInlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiInlineData {
    #[serde(alias = "mime_type")]
    mime_type: String,
    data: String,
}

impl ApiPart {
    fn into_part(self) -> Option<ResponsePart> {
        match (self.inline_data, self.text) {
            (Some(inline), _) if !inline.data.is_empty() => Some(ResponsePart::InlineImage(
                ImagePayload::new(inline.data, inline.mime_type),
            )),
            (_, Some(text)) => Some(ResponsePart::Text(text)),
            _ => None,
        }
    }
}
