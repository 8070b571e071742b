//! Image codec: converts between files, ImageURIs, and staged uploads.
//!
//! The only accepted wire shape is `data:<mime>;base64,<payload>`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use studio_types::{
    image::{FileBlob, ImagePayload, UploadedImage},
    Result, StudioError,
};

const DATA_PREFIX: &str = "data:";
const BASE64_SUFFIX: &str = ";base64";

/// Encode a payload as an ImageURI.
pub fn encode(payload: &ImagePayload) -> String {
    payload.to_uri()
}

/// Parse an ImageURI back into a staged upload.
pub fn decode_data_uri(uri: &str) -> Result<UploadedImage> {
    let (header, data) = uri
        .split_once(',')
        .filter(|(header, data)| !header.is_empty() && !data.is_empty())
        .ok_or_else(|| {
            StudioError::Format("Invalid file format. Could not split data URL.".to_string())
        })?;

    let mime_type = header
        .strip_prefix(DATA_PREFIX)
        .and_then(|rest| rest.strip_suffix(BASE64_SUFFIX))
        .filter(|mime| !mime.is_empty() && !mime.contains(';'))
        .ok_or_else(|| {
            StudioError::Format(
                "Could not determine MIME type from data URL header.".to_string(),
            )
        })?;

    if !data.bytes().all(is_base64_byte) {
        return Err(StudioError::Format(
            "Data URL payload is not base64.".to_string(),
        ));
    }

    Ok(UploadedImage {
        payload: ImagePayload::new(data, mime_type),
        preview_uri: uri.to_string(),
    })
}

/// Raw image bytes behind an ImageURI, for rendering.
pub fn image_bytes(uri: &str) -> Result<Vec<u8>> {
    let upload = decode_data_uri(uri)?;
    STANDARD
        .decode(upload.payload.data.as_bytes())
        .map_err(|e| StudioError::Format(e.to_string()))
}

/// Encode file bytes and parse them under the same contract as
/// [`decode_data_uri`]. An empty MIME type is guessed from the file name.
pub fn decode_file(file: &FileBlob) -> Result<UploadedImage> {
    let mime_type = if file.mime_type.trim().is_empty() {
        guess_mime(&file.name).unwrap_or_default()
    } else {
        file.mime_type.trim()
    };
    let uri = format!(
        "{}{}{},{}",
        DATA_PREFIX,
        mime_type,
        BASE64_SUFFIX,
        STANDARD.encode(&file.bytes)
    );
    decode_data_uri(&uri)
}

/// MIME type for common raster file extensions.
pub fn guess_mime(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

fn is_base64_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=')
}
