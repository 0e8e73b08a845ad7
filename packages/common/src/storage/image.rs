use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Extensions accepted from browser form uploads.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Extension used for Base64 payloads whose format cannot be recognised.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Image formats recognised from their leading magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    /// File extension for arbitrary bytes, falling back to [`DEFAULT_EXTENSION`].
    pub fn extension_for(data: &[u8]) -> &'static str {
        Self::sniff(data).map_or(DEFAULT_EXTENSION, Self::extension)
    }
}

/// Returns the lowercased extension of `filename` if it is in [`ALLOWED_EXTENSIONS`].
pub fn allowed_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename.trim())
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageDecodeError {
    #[error("image payload is empty")]
    Empty,
    #[error("image payload is not valid Base64: {0}")]
    Base64(String),
}

/// Decode a Base64 image payload.
///
/// Accepts plain standard Base64 or a `data:<mime>;base64,` URL. ASCII
/// whitespace anywhere in the payload is ignored.
pub fn decode_base64_image(payload: &str) -> Result<Vec<u8>, ImageDecodeError> {
    let payload = payload.trim();
    let encoded = match payload.strip_prefix("data:") {
        Some(rest) => match rest.split_once(',') {
            Some((meta, data)) if meta.ends_with(";base64") => data,
            _ => return Err(ImageDecodeError::Base64("unsupported data URL".into())),
        },
        None => payload,
    };

    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if compact.is_empty() {
        return Err(ImageDecodeError::Empty);
    }

    let data = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ImageDecodeError::Base64(e.to_string()))?;
    if data.is_empty() {
        return Err(ImageDecodeError::Empty);
    }
    Ok(data)
}
