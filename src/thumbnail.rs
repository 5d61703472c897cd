// src/thumbnail.rs

use crate::error::{HistoryError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::path::Path;

pub const MAX_IMAGE_BYTES: u64 = 16 * 1024 * 1024;

/// 根据扩展名判断图片类型，只接受 PNG / JPEG / WEBP
pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Reads an image file into an owned `data:` URI preview.
pub fn from_path(path: &Path) -> Result<String> {
    let mime = mime_for(path).ok_or_else(|| {
        HistoryError::InvalidInput(
            "Invalid file type. Please upload a PNG, JPG, or WEBP image.".to_string(),
        )
    })?;

    let size = std::fs::metadata(path)?.len();
    if size > MAX_IMAGE_BYTES {
        return Err(HistoryError::InvalidInput(
            "File is too large. Maximum size is 16MB.".to_string(),
        ));
    }

    let bytes = std::fs::read(path)?;
    if bytes.is_empty() {
        return Err(HistoryError::InvalidInput("Uploaded file is empty.".to_string()));
    }
    Ok(encode_data_uri(mime, &bytes))
}
