//! Card background uploads.
//!
//! The editor sends the chosen image as a `data:` URL. It is decoded,
//! size-checked and written under the upload directory with a random name;
//! the returned `/uploads/<file>` path is what the card design stores.
//!
//! Uploads are served from the API origin, so only png, jpeg, gif and webp
//! are accepted.

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, Result};

/// URL prefix the upload directory is served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Debug, Clone)]
pub struct BackgroundUploads {
    dir: PathBuf,
    max_bytes: usize,
}

impl BackgroundUploads {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Decode and store a `data:image/...;base64,...` URL.
    pub async fn save_data_url(&self, data_url: &str) -> Result<String> {
        let (mime, payload) = split_data_url(data_url.trim())?;
        let ext = extension_for(mime)?;

        // Base64 inflates by 4/3; reject oversized payloads before decoding.
        if payload.len() / 4 * 3 > self.max_bytes + 3 {
            return Err(too_large(self.max_bytes));
        }
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| AppError::validation(format!("image payload is not valid base64: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::validation("image payload is empty"));
        }
        if bytes.len() > self.max_bytes {
            return Err(too_large(self.max_bytes));
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let file_name = format!("{}.{ext}", Uuid::new_v4());
        tokio::fs::write(self.dir.join(&file_name), &bytes).await?;

        info!(file = %file_name, bytes = bytes.len(), "Stored card background");
        Ok(format!("{PUBLIC_PREFIX}/{file_name}"))
    }
}

fn too_large(max: usize) -> AppError {
    AppError::validation(format!("image exceeds the {max} byte limit"))
}

/// `data:<mime>;base64,<payload>` into `(mime, payload)`.
fn split_data_url(url: &str) -> Result<(&str, &str)> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| AppError::validation("background must be a data: URL"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| AppError::validation("data URL has no payload"))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| AppError::validation("data URL must be base64-encoded"))?;
    Ok((mime.trim(), payload.trim()))
}

/// Raster formats only; SVG and anything unlisted are refused.
fn extension_for(mime: &str) -> Result<&'static str> {
    let mime = mime.to_ascii_lowercase();
    match mime.strip_prefix("image/") {
        Some("png") => Ok("png"),
        Some("jpeg" | "jpg" | "pjpeg") => Ok("jpg"),
        Some("gif") => Ok("gif"),
        Some("webp") => Ok("webp"),
        _ => Err(AppError::validation(format!(
            "'{mime}' is not an accepted image type (png, jpeg, gif, webp)"
        ))),
    }
}
