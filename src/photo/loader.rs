//! Reference photo loading
//!
//! Decodes the picked file, derives its aspect ratio, and re-encodes the
//! pixels as PNG so the upload payload has a single known MIME type no
//! matter what the user selected.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::task;

/// The loaded reference portrait
///
/// Immutable once produced; replaced wholesale when the user picks a new
/// file. `png` is the exact payload later sent to the generation service.
#[derive(Debug, Clone)]
pub struct ReferencePhoto {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Display handle for the GUI preview
    pub handle: iced::widget::image::Handle,
}

impl ReferencePhoto {
    /// Width over height, used for billboard sizing and aspect selection
    pub fn ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

#[derive(Debug, Clone, Error)]
pub enum UploadError {
    #[error("could not read {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("could not decode image: {0}")]
    Undecodable(String),

    #[error("could not re-encode image: {0}")]
    Encode(String),
}

/// Load a reference photo from disk
///
/// Decoding runs on a blocking thread because it is CPU-bound.
pub async fn load_reference(path: PathBuf) -> Result<ReferencePhoto, UploadError> {
    task::spawn_blocking(move || load_reference_blocking(&path))
        .await
        .map_err(|e| UploadError::Undecodable(format!("task join error: {}", e)))?
}

fn load_reference_blocking(path: &Path) -> Result<ReferencePhoto, UploadError> {
    let reader = image::ImageReader::open(path).map_err(|e| UploadError::Unreadable {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let decoded = reader
        .decode()
        .map_err(|e| UploadError::Undecodable(e.to_string()))?;

    let width = decoded.width();
    let height = decoded.height();

    let mut png = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| UploadError::Encode(e.to_string()))?;

    log::info!(
        "Loaded reference {} ({}x{}, {} bytes as PNG)",
        path.display(),
        width,
        height,
        png.len()
    );

    Ok(ReferencePhoto {
        handle: iced::widget::image::Handle::from_bytes(png.clone()),
        png,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_unreadable() {
        let result = load_reference(PathBuf::from("/nonexistent/portrait.png")).await;
        assert!(matches!(result, Err(UploadError::Unreadable { .. })));
    }

    #[tokio::test]
    async fn test_load_derives_dimensions_and_png_payload() {
        // Encode a tiny 4x3 image to a temp file and load it back
        let dir = std::env::temp_dir();
        let path = dir.join("lens3d-loader-test.png");
        let buffer = image::RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30]));
        buffer.save(&path).unwrap();

        let photo = load_reference(path.clone()).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(photo.width, 4);
        assert_eq!(photo.height, 3);
        assert!((photo.ratio() - 4.0 / 3.0).abs() < 1e-6);
        // PNG signature on the re-encoded payload
        assert_eq!(&photo.png[..4], &[0x89, b'P', b'N', b'G']);
    }
}
