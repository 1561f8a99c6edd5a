//! Export of generated renders
//!
//! The generated image stays in memory until the user saves it; the
//! default file name carries the azimuth the render was made from.

use std::path::PathBuf;

/// Default file name for a render, e.g. `perspective-270.png`
pub fn default_file_name(azimuth: f32) -> String {
    format!("perspective-{}.png", azimuth.rem_euclid(360.0).round() as u32)
}

/// Write the render to the chosen path
pub async fn save_render(png: Vec<u8>, path: PathBuf) -> Result<PathBuf, String> {
    tokio::fs::write(&path, &png)
        .await
        .map_err(|e| format!("failed to write {}: {}", path.display(), e))?;

    log::info!("Saved render to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_name_uses_azimuth() {
        assert_eq!(default_file_name(90.0), "perspective-90.png");
        assert_eq!(default_file_name(0.0), "perspective-0.png");
        assert_eq!(default_file_name(359.6), "perspective-360.png");
        // Wrapped input still names sensibly
        assert_eq!(default_file_name(-90.0), "perspective-270.png");
    }

    #[tokio::test]
    async fn test_save_render_writes_bytes() {
        let path = std::env::temp_dir().join("lens3d-export-test.png");
        let bytes = vec![1, 2, 3, 4];

        let saved = save_render(bytes.clone(), path.clone()).await.unwrap();
        assert_eq!(saved, path);
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
        std::fs::remove_file(&path).ok();
    }
}
