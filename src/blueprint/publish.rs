/// Encoding and saving of finished images
///
/// The combined sheet is always PNG. Downloads and exports use the
/// stable filenames from `GalleryEntry::download_filename`; payloads that
/// are not PNG already are transcoded so the `.png` name stays honest.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::error::{BlueprintError, Result};
use crate::state::gallery::GalleryItem;
use crate::state::data::ImagePayload;

/// Encode a rendered canvas as PNG
pub fn encode_png(canvas: &RgbaImage) -> Result<ImagePayload> {
    let mut buffer = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(BlueprintError::Encode)?;
    Ok(ImagePayload::with_format(buffer, ImageFormat::Png))
}

/// Return the payload as PNG, re-encoding if needed
pub fn to_png(payload: &ImagePayload) -> Result<ImagePayload> {
    if payload.format() == ImageFormat::Png {
        return Ok(payload.clone());
    }

    let img = image::load_from_memory_with_format(payload.bytes(), payload.format())
        .map_err(|e| BlueprintError::UnsupportedFormat(e.to_string()))?;
    encode_png(&img.to_rgba8())
}

/// Write one payload as PNG to `path`
pub async fn save_png(path: PathBuf, payload: ImagePayload) -> Result<PathBuf> {
    let png = tokio::task::spawn_blocking(move || to_png(&payload)).await??;

    tokio::fs::write(&path, png.bytes())
        .await
        .map_err(|e| BlueprintError::io(&path, e))?;

    tracing::info!(path = %path.display(), bytes = png.len(), "💾 saved image");
    Ok(path)
}

/// Write every gallery item into `dir` under its stable filename
pub async fn export_all(dir: PathBuf, items: Vec<GalleryItem>) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| BlueprintError::io(&dir, e))?;

    let mut written = Vec::with_capacity(items.len());
    for item in items {
        let path = export_path(&dir, &item);
        written.push(save_png(path, item.payload).await?);
    }

    tracing::info!(dir = %dir.display(), count = written.len(), "📦 export complete");
    Ok(written)
}

fn export_path(dir: &Path, item: &GalleryItem) -> PathBuf {
    dir.join(item.entry.download_filename())
}
