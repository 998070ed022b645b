/// Image loading and decoding
///
/// File reads go through `tokio::fs`. Decoding is CPU-bound, so every
/// decode runs on the blocking pool. `decode_views` is the compositor's
/// barrier: it returns only once all five bitmaps exist, or with the
/// first failure.

use std::collections::BTreeMap;
use std::path::PathBuf;

use image::RgbaImage;
use tokio::task::JoinSet;

use crate::error::{BlueprintError, Result};
use crate::state::data::{ImagePayload, ImageSet, ViewSlot};

/// Decoded bitmaps keyed by slot
pub type DecodedViews = BTreeMap<ViewSlot, RgbaImage>;

/// Read an image file from disk and tag its format
pub async fn load_image_file(path: PathBuf) -> Result<ImagePayload> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| BlueprintError::io(&path, e))?;

    let payload = ImagePayload::from_bytes(bytes)?;
    tracing::debug!(path = %path.display(), format = ?payload.format(), bytes = payload.len(), "loaded image");
    Ok(payload)
}

/// Decode one payload with the decoder its format tag selects
pub fn decode_payload(slot: ViewSlot, payload: &ImagePayload) -> Result<RgbaImage> {
    image::load_from_memory_with_format(payload.bytes(), payload.format())
        .map(|img| img.to_rgba8())
        .map_err(|e| BlueprintError::Decode {
            slot,
            reason: e.to_string(),
        })
}

/// Decode all five views concurrently and wait for every one of them
///
/// Fails fast: the first decode error is returned and the remaining
/// tasks are dropped with the `JoinSet`.
pub async fn decode_views(set: &ImageSet) -> Result<DecodedViews> {
    if !set.is_complete() {
        return Err(BlueprintError::IncompleteInput {
            missing: set.missing(),
        });
    }

    let mut decodes = JoinSet::new();
    for (slot, payload) in set.iter() {
        let Some(payload) = payload.cloned() else {
            continue;
        };
        decodes.spawn_blocking(move || decode_payload(slot, &payload).map(|bitmap| (slot, bitmap)));
    }

    let mut bitmaps = DecodedViews::new();
    while let Some(joined) = decodes.join_next().await {
        let (slot, bitmap) = joined??;
        tracing::trace!(%slot, width = bitmap.width(), height = bitmap.height(), "decoded view");
        bitmaps.insert(slot, bitmap);
    }

    Ok(bitmaps)
}
