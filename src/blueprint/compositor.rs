/// Blueprint compositor
///
/// Renders the five decoded views into one square sheet:
/// 1. Fill the canvas with the background colour
/// 2. Stretch every view to exactly fill its tile (aspect ratio not kept)
/// 3. Stroke a border centred on each tile edge
///
/// Rendering is pure and deterministic: the same five inputs and the same
/// settings always give the same pixels.

use std::time::Instant;

use chrono::Utc;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::layout::{self, Tile};
use super::loader::{self, DecodedViews};
use super::publish;
use crate::error::{BlueprintError, Result};
use crate::state::data::{ImageSet, ViewSlot};
use crate::state::session::CombinedArtifact;
use crate::state::settings::BlueprintSettings;

/// Fixed resampling filter so output never depends on the source size
const SCALE_FILTER: FilterType = FilterType::Triangle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compositor {
    settings: BlueprintSettings,
}

impl Compositor {
    pub fn new(settings: BlueprintSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BlueprintSettings {
        &self.settings
    }

    /// Draw the sheet from already decoded bitmaps
    pub fn render(&self, bitmaps: &DecodedViews) -> Result<RgbaImage> {
        let missing: Vec<ViewSlot> = ViewSlot::ALL
            .into_iter()
            .filter(|slot| !bitmaps.contains_key(slot))
            .collect();
        if !missing.is_empty() {
            return Err(BlueprintError::IncompleteInput { missing });
        }
        self.settings.validate()?;

        let size = self.settings.canvas_size;
        let mut canvas = RgbaImage::from_pixel(size, size, opaque(self.settings.background));
        let border = opaque(self.settings.border_color);

        for tile in layout::tiles(&self.settings) {
            let bitmap = &bitmaps[&tile.slot];
            let scaled = imageops::resize(bitmap, tile.size, tile.size, SCALE_FILTER);
            imageops::overlay(&mut canvas, &scaled, i64::from(tile.x), i64::from(tile.y));
            stroke_tile(&mut canvas, &tile, self.settings.border_width, border);
        }

        Ok(canvas)
    }

    /// Full pipeline: decode barrier, render, encode
    ///
    /// Refuses incomplete sets. Nothing is produced unless all five views
    /// decode.
    pub async fn compose(&self, set: ImageSet) -> Result<CombinedArtifact> {
        let started = Instant::now();
        let inputs = set.digest();

        let bitmaps = loader::decode_views(&set).await?;

        let compositor = *self;
        let payload = tokio::task::spawn_blocking(move || {
            let canvas = compositor.render(&bitmaps)?;
            publish::encode_png(&canvas)
        })
        .await??;

        tracing::info!(
            size = self.settings.canvas_size,
            bytes = payload.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "🧩 rendered combined blueprint"
        );

        Ok(CombinedArtifact {
            payload,
            inputs,
            rendered_at: Utc::now(),
        })
    }
}

fn opaque([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

/// Stroke a `width`-pixel rectangle centred on the tile edge, clipped to the canvas
fn stroke_tile(canvas: &mut RgbaImage, tile: &Tile, width: u32, color: Rgba<u8>) {
    if width == 0 {
        return;
    }
    let inset = width / 2;
    let outset = width - inset;

    let x0 = tile.x.saturating_sub(inset);
    let y0 = tile.y.saturating_sub(inset);
    let x1 = (tile.x + tile.size + outset).min(canvas.width());
    let y1 = (tile.y + tile.size + outset).min(canvas.height());

    fill_rect(canvas, x0, y0, x1, (y0 + width).min(y1), color);
    fill_rect(canvas, x0, y1.saturating_sub(width), x1, y1, color);
    fill_rect(canvas, x0, y0, (x0 + width).min(x1), y1, color);
    fill_rect(canvas, x1.saturating_sub(width), y0, x1, y1, color);
}

fn fill_rect(canvas: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.put_pixel(x, y, color);
        }
    }
}
