/// T-cross orthographic layout
///
/// ```text
///      [ ][Top][ ]
///      [L][Frt][R]
///      [ ][Bck][ ]
/// ```
///
/// The canvas is split into a 3x3 grid of square tiles separated by
/// `padding`. Five cells hold views, the four corners stay blank.

use crate::state::data::ViewSlot;
use crate::state::settings::BlueprintSettings;

/// (slot, row, col) for every view in the sheet
pub const T_CROSS: [(ViewSlot, u32, u32); 5] = [
    (ViewSlot::Top, 0, 1),
    (ViewSlot::Left, 1, 0),
    (ViewSlot::Front, 1, 1),
    (ViewSlot::Right, 1, 2),
    (ViewSlot::Back, 2, 1),
];

/// Grid cells that only ever show the background
pub const BLANK_CELLS: [(u32, u32); 4] = [(0, 0), (0, 2), (2, 0), (2, 2)];

/// Pixel placement of one view on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub slot: ViewSlot,
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

/// Top-left pixel of a grid cell
///
/// Only meaningful for validated settings; otherwise saturates instead of
/// wrapping.
pub fn cell_origin(settings: &BlueprintSettings, row: u32, col: u32) -> (u32, u32) {
    let step = settings.tile_size().saturating_add(settings.padding);
    let offset = |index: u32| settings.padding.saturating_add(index.saturating_mul(step));
    (offset(col), offset(row))
}

pub fn tiles(settings: &BlueprintSettings) -> [Tile; 5] {
    debug_assert!(covers_grid(), "T-cross and blank cells must tile the 3x3 grid");
    let size = settings.tile_size();
    T_CROSS.map(|(slot, row, col)| {
        let (x, y) = cell_origin(settings, row, col);
        Tile { slot, x, y, size }
    })
}

/// Every cell of the 3x3 grid is either a view or blank, exactly once
fn covers_grid() -> bool {
    let cells = T_CROSS
        .iter()
        .map(|&(_, row, col)| (row, col))
        .chain(BLANK_CELLS);
    let mut seen = [[false; 3]; 3];
    for (row, col) in cells {
        let cell = &mut seen[row as usize][col as usize];
        if *cell {
            return false;
        }
        *cell = true;
    }
    seen.iter().flatten().all(|&filled| filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_geometry() {
        let settings = BlueprintSettings::default();
        let tiles = tiles(&settings);

        let top = tiles.iter().find(|t| t.slot == ViewSlot::Top).unwrap();
        assert_eq!((top.x, top.y, top.size), (264, 12, 240));

        let left = tiles.iter().find(|t| t.slot == ViewSlot::Left).unwrap();
        assert_eq!((left.x, left.y), (12, 264));

        let right = tiles.iter().find(|t| t.slot == ViewSlot::Right).unwrap();
        assert_eq!((right.x, right.y), (516, 264));

        let back = tiles.iter().find(|t| t.slot == ViewSlot::Back).unwrap();
        assert_eq!((back.x, back.y), (264, 516));
    }

    #[test]
    fn test_every_slot_placed_once() {
        let tiles = tiles(&BlueprintSettings::default());
        for slot in ViewSlot::ALL {
            assert_eq!(tiles.iter().filter(|t| t.slot == slot).count(), 1);
        }
    }

    #[test]
    fn test_cells_cover_grid() {
        assert!(covers_grid());
    }

    #[test]
    fn test_cell_origin_saturates() {
        let settings = BlueprintSettings {
            padding: u32::MAX / 2,
            ..BlueprintSettings::default()
        };
        assert!(settings.validate().is_err());
        assert_eq!(cell_origin(&settings, 2, 2), (u32::MAX, u32::MAX));
    }

    #[test]
    fn test_grid_fits_canvas() {
        let settings = BlueprintSettings::default();
        let (x, y) = cell_origin(&settings, 2, 2);
        assert_eq!(x + settings.tile_size() + settings.padding, settings.canvas_size);
        assert_eq!(y + settings.tile_size() + settings.padding, settings.canvas_size);
    }
}
