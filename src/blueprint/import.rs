/// Folder import
///
/// Finds view images in a folder by file name (`front.png`,
/// `top_view.jpg`, `right_side_view.png`, ...). The scan itself is cheap;
/// the actual file loads are issued one per slot by the caller so each
/// view lands independently.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;
use crate::state::data::ViewSlot;

/// Extensions we attempt to load as views
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "bmp"];

/// One matched file per slot, in `ViewSlot::ALL` order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderScan {
    pub matches: Vec<(ViewSlot, PathBuf)>,
    pub skipped: usize,
}

/// Scan `folder` recursively on the blocking pool
pub async fn scan_view_folder(folder: PathBuf) -> Result<FolderScan> {
    Ok(tokio::task::spawn_blocking(move || scan_view_folder_blocking(&folder)).await?)
}

fn scan_view_folder_blocking(folder: &Path) -> FolderScan {
    tracing::info!(folder = %folder.display(), "🔍 scanning for views");

    let mut found: Vec<(ViewSlot, PathBuf)> = Vec::new();
    let mut skipped = 0;

    // Sorted walk: when a slot matches twice, the first path wins deterministically
    for entry in WalkDir::new(folder)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || !has_image_extension(path) {
            continue;
        }

        let Some(slot) = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(ViewSlot::from_file_stem)
        else {
            continue;
        };

        if found.iter().any(|(s, _)| *s == slot) {
            tracing::debug!(%slot, path = %path.display(), "duplicate view file ignored");
            skipped += 1;
            continue;
        }
        found.push((slot, path.to_path_buf()));
    }

    found.sort_by_key(|(slot, _)| *slot);
    tracing::info!(matched = found.len(), skipped, "scan complete");

    FolderScan {
        matches: found,
        skipped,
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
