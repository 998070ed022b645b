/// Widgets for the main window
///
/// - Gallery of source, views and combined sheet (gallery.rs)
/// - Zoom overlay with previous/next navigation (zoom.rs)

use std::collections::HashMap;

use iced::widget::image::Handle;

pub mod gallery;
pub mod zoom;

/// Uploaded image handles keyed by payload digest.
/// Kept across frames so iced does not re-upload textures on every redraw.
pub type Handles = HashMap<blake3::Hash, Handle>;
