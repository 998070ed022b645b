/// Blueprint compositing pipeline
///
/// This module handles:
/// - Loading view images from disk and decoding them (loader.rs)
/// - The T-cross grid geometry (layout.rs)
/// - Rendering the combined sheet (compositor.rs)
/// - Encoding, downloads and exports (publish.rs)
/// - Finding view files in a folder (import.rs)

pub mod compositor;
pub mod import;
pub mod layout;
pub mod loader;
pub mod publish;

pub use compositor::Compositor;
