/// State management module
///
/// This module handles all application state, including:
/// - Views, payloads and image sets (data.rs)
/// - The current batch, source image and combined artifact (session.rs)
/// - The derived gallery and the zoom cursor (gallery.rs)
/// - When the combined sheet is due for rendering (render.rs)
/// - Layout settings persisted as JSON (settings.rs)

pub mod data;
pub mod gallery;
pub mod render;
pub mod session;
pub mod settings;
