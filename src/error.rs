/// Error types for the blueprint pipeline
///
/// Every fallible operation in the crate returns `Result<T, BlueprintError>`.
/// The UI collapses these into a single human-readable banner string.

use std::path::PathBuf;

use thiserror::Error;

use crate::state::data::ViewSlot;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, BlueprintError>;

#[derive(Debug, Error)]
pub enum BlueprintError {
    /// One of the view payloads could not be decoded to a bitmap
    #[error("Failed to decode {slot} view: {reason}")]
    Decode { slot: ViewSlot, reason: String },

    /// Compositing was requested before all five views were present
    #[error("Cannot compose blueprint, missing views: {}", format_slots(.missing))]
    IncompleteInput { missing: Vec<ViewSlot> },

    /// The rendered canvas could not be encoded
    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// Bytes do not look like any raster format we can display
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Layout settings that cannot produce a valid grid
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to parse settings: {0}")]
    Settings(#[from] serde_json::Error),

    /// A background task panicked or was cancelled
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl BlueprintError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BlueprintError::Io {
            path: path.into(),
            source,
        }
    }
}

fn format_slots(slots: &[ViewSlot]) -> String {
    slots
        .iter()
        .map(|slot| slot.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
