/// Layout settings for the combined blueprint sheet
///
/// Stored as JSON in the user's config directory so the sheet geometry
/// can be tuned without rebuilding. A missing file means defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BlueprintError, Result};

/// Largest accepted canvas edge in pixels
pub const MAX_CANVAS_SIZE: u32 = 16384;

/// All layout constants of the compositor
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct BlueprintSettings {
    /// Width and height of the square canvas in pixels
    pub canvas_size: u32,

    /// Gap between tiles and around the grid
    pub padding: u32,

    /// Width of the border stroked around each tile
    pub border_width: u32,

    /// Canvas fill (RGB)
    pub background: [u8; 3],

    /// Tile border colour (RGB)
    pub border_color: [u8; 3],
}

impl Default for BlueprintSettings {
    fn default() -> Self {
        Self {
            canvas_size: 768,
            padding: 12,
            border_width: 2,
            background: [0x1f, 0x29, 0x37],
            border_color: [0x4b, 0x55, 0x63],
        }
    }
}

impl BlueprintSettings {
    /// Convert to JSON string for storage
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Tile edge length: `(canvas - 4 * padding) / 3`, zero if the padding does not fit
    pub fn tile_size(&self) -> u32 {
        self.padding
            .checked_mul(4)
            .and_then(|gutters| self.canvas_size.checked_sub(gutters))
            .map_or(0, |room| room / 3)
    }

    pub fn validate(&self) -> Result<()> {
        if self.canvas_size > MAX_CANVAS_SIZE {
            return Err(BlueprintError::InvalidSettings(format!(
                "canvas of {}px exceeds the {MAX_CANVAS_SIZE}px limit",
                self.canvas_size
            )));
        }
        if self.tile_size() == 0 {
            return Err(BlueprintError::InvalidSettings(format!(
                "canvas of {}px leaves no room for tiles with {}px padding",
                self.canvas_size, self.padding
            )));
        }
        if self.border_width > self.padding {
            return Err(BlueprintError::InvalidSettings(format!(
                "border width {} exceeds padding {}",
                self.border_width, self.padding
            )));
        }
        Ok(())
    }

    /// Where the settings file lives:
    /// - Linux: ~/.config/blueprint-studio/settings.json
    /// - macOS: ~/Library/Application Support/blueprint-studio/settings.json
    /// - Windows: %APPDATA%\blueprint-studio\settings.json
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("blueprint-studio");
        path.push("settings.json");
        Some(path)
    }

    /// Read settings from `path`; `Ok(None)` if the file does not exist
    pub fn load(path: &Path) -> Result<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BlueprintError::io(path, e)),
        }
    }

    /// Load from the default location, falling back to defaults on any problem
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            tracing::warn!("no config directory available, using default layout");
            return Self::default();
        };

        match Self::load(&path) {
            Ok(Some(settings)) => {
                tracing::info!(path = %path.display(), "loaded layout settings");
                settings
            }
            Ok(None) => {
                // Write the defaults out so there is a file to edit
                let settings = Self::default();
                if let Err(e) = settings.save(&path) {
                    tracing::debug!(error = %e, "could not write default settings");
                }
                settings
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring settings file");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| BlueprintError::io(parent, e))?;
        }
        std::fs::write(path, self.to_json()?).map_err(|e| BlueprintError::io(path, e))
    }
}
