//! Viewer options with TOML file support.
//!
//! Camera, capture, display and keybinding settings are consolidated
//! here. Every section uses `#[serde(default)]`, so a file only needs the
//! values it changes.

mod camera;
mod capture;
mod display;
mod keybindings;

use std::path::Path;

pub use camera::CameraOptions;
pub use capture::CaptureOptions;
pub use display::DisplayOptions;
pub use keybindings::KeybindingOptions;
use serde::{Deserialize, Serialize};

use crate::error::GlimpseError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[capture]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Screenshot and recording parameters.
    pub capture: CaptureOptions,
    /// Window and presentation settings.
    pub display: DisplayOptions,
    /// Keyboard binding options.
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GlimpseError::OptionsParse`] for malformed TOML or
    /// values of the wrong type.
    pub fn from_toml(text: &str) -> Result<Self, GlimpseError> {
        let mut options: Self = toml::from_str(text)
            .map_err(|e| GlimpseError::OptionsParse(e.to_string()))?;
        options.keybindings.rebuild_reverse_map();
        Ok(options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GlimpseError::Io`] if the file cannot be read, or
    /// [`GlimpseError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, GlimpseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`GlimpseError::OptionsParse`] if serialization fails, or
    /// [`GlimpseError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), GlimpseError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GlimpseError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
