use crate::models::rectangle::{
    Rect, SplitPolicy, SplitPreference, DEFAULT_APPROX_MARGIN, DEFAULT_IGNORE_MARGIN,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// User settings read by the tiling engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilingSettings {
    /// Pixel spacing between tiled windows and around the work area border
    pub window_gap: i32,
    /// Request transition effects when moving windows
    pub use_animation: bool,
    /// Free-space slabs this thin or thinner are ignored
    pub ignore_margin: i32,
    /// Tolerance for "about equal" rectangle comparisons
    pub approx_margin: i32,
    /// Orientation tie-break when subtracting tiles from the work area
    pub split_preference: SplitPreference,
}

impl Default for TilingSettings {
    fn default() -> Self {
        Self {
            window_gap: 0,
            use_animation: true,
            ignore_margin: DEFAULT_IGNORE_MARGIN,
            approx_margin: DEFAULT_APPROX_MARGIN,
            split_preference: SplitPreference::Auto,
        }
    }
}

impl TilingSettings {
    pub fn with_gap(mut self, window_gap: i32) -> Self {
        self.window_gap = window_gap;
        self
    }

    pub fn split_policy(&self, monitor_geometry: Rect) -> SplitPolicy {
        self.split_preference.policy_for(monitor_geometry)
    }
}

/// Reads and writes the settings file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.config/snaptile/settings.toml`
    pub fn default_path() -> PathBuf {
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home_dir
            .join(".config")
            .join("snaptile")
            .join("settings.toml")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults when no file exists
    pub fn load(&self) -> Result<TilingSettings, SettingsError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Settings file missing, using defaults");
            return Ok(TilingSettings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, settings: &TilingSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(settings)?;

        // Atomic write
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(temp_path, &self.path)?;

        Ok(())
    }

    /// Write a default settings file unless one exists; returns whether it
    /// was created
    pub fn initialize(&self) -> Result<bool, SettingsError> {
        if self.path.exists() {
            return Ok(false);
        }

        self.save(&TilingSettings::default())?;
        Ok(true)
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}
