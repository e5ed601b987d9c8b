//! Configuration management for SnapTile

pub mod settings;
pub mod validator;

pub use settings::{SettingsError, SettingsStore, TilingSettings};
pub use validator::{SettingsValidator, ValidationResult, ValidationRule, ValidationSeverity};
