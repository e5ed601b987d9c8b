//! SnapTile - snap-tiling layout engine
//!
//! SnapTile decides where a window should snap to, which tiled windows form a
//! tile group that raises together, how resizing one tiled window resizes its
//! neighbours, and which parts of a monitor's work area remain free.

pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod platform;
pub mod services;

pub use models::*;
pub use services::*;

/// Result type alias for SnapTile operations
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to SnapTile operations
#[derive(thiserror::Error, Debug)]
pub enum SnapTileError {
    #[error("Window not found: {0}")]
    WindowNotFound(u32),

    #[error("Monitor not found: {0}")]
    MonitorNotFound(usize),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Windowing platform error: {0}")]
    PlatformError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
