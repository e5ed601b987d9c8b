//! Window data read from the windowing platform

use crate::models::rectangle::Rect;
use serde::{Deserialize, Serialize};

/// Stable window identifier assigned by the windowing platform
pub type WindowId = u32;

/// Window role as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    #[default]
    Normal,
    Dialog,
    Utility,
    Splash,
}

/// Maximization flags of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaximizeState {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl MaximizeState {
    pub fn is_maximized(self) -> bool {
        self != MaximizeState::None
    }

    pub fn is_fully_maximized(self) -> bool {
        self == MaximizeState::Both
    }
}

/// Point-in-time view of a top-level window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSnapshot {
    pub window_id: WindowId,
    #[serde(default)]
    pub title: String,
    pub app_id: String,
    pub frame: Rect,
    #[serde(default)]
    pub window_type: WindowType,
    #[serde(default)]
    pub skip_taskbar: bool,
    #[serde(default = "default_true")]
    pub allows_move: bool,
    #[serde(default = "default_true")]
    pub allows_resize: bool,
    #[serde(default)]
    pub maximized: MaximizeState,
    #[serde(default)]
    pub monitor: usize,
    #[serde(default = "default_true")]
    pub first_frame_drawn: bool,
}

fn default_true() -> bool {
    true
}

impl WindowSnapshot {
    /// Normal, resizable, movable window on `monitor`
    pub fn new(
        window_id: WindowId,
        title: impl Into<String>,
        app_id: impl Into<String>,
        frame: Rect,
        monitor: usize,
    ) -> Self {
        Self {
            window_id,
            title: title.into(),
            app_id: app_id.into(),
            frame,
            window_type: WindowType::Normal,
            skip_taskbar: false,
            allows_move: true,
            allows_resize: true,
            maximized: MaximizeState::None,
            monitor,
            first_frame_drawn: true,
        }
    }

    pub fn can_move_and_resize(&self) -> bool {
        self.allows_move && self.allows_resize
    }

    /// Windows that take part in tiling: normal, shown in the taskbar and
    /// either freely movable/resizable or currently maximized
    pub fn is_tileable(&self) -> bool {
        self.window_type == WindowType::Normal
            && !self.skip_taskbar
            && (self.can_move_and_resize() || self.maximized.is_maximized())
    }

    /// Windows eligible for tiling right after an app launch; splash screens
    /// and loading surfaces fail this check
    pub fn is_launch_candidate(&self) -> bool {
        self.window_type == WindowType::Normal && !self.skip_taskbar && self.can_move_and_resize()
    }
}

/// A window in stacking order together with its tiling data, as consumed by
/// tile group resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackedWindow {
    pub window_id: WindowId,
    pub monitor: usize,
    pub frame: Rect,
    pub fully_maximized: bool,
    pub tiled_rect: Option<Rect>,
    pub work_area: Rect,
}
