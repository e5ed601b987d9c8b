use crate::models::rectangle::{Point, Rect};
use crate::models::window::{MaximizeState, WindowId, WindowSnapshot};
use crate::platform::display::MonitorInfo;
use crate::{Result, SnapTileError};
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

/// Move/resize request sent to the windowing platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameChange {
    pub frame: Rect,
    /// Treat the request as a user operation, which lets the platform keep
    /// the window partly off screen
    pub user_op: bool,
    /// Ask the platform for a transition effect
    pub animate: bool,
}

impl FrameChange {
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            user_op: false,
            animate: false,
        }
    }

    pub fn user_op(mut self, user_op: bool) -> Self {
        self.user_op = user_op;
        self
    }

    pub fn animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }
}

/// Abstraction over the windowing system that owns the actual windows
#[cfg_attr(test, mockall::automock)]
pub trait WindowingProvider: Send + Sync {
    /// Snapshot the windows of the active workspace, topmost first
    fn list_windows(&self) -> Result<Vec<WindowSnapshot>>;

    /// Retrieve a single window; `None` once it has been destroyed
    fn get_window(&self, window_id: WindowId) -> Result<Option<WindowSnapshot>>;

    /// Query a monitor by index
    fn monitor(&self, index: usize) -> Result<Option<MonitorInfo>>;

    /// Monitor currently holding the pointer or keyboard focus
    fn current_monitor(&self) -> usize;

    /// Move / resize a window
    fn set_window_frame(&self, window_id: WindowId, change: FrameChange) -> Result<()>;

    /// Maximize a window in both directions
    fn maximize(&self, window_id: WindowId) -> Result<()>;

    /// Drop any maximization flags of a window
    fn unmaximize(&self, window_id: WindowId) -> Result<()>;

    /// Raise a window above its siblings
    fn raise(&self, window_id: WindowId) -> Result<()>;

    /// Current pointer position
    fn pointer(&self) -> Point;

    /// Whether the app can be asked for another window
    fn can_open_new_window(&self, app_id: &str) -> bool;

    /// Ask the app to open a new window; creation is reported asynchronously
    fn open_new_window(&self, app_id: &str) -> Result<()>;
}

/// Windows that take part in tiling, topmost first
pub fn open_windows(provider: &dyn WindowingProvider) -> Result<Vec<WindowSnapshot>> {
    Ok(provider
        .list_windows()?
        .into_iter()
        .filter(WindowSnapshot::is_tileable)
        .collect())
}

/// Monitor lookup that fails for unknown indices
pub fn require_monitor(provider: &dyn WindowingProvider, index: usize) -> Result<MonitorInfo> {
    provider
        .monitor(index)?
        .ok_or_else(|| SnapTileError::MonitorNotFound(index).into())
}

/// Deterministic provider that keeps windows and monitors in memory
///
/// Used by tests, benchmarks and the `replay` command.
#[derive(Debug, Default)]
pub struct InMemoryWindowingProvider {
    /// Topmost first
    windows: RwLock<Vec<WindowSnapshot>>,
    monitors: RwLock<Vec<MonitorInfo>>,
    current_monitor: RwLock<usize>,
    pointer: RwLock<Point>,
    launchable_apps: RwLock<HashSet<String>>,
    frame_requests: RwLock<Vec<(WindowId, FrameChange)>>,
    launch_requests: RwLock<Vec<String>>,
    /// Frames to return to on unmaximize
    restore_frames: RwLock<HashMap<WindowId, Rect>>,
}

impl InMemoryWindowingProvider {
    /// `windows` are given topmost first
    pub fn new_with(monitors: Vec<MonitorInfo>, windows: Vec<WindowSnapshot>) -> Self {
        Self {
            windows: RwLock::new(windows),
            monitors: RwLock::new(monitors),
            ..Self::default()
        }
    }

    /// Add a window on top of the stack
    pub fn insert_window(&self, window: WindowSnapshot) {
        let mut windows = self.windows.write().unwrap_or_else(PoisonError::into_inner);
        windows.retain(|w| w.window_id != window.window_id);
        windows.insert(0, window);
    }

    pub fn remove_window(&self, window_id: WindowId) -> Option<WindowSnapshot> {
        let mut windows = self.windows.write().unwrap_or_else(PoisonError::into_inner);
        let index = windows.iter().position(|w| w.window_id == window_id)?;
        Some(windows.remove(index))
    }

    /// Change a frame without recording a request, as a user drag would
    pub fn set_frame_directly(&self, window_id: WindowId, frame: Rect) -> Result<()> {
        self.update(window_id, |window| window.frame = frame)
    }

    /// Mark the first paint of a window
    pub fn mark_first_frame(&self, window_id: WindowId) -> Result<()> {
        self.update(window_id, |window| window.first_frame_drawn = true)
    }

    pub fn set_pointer(&self, pointer: Point) {
        *self.pointer.write().unwrap_or_else(PoisonError::into_inner) = pointer;
    }

    pub fn set_current_monitor(&self, index: usize) {
        *self
            .current_monitor
            .write()
            .unwrap_or_else(PoisonError::into_inner) = index;
    }

    pub fn add_launchable_app(&self, app_id: impl Into<String>) {
        self.launchable_apps
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(app_id.into());
    }

    /// Window ids, topmost first
    pub fn stacking_order(&self) -> Vec<WindowId> {
        self.windows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|w| w.window_id)
            .collect()
    }

    pub fn frame_requests(&self) -> Vec<(WindowId, FrameChange)> {
        self.frame_requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn launch_requests(&self) -> Vec<String> {
        self.launch_requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, window_id: WindowId, apply: impl FnOnce(&mut WindowSnapshot)) -> Result<()> {
        let mut windows = self.windows.write().unwrap_or_else(PoisonError::into_inner);
        let window = windows
            .iter_mut()
            .find(|w| w.window_id == window_id)
            .ok_or(SnapTileError::WindowNotFound(window_id))?;
        apply(window);
        Ok(())
    }
}

impl WindowingProvider for InMemoryWindowingProvider {
    fn list_windows(&self) -> Result<Vec<WindowSnapshot>> {
        Ok(self
            .windows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn get_window(&self, window_id: WindowId) -> Result<Option<WindowSnapshot>> {
        Ok(self
            .windows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|w| w.window_id == window_id)
            .cloned())
    }

    fn monitor(&self, index: usize) -> Result<Option<MonitorInfo>> {
        Ok(self
            .monitors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|m| m.index == index)
            .cloned())
    }

    fn current_monitor(&self) -> usize {
        *self
            .current_monitor
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_window_frame(&self, window_id: WindowId, change: FrameChange) -> Result<()> {
        self.update(window_id, |window| window.frame = change.frame)?;
        self.frame_requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((window_id, change));
        Ok(())
    }

    fn maximize(&self, window_id: WindowId) -> Result<()> {
        let monitor = self
            .get_window(window_id)?
            .ok_or(SnapTileError::WindowNotFound(window_id))?
            .monitor;
        let work_area = require_monitor(self, monitor)?.work_area;
        let mut restore_frames = self
            .restore_frames
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        self.update(window_id, |window| {
            if !window.maximized.is_maximized() {
                restore_frames.insert(window_id, window.frame);
            }
            window.maximized = MaximizeState::Both;
            window.frame = work_area;
        })
    }

    fn unmaximize(&self, window_id: WindowId) -> Result<()> {
        let saved = self
            .restore_frames
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&window_id);
        self.update(window_id, |window| {
            window.maximized = MaximizeState::None;
            if let Some(frame) = saved {
                window.frame = frame;
            }
        })
    }

    fn raise(&self, window_id: WindowId) -> Result<()> {
        let window = self
            .remove_window(window_id)
            .ok_or(SnapTileError::WindowNotFound(window_id))?;
        self.insert_window(window);
        Ok(())
    }

    fn pointer(&self) -> Point {
        *self.pointer.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn can_open_new_window(&self, app_id: &str) -> bool {
        self.launchable_apps
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(app_id)
    }

    fn open_new_window(&self, app_id: &str) -> Result<()> {
        if !self.can_open_new_window(app_id) {
            return Err(SnapTileError::PlatformError(format!(
                "Application '{}' cannot open a new window",
                app_id
            ))
            .into());
        }

        self.launch_requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(app_id.to_string());
        Ok(())
    }
}
