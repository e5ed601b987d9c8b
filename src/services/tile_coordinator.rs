use crate::config::TilingSettings;
use crate::models::rectangle::Rect;
use crate::models::side::{ResizeDirection, Side};
use crate::models::tiling_state::TileStatus;
use crate::models::window::{StackedWindow, WindowId};
use crate::platform::windowing::{open_windows, require_monitor, FrameChange, WindowingProvider};
use crate::services::complementary_resizer::{ComplementaryResizer, GrabSession};
use crate::services::free_space::FreeSpaceComputer;
use crate::services::tile_group_manager::TileGroupManager;
use crate::services::tile_group_resolver::top_tile_group;
use crate::services::tile_rect_resolver::tile_rect_for_side;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// App launch waiting for its first suitable window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLaunch {
    pub app_id: String,
    pub rect: Rect,
}

/// Per-window view of the engine's state, as reported by `replay`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowLayout {
    pub window_id: WindowId,
    pub frame: Rect,
    pub status: TileStatus,
    pub tiled_rect: Option<Rect>,
    pub group: Vec<WindowId>,
}

/// Implements the tiling operations on top of the windowing collaborator
///
/// Every operation reads a fresh snapshot from the provider and runs to
/// completion. Windows that are gone or cannot be moved and resized turn an
/// operation into a no-op (`Ok(false)`); `Err` is reserved for failed
/// provider requests.
pub struct TileCoordinator {
    provider: Arc<dyn WindowingProvider>,
    settings: TilingSettings,
    manager: TileGroupManager,
    resizer: ComplementaryResizer,
    grabs: HashMap<WindowId, GrabSession>,
    pending_launches: Vec<PendingLaunch>,
    awaiting_first_frame: HashMap<WindowId, Rect>,
}

impl TileCoordinator {
    pub fn new(provider: Arc<dyn WindowingProvider>, settings: TilingSettings) -> Self {
        Self {
            provider,
            manager: TileGroupManager::new(settings.approx_margin),
            resizer: ComplementaryResizer::new(settings.window_gap, settings.approx_margin),
            settings,
            grabs: HashMap::new(),
            pending_launches: Vec::new(),
            awaiting_first_frame: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &TilingSettings {
        &self.settings
    }

    pub fn manager(&self) -> &TileGroupManager {
        &self.manager
    }

    pub fn provider(&self) -> &dyn WindowingProvider {
        self.provider.as_ref()
    }

    pub fn pending_launches(&self) -> &[PendingLaunch] {
        &self.pending_launches
    }

    pub fn grab(&self, window_id: WindowId) -> Option<&GrabSession> {
        self.grabs.get(&window_id)
    }

    /// Tile a window to the gap-free `rect`
    pub fn tile_window(&mut self, window_id: WindowId, rect: Rect) -> Result<bool> {
        let Some(window) = self.provider.get_window(window_id)? else {
            debug!(window_id, "Skipping tile of unknown window");
            return Ok(false);
        };

        // the unmaximized frame is the one to restore to later
        let window = if window.maximized.is_maximized() {
            self.provider.unmaximize(window_id)?;
            match self.provider.get_window(window_id)? {
                Some(window) => window,
                None => return Ok(false),
            }
        } else {
            window
        };

        if !window.can_move_and_resize() {
            debug!(window_id, "Skipping tile of fixed window");
            return Ok(false);
        }

        // group raising may have left the window below a peer
        self.provider.raise(window_id)?;

        self.manager.record_tile(window_id, rect, window.frame);
        let frame = rect.shrink(self.settings.window_gap);
        self.provider.set_window_frame(
            window_id,
            FrameChange::new(frame).animate(self.settings.use_animation),
        )?;

        let group: Vec<WindowId> = self
            .top_tile_group(false)?
            .iter()
            .map(|w| w.window_id)
            .collect();
        self.manager.update_tile_group(&group);

        info!(window_id, %rect, ?group, "Tiled window");
        Ok(true)
    }

    /// Tile a window against `side`, lining it up with the tile group below it
    pub fn tile_window_to_side(&mut self, window_id: WindowId, side: Side) -> Result<bool> {
        let Some(window) = self.provider.get_window(window_id)? else {
            debug!(window_id, "Skipping side tile of unknown window");
            return Ok(false);
        };
        let monitor = require_monitor(self.provider.as_ref(), window.monitor)?;

        let group = self.tile_group_below(window_id)?;
        let tiled_rects: Vec<Rect> = group.iter().filter_map(|w| w.tiled_rect).collect();
        let partition = FreeSpaceComputer::from_settings(&self.settings, monitor.geometry)
            .screen_partition(&tiled_rects, monitor.work_area);

        let rect = tile_rect_for_side(side, monitor.work_area, &partition, self.settings.window_gap);
        self.tile_window(window_id, rect)
    }

    /// Maximize a window and take it out of its tile group
    pub fn maximize_both(&mut self, window_id: WindowId) -> Result<bool> {
        let Some(window) = self.provider.get_window(window_id)? else {
            return Ok(false);
        };
        if !window.can_move_and_resize() {
            debug!(window_id, "Skipping maximize of fixed window");
            return Ok(false);
        }

        self.manager.remove_tile_group(window_id);
        self.provider.raise(window_id)?;

        let work_area = require_monitor(self.provider.as_ref(), window.monitor)?.work_area;
        self.manager.record_tile(window_id, work_area, window.frame);
        self.provider.maximize(window_id)?;

        info!(window_id, "Maximized window");
        Ok(true)
    }

    /// Bring a tiled window back to its pre-tile size
    ///
    /// A full restore reapplies the saved frame. Otherwise (restores started
    /// by dragging) only the size is restored and the window is placed so the
    /// pointer keeps its relative horizontal position over it.
    pub fn restore_window_size(&mut self, window_id: WindowId, full_restore: bool) -> Result<bool> {
        let Some(window) = self.provider.get_window(window_id)? else {
            return Ok(false);
        };
        if window.maximized.is_maximized() {
            self.provider.unmaximize(window_id)?;
        }

        let Some(pre_tile_rect) = self.manager.pre_tile_rect(window_id) else {
            return Ok(false);
        };
        if !window.can_move_and_resize() {
            return Ok(false);
        }

        let change = if full_restore {
            FrameChange::new(pre_tile_rect)
        } else {
            let frame = window.frame;
            let pointer = self.provider.pointer();
            let relative_x = if frame.width > 0 {
                f64::from(pointer.x - frame.x) / f64::from(frame.width)
            } else {
                0.0
            };
            let x = pointer.x - (f64::from(pre_tile_rect.width) * relative_x).round() as i32;
            FrameChange::new(Rect::new(x, frame.y, pre_tile_rect.width, pre_tile_rect.height))
                .user_op(true)
        };
        self.provider.set_window_frame(window_id, change)?;

        self.manager.clear_tiling(window_id);
        info!(window_id, frame = %change.frame, "Restored window size");
        Ok(true)
    }

    /// Launch a new window of `app_id` and tile it to `rect` once it shows up
    pub fn open_app_tiled(&mut self, app_id: &str, rect: Rect) -> Result<bool> {
        if !self.provider.can_open_new_window(app_id) {
            debug!(app_id, "App cannot open a new window");
            return Ok(false);
        }

        self.pending_launches.push(PendingLaunch {
            app_id: app_id.to_string(),
            rect,
        });
        self.provider.open_new_window(app_id)?;
        Ok(true)
    }

    /// Window-created notification
    ///
    /// Splash screens and loading surfaces are ignored, as are windows of
    /// apps nobody is waiting for. Windows that have not been painted yet
    /// are tiled on their first frame.
    pub fn handle_window_created(&mut self, window_id: WindowId) -> Result<bool> {
        if self.pending_launches.is_empty() {
            return Ok(false);
        }
        let Some(window) = self.provider.get_window(window_id)? else {
            return Ok(false);
        };
        if !window.is_launch_candidate() {
            debug!(window_id, "Ignoring non-candidate window while waiting for launch");
            return Ok(false);
        }
        let Some(index) = self
            .pending_launches
            .iter()
            .position(|launch| launch.app_id == window.app_id)
        else {
            debug!(window_id, app_id = %window.app_id, "Window belongs to another app");
            return Ok(false);
        };

        let launch = self.pending_launches.remove(index);
        if window.first_frame_drawn {
            return self.tile_window(window_id, launch.rect);
        }

        self.awaiting_first_frame.insert(window_id, launch.rect);
        Ok(false)
    }

    /// First-frame notification of a launched window
    pub fn handle_first_frame(&mut self, window_id: WindowId) -> Result<bool> {
        match self.awaiting_first_frame.remove(&window_id) {
            Some(rect) => self.tile_window(window_id, rect),
            None => Ok(false),
        }
    }

    pub fn handle_focus(&mut self, window_id: WindowId) -> Result<Vec<WindowId>> {
        self.manager.handle_focus(window_id, self.provider.as_ref())
    }

    /// Window destroyed: drop its grab, launch bookkeeping and tiling state
    pub fn handle_unmanaging(&mut self, window_id: WindowId) -> bool {
        self.grabs.remove(&window_id);
        self.awaiting_first_frame.remove(&window_id);
        self.manager.handle_unmanaging(window_id).is_some()
    }

    /// Start an interactive resize of a tiled window
    pub fn begin_grab(&mut self, window_id: WindowId, direction: ResizeDirection) -> Result<bool> {
        if !self.manager.is_tiled(window_id) {
            return Ok(false);
        }
        let Some(window) = self.provider.get_window(window_id)? else {
            return Ok(false);
        };

        let mut neighbours = Vec::new();
        for &peer in self.manager.group(window_id) {
            if let Some(snapshot) = self.provider.get_window(peer)? {
                neighbours.push((peer, snapshot.frame));
            }
        }

        let session = self
            .resizer
            .begin_grab(window_id, window.frame, direction, &neighbours);
        self.grabs.insert(window_id, session);
        Ok(true)
    }

    /// Resize tick: move the neighbours of the grabbed window along
    pub fn resize_complementing(&mut self, window_id: WindowId) -> Result<Vec<(WindowId, Rect)>> {
        let Some(resized) = self.provider.get_window(window_id)? else {
            self.grabs.remove(&window_id);
            return Ok(Vec::new());
        };
        let Some(session) = self.grabs.get(&window_id) else {
            return Ok(Vec::new());
        };

        let provider = self.provider.as_ref();
        let frames = self.resizer.resize_complementing(session, resized.frame, |peer| {
            provider.get_window(peer).ok().flatten().map(|w| w.frame)
        });

        for &(peer, frame) in &frames {
            self.provider.set_window_frame(peer, FrameChange::new(frame))?;
        }
        Ok(frames)
    }

    /// Finish a grab; participants get tiled rects matching their new frames
    pub fn end_grab(&mut self, window_id: WindowId) -> Result<bool> {
        let Some(session) = self.grabs.remove(&window_id) else {
            return Ok(false);
        };

        let gap = self.settings.window_gap;
        for id in std::iter::once(window_id).chain(session.participants()) {
            if let Some(window) = self.provider.get_window(id)? {
                self.manager.update_tiled_rect(id, window.frame.shrink(-gap));
            }
        }

        debug!(window_id, "Grab ended");
        Ok(true)
    }

    /// Topmost tile group of the current stack
    pub fn top_tile_group(&self, ignore_top: bool) -> Result<Vec<StackedWindow>> {
        Ok(top_tile_group(&self.stacked_windows()?, ignore_top))
    }

    /// Tile group a window would join, resolved as if it were on top
    pub fn tile_group_below(&self, window_id: WindowId) -> Result<Vec<StackedWindow>> {
        let mut stacked = self.stacked_windows()?;
        if let Some(index) = stacked.iter().position(|w| w.window_id == window_id) {
            let window = stacked.remove(index);
            stacked.insert(0, window);
        }
        Ok(top_tile_group(&stacked, true))
    }

    /// Free space next to the tile group below `window_id`, or next to the
    /// topmost group of the current monitor
    pub fn free_screen_rects(&self, window_id: Option<WindowId>) -> Result<Vec<Rect>> {
        let (group, monitor) = match window_id {
            Some(id) => {
                let monitor = match self.provider.get_window(id)? {
                    Some(window) => window.monitor,
                    None => self.provider.current_monitor(),
                };
                (self.tile_group_below(id)?, monitor)
            }
            None => (self.top_tile_group(false)?, self.provider.current_monitor()),
        };

        let monitor = require_monitor(self.provider.as_ref(), monitor)?;
        Ok(FreeSpaceComputer::from_settings(&self.settings, monitor.geometry)
            .free_screen_rects(&group, monitor.work_area))
    }

    /// Frames and tiling state of all open windows, topmost first
    pub fn layout(&self) -> Result<Vec<WindowLayout>> {
        Ok(open_windows(self.provider.as_ref())?
            .into_iter()
            .map(|window| WindowLayout {
                window_id: window.window_id,
                frame: window.frame,
                status: self.manager.status(window.window_id),
                tiled_rect: self.manager.tiled_rect(window.window_id),
                group: self.manager.group(window.window_id).to_vec(),
            })
            .collect())
    }

    fn stacked_windows(&self) -> Result<Vec<StackedWindow>> {
        let mut work_areas: HashMap<usize, Rect> = HashMap::new();
        let mut stacked = Vec::new();

        for window in open_windows(self.provider.as_ref())? {
            let work_area = match work_areas.get(&window.monitor) {
                Some(work_area) => *work_area,
                None => match self.provider.monitor(window.monitor)? {
                    Some(monitor) => {
                        work_areas.insert(window.monitor, monitor.work_area);
                        monitor.work_area
                    }
                    None => {
                        debug!(window_id = window.window_id, "Window on unknown monitor");
                        continue;
                    }
                },
            };

            stacked.push(StackedWindow {
                window_id: window.window_id,
                monitor: window.monitor,
                frame: window.frame,
                fully_maximized: window.maximized.is_fully_maximized(),
                tiled_rect: self.manager.tiled_rect(window.window_id),
                work_area,
            });
        }

        Ok(stacked)
    }
}
