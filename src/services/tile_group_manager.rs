use crate::models::rectangle::{rects_about_equal, Rect};
use crate::models::tiling_state::{TileStatus, TilingState};
use crate::models::window::WindowId;
use crate::platform::windowing::{require_monitor, WindowingProvider};
use crate::Result;
use std::collections::HashMap;
use tracing::{debug, trace};
use uuid::Uuid;

/// Notifications the engine subscribes to per window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObserverKind {
    /// Raise the window's tile group when it gains focus
    Focus,
    /// Drop the window from its tile group when it is destroyed
    Removal,
}

/// Handle returned for a registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverToken(Uuid);

impl ObserverToken {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Observer bookkeeping: at most one live token per window and kind
#[derive(Debug, Default)]
pub struct ObserverRegistry {
    tokens: HashMap<(WindowId, ObserverKind), ObserverToken>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer, revoking the one previously installed for the
    /// same window and kind
    pub fn register(&mut self, window_id: WindowId, kind: ObserverKind) -> ObserverToken {
        let token = ObserverToken::new();
        if let Some(previous) = self.tokens.insert((window_id, kind), token) {
            trace!(window_id, ?kind, ?previous, "Replaced observer");
        }
        token
    }

    pub fn unregister(&mut self, window_id: WindowId, kind: ObserverKind) -> Option<ObserverToken> {
        self.tokens.remove(&(window_id, kind))
    }

    /// Drop every observer of a window
    pub fn unregister_all(&mut self, window_id: WindowId) {
        self.tokens.retain(|(id, _), _| *id != window_id);
    }

    pub fn is_observing(&self, window_id: WindowId, kind: ObserverKind) -> bool {
        self.tokens.contains_key(&(window_id, kind))
    }
}

/// Owns the tiling side table and the "raise together" relation
///
/// All tiling state mutation goes through this type. Groups are stored as
/// peer id lists that never contain the window itself, and every update
/// keeps them symmetric.
#[derive(Debug)]
pub struct TileGroupManager {
    states: HashMap<WindowId, TilingState>,
    observers: ObserverRegistry,
    approx_margin: i32,
}

impl TileGroupManager {
    pub fn new(approx_margin: i32) -> Self {
        Self {
            states: HashMap::new(),
            observers: ObserverRegistry::new(),
            approx_margin,
        }
    }

    pub fn state(&self, window_id: WindowId) -> Option<&TilingState> {
        self.states.get(&window_id)
    }

    pub fn status(&self, window_id: WindowId) -> TileStatus {
        self.states
            .get(&window_id)
            .map_or(TileStatus::Untiled, TilingState::status)
    }

    pub fn is_tiled(&self, window_id: WindowId) -> bool {
        self.states.contains_key(&window_id)
    }

    pub fn tiled_rect(&self, window_id: WindowId) -> Option<Rect> {
        self.states.get(&window_id).map(|state| state.tiled_rect)
    }

    pub fn pre_tile_rect(&self, window_id: WindowId) -> Option<Rect> {
        self.states.get(&window_id).map(|state| state.pre_tile_rect)
    }

    /// Peers of a window, in stacking order
    pub fn group(&self, window_id: WindowId) -> &[WindowId] {
        self.states
            .get(&window_id)
            .map(|state| state.group.as_slice())
            .unwrap_or(&[])
    }

    /// Ids of all tiled windows, ascending
    pub fn tiled_windows(&self) -> Vec<WindowId> {
        let mut ids: Vec<_> = self.states.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    /// Mark a window as tiled to `tiled_rect`; `current_frame` becomes the
    /// restore target only on the first tile
    pub fn record_tile(&mut self, window_id: WindowId, tiled_rect: Rect, current_frame: Rect) {
        self.states
            .entry(window_id)
            .and_modify(|state| state.tiled_rect = tiled_rect)
            .or_insert_with(|| TilingState::new(tiled_rect, current_frame));
    }

    /// Replace the tiled rect of an already tiled window
    pub fn update_tiled_rect(&mut self, window_id: WindowId, tiled_rect: Rect) -> bool {
        match self.states.get_mut(&window_id) {
            Some(state) => {
                state.tiled_rect = tiled_rect;
                true
            }
            None => false,
        }
    }

    /// Forget all tiling data of a window
    pub fn clear_tiling(&mut self, window_id: WindowId) -> Option<TilingState> {
        self.remove_tile_group(window_id);
        self.observers.unregister_all(window_id);
        self.states.remove(&window_id)
    }

    /// Make `members` (stacking order) one tile group
    ///
    /// Untiled ids are skipped. Members leave the groups they were part of
    /// before, so no stale back-references survive. Focus and removal
    /// observers are (re)installed for every member.
    pub fn update_tile_group(&mut self, members: &[WindowId]) {
        let members: Vec<WindowId> = members
            .iter()
            .copied()
            .filter(|id| self.states.contains_key(id))
            .collect();

        for &window_id in &members {
            let stale: Vec<WindowId> = self
                .group(window_id)
                .iter()
                .copied()
                .filter(|peer| !members.contains(peer))
                .collect();
            for peer in stale {
                if let Some(state) = self.states.get_mut(&peer) {
                    state.group.retain(|id| *id != window_id);
                }
            }
        }

        for &window_id in &members {
            if let Some(state) = self.states.get_mut(&window_id) {
                state.group = members.iter().copied().filter(|id| *id != window_id).collect();
            }
            self.observers.register(window_id, ObserverKind::Focus);
            self.observers.register(window_id, ObserverKind::Removal);
        }

        debug!(?members, "Updated tile group");
    }

    /// Take a window out of its tile group
    ///
    /// Returns whether anything changed; repeated calls and unknown windows
    /// are no-ops.
    pub fn remove_tile_group(&mut self, window_id: WindowId) -> bool {
        let peers = match self.states.get_mut(&window_id) {
            Some(state) if !state.group.is_empty() => std::mem::take(&mut state.group),
            _ => return false,
        };

        self.observers.unregister(window_id, ObserverKind::Focus);
        for peer in &peers {
            if let Some(state) = self.states.get_mut(peer) {
                state.group.retain(|id| *id != window_id);
            }
        }

        debug!(window_id, ?peers, "Removed window from tile group");
        true
    }

    /// Focus observer: raise the focused window's groupmates
    ///
    /// Nothing happens for ungrouped or fully maximized windows, or when the
    /// window covers the whole work area. Otherwise every tiled peer that is
    /// not maximized and does not cover the work area is raised, lowest
    /// first, so the stacking order among the group is preserved. The group
    /// is then narrowed to the raised peers. Returns the raised ids.
    pub fn handle_focus(
        &mut self,
        window_id: WindowId,
        provider: &dyn WindowingProvider,
    ) -> Result<Vec<WindowId>> {
        if !self.observers.is_observing(window_id, ObserverKind::Focus) {
            return Ok(Vec::new());
        }
        let Some(state) = self.states.get(&window_id) else {
            return Ok(Vec::new());
        };
        if state.group.is_empty() {
            return Ok(Vec::new());
        }
        let Some(window) = provider.get_window(window_id)? else {
            return Ok(Vec::new());
        };
        let work_area = require_monitor(provider, window.monitor)?.work_area;
        if window.maximized.is_fully_maximized() || self.covers(state.tiled_rect, work_area) {
            return Ok(Vec::new());
        }

        let mut members = vec![window_id];
        members.extend(state.group.iter().copied());

        let mut raise = Vec::new();
        for &peer in &members[1..] {
            let Some(snapshot) = provider.get_window(peer)? else {
                continue;
            };
            let Some(tiled_rect) = self.tiled_rect(peer) else {
                continue;
            };
            if snapshot.maximized.is_fully_maximized() || self.covers(tiled_rect, work_area) {
                continue;
            }
            raise.push(peer);
        }

        let mut regrouped = vec![window_id];
        regrouped.extend(raise.iter().copied());
        self.update_tile_group(&regrouped);
        for &peer in raise.iter().rev() {
            provider.raise(peer)?;
        }

        trace!(window_id, raised = ?raise, "Raised tile group");
        Ok(raise)
    }

    /// Removal observer: the window was destroyed
    pub fn handle_unmanaging(&mut self, window_id: WindowId) -> Option<TilingState> {
        if self.observers.is_observing(window_id, ObserverKind::Removal) {
            self.remove_tile_group(window_id);
        }
        self.clear_tiling(window_id)
    }

    fn covers(&self, tiled_rect: Rect, work_area: Rect) -> bool {
        rects_about_equal(Some(&tiled_rect), Some(&work_area), self.approx_margin)
    }
}
