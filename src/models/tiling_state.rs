use crate::models::rectangle::Rect;
use crate::models::window::WindowId;
use serde::{Deserialize, Serialize};

/// Tiling status of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileStatus {
    Untiled,
    TiledStandalone,
    TiledGrouped,
}

/// Tiling data the engine keeps per window
///
/// A record exists exactly while the window is tiled, so the tiled rect and
/// the pre-tile rect are always present together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilingState {
    /// Logical target rectangle, without gaps
    pub tiled_rect: Rect,
    /// Frame the window had before it was first tiled
    pub pre_tile_rect: Rect,
    /// Peers raised together with this window, in stacking order; never
    /// contains the window itself
    pub group: Vec<WindowId>,
}

impl TilingState {
    pub fn new(tiled_rect: Rect, pre_tile_rect: Rect) -> Self {
        Self {
            tiled_rect,
            pre_tile_rect,
            group: Vec::new(),
        }
    }

    pub fn status(&self) -> TileStatus {
        if self.group.is_empty() {
            TileStatus::TiledStandalone
        } else {
            TileStatus::TiledGrouped
        }
    }
}
