use crate::models::rectangle::Rect;
use crate::models::side::{ResizeDirection, Side};
use crate::models::window::WindowId;
use crate::services::tile_coordinator::TileCoordinator;
use crate::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

/// Platform notifications and tiling commands consumed by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum TilingEvent {
    Focused { window_id: WindowId },
    Unmanaging { window_id: WindowId },
    WindowCreated { window_id: WindowId },
    FirstFrame { window_id: WindowId },
    GrabBegin { window_id: WindowId, direction: ResizeDirection },
    ResizeTick { window_id: WindowId },
    GrabEnd { window_id: WindowId },
    Tile { window_id: WindowId, rect: Rect },
    TileToSide { window_id: WindowId, side: Side },
    Maximize { window_id: WindowId },
    Restore { window_id: WindowId, full_restore: bool },
    OpenApp { app_id: String, rect: Rect },
}

/// Counters kept by the event loop
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TilingServiceMetrics {
    pub processed: u64,
    pub failed: u64,
}

/// Single consumer of tiling events
///
/// Each event runs to completion before the next one is taken, so every
/// operation sees a consistent snapshot of the windowing state.
pub struct TilingService {
    coordinator: TileCoordinator,
    metrics: TilingServiceMetrics,
}

impl TilingService {
    pub fn new(coordinator: TileCoordinator) -> Self {
        Self {
            coordinator,
            metrics: TilingServiceMetrics::default(),
        }
    }

    pub fn coordinator(&self) -> &TileCoordinator {
        &self.coordinator
    }

    pub fn metrics(&self) -> TilingServiceMetrics {
        self.metrics
    }

    /// Apply one event
    pub fn handle(&mut self, event: TilingEvent) -> Result<()> {
        debug!(?event, "Handling tiling event");
        let coordinator = &mut self.coordinator;

        match event {
            TilingEvent::Focused { window_id } => {
                coordinator.handle_focus(window_id)?;
            }
            TilingEvent::Unmanaging { window_id } => {
                coordinator.handle_unmanaging(window_id);
            }
            TilingEvent::WindowCreated { window_id } => {
                coordinator.handle_window_created(window_id)?;
            }
            TilingEvent::FirstFrame { window_id } => {
                coordinator.handle_first_frame(window_id)?;
            }
            TilingEvent::GrabBegin {
                window_id,
                direction,
            } => {
                coordinator.begin_grab(window_id, direction)?;
            }
            TilingEvent::ResizeTick { window_id } => {
                coordinator.resize_complementing(window_id)?;
            }
            TilingEvent::GrabEnd { window_id } => {
                coordinator.end_grab(window_id)?;
            }
            TilingEvent::Tile { window_id, rect } => {
                coordinator.tile_window(window_id, rect)?;
            }
            TilingEvent::TileToSide { window_id, side } => {
                coordinator.tile_window_to_side(window_id, side)?;
            }
            TilingEvent::Maximize { window_id } => {
                coordinator.maximize_both(window_id)?;
            }
            TilingEvent::Restore {
                window_id,
                full_restore,
            } => {
                coordinator.restore_window_size(window_id, full_restore)?;
            }
            TilingEvent::OpenApp { app_id, rect } => {
                coordinator.open_app_tiled(&app_id, rect)?;
            }
        }

        Ok(())
    }

    /// Consume events until every sender is dropped
    ///
    /// Failures are logged and do not stop the loop.
    pub async fn run(&mut self, mut events: UnboundedReceiver<TilingEvent>) -> TilingServiceMetrics {
        while let Some(event) = events.recv().await {
            self.metrics.processed += 1;
            if let Err(e) = self.handle(event.clone()) {
                self.metrics.failed += 1;
                warn!("Failed to handle {:?}: {}", event, e);
            }
        }

        debug!(processed = self.metrics.processed, "Tiling event loop stopped");
        self.metrics
    }
}
