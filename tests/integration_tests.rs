//! End-to-end tiling scenarios
//!
//! Drives the tiling service against the in-memory windowing provider the
//! same way the platform would: a state change on the provider followed by
//! the matching notification.

use snaptile::cli::{replay_scenario, Scenario};
use snaptile::config::TilingSettings;
use snaptile::models::{Rect, ResizeDirection, Side, TileStatus, WindowId, WindowSnapshot};
use snaptile::platform::{InMemoryWindowingProvider, MonitorInfo, WindowingProvider};
use snaptile::services::{TileCoordinator, TilingEvent, TilingService};
use std::sync::Arc;
use tokio::sync::mpsc;

const WORK_AREA: Rect = Rect::new(0, 0, 1200, 800);

fn desktop(window_count: u32, gap: i32) -> (Arc<InMemoryWindowingProvider>, TilingService) {
    let monitor = MonitorInfo::primary(WORK_AREA, WORK_AREA).unwrap();
    let windows = (1..=window_count)
        .map(|id| {
            WindowSnapshot::new(
                id,
                format!("window {}", id),
                "app",
                Rect::new(200, 150, 400, 300),
                0,
            )
        })
        .collect();
    let provider = Arc::new(InMemoryWindowingProvider::new_with(vec![monitor], windows));
    let coordinator = TileCoordinator::new(provider.clone(), TilingSettings::default().with_gap(gap));
    (provider, TilingService::new(coordinator))
}

fn frame_of(provider: &InMemoryWindowingProvider, window_id: WindowId) -> Rect {
    provider.get_window(window_id).unwrap().unwrap().frame
}

fn tile_side(service: &mut TilingService, window_id: WindowId, side: Side) {
    service
        .handle(TilingEvent::TileToSide { window_id, side })
        .unwrap();
}

#[tokio::test]
async fn test_keyboard_tiling_through_event_channel() {
    let (provider, mut service) = desktop(2, 8);
    let (tx, rx) = mpsc::unbounded_channel();

    tx.send(TilingEvent::TileToSide {
        window_id: 1,
        side: Side::Left,
    })
    .unwrap();
    tx.send(TilingEvent::TileToSide {
        window_id: 2,
        side: Side::Right,
    })
    .unwrap();
    drop(tx);

    let metrics = service.run(rx).await;
    assert_eq!(metrics.processed, 2);
    assert_eq!(metrics.failed, 0);

    // tiled rects are gap-free, frames are inset by the gap
    let manager = service.coordinator().manager();
    assert_eq!(manager.tiled_rect(1), Some(Rect::new(0, 0, 600, 800)));
    assert_eq!(manager.tiled_rect(2), Some(Rect::new(600, 0, 600, 800)));
    assert_eq!(frame_of(&provider, 1), Rect::new(8, 8, 584, 784));
    assert_eq!(frame_of(&provider, 2), Rect::new(608, 8, 584, 784));
    assert_eq!(manager.group(1), &[2]);
    assert_eq!(manager.group(2), &[1]);
}

#[test]
fn test_corner_tile_replaces_grouped_window() {
    let (provider, mut service) = desktop(3, 8);
    tile_side(&mut service, 1, Side::Left);
    tile_side(&mut service, 2, Side::Right);

    // the right column is anchored at the top-right corner and gets reused
    tile_side(&mut service, 3, Side::TopRight);
    assert_eq!(frame_of(&provider, 3), Rect::new(608, 8, 584, 784));

    let manager = service.coordinator().manager();
    assert_eq!(manager.group(3), &[1]);
    assert_eq!(manager.group(1), &[3]);
    assert!(manager.group(2).is_empty());
    assert_eq!(manager.status(2), TileStatus::TiledStandalone);
}

#[test]
fn test_focus_raises_group_without_covered_window() {
    let (provider, mut service) = desktop(3, 8);
    tile_side(&mut service, 1, Side::Left);
    tile_side(&mut service, 2, Side::Right);
    tile_side(&mut service, 3, Side::TopRight);

    // the standalone window covered by 3 is brought forward by the user
    provider.raise(2).unwrap();
    service.handle(TilingEvent::Focused { window_id: 2 }).unwrap();
    assert_eq!(provider.stacking_order(), vec![2, 3, 1]);

    provider.raise(1).unwrap();
    service.handle(TilingEvent::Focused { window_id: 1 }).unwrap();
    assert_eq!(provider.stacking_order()[0], 3);
    assert_eq!(provider.stacking_order()[2], 2);
}

#[test]
fn test_maximize_restore_and_retile() {
    let (provider, mut service) = desktop(2, 0);
    tile_side(&mut service, 1, Side::Left);
    tile_side(&mut service, 2, Side::Right);

    service.handle(TilingEvent::Maximize { window_id: 1 }).unwrap();
    assert_eq!(frame_of(&provider, 1), WORK_AREA);
    assert!(service.coordinator().manager().group(2).is_empty());

    service
        .handle(TilingEvent::Restore {
            window_id: 1,
            full_restore: true,
        })
        .unwrap();
    assert_eq!(frame_of(&provider, 1), Rect::new(200, 150, 400, 300));
    assert_eq!(service.coordinator().manager().status(1), TileStatus::Untiled);

    // the right tile is still there, so the left side lines up with it
    tile_side(&mut service, 1, Side::Left);
    assert_eq!(frame_of(&provider, 1), Rect::new(0, 0, 600, 800));
    assert_eq!(service.coordinator().manager().group(1), &[2]);
}

#[test]
fn test_resize_drags_neighbour_and_updates_tiles() {
    let (provider, mut service) = desktop(2, 8);
    tile_side(&mut service, 1, Side::Left);
    tile_side(&mut service, 2, Side::Right);

    service
        .handle(TilingEvent::GrabBegin {
            window_id: 2,
            direction: ResizeDirection::West,
        })
        .unwrap();
    provider
        .set_frame_directly(2, Rect::new(508, 8, 684, 784))
        .unwrap();
    service.handle(TilingEvent::ResizeTick { window_id: 2 }).unwrap();

    assert_eq!(frame_of(&provider, 1), Rect::new(8, 8, 484, 784));

    service.handle(TilingEvent::GrabEnd { window_id: 2 }).unwrap();
    let manager = service.coordinator().manager();
    assert_eq!(manager.tiled_rect(1), Some(Rect::new(0, 0, 500, 800)));
    assert_eq!(manager.tiled_rect(2), Some(Rect::new(500, 0, 700, 800)));

    // the two tiles still fill the work area
    let free = service.coordinator().free_screen_rects(None).unwrap();
    assert!(free.is_empty());
}

#[test]
fn test_closing_grouped_window_leaves_peer_standalone() {
    let (provider, mut service) = desktop(2, 0);
    tile_side(&mut service, 1, Side::Left);
    tile_side(&mut service, 2, Side::Right);

    provider.remove_window(2);
    service
        .handle(TilingEvent::Unmanaging { window_id: 2 })
        .unwrap();

    let manager = service.coordinator().manager();
    assert_eq!(manager.status(1), TileStatus::TiledStandalone);
    assert_eq!(manager.status(2), TileStatus::Untiled);
    assert_eq!(manager.tiled_windows(), vec![1]);
    assert_eq!(
        service.coordinator().free_screen_rects(None).unwrap(),
        vec![Rect::new(600, 0, 600, 800)]
    );
}

#[test]
fn test_replayed_scenario_opens_app_into_free_half() {
    let scenario: Scenario = serde_json::from_str(
        r#"{
            "monitors": [{
                "index": 0,
                "geometry": {"x": 0, "y": 0, "width": 1200, "height": 800},
                "work_area": {"x": 0, "y": 0, "width": 1200, "height": 800},
                "is_primary": true
            }],
            "windows": [{
                "window_id": 1,
                "app_id": "editor",
                "frame": {"x": 200, "y": 150, "width": 400, "height": 300}
            }],
            "launchable_apps": ["terminal"],
            "steps": [
                {"event": "tile-to-side", "window_id": 1, "side": "left"},
                {"event": "open-app", "app_id": "terminal",
                 "rect": {"x": 600, "y": 0, "width": 600, "height": 800}},
                {"action": "create-window", "window": {
                    "window_id": 2,
                    "app_id": "terminal",
                    "frame": {"x": 300, "y": 300, "width": 500, "height": 400},
                    "first_frame_drawn": false
                }},
                {"action": "paint", "window_id": 2},
                {"action": "focus", "window_id": 1},
                {"action": "close", "window_id": 7}
            ]
        }"#,
    )
    .unwrap();

    let report = replay_scenario(scenario, TilingSettings::default()).unwrap();

    assert_eq!(report.steps, 6);
    assert_eq!(report.failed_steps, vec![5]);

    let terminal = report.layout.iter().find(|w| w.window_id == 2).unwrap();
    assert_eq!(terminal.frame, Rect::new(600, 0, 600, 800));
    assert_eq!(terminal.status, TileStatus::TiledGrouped);
    assert_eq!(terminal.group, vec![1]);

    let editor = report.layout.iter().find(|w| w.window_id == 1).unwrap();
    assert_eq!(editor.tiled_rect, Some(Rect::new(0, 0, 600, 800)));
}
