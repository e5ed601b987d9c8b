//! Property checks for the pure layout geometry
//!
//! Covers rectangle difference, free-space reduction, tile group resolution
//! and side targets.

use snaptile::models::{
    equal_approx, rect_diff, rects_about_equal, Rect, Side, SplitPolicy, StackedWindow,
};
use snaptile::services::{tile_rect_for_side, top_tile_group, FreeSpaceComputer};

const WORK_AREA: Rect = Rect::new(0, 0, 1000, 800);

fn total_area(rects: &[Rect]) -> i64 {
    rects.iter().map(Rect::area).sum()
}

fn assert_disjoint_within(rects: &[Rect], container: &Rect) {
    for (i, rect) in rects.iter().enumerate() {
        assert!(
            container.contains_rect(rect),
            "{} escapes {}",
            rect,
            container
        );
        for other in &rects[i + 1..] {
            assert!(!rect.overlaps(other), "{} overlaps {}", rect, other);
        }
    }
}

fn tiled(window_id: u32, tiled_rect: Rect) -> StackedWindow {
    StackedWindow {
        window_id,
        monitor: 0,
        frame: tiled_rect,
        fully_maximized: false,
        tiled_rect: Some(tiled_rect),
        work_area: WORK_AREA,
    }
}

fn floating(window_id: u32, frame: Rect) -> StackedWindow {
    StackedWindow {
        window_id,
        monitor: 0,
        frame,
        fully_maximized: false,
        tiled_rect: None,
        work_area: WORK_AREA,
    }
}

#[test]
fn test_equal_approx_properties() {
    for (value, other) in [(0, 0), (-40, 25), (1000, 985), (7, -7)] {
        assert!(equal_approx(value, value, 0));
        assert_eq!(
            equal_approx(value, other, 15),
            equal_approx(other, value, 15)
        );
        assert!(equal_approx(value, other, (value - other).abs()));
    }
    assert!(!equal_approx(0, 16, 15));
}

#[test]
fn test_rects_about_equal_tolerates_small_offsets() {
    let tiled = Rect::new(0, 0, 500, 800);
    let frame = tiled.shrink(8);
    assert!(rects_about_equal(Some(&tiled), Some(&frame), 16));
    assert!(!rects_about_equal(Some(&tiled), Some(&frame), 8));
}

#[test]
fn test_diff_with_itself_is_empty_for_every_policy() {
    for split in [
        SplitPolicy::Vertical,
        SplitPolicy::Horizontal,
        SplitPolicy::FromMonitor(WORK_AREA),
    ] {
        assert!(rect_diff(Some(&WORK_AREA), Some(&WORK_AREA), 0, split).is_empty());
    }
}

#[test]
fn test_diff_with_disjoint_rect_is_minuend() {
    let a = Rect::new(0, 0, 300, 300);
    let b = Rect::new(400, 400, 100, 100);
    assert_eq!(rect_diff(Some(&a), Some(&b), 0, SplitPolicy::Vertical), vec![a]);
}

#[test]
fn test_diff_area_law_for_both_splits() {
    let inner = Rect::new(200, 100, 300, 400);
    let expected = WORK_AREA.area() - inner.area();

    for split in [SplitPolicy::Vertical, SplitPolicy::Horizontal] {
        let pieces = rect_diff(Some(&WORK_AREA), Some(&inner), 0, split);
        assert_eq!(pieces.len(), 4);
        assert_eq!(total_area(&pieces), expected);
        assert_disjoint_within(&pieces, &WORK_AREA);
        assert!(pieces.iter().all(|piece| !piece.overlaps(&inner)));
    }
}

#[test]
fn test_diff_clips_subtrahend_to_minuend() {
    let corner = Rect::new(800, 600, 400, 400);
    let pieces = rect_diff(Some(&WORK_AREA), Some(&corner), 0, SplitPolicy::Vertical);

    assert_eq!(total_area(&pieces), WORK_AREA.area() - 200 * 200);
    assert_disjoint_within(&pieces, &WORK_AREA);
}

#[test]
fn test_diff_drops_slivers_below_margin() {
    // terminals leave a few pixels uncovered when they snap to character cells
    let almost_half = Rect::new(0, 0, 500, 790);
    let pieces = rect_diff(Some(&WORK_AREA), Some(&almost_half), 35, SplitPolicy::Vertical);
    assert_eq!(pieces, vec![Rect::new(500, 0, 500, 800)]);
}

#[test]
fn test_free_space_of_empty_group_is_work_area() {
    let computer = FreeSpaceComputer::new(8, 35, SplitPolicy::Vertical);
    assert_eq!(computer.free_screen_rects(&[], WORK_AREA), vec![WORK_AREA]);
}

#[test]
fn test_exact_partition_leaves_no_free_space() {
    let computer = FreeSpaceComputer::new(0, 35, SplitPolicy::Vertical);
    let group = [
        tiled(1, Rect::new(0, 0, 500, 800)),
        tiled(2, Rect::new(500, 0, 500, 400)),
        tiled(3, Rect::new(500, 400, 500, 400)),
    ];
    assert!(computer.free_screen_rects(&group, WORK_AREA).is_empty());
}

#[test]
fn test_free_space_never_overlaps_tiles() {
    let computer = FreeSpaceComputer::new(0, 35, SplitPolicy::Vertical);
    let tiles = [Rect::new(0, 0, 500, 400), Rect::new(500, 400, 500, 400)];

    let free = computer.free_rects_around(&tiles, WORK_AREA);

    assert!(!free.is_empty());
    assert_disjoint_within(&free, &WORK_AREA);
    for rect in &free {
        assert!(tiles.iter().all(|tile| !tile.overlaps(rect)));
    }
    assert_eq!(
        total_area(&free) + total_area(&tiles),
        WORK_AREA.area()
    );
}

#[test]
fn test_top_tile_group_stops_at_occluding_window() {
    let stack = [
        tiled(1, Rect::new(0, 0, 500, 800)),
        tiled(2, Rect::new(500, 0, 500, 800)),
        floating(3, Rect::new(100, 100, 300, 300)),
    ];
    let ids: Vec<u32> = top_tile_group(&stack, false)
        .iter()
        .map(|w| w.window_id)
        .collect();
    assert_eq!(ids, vec![1, 2]);

    // the floating window now covers the left tile
    let stack = [
        floating(3, Rect::new(100, 100, 300, 300)),
        tiled(1, Rect::new(0, 0, 500, 800)),
        tiled(2, Rect::new(500, 0, 500, 800)),
    ];
    let ids: Vec<u32> = top_tile_group(&stack, false)
        .iter()
        .map(|w| w.window_id)
        .collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn test_top_tile_group_behind_maximized_window() {
    let mut maximized = floating(9, WORK_AREA);
    maximized.fully_maximized = true;
    let stack = [
        maximized,
        tiled(1, Rect::new(0, 0, 500, 800)),
        tiled(2, Rect::new(500, 0, 500, 800)),
    ];

    assert!(top_tile_group(&stack, false).is_empty());
    assert_eq!(top_tile_group(&stack, true).len(), 2);
}

#[test]
fn test_left_side_on_empty_screen_is_half() {
    assert_eq!(
        tile_rect_for_side(Side::Left, WORK_AREA, &[], 8),
        Rect::new(0, 0, 500, 800)
    );
}

#[test]
fn test_top_left_reuses_anchored_rect() {
    assert_eq!(
        tile_rect_for_side(Side::TopLeft, WORK_AREA, &[Rect::new(0, 0, 500, 800)], 0),
        Rect::new(0, 0, 500, 800)
    );
}

#[test]
fn test_every_side_stays_inside_work_area() {
    let work_area = Rect::new(0, 32, 1920, 1048);
    let computer = FreeSpaceComputer::new(8, 35, SplitPolicy::Vertical);
    let layouts = [
        vec![],
        vec![Rect::new(0, 32, 1280, 1048)],
        vec![Rect::new(0, 32, 960, 524), Rect::new(960, 556, 960, 524)],
        vec![work_area],
    ];

    for tiles in &layouts {
        let partition = computer.screen_partition(tiles, work_area);
        for side in Side::ALL {
            let rect = tile_rect_for_side(side, work_area, &partition, 8);
            assert!(
                work_area.contains_rect(&rect),
                "{} escapes work area for {:?}",
                rect,
                side
            );
            assert!(!rect.is_empty());
        }
    }
}
