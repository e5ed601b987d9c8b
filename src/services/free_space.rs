use crate::config::TilingSettings;
use crate::models::rectangle::{rect_diff, Rect, SplitPolicy};
use crate::models::window::StackedWindow;
use tracing::trace;

/// Derives the untiled parts of a work area
#[derive(Debug, Clone, Copy)]
pub struct FreeSpaceComputer {
    gap: i32,
    ignore_margin: i32,
    split: SplitPolicy,
}

impl FreeSpaceComputer {
    pub fn new(gap: i32, ignore_margin: i32, split: SplitPolicy) -> Self {
        Self {
            gap,
            ignore_margin,
            split,
        }
    }

    /// Computer for operations on the monitor with `monitor_geometry`
    pub fn from_settings(settings: &TilingSettings, monitor_geometry: Rect) -> Self {
        Self::new(
            settings.window_gap,
            settings.ignore_margin,
            settings.split_policy(monitor_geometry),
        )
    }

    /// Free rectangles of the group's work area
    ///
    /// Every tiled member is subtracted from the work area on its own; the
    /// result is the intersection of those per-window complements. Pieces
    /// no larger than the gap in either dimension are dropped.
    /// `fallback_work_area` is used when the group is empty.
    pub fn free_screen_rects(
        &self,
        tile_group: &[StackedWindow],
        fallback_work_area: Rect,
    ) -> Vec<Rect> {
        let work_area = tile_group
            .first()
            .map(|window| window.work_area)
            .unwrap_or(fallback_work_area);

        let tiled_rects: Vec<Rect> = tile_group.iter().filter_map(|w| w.tiled_rect).collect();
        self.free_rects_around(&tiled_rects, work_area)
    }

    /// Same reduction over bare tile rectangles
    pub fn free_rects_around(&self, tiled_rects: &[Rect], work_area: Rect) -> Vec<Rect> {
        let mut free_rects = vec![work_area];

        for tiled_rect in tiled_rects {
            let complement = rect_diff(
                Some(&work_area),
                Some(tiled_rect),
                self.ignore_margin,
                self.split,
            );

            let mut intersections = Vec::new();
            for free_rect in &complement {
                for current in &free_rects {
                    if let Some(common) = current.intersection(free_rect) {
                        if common.width > self.gap && common.height > self.gap {
                            intersections.push(common);
                        }
                    }
                }
            }

            free_rects = intersections;
        }

        trace!(count = free_rects.len(), "Computed free screen rects");
        free_rects
    }

    /// Tiled rects followed by the free rects: together they cover the work area
    pub fn screen_partition(&self, tiled_rects: &[Rect], work_area: Rect) -> Vec<Rect> {
        let mut partition = tiled_rects.to_vec();
        partition.extend(self.free_rects_around(tiled_rects, work_area));
        partition
    }
}
