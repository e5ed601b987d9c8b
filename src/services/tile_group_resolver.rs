use crate::models::rectangle::Rect;
use crate::models::window::StackedWindow;
use tracing::trace;

/// Topmost group of mutually visible tiled windows
///
/// `windows` are ordered topmost first. With `ignore_top` the first window
/// (the one being dragged, opened or tiled by keyboard) is skipped but still
/// picks the reference monitor. Tiled windows occluded by anything stacked
/// above them that is not part of the group are left out, and the scan stops
/// at a window covering the whole work area or once the group fills it.
/// The result keeps stacking order.
pub fn top_tile_group(windows: &[StackedWindow], ignore_top: bool) -> Vec<StackedWindow> {
    let Some(top) = windows.first() else {
        return Vec::new();
    };
    let reference_monitor = top.monitor;
    let skip = usize::from(ignore_top);

    let mut grouped: Vec<StackedWindow> = Vec::new();
    // occupied rects of windows stacked above the current one but outside the group
    let mut not_grouped: Vec<Rect> = Vec::new();
    let mut grouped_area = 0i64;

    for window in windows.iter().skip(skip) {
        if window.monitor != reference_monitor {
            continue;
        }

        let Some(tiled_rect) = window.tiled_rect else {
            not_grouped.push(window.frame);
            continue;
        };

        if window.fully_maximized || tiled_rect == window.work_area {
            trace!(window_id = window.window_id, "Covering window ends tile group scan");
            break;
        }

        if grouped_area >= window.work_area.area() {
            break;
        }

        if not_grouped.iter().any(|rect| rect.overlaps(&tiled_rect)) {
            continue;
        }

        let overlaps_group = grouped
            .iter()
            .filter_map(|member| member.tiled_rect)
            .any(|rect| rect.overlaps(&tiled_rect));
        if overlaps_group {
            not_grouped.push(tiled_rect);
            continue;
        }

        grouped_area += tiled_rect.area();
        grouped.push(*window);
    }

    grouped
}
