use crate::models::rectangle::{equal_approx, rects_about_equal, Rect};
use crate::models::side::Side;
use tracing::trace;

/// Target rectangle for tiling a window against `side` of `work_area`
///
/// `screen_rects` is the current partition of the work area (tiled windows
/// plus free space). Edge sides look for a run of rectangles whose far edge
/// lines up within `gap` and that together span the whole perpendicular
/// extent; the shared edge becomes the new window's boundary, so an existing
/// column or row split is reproduced. For the bottom side the boundary is
/// the bottom edge of the row above. Corner sides reuse the size of a
/// rectangle already anchored at that corner. Without a match, or when the
/// match would cover the full work area, the work area is halved.
pub fn tile_rect_for_side(side: Side, work_area: Rect, screen_rects: &[Rect], gap: i32) -> Rect {
    // left -> right, then top -> bottom
    let mut sorted = screen_rects.to_vec();
    sorted.sort_by(|r1, r2| r1.x.cmp(&r2.x).then(r1.y.cmp(&r2.y)));
    let reversed: Vec<Rect> = sorted.iter().rev().copied().collect();

    let half_width = work_area.width / 2;
    let half_height = work_area.height / 2;
    let pick = |size: Option<i32>, full: i32, half: i32| match size {
        Some(size) if size > 0 && !equal_approx(size, full, gap) => size,
        _ => half,
    };

    let rect = match side {
        Side::Left => {
            let width = lined_up(&sorted, Rect::x2, |r| r.height, work_area.height, gap)
                .map(|r| r.x2() - work_area.x);
            let width = pick(width, work_area.width, half_width);
            Rect::new(work_area.x, work_area.y, width, work_area.height)
        }
        Side::Right => {
            let width = lined_up(&reversed, |r| r.x, |r| r.height, work_area.height, gap)
                .map(|r| work_area.x2() - r.x);
            let width = pick(width, work_area.width, half_width);
            Rect::new(work_area.x2() - width, work_area.y, width, work_area.height)
        }
        Side::Top => {
            let height = lined_up(&sorted, Rect::y2, |r| r.width, work_area.width, gap)
                .map(|r| r.y2() - work_area.y);
            let height = pick(height, work_area.height, half_height);
            Rect::new(work_area.x, work_area.y, work_area.width, height)
        }
        Side::Bottom => {
            // the row above the new window shares its bottom edge; rows
            // already touching the work area bottom cannot be that boundary
            let above_bottom: Vec<Rect> = reversed
                .iter()
                .filter(|r| !equal_approx(r.y2(), work_area.y2(), gap))
                .copied()
                .collect();
            let height = lined_up(&above_bottom, Rect::y2, |r| r.width, work_area.width, gap)
                .map(|r| work_area.y2() - r.y2());
            let height = pick(height, work_area.height, half_height);
            Rect::new(work_area.x, work_area.y2() - height, work_area.width, height)
        }
        Side::TopLeft | Side::TopRight | Side::BottomLeft | Side::BottomRight => {
            let anchored = sorted
                .iter()
                .find(|r| is_anchored(side, r, &work_area, gap))
                .filter(|r| !rects_about_equal(Some(*r), Some(&work_area), gap));

            let (width, height) = match anchored {
                Some(r) if r.width > 0 && r.height > 0 => (r.width, r.height),
                _ => (half_width, half_height),
            };

            let x = match side {
                Side::TopLeft | Side::BottomLeft => work_area.x,
                _ => work_area.x2() - width,
            };
            let y = match side {
                Side::TopLeft | Side::TopRight => work_area.y,
                _ => work_area.y2() - height,
            };
            Rect::new(x, y, width, height)
        }
    };

    trace!(%side, %rect, "Resolved tile rect");
    rect.intersection(&work_area).unwrap_or(work_area)
}

/// First rectangle, scanning in order, that together with the later
/// rectangles sharing its edge spans `full_extent`
fn lined_up(
    rects: &[Rect],
    edge_of: impl Fn(&Rect) -> i32,
    extent: impl Fn(&Rect) -> i32,
    full_extent: i32,
    gap: i32,
) -> Option<Rect> {
    rects.iter().enumerate().find_map(|(index, rect)| {
        let edge = edge_of(rect);
        let total: i32 = extent(rect)
            + rects[index + 1..]
                .iter()
                .filter(|&&other| equal_approx(edge, edge_of(&other), gap))
                .map(&extent)
                .sum::<i32>();

        equal_approx(total, full_extent, gap).then_some(*rect)
    })
}

fn is_anchored(side: Side, rect: &Rect, work_area: &Rect, gap: i32) -> bool {
    let left = equal_approx(rect.x, work_area.x, gap);
    let right = equal_approx(rect.x2(), work_area.x2(), gap);
    let top = equal_approx(rect.y, work_area.y, gap);
    let bottom = equal_approx(rect.y2(), work_area.y2(), gap);

    match side {
        Side::TopLeft => top && left,
        Side::TopRight => top && right,
        Side::BottomLeft => bottom && left,
        Side::BottomRight => bottom && right,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORK_AREA: Rect = Rect::new(0, 0, 1000, 800);

    #[test]
    fn empty_partition_halves_work_area() {
        assert_eq!(
            tile_rect_for_side(Side::Left, WORK_AREA, &[], 0),
            Rect::new(0, 0, 500, 800)
        );
        assert_eq!(
            tile_rect_for_side(Side::Right, WORK_AREA, &[], 0),
            Rect::new(500, 0, 500, 800)
        );
        assert_eq!(
            tile_rect_for_side(Side::Bottom, WORK_AREA, &[], 0),
            Rect::new(0, 400, 1000, 400)
        );
        assert_eq!(
            tile_rect_for_side(Side::BottomRight, WORK_AREA, &[], 0),
            Rect::new(500, 400, 500, 400)
        );
    }

    #[test]
    fn corner_reuses_existing_anchored_rect() {
        let partition = [Rect::new(0, 0, 500, 800)];
        assert_eq!(
            tile_rect_for_side(Side::TopLeft, WORK_AREA, &partition, 0),
            Rect::new(0, 0, 500, 800)
        );
    }

    #[test]
    fn corner_ignores_maximized_partition() {
        assert_eq!(
            tile_rect_for_side(Side::TopRight, WORK_AREA, &[WORK_AREA], 0),
            Rect::new(500, 0, 500, 400)
        );
    }

    #[test]
    fn left_and_right_follow_existing_column_boundary() {
        let partition = [Rect::new(0, 0, 600, 800), Rect::new(600, 0, 400, 800)];
        assert_eq!(
            tile_rect_for_side(Side::Left, WORK_AREA, &partition, 8),
            Rect::new(0, 0, 600, 800)
        );
        assert_eq!(
            tile_rect_for_side(Side::Right, WORK_AREA, &partition, 8),
            Rect::new(600, 0, 400, 800)
        );
    }

    #[test]
    fn left_column_split_into_rows_still_lines_up() {
        let partition = [
            Rect::new(600, 0, 400, 800),
            Rect::new(0, 400, 600, 400),
            Rect::new(0, 0, 600, 400),
        ];
        assert_eq!(
            tile_rect_for_side(Side::Left, WORK_AREA, &partition, 0),
            Rect::new(0, 0, 600, 800)
        );
    }

    #[test]
    fn top_and_bottom_follow_existing_row_boundary() {
        let partition = [
            Rect::new(0, 0, 500, 300),
            Rect::new(500, 0, 500, 300),
            Rect::new(0, 300, 1000, 500),
        ];
        assert_eq!(
            tile_rect_for_side(Side::Top, WORK_AREA, &partition, 0),
            Rect::new(0, 0, 1000, 300)
        );
        assert_eq!(
            tile_rect_for_side(Side::Bottom, WORK_AREA, &partition, 0),
            Rect::new(0, 300, 1000, 500)
        );
    }

    #[test]
    fn bottom_follows_full_width_top_row() {
        let partition = [Rect::new(0, 0, 1000, 300), Rect::new(0, 300, 1000, 500)];
        assert_eq!(
            tile_rect_for_side(Side::Bottom, WORK_AREA, &partition, 0),
            Rect::new(0, 300, 1000, 500)
        );
    }

    #[test]
    fn full_width_match_falls_back_to_half() {
        let partition = [Rect::new(0, 0, 1000, 800)];
        assert_eq!(
            tile_rect_for_side(Side::Left, WORK_AREA, &partition, 0),
            Rect::new(0, 0, 500, 800)
        );
    }

    #[test]
    fn result_is_offset_into_work_area() {
        let work_area = Rect::new(1920, 32, 1920, 1048);
        let partition = [Rect::new(1920, 32, 1280, 1048), Rect::new(3200, 32, 640, 1048)];
        let rect = tile_rect_for_side(Side::Right, work_area, &partition, 10);
        assert_eq!(rect, Rect::new(3200, 32, 640, 1048));
        assert!(work_area.contains_rect(&rect));
    }
}
