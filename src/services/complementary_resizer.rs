use crate::models::rectangle::{equal_approx, Rect};
use crate::models::side::ResizeDirection;
use crate::models::window::WindowId;
use std::collections::HashMap;
use tracing::trace;

/// Interactive resize of a tiled window and the neighbours it drags along
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrabSession {
    pub window_id: WindowId,
    pub direction: ResizeDirection,
    /// Windows sharing the moving edge on the resized window's side of the
    /// divide; their edge follows the drag
    pub same_side: Vec<WindowId>,
    /// Windows bordering the resized window across the moving edge; they keep
    /// their far edge and give or take the space
    pub opposing: Vec<WindowId>,
    /// Frames of all participants when the grab started
    pub pre_grab_rects: HashMap<WindowId, Rect>,
}

impl GrabSession {
    pub fn participants(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.same_side.iter().chain(self.opposing.iter()).copied()
    }
}

/// Propagates a resize of one tiled window to its neighbours
#[derive(Debug, Clone, Copy)]
pub struct ComplementaryResizer {
    gap: i32,
    approx_margin: i32,
}

impl ComplementaryResizer {
    pub fn new(gap: i32, approx_margin: i32) -> Self {
        Self { gap, approx_margin }
    }

    /// Classify `neighbours` (frames at grab start) relative to the edge of
    /// `frame` being dragged in `direction`
    pub fn begin_grab(
        &self,
        window_id: WindowId,
        frame: Rect,
        direction: ResizeDirection,
        neighbours: &[(WindowId, Rect)],
    ) -> GrabSession {
        let mut session = GrabSession {
            window_id,
            direction,
            same_side: Vec::new(),
            opposing: Vec::new(),
            pre_grab_rects: HashMap::from([(window_id, frame)]),
        };

        let double_gap = 2 * self.gap;
        for &(id, rect) in neighbours.iter().filter(|(id, _)| *id != window_id) {
            let (same_edge, moving_edge, near_edge, across) = match direction {
                ResizeDirection::North => (rect.y, frame.y, rect.y2(), frame.y - double_gap),
                ResizeDirection::South => (rect.y2(), frame.y2(), rect.y, frame.y2() + double_gap),
                ResizeDirection::East => (rect.x2(), frame.x2(), rect.x, frame.x2() + double_gap),
                ResizeDirection::West => (rect.x, frame.x, rect.x2(), frame.x - double_gap),
            };

            if equal_approx(same_edge, moving_edge, self.approx_margin) {
                session.same_side.push(id);
            } else if equal_approx(near_edge, across, self.approx_margin) {
                session.opposing.push(id);
            } else {
                continue;
            }
            session.pre_grab_rects.insert(id, rect);
        }

        trace!(
            window_id,
            ?direction,
            same_side = ?session.same_side,
            opposing = ?session.opposing,
            "Grab started"
        );
        session
    }

    /// New frames for the session's neighbours after the resized window
    /// reached `resized`
    ///
    /// `current_frame` resolves live frames; neighbours it no longer knows
    /// (closed mid-drag) are skipped.
    pub fn resize_complementing(
        &self,
        session: &GrabSession,
        resized: Rect,
        current_frame: impl Fn(WindowId) -> Option<Rect>,
    ) -> Vec<(WindowId, Rect)> {
        let double_gap = 2 * self.gap;
        let mut frames = Vec::new();

        for id in &session.same_side {
            let (Some(cur), Some(pre)) = (current_frame(*id), session.pre_grab_rects.get(id)) else {
                continue;
            };
            let rect = match session.direction {
                ResizeDirection::North => {
                    Rect::new(cur.x, resized.y, cur.width, pre.y2() - resized.y)
                }
                ResizeDirection::South => {
                    Rect::new(cur.x, cur.y, cur.width, resized.y2() - cur.y)
                }
                ResizeDirection::East => {
                    Rect::new(cur.x, cur.y, resized.x2() - cur.x, cur.height)
                }
                ResizeDirection::West => {
                    Rect::new(resized.x, cur.y, pre.x2() - resized.x, cur.height)
                }
            };
            frames.push((*id, rect));
        }

        for id in &session.opposing {
            let (Some(cur), Some(pre)) = (current_frame(*id), session.pre_grab_rects.get(id)) else {
                continue;
            };
            let rect = match session.direction {
                ResizeDirection::North => {
                    Rect::new(cur.x, cur.y, cur.width, resized.y - cur.y - double_gap)
                }
                ResizeDirection::South => {
                    let y = resized.y2() + double_gap;
                    Rect::new(cur.x, y, cur.width, pre.y2() - y)
                }
                ResizeDirection::East => {
                    let x = resized.x2() + double_gap;
                    Rect::new(x, cur.y, pre.x2() - x, cur.height)
                }
                ResizeDirection::West => {
                    Rect::new(cur.x, cur.y, resized.x - cur.x - double_gap, cur.height)
                }
            };
            frames.push((*id, rect));
        }

        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(frames: &[(WindowId, Rect)]) -> impl Fn(WindowId) -> Option<Rect> + '_ {
        move |id| frames.iter().find(|(w, _)| *w == id).map(|(_, r)| *r)
    }

    #[test]
    fn west_drag_shrinks_opposing_neighbour() {
        let neighbour = Rect::new(0, 0, 500, 800);
        let session = GrabSession {
            window_id: 2,
            direction: ResizeDirection::West,
            same_side: Vec::new(),
            opposing: vec![1],
            pre_grab_rects: HashMap::from([(1, neighbour), (2, Rect::new(500, 0, 500, 800))]),
        };

        let frames = ComplementaryResizer::new(10, 15).resize_complementing(
            &session,
            Rect::new(450, 0, 550, 800),
            lookup(&[(1, neighbour)]),
        );
        assert_eq!(frames, vec![(1, Rect::new(0, 0, 430, 800))]);
    }

    #[test]
    fn begin_grab_classifies_neighbours() {
        // top-right quadrant dragged west with gap 10
        let resizer = ComplementaryResizer::new(10, 15);
        let neighbours = [
            (1, Rect::new(10, 10, 480, 780)),
            (2, Rect::new(510, 10, 480, 380)),
            (3, Rect::new(510, 410, 480, 380)),
        ];
        let session = resizer.begin_grab(2, neighbours[1].1, ResizeDirection::West, &neighbours);

        assert_eq!(session.same_side, vec![3]);
        assert_eq!(session.opposing, vec![1]);
        assert_eq!(session.pre_grab_rects.len(), 3);
        assert_eq!(session.participants().collect::<Vec<_>>(), vec![3, 1]);
    }

    #[test]
    fn east_drag_moves_same_side_and_opposing_edges() {
        let resizer = ComplementaryResizer::new(10, 15);
        let neighbours = [
            (1, Rect::new(10, 10, 480, 380)),
            (2, Rect::new(10, 410, 480, 380)),
            (3, Rect::new(510, 10, 480, 780)),
        ];
        let session = resizer.begin_grab(1, neighbours[0].1, ResizeDirection::East, &neighbours);
        let frames =
            resizer.resize_complementing(&session, Rect::new(10, 10, 580, 380), lookup(&neighbours));

        assert_eq!(
            frames,
            vec![
                (2, Rect::new(10, 410, 580, 380)),
                (3, Rect::new(610, 10, 380, 780)),
            ]
        );
    }

    #[test]
    fn north_and_south_drags_track_the_moving_edge() {
        let resizer = ComplementaryResizer::new(0, 15);
        let top = (1, Rect::new(0, 0, 1000, 400));
        let bottom = (2, Rect::new(0, 400, 1000, 400));

        let north = resizer.begin_grab(2, bottom.1, ResizeDirection::North, &[top, bottom]);
        assert_eq!(north.opposing, vec![1]);
        let frames = resizer.resize_complementing(&north, Rect::new(0, 300, 1000, 500), lookup(&[top]));
        assert_eq!(frames, vec![(1, Rect::new(0, 0, 1000, 300))]);

        let south = resizer.begin_grab(1, top.1, ResizeDirection::South, &[top, bottom]);
        assert_eq!(south.opposing, vec![2]);
        let frames =
            resizer.resize_complementing(&south, Rect::new(0, 0, 1000, 500), lookup(&[bottom]));
        assert_eq!(frames, vec![(2, Rect::new(0, 500, 1000, 300))]);
    }

    #[test]
    fn closed_neighbours_are_skipped() {
        let resizer = ComplementaryResizer::new(0, 15);
        let left = (1, Rect::new(0, 0, 500, 800));
        let right = (2, Rect::new(500, 0, 500, 800));
        let session = resizer.begin_grab(2, right.1, ResizeDirection::West, &[left, right]);

        let frames = resizer.resize_complementing(&session, Rect::new(400, 0, 600, 800), |_| None);
        assert!(frames.is_empty());
    }

    #[test]
    fn distant_windows_are_not_part_of_the_grab() {
        let resizer = ComplementaryResizer::new(0, 15);
        let session = resizer.begin_grab(
            1,
            Rect::new(0, 0, 500, 400),
            ResizeDirection::East,
            &[(2, Rect::new(700, 500, 300, 300))],
        );
        assert!(session.same_side.is_empty() && session.opposing.is_empty());
    }
}
