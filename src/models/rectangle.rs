//! Rectangle algebra used by every layout computation
//!
//! All geometry is integral and axis-aligned. Functions that accept an
//! optional operand treat a missing rectangle as "nothing to compare" and
//! return an empty result instead of failing.

use crate::SnapTileError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Margin used by [`rects_about_equal`] when callers have no configured value
pub const DEFAULT_APPROX_MARGIN: i32 = 15;

/// Slabs thinner than this are dropped by [`rect_diff`] unless configured otherwise
pub const DEFAULT_IGNORE_MARGIN: i32 = 35;

/// Pointer or anchor position in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive)
    pub fn x2(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive)
    pub fn y2(&self) -> i32 {
        self.y + self.height
    }

    pub fn area(&self) -> i64 {
        i64::from(self.width.max(0)) * i64::from(self.height.max(0))
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Strict overlap test: rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Common area of both rectangles, `None` when it is empty
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let x2 = self.x2().min(other.x2());
        let y2 = self.y2().min(other.y2());

        if x2 > x && y2 > y {
            Some(Rect::new(x, y, x2 - x, y2 - y))
        } else {
            None
        }
    }

    /// Inclusive point containment, edges count as inside
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.x2() && point.y >= self.y && point.y <= self.y2()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x && other.y >= self.y && other.x2() <= self.x2() && other.y2() <= self.y2()
    }

    /// Inset the rectangle by `amount` on every side
    pub fn shrink(&self, amount: i32) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            self.width - 2 * amount,
            self.height - 2 * amount,
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

impl FromStr for Rect {
    type Err = SnapTileError;

    /// Parses `x,y,width,height`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<i32> = s
            .split(',')
            .map(|part| part.trim().parse::<i32>())
            .collect::<Result<_, _>>()
            .map_err(|e| SnapTileError::ValidationError(format!("Invalid rectangle '{s}': {e}")))?;

        match parts.as_slice() {
            [x, y, width, height] => Ok(Rect::new(*x, *y, *width, *height)),
            _ => Err(SnapTileError::ValidationError(format!(
                "Rectangle '{s}' must have the form x,y,width,height"
            ))),
        }
    }
}

/// User-facing orientation preference for [`rect_diff`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPreference {
    /// Derive from the monitor's aspect ratio
    #[default]
    Auto,
    Vertical,
    Horizontal,
}

impl SplitPreference {
    /// Resolve the preference against the monitor an operation runs on
    pub fn policy_for(self, monitor_geometry: Rect) -> SplitPolicy {
        match self {
            SplitPreference::Auto => SplitPolicy::FromMonitor(monitor_geometry),
            SplitPreference::Vertical => SplitPolicy::Vertical,
            SplitPreference::Horizontal => SplitPolicy::Horizontal,
        }
    }
}

impl FromStr for SplitPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(SplitPreference::Auto),
            "vertical" => Ok(SplitPreference::Vertical),
            "horizontal" => Ok(SplitPreference::Horizontal),
            _ => Err(format!("Invalid split preference: {}", s)),
        }
    }
}

/// Which slabs [`rect_diff`] gives the full extent of the minuend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPolicy {
    /// Left/right slabs span the full height
    Vertical,
    /// Top/bottom slabs span the full width
    Horizontal,
    /// Vertical when the monitor is wider than 0.9 x its height
    FromMonitor(Rect),
}

impl SplitPolicy {
    pub fn prefers_vertical(self) -> bool {
        match self {
            SplitPolicy::Vertical => true,
            SplitPolicy::Horizontal => false,
            SplitPolicy::FromMonitor(monitor) => {
                f64::from(monitor.width) > f64::from(monitor.height) * 0.9
            }
        }
    }
}

/// `true` iff `|value - other| <= margin`
pub fn equal_approx(value: i32, other: i32, margin: i32) -> bool {
    (i64::from(value) - i64::from(other)).abs() <= i64::from(margin)
}

/// Position and size both within `margin`; absent rectangles never match
pub fn rects_about_equal(r1: Option<&Rect>, r2: Option<&Rect>, margin: i32) -> bool {
    let (Some(r1), Some(r2)) = (r1, r2) else {
        return false;
    };

    let same_pos = equal_approx(r1.x, r2.x, margin) && equal_approx(r1.y, r2.y, margin);
    let same_size =
        equal_approx(r1.width, r2.width, margin) && equal_approx(r1.height, r2.height, margin);
    same_pos && same_size
}

pub fn overlap(r1: Option<&Rect>, r2: Option<&Rect>) -> bool {
    intersect(r1, r2).is_some()
}

pub fn intersect(r1: Option<&Rect>, r2: Option<&Rect>) -> Option<Rect> {
    r1?.intersection(r2?)
}

/// Region of `a` not covered by `b`, as 0-4 slabs
///
/// The slabs around `b` are split so that one orientation gets the full
/// extent of `a`: with a vertical split the left and right slabs are as tall
/// as `a` and the top and bottom slabs only span `b`'s columns. Slabs whose
/// width or height does not exceed `ignore_margin` are dropped, which absorbs
/// windows that only resize in whole character cells.
pub fn rect_diff(
    a: Option<&Rect>,
    b: Option<&Rect>,
    ignore_margin: i32,
    split: SplitPolicy,
) -> Vec<Rect> {
    let (Some(a), Some(b)) = (a, b) else {
        return Vec::new();
    };

    let keep = |rect: &Rect| rect.width > ignore_margin && rect.height > ignore_margin;

    // Only the part of b inside a can be subtracted
    let Some(b) = a.intersection(b) else {
        return if keep(a) { vec![*a] } else { Vec::new() };
    };

    let slabs = if split.prefers_vertical() {
        [
            Rect::new(a.x, a.y, b.x - a.x, a.height),
            Rect::new(b.x2(), a.y, a.x2() - b.x2(), a.height),
            Rect::new(b.x, a.y, b.width, b.y - a.y),
            Rect::new(b.x, b.y2(), b.width, a.y2() - b.y2()),
        ]
    } else {
        [
            Rect::new(a.x, a.y, a.width, b.y - a.y),
            Rect::new(a.x, b.y2(), a.width, a.y2() - b.y2()),
            Rect::new(a.x, b.y, b.x - a.x, b.height),
            Rect::new(b.x2(), b.y, a.x2() - b.x2(), b.height),
        ]
    };

    slabs.into_iter().filter(keep).collect()
}
