//! Integer geometry primitives shared by the viewport, scroll and window
//! components. Coordinates are logical pixels.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

// ── Point ────────────────────────────────────────────────────────

/// A position in some widget's coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

// ── Size ─────────────────────────────────────────────────────────

/// A width/height pair. Arithmetic saturates at the `i32` bounds, so a
/// huge remote screen stays huge instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Shrink by `dw`/`dh`, never going below zero.
    pub fn shrunk_by(self, dw: i32, dh: i32) -> Size {
        Size::new(
            self.width.saturating_sub(dw).max(0),
            self.height.saturating_sub(dh).max(0),
        )
    }

    /// `true` when `self` is strictly smaller than `other` on both axes.
    pub fn fits_strictly_within(self, other: Size) -> bool {
        self.width < other.width && self.height < other.height
    }
}

impl Add for Size {
    type Output = Size;

    fn add(self, rhs: Size) -> Size {
        Size::new(
            self.width.saturating_add(rhs.width),
            self.height.saturating_add(rhs.height),
        )
    }
}

impl Sub for Size {
    type Output = Size;

    fn sub(self, rhs: Size) -> Size {
        Size::new(
            self.width.saturating_sub(rhs.width),
            self.height.saturating_sub(rhs.height),
        )
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ── Rect ─────────────────────────────────────────────────────────

/// An axis-aligned rectangle: origin plus size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Top-left position that centers an item of `outer` size inside
    /// this rectangle. Halves are taken separately, so odd sizes round
    /// toward the origin on both terms.
    pub fn centered_origin(&self, outer: Size) -> Point {
        let axis = |start: i32, inner: i32, outer: i32| {
            start.saturating_add((inner / 2).saturating_sub(outer / 2))
        };
        Point::new(
            axis(self.x, self.width, outer.width),
            axis(self.y, self.height, outer.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_arithmetic() {
        let frame = Size::new(1032, 798);
        let client = Size::new(1024, 768);
        assert_eq!(frame - client, Size::new(8, 30));
        assert_eq!(client + Size::new(8, 30), frame);
    }

    #[test]
    fn shrunk_never_negative() {
        assert_eq!(Size::new(10, 10).shrunk_by(16, 4), Size::new(0, 6));
    }

    #[test]
    fn strict_fit() {
        let screen = Size::new(1920, 1080);
        assert!(Size::new(1032, 798).fits_strictly_within(screen));
        assert!(!Size::new(1920, 798).fits_strictly_within(screen));
        assert!(!Size::new(2008, 1230).fits_strictly_within(screen));
    }

    #[test]
    fn centered_origin_respects_offset() {
        let avail = Rect::new(100, 40, 1920, 1040);
        assert_eq!(avail.centered_origin(Size::new(1032, 798)), Point::new(544, 161));
    }

    #[test]
    fn arithmetic_saturates_at_bounds() {
        let huge = Size::new(i32::MAX, 768);
        assert_eq!(huge + Size::new(16, 39), Size::new(i32::MAX, 807));
        assert_eq!(Size::new(i32::MIN, 0) - Size::new(1, 1), Size::new(i32::MIN, -1));
        assert_eq!(Point::new(i32::MIN, 5) - Point::new(80, 0), Point::new(i32::MIN, 5));

        let avail = Rect::new(i32::MAX - 10, 0, 1920, 1040);
        assert_eq!(avail.centered_origin(Size::new(0, 0)).x, i32::MAX);
    }

    #[test]
    fn size_display() {
        assert_eq!(Size::new(1920, 1080).to_string(), "1920x1080");
    }
}
