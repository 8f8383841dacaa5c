//! Integer and float rectangles.
//!
//! Both use the left/top/right/bottom convention with y growing downwards.
//! A rectangle is empty when its width or height is not positive; an empty
//! rectangle in a computed layout means "not applicable", so helpers never
//! hand back a partially clamped rectangle where an empty one is expected.

use serde::{Deserialize, Serialize};

/// Integer rectangle, pixel aligned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const EMPTY: Rect = Rect::new(0, 0, 0, 0);

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle anchored at the origin
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn center_x(&self) -> i32 {
        (self.left + self.right) >> 1
    }

    pub fn center_y(&self) -> i32 {
        (self.top + self.bottom) >> 1
    }

    pub fn set_empty(&mut self) {
        *self = Rect::EMPTY;
    }

    /// Shrink (positive) or grow (negative) on every side.
    pub fn inset(&mut self, dx: i32, dy: i32) {
        self.left += dx;
        self.top += dy;
        self.right -= dx;
        self.bottom -= dy;
    }

    pub fn offset(&mut self, dx: i32, dy: i32) {
        self.left += dx;
        self.top += dy;
        self.right += dx;
        self.bottom += dy;
    }

    /// Replace `self` with its intersection with `other`.
    ///
    /// Returns false and leaves `self` untouched when the two do not overlap.
    pub fn intersect(&mut self, other: &Rect) -> bool {
        if self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
        {
            self.left = self.left.max(other.left);
            self.top = self.top.max(other.top);
            self.right = self.right.min(other.right);
            self.bottom = self.bottom.min(other.bottom);
            true
        } else {
            false
        }
    }

    /// True when `other` lies entirely inside `self`
    pub fn contains(&self, other: &Rect) -> bool {
        !self.is_empty()
            && self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }

    pub fn to_f(&self) -> RectF {
        RectF::new(
            self.left as f64,
            self.top as f64,
            self.right as f64,
            self.bottom as f64,
        )
    }
}

/// Float rectangle used for anti-aliased drawing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RectF {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl RectF {
    pub const EMPTY: RectF = RectF::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn center_x(&self) -> f64 {
        (self.left + self.right) * 0.5
    }

    pub fn center_y(&self) -> f64 {
        (self.top + self.bottom) * 0.5
    }

    pub fn inset(&mut self, dx: f64, dy: f64) {
        self.left += dx;
        self.top += dy;
        self.right -= dx;
        self.bottom -= dy;
    }

    pub fn set(&mut self, rect: &Rect) {
        *self = rect.to_f();
    }
}

impl From<Rect> for RectF {
    fn from(rect: Rect) -> Self {
        rect.to_f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_leaves_rect_on_miss() {
        let mut a = Rect::new(0, 0, 10, 10);
        assert!(!a.intersect(&Rect::new(20, 20, 30, 30)));
        assert_eq!(a, Rect::new(0, 0, 10, 10));

        assert!(a.intersect(&Rect::new(5, -5, 30, 8)));
        assert_eq!(a, Rect::new(5, 0, 10, 8));
    }

    #[test]
    fn test_empty_rules() {
        assert!(Rect::EMPTY.is_empty());
        assert!(Rect::new(5, 5, 5, 10).is_empty());
        assert!(!Rect::from_size(1, 1).is_empty());
        assert!(RectF::new(0.0, 0.0, 0.0, 4.0).is_empty());
    }

    #[test]
    fn test_contains() {
        let outer = Rect::from_size(100, 100);
        assert!(outer.contains(&Rect::new(10, 10, 90, 90)));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&Rect::new(-1, 10, 90, 90)));
    }
}
