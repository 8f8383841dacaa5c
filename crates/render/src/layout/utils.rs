//! Rectangle helpers shared by the layout strategies.
//!
//! Every helper is pure: it takes rectangles by value and returns a new one.

use std::f64::consts::SQRT_2;

use complication_types::Rect;

/// Bounds wider than this many heights get side-by-side layouts
pub const WIDE_RECTANGLE_ASPECT_RATIO: f64 = 2.0;

pub fn is_wide_rectangle(bounds: Rect) -> bool {
    bounds.width() as f64 > bounds.height() as f64 * WIDE_RECTANGLE_ASPECT_RATIO
}

/// Largest square centered in `bounds`
pub fn central_square(bounds: Rect) -> Rect {
    let edge = bounds.width().min(bounds.height()).max(0);
    let left = bounds.center_x() - edge / 2;
    let top = bounds.center_y() - edge / 2;
    Rect::new(left, top, left + edge, top + edge)
}

/// Square anchored at the left edge, as tall as `bounds`
pub fn left_square(bounds: Rect) -> Rect {
    let edge = bounds.height().min(bounds.width()).max(0);
    Rect::new(bounds.left, bounds.top, bounds.left + edge, bounds.bottom)
}

/// Whatever is left to the right of `left_square`
pub fn right_part(bounds: Rect) -> Rect {
    let edge = bounds.height().min(bounds.width()).max(0);
    Rect::new(bounds.left + edge, bounds.top, bounds.right, bounds.bottom)
}

pub fn top_half(bounds: Rect) -> Rect {
    Rect::new(bounds.left, bounds.top, bounds.right, bounds.center_y())
}

pub fn bottom_half(bounds: Rect) -> Rect {
    Rect::new(bounds.left, bounds.center_y(), bounds.right, bounds.bottom)
}

/// Scale both dimensions by `fraction`, keeping the center.
///
/// A fraction of 1.0 returns `bounds` unchanged. Empty input stays empty.
pub fn scaled_around_center(bounds: Rect, fraction: f64) -> Rect {
    if bounds.is_empty() {
        return Rect::EMPTY;
    }
    let width = (bounds.width() as f64 * fraction) as i32;
    let height = (bounds.height() as f64 * fraction) as i32;
    if width <= 0 || height <= 0 {
        return Rect::EMPTY;
    }
    let left = bounds.center_x() - width / 2;
    let top = bounds.center_y() - height / 2;
    Rect::new(left, top, left + width, top + height)
}

/// Largest square centered in `bounds` that also fits `container`.
///
/// Starts from `central_square(bounds)` and shrinks it evenly on every side
/// by the worst overflow past `container`. Empty when nothing is left.
pub fn fit_square_to_bounds(bounds: Rect, container: Rect) -> Rect {
    if bounds.is_empty() || container.is_empty() {
        return Rect::EMPTY;
    }
    let mut square = central_square(bounds);
    let overflow = (container.left - square.left)
        .max(square.right - container.right)
        .max(container.top - square.top)
        .max(square.bottom - container.bottom)
        .max(0);
    square.inset(overflow, overflow);
    if square.is_empty() {
        Rect::EMPTY
    } else {
        square
    }
}

/// Region guaranteed to lie inside the rounded outline of `bounds`.
///
/// A corner of radius r cuts `(sqrt(2) - 1) * r` off the diagonal, so
/// insetting every side by that much keeps content clear of the curve.
/// `compensation` divides the inset to trade safety for space.
pub fn inner_bounds(bounds: Rect, corner_radius: i32, compensation: f64) -> Rect {
    let padding = ((SQRT_2 - 1.0) * corner_radius.max(0) as f64).ceil();
    let inset = (padding / compensation) as i32;
    let mut inner = bounds;
    inner.inset(inset, inset);
    if inner.is_empty() {
        Rect::EMPTY
    } else {
        inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_central_square_stays_inside() {
        let bounds = Rect::new(1, 0, 8, 20);
        let square = central_square(bounds);
        assert_eq!(square.width(), 7);
        assert_eq!(square.height(), 7);
        assert!(bounds.contains(&square));

        let wide = Rect::new(0, 0, 10, 5);
        assert_eq!(central_square(wide), Rect::new(3, 0, 8, 5));
    }

    #[test]
    fn test_left_square_and_right_part_tile_bounds() {
        let bounds = Rect::new(0, 0, 300, 100);
        assert_eq!(left_square(bounds), Rect::new(0, 0, 100, 100));
        assert_eq!(right_part(bounds), Rect::new(100, 0, 300, 100));
    }

    #[test]
    fn test_wide_rectangle_threshold() {
        assert!(!is_wide_rectangle(Rect::from_size(200, 100)));
        assert!(is_wide_rectangle(Rect::from_size(201, 100)));
    }

    #[test]
    fn test_scale_by_one_is_identity() {
        for bounds in [Rect::new(0, 0, 5, 7), Rect::new(1, 3, 6, 10), Rect::new(2, 2, 9, 9)] {
            assert_eq!(scaled_around_center(bounds, 1.0), bounds);
        }
        assert_eq!(
            scaled_around_center(Rect::from_size(100, 100), 0.5),
            Rect::new(25, 25, 75, 75)
        );
    }

    #[test]
    fn test_fit_square_limited_by_container() {
        let container = Rect::new(10, 10, 90, 90);
        assert_eq!(
            fit_square_to_bounds(Rect::from_size(100, 100), container),
            Rect::new(10, 10, 90, 90)
        );
        // center near the container's left edge
        assert_eq!(
            fit_square_to_bounds(Rect::new(0, 30, 30, 60), container),
            Rect::new(10, 40, 20, 50)
        );
        // center outside
        assert!(fit_square_to_bounds(Rect::new(0, 0, 10, 10), container).is_empty());
    }

    #[test]
    fn test_fit_square_keeps_odd_edges() {
        let container = Rect::from_size(100, 100);
        assert_eq!(
            fit_square_to_bounds(Rect::new(3, 3, 10, 10), container),
            Rect::new(3, 3, 10, 10)
        );
        assert_eq!(
            fit_square_to_bounds(Rect::new(5, 5, 6, 6), container),
            Rect::new(5, 5, 6, 6)
        );
        // 7 wide, 9 tall: full width, centered vertically
        assert_eq!(
            fit_square_to_bounds(Rect::new(0, 0, 7, 9), container),
            Rect::new(0, 1, 7, 8)
        );
    }

    #[test]
    fn test_inner_bounds_inset() {
        let bounds = Rect::from_size(100, 100);
        // ceil(0.4142 * 50) = 21
        assert_eq!(inner_bounds(bounds, 50, 1.0), Rect::new(21, 21, 79, 79));
        assert_eq!(inner_bounds(bounds, 0, 1.0), bounds);
        // (int)(21 / 1.3) = 16
        assert_eq!(inner_bounds(bounds, 50, 1.3), Rect::new(16, 16, 84, 84));
        assert!(inner_bounds(Rect::from_size(10, 10), 100, 1.0).is_empty());
    }
}
