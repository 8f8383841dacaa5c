//! Progress ring geometry.
//!
//! The ring is two arcs: the in-progress arc from the start angle and the
//! remaining arc after it, separated by a gap at both joins. Angles are in
//! degrees, clockwise.

use complication_types::{RangedValue, RectF};

use crate::canvas::{Canvas, Paint};

/// Fraction of the range covered by `value`, in `[0, 1]`.
///
/// The value is clamped into `[min, max]`. A non-positive or non-finite
/// range gives 0.
pub fn progress(value: f32, min: f32, max: f32) -> f64 {
    let (value, min, max) = (value as f64, min as f64, max as f64);
    let interval = max - min;
    if !interval.is_finite() || interval <= 0.0 {
        return 0.0;
    }
    let clamped = value.max(min).min(max);
    let progress = (clamped - min) / interval;
    if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Sweeps and start angles of the two arcs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangedArcs {
    pub progress: f64,
    /// Gap actually used: zero at 0% and 100%
    pub gap: f64,
    pub in_progress_start: f64,
    pub in_progress_sweep: f64,
    pub remaining_start: f64,
    pub remaining_sweep: f64,
}

impl RangedArcs {
    pub fn compute(ranged: &RangedValue, start_angle: f64, gap_degrees: f64) -> Self {
        let progress = progress(ranged.value, ranged.min, ranged.max);
        let gap = if progress == 0.0 || progress == 1.0 {
            0.0
        } else {
            gap_degrees
        };
        let in_progress_sweep = (360.0 * progress - gap).max(0.0);
        let remaining_sweep = (360.0 * (1.0 - progress) - gap).max(0.0);
        let in_progress_start = start_angle + gap / 2.0;
        Self {
            progress,
            gap,
            in_progress_start,
            in_progress_sweep,
            remaining_start: in_progress_start + in_progress_sweep + gap,
            remaining_sweep,
        }
    }
}

/// Stand-in range drawn while the real value is pending
pub const PLACEHOLDER_RANGE: RangedValue = RangedValue {
    value: 75.0,
    min: 0.0,
    max: 100.0,
};

/// Draw the arcs inside `oval`, inset by the in-progress stroke so it stays within the rect.
///
/// The remaining arc is skipped when `remaining` is None. `oval` is shrunk
/// for the duration of the call and restored before returning.
pub fn draw_ranged_arcs(
    canvas: &mut dyn Canvas,
    oval: &mut RectF,
    arcs: &RangedArcs,
    in_progress: &Paint,
    remaining: Option<&Paint>,
) {
    let inset = in_progress.stroke_width.ceil();
    oval.inset(inset, inset);
    if !oval.is_empty() {
        if arcs.in_progress_sweep > 0.0 {
            canvas.draw_arc(*oval, arcs.in_progress_start, arcs.in_progress_sweep, in_progress);
        }
        if let Some(remaining) = remaining.filter(|_| arcs.remaining_sweep > 0.0) {
            canvas.draw_arc(*oval, arcs.remaining_start, arcs.remaining_sweep, remaining);
        }
    }
    oval.inset(-inset, -inset);
}
