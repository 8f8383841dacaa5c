//! Text box with cached measurement.
//!
//! Setters only mark the layout dirty when the value actually changes, so a
//! renderer can push the same text every frame without re-measuring.

use complication_types::{Rect, RectF};

use crate::canvas::{Canvas, Gravity, TextAlignment, TextExtent, TextPaint};

/// Padding on each side as a fraction of the box width (left, right) or height (top, bottom)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RelativePadding {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl RelativePadding {
    pub const NONE: RelativePadding = RelativePadding {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    /// Shrink `bounds` by the padding
    pub fn apply(&self, bounds: RectF) -> RectF {
        let (width, height) = (bounds.width(), bounds.height());
        RectF::new(
            bounds.left + self.left * width,
            bounds.top + self.top * height,
            bounds.right - self.right * width,
            bounds.bottom - self.bottom * height,
        )
    }
}

#[derive(Debug, Clone)]
pub struct TextRenderer {
    text: String,
    paint: TextPaint,
    alignment: TextAlignment,
    gravity: Gravity,
    max_lines: u32,
    padding: RelativePadding,
    bounds: RectF,
    extent: TextExtent,
    needs_layout: bool,
    measure_count: u64,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            paint: TextPaint::default(),
            alignment: TextAlignment::Center,
            gravity: Gravity::CenterVertical,
            max_lines: 1,
            padding: RelativePadding::NONE,
            bounds: RectF::EMPTY,
            extent: TextExtent::default(),
            needs_layout: true,
            measure_count: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Reuses the existing buffer
    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
            self.needs_layout = true;
        }
    }

    pub fn set_paint(&mut self, paint: &TextPaint) {
        if self.paint != *paint {
            self.paint.clone_from(paint);
            self.needs_layout = true;
        }
    }

    pub fn set_alignment(&mut self, alignment: TextAlignment) {
        if self.alignment != alignment {
            self.alignment = alignment;
            self.needs_layout = true;
        }
    }

    pub fn set_gravity(&mut self, gravity: Gravity) {
        // Only moves the block, no re-measure
        self.gravity = gravity;
    }

    pub fn set_max_lines(&mut self, max_lines: u32) {
        let max_lines = max_lines.max(1);
        if self.max_lines != max_lines {
            self.max_lines = max_lines;
            self.needs_layout = true;
        }
    }

    pub fn set_relative_padding(&mut self, padding: RelativePadding) {
        if self.padding != padding {
            self.padding = padding;
            self.needs_layout = true;
        }
    }

    /// Change only the left padding
    pub fn set_relative_padding_left(&mut self, left: f64) {
        self.set_relative_padding(RelativePadding {
            left,
            ..self.padding
        });
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// How many times the text was measured
    pub fn measure_count(&self) -> u64 {
        self.measure_count
    }

    /// Draw into `bounds`; empty text or bounds draw nothing
    pub fn draw(&mut self, canvas: &mut dyn Canvas, bounds: Rect) {
        if self.text.is_empty() || bounds.is_empty() {
            return;
        }

        let bounds = bounds.to_f();
        if self.bounds != bounds {
            self.bounds = bounds;
            self.needs_layout = true;
        }

        let inner = self.padding.apply(bounds);
        if inner.is_empty() {
            return;
        }
        let available_width = inner.width();

        if self.needs_layout {
            self.extent =
                canvas.measure_text(&self.text, &self.paint, available_width, self.max_lines);
            self.needs_layout = false;
            self.measure_count += 1;
        }

        let height = self.extent.height;
        let top = match self.gravity {
            Gravity::Top => inner.top,
            Gravity::CenterVertical => inner.top + (inner.height() - height) / 2.0,
            Gravity::Bottom => inner.bottom - height,
        };
        let text_rect = RectF::new(inner.left, top, inner.right, top + height);

        canvas.draw_text(
            &self.text,
            &self.paint,
            text_rect,
            self.max_lines,
            self.alignment,
        );
    }
}
