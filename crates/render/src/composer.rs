//! Per-frame drawing of one complication.
//!
//! A `Frame` borrows everything one draw needs and paints the elements in a
//! fixed order: background, icon, small image, large image, ranged value,
//! main text, sub text, highlight, border. Coordinates are relative to the
//! complication's top-left; the caller translates the canvas.

use complication_types::{
    ComplicationData, ImageStyle, PlaceholderFlags, PlaceholderKind, Rect, RectF, RendererConfig,
};

use crate::canvas::{Canvas, ColorFilter, Paint};
use crate::images::ImageSlots;
use crate::layout::LayoutGeometry;
use crate::paint_set::PaintSet;
use crate::ranged_value::{draw_ranged_arcs, RangedArcs, PLACEHOLDER_RANGE};
use crate::text_renderer::TextRenderer;

/// Why a draw produced no output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdleReason {
    NoContent,
    Empty,
    NotConfigured,
    Inactive,
    EmptyBounds,
    /// The host asked not to draw complications this frame
    LayerHidden,
}

/// Outcome of a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameState {
    Idle(IdleReason),
    Drawn,
}

impl FrameState {
    pub fn is_drawn(self) -> bool {
        self == FrameState::Drawn
    }
}

/// Corner radius of an image so it follows the complication's rounded outline.
///
/// The outline radius shrinks by the image's distance to the nearest edge of
/// the `width` x `height` container.
pub fn image_corner_radius(border_radius: i32, image: Rect, width: i32, height: i32) -> i32 {
    if width <= 0 || height <= 0 {
        return 0;
    }
    let distance = image
        .left
        .min(width - image.right)
        .min(image.top)
        .min(height - image.bottom);
    (border_radius - distance).max(0)
}

pub(crate) struct Frame<'a> {
    pub canvas: &'a mut dyn Canvas,
    pub data: &'a ComplicationData,
    pub paints: &'a PaintSet,
    pub geometry: &'a mut LayoutGeometry,
    pub placeholders: PlaceholderFlags,
    pub images: &'a ImageSlots,
    pub config: &'a RendererConfig,
    pub width: i32,
    pub height: i32,
}

impl Frame<'_> {
    pub fn draw(
        &mut self,
        main_text: &mut TextRenderer,
        sub_text: &mut TextRenderer,
        show_highlight: bool,
    ) {
        self.draw_background();
        self.draw_icon();
        self.draw_small_image();
        self.draw_large_image();
        self.draw_ranged_value();
        self.draw_main_text(main_text);
        self.draw_sub_text(sub_text);
        if show_highlight {
            self.draw_highlight();
        }
        // Last, so nothing covers it
        self.draw_border();
    }

    fn border_radius(&self) -> i32 {
        self.paints
            .style
            .clamped_border_radius(self.width, self.height)
    }

    fn image_radius(&self, image: Rect) -> f64 {
        image_corner_radius(self.border_radius(), image, self.width, self.height) as f64
    }

    fn placeholder_paint(&self) -> Paint {
        Paint::fill(self.config.placeholder_color)
    }

    fn draw_outline(&mut self, paint: &Paint) {
        let radius = self.border_radius() as f64;
        self.canvas
            .draw_round_rect(self.geometry.background_f, radius, radius, paint);
    }

    fn draw_background(&mut self) {
        let paint = self.paints.background;
        self.draw_outline(&paint);
    }

    fn draw_border(&mut self) {
        if self.paints.has_border() {
            let paint = self.paints.border;
            self.draw_outline(&paint);
        }
    }

    fn draw_highlight(&mut self) {
        if !self.paints.is_ambient {
            let paint = self.paints.highlight;
            self.draw_outline(&paint);
        }
    }

    fn draw_icon(&mut self) {
        let bounds = self.geometry.icon;
        if bounds.is_empty() {
            return;
        }
        let images = self.images;
        let burn_in = self.paints.is_in_burn_in_protection_mode();
        if let Some(icon) = images.icon_for(burn_in) {
            let filter = if self.data.kind.placeholder().is_some() {
                ColorFilter::Tint(self.config.placeholder_color)
            } else {
                self.paints.icon_filter
            };
            self.canvas.draw_image(icon, bounds, 0.0, Some(filter));
        } else if self.placeholders.icon {
            let paint = self.placeholder_paint();
            self.canvas.draw_rect(bounds.to_f(), &paint);
        }
    }

    fn draw_small_image(&mut self) {
        let bounds = self.geometry.small_image;
        if bounds.is_empty() {
            return;
        }
        let images = self.images;
        let burn_in = self.paints.is_in_burn_in_protection_mode();
        let Some(image) = images.small_image_for(burn_in) else {
            if !burn_in && self.placeholders.small_image {
                let paint = self.placeholder_paint();
                self.canvas.draw_rect(bounds.to_f(), &paint);
            }
            return;
        };

        let (radius, filter) = match self.data.small_image_style {
            ImageStyle::Icon => (0.0, None),
            ImageStyle::Photo => (
                self.image_radius(bounds),
                self.paints.style.image_color_filter.map(ColorFilter::Tint),
            ),
        };
        self.canvas.draw_image(image, bounds, radius, filter);
    }

    fn draw_large_image(&mut self) {
        let bounds = self.geometry.large_image;
        if bounds.is_empty() {
            return;
        }
        if self.paints.is_in_burn_in_protection_mode() {
            if self.placeholders.large_image {
                let paint = self.placeholder_paint();
                self.canvas.draw_rect(bounds.to_f(), &paint);
            }
            return;
        }
        let images = self.images;
        match images.large_image.as_ref() {
            Some(image) => {
                let radius = self.image_radius(bounds);
                let filter = self.paints.style.image_color_filter.map(ColorFilter::Tint);
                self.canvas.draw_image(image, bounds, radius, filter);
            }
            None if self.placeholders.large_image => {
                let paint = self.placeholder_paint();
                self.canvas.draw_rect(bounds.to_f(), &paint);
            }
            None => {}
        }
    }

    fn draw_ranged_value(&mut self) {
        if self.geometry.ranged_value_f.is_empty() {
            return;
        }
        let in_progress = self.paints.in_progress;
        let start = self.config.ranged_start_angle;
        let gap = self.config.ranged_gap_degrees;

        if self.placeholders.ranged_value {
            let arcs = RangedArcs::compute(&PLACEHOLDER_RANGE, start, gap);
            let paint = Paint::stroke(self.config.placeholder_color, in_progress.stroke_width)
                .with_anti_alias(in_progress.anti_alias);
            draw_ranged_arcs(
                self.canvas,
                &mut self.geometry.ranged_value_f,
                &arcs,
                &paint,
                None,
            );
            return;
        }

        let Some(ranged) = self.data.ranged_value.as_ref() else {
            return;
        };
        let arcs = RangedArcs::compute(ranged, start, gap);
        let remaining = self.paints.remaining;
        draw_ranged_arcs(
            self.canvas,
            &mut self.geometry.ranged_value_f,
            &arcs,
            &in_progress,
            Some(&remaining),
        );
    }

    fn draw_main_text(&mut self, renderer: &mut TextRenderer) {
        let bounds = self.geometry.main_text;
        if bounds.is_empty() {
            return;
        }
        if self.placeholders.text {
            // Two placeholders side by side must not look like twins
            let both = !self.geometry.sub_text.is_empty()
                && matches!(
                    self.data.kind.placeholder(),
                    Some(PlaceholderKind::ShortText | PlaceholderKind::LongText)
                );
            let rect = bounds.to_f();
            let (width, height) = if both {
                (rect.width() * 0.4, rect.height() * 0.9)
            } else {
                (rect.width(), rect.height() * 0.75)
            };
            let block = RectF::new(
                rect.left,
                rect.top + height * 0.1,
                rect.left + width,
                rect.top + height,
            );
            let paint = self.placeholder_paint();
            self.canvas
                .draw_round_rect(block, rect.width() * 0.05, rect.height() * 0.1, &paint);
            return;
        }

        renderer.set_paint(&self.paints.primary_text);
        renderer.set_alignment(self.geometry.main_text_placement.alignment);
        renderer.set_gravity(self.geometry.main_text_placement.gravity);
        renderer.set_relative_padding_left(self.geometry.main_text_padding);
        renderer.draw(self.canvas, bounds);
    }

    fn draw_sub_text(&mut self, renderer: &mut TextRenderer) {
        let bounds = self.geometry.sub_text;
        if bounds.is_empty() {
            return;
        }
        if self.placeholders.title {
            let rect = bounds.to_f();
            let block = RectF::new(
                rect.left,
                rect.bottom - rect.height() * 0.9,
                rect.right,
                rect.bottom,
            );
            let paint = self.placeholder_paint();
            self.canvas
                .draw_round_rect(block, rect.width() * 0.05, rect.height() * 0.1, &paint);
            return;
        }

        renderer.set_paint(&self.paints.secondary_text);
        renderer.set_alignment(self.geometry.sub_text_placement.alignment);
        renderer.set_gravity(self.geometry.sub_text_placement.gravity);
        renderer.set_relative_padding_left(self.geometry.sub_text_padding);
        renderer.draw(self.canvas, bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_radius_follows_outline() {
        // Image touching the edges keeps the full radius
        assert_eq!(image_corner_radius(50, Rect::from_size(100, 100), 100, 100), 50);
        // Inset by 21 on every side
        assert_eq!(
            image_corner_radius(50, Rect::new(21, 21, 79, 79), 100, 100),
            29
        );
        // Far from the edges: square corners
        assert_eq!(image_corner_radius(10, Rect::new(20, 20, 80, 80), 100, 100), 0);
        assert_eq!(image_corner_radius(10, Rect::new(0, 0, 5, 5), 0, 0), 0);
    }

    #[test]
    fn test_frame_state_helpers() {
        assert!(FrameState::Drawn.is_drawn());
        assert!(!FrameState::Idle(IdleReason::Inactive).is_drawn());
    }
}
