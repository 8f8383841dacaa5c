//! Complication layout: where each element goes inside the bounds.
//!
//! `LayoutGeometry::update` runs a per-kind strategy and then normalizes its
//! raw rectangles against the inner bounds, the region clear of the rounded
//! corners. After an update every rectangle other than the background is
//! either empty or inside `inner_bounds`.

pub mod strategies;
pub mod utils;

use complication_types::{ComplicationData, ImageStyle, Rect, RectF};

pub use strategies::{LayoutContext, LayoutStrategy, LayoutStrategyKind, TextPlacement};
use utils::{fit_square_to_bounds, inner_bounds, scaled_around_center};

use crate::canvas::TextAlignment;

pub const ICON_SIZE_FRACTION: f64 = 1.0;
pub const SMALL_IMAGE_SIZE_FRACTION: f64 = 0.95;
pub const LARGE_IMAGE_SIZE_FRACTION: f64 = 1.0;
/// Start-aligned text is padded by this fraction of the container height
pub const TEXT_PADDING_HEIGHT_FRACTION: f64 = 0.1;

/// Everything the layout depends on
#[derive(Debug, Clone, Copy)]
pub struct LayoutInput<'a> {
    pub data: &'a ComplicationData,
    pub width: i32,
    pub height: i32,
    pub ranged_value_progress_hidden: bool,
    /// Larger of the active and ambient corner radii, already clamped
    pub corner_radius: i32,
    /// Divisor applied to the inner-bounds inset
    pub compensation: f64,
}

/// Computed rectangles, in coordinates relative to the bounds' top-left
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutGeometry {
    pub strategy: LayoutStrategyKind,
    pub background: Rect,
    pub background_f: RectF,
    pub inner_bounds: Rect,
    pub icon: Rect,
    pub small_image: Rect,
    pub large_image: Rect,
    pub main_text: Rect,
    pub sub_text: Rect,
    pub main_text_placement: TextPlacement,
    pub sub_text_placement: TextPlacement,
    /// Left padding relative to the main text width
    pub main_text_padding: f64,
    pub sub_text_padding: f64,
    pub ranged_value: Rect,
    pub ranged_value_f: RectF,
}

impl LayoutGeometry {
    pub fn compute(input: &LayoutInput<'_>) -> Self {
        let mut geometry = Self::default();
        geometry.update(input);
        geometry
    }

    /// Recompute in place
    pub fn update(&mut self, input: &LayoutInput<'_>) {
        *self = Self::default();

        let background = Rect::from_size(input.width.max(0), input.height.max(0));
        self.background = background;
        self.background_f = background.to_f();
        if background.is_empty() {
            return;
        }

        let strategy = LayoutStrategyKind::select(input.data, input.ranged_value_progress_hidden);
        self.strategy = strategy;
        let layout = strategy.strategy();
        let cx = LayoutContext::new(input.data, background);

        let raw_ranged = layout.ranged_value_bounds(&cx);
        let raw_icon = layout.icon_bounds(&cx);
        let raw_small_image = layout.small_image_bounds(&cx);
        let raw_large_image = layout.large_image_bounds(&cx);
        let (mut main_text, mut sub_text) = if strategy.uses_long_text() {
            self.main_text_placement = layout.long_text_placement(&cx);
            self.sub_text_placement = layout.long_title_placement(&cx);
            (layout.long_text_bounds(&cx), layout.long_title_bounds(&cx))
        } else {
            self.main_text_placement = layout.short_text_placement(&cx);
            self.sub_text_placement = layout.short_title_placement(&cx);
            (layout.short_text_bounds(&cx), layout.short_title_bounds(&cx))
        };

        // Padding is relative to the unclipped main text width
        let relative_padding = if main_text.width() > 0 {
            TEXT_PADDING_HEIGHT_FRACTION * input.height as f64 / main_text.width() as f64
        } else {
            0.0
        };
        self.main_text_padding = padding_for(self.main_text_placement, relative_padding);
        self.sub_text_padding = padding_for(self.sub_text_placement, relative_padding);

        let inner = inner_bounds(background, input.corner_radius, input.compensation);
        self.inner_bounds = inner;

        self.main_text = clip_to(&mut main_text, inner);
        self.sub_text = clip_to(&mut sub_text, inner);

        self.icon = fit_square_to_bounds(scaled_around_center(raw_icon, ICON_SIZE_FRACTION), inner);

        let mut small_image = scaled_around_center(raw_small_image, SMALL_IMAGE_SIZE_FRACTION);
        self.small_image = match input.data.small_image_style {
            ImageStyle::Icon => fit_square_to_bounds(small_image, inner),
            ImageStyle::Photo => clip_to(&mut small_image, inner),
        };

        let mut large_image = scaled_around_center(raw_large_image, LARGE_IMAGE_SIZE_FRACTION);
        self.large_image = clip_to(&mut large_image, inner);

        // Keep the ring circular
        self.ranged_value = fit_square_to_bounds(raw_ranged, inner);
        self.ranged_value_f = self.ranged_value.to_f();
    }
}

fn padding_for(placement: TextPlacement, relative_padding: f64) -> f64 {
    match placement.alignment {
        TextAlignment::Start => relative_padding,
        TextAlignment::Center => 0.0,
    }
}

/// Intersect with `inner`, collapsing to empty when they do not overlap
fn clip_to(rect: &mut Rect, inner: Rect) -> Rect {
    if rect.is_empty() || !rect.intersect(&inner) {
        Rect::EMPTY
    } else {
        *rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use complication_types::{ComplicationText, ImageHandle, PlaceholderKind};

    fn input(data: &ComplicationData, width: i32, height: i32, radius: i32) -> LayoutInput<'_> {
        LayoutInput {
            data,
            width,
            height,
            ranged_value_progress_hidden: false,
            corner_radius: radius,
            compensation: 1.0,
        }
    }

    fn sub_rects(g: &LayoutGeometry) -> [Rect; 7] {
        [
            g.icon,
            g.small_image,
            g.large_image,
            g.main_text,
            g.sub_text,
            g.ranged_value,
            g.inner_bounds,
        ]
    }

    #[test]
    fn test_empty_bounds_give_empty_layout() {
        let data = ComplicationData::short_text(ComplicationText::plain("12"));
        let g = LayoutGeometry::compute(&input(&data, 0, 0, 0));
        assert!(g.background.is_empty());
        for rect in sub_rects(&g) {
            assert!(rect.is_empty());
        }
    }

    #[test]
    fn test_sub_rects_stay_inside_inner_bounds() {
        let all = [
            ComplicationData::short_text(ComplicationText::plain("12"))
                .with_short_title(ComplicationText::plain("steps"))
                .with_icon(ImageHandle::resource("a")),
            ComplicationData::long_text(ComplicationText::plain("Lunch with Sam"))
                .with_small_image(ImageHandle::resource("b"), ImageStyle::Photo),
            ComplicationData::ranged_value(3.0, 0.0, 10.0).with_icon(ImageHandle::resource("c")),
            ComplicationData::large_image(ImageHandle::resource("d")),
            ComplicationData::small_image(ImageHandle::resource("e"), ImageStyle::Icon),
            ComplicationData::icon(ImageHandle::resource("f")),
        ];
        for data in &all {
            for (w, h, r) in [(100, 100, 50), (300, 100, 20), (80, 120, 0), (64, 64, 10)] {
                let g = LayoutGeometry::compute(&input(data, w, h, r));
                for rect in sub_rects(&g) {
                    assert!(
                        rect.is_empty() || g.inner_bounds.contains(&rect),
                        "{:?} escapes {:?} for {:?}",
                        rect,
                        g.inner_bounds,
                        data.kind
                    );
                }
            }
        }
    }

    #[test]
    fn test_icon_layout_is_square_within_inner_bounds() {
        let data = ComplicationData::icon(ImageHandle::resource("heart"));
        let g = LayoutGeometry::compute(&input(&data, 120, 80, 0));
        assert_eq!(g.icon, Rect::new(20, 0, 100, 80));

        let rounded = LayoutGeometry::compute(&input(&data, 100, 100, 50));
        assert_eq!(rounded.icon, Rect::new(21, 21, 79, 79));
    }

    #[test]
    fn test_small_image_photo_is_scaled_not_squared() {
        let data = ComplicationData::small_image(ImageHandle::resource("p"), ImageStyle::Photo);
        let g = LayoutGeometry::compute(&input(&data, 100, 100, 0));
        // 100 * 0.95 = 95, centered on 50
        assert_eq!(g.small_image, Rect::new(3, 3, 98, 98));
    }

    #[test]
    fn test_start_alignment_gets_padding() {
        let data = ComplicationData::long_text(ComplicationText::plain("Lunch"))
            .with_icon(ImageHandle::resource("cal"));
        let g = LayoutGeometry::compute(&input(&data, 300, 100, 0));
        assert_eq!(g.main_text, Rect::new(100, 0, 300, 100));
        assert!((g.main_text_padding - 0.05).abs() < 1e-9);

        let centered = ComplicationData::short_text(ComplicationText::plain("12"));
        let g = LayoutGeometry::compute(&input(&centered, 100, 100, 0));
        assert_eq!(g.main_text_padding, 0.0);
    }

    #[test]
    fn test_text_outside_inner_bounds_collapses() {
        // A fully rounded 30x30 box leaves a 16x16 inner region
        let data = ComplicationData::short_text(ComplicationText::plain("12"))
            .with_icon(ImageHandle::resource("i"));
        let g = LayoutGeometry::compute(&input(&data, 30, 30, 15));
        assert_eq!(g.inner_bounds, Rect::new(7, 7, 23, 23));
        assert_eq!(g.main_text, Rect::new(7, 15, 23, 23));
    }

    #[test]
    fn test_placeholder_no_data_lays_out_as_kind() {
        let data = ComplicationData::placeholder(PlaceholderKind::ShortText)
            .with_short_text(ComplicationText::Placeholder)
            .with_short_title(ComplicationText::Placeholder);
        let g = LayoutGeometry::compute(&input(&data, 100, 100, 0));
        assert_eq!(g.strategy, LayoutStrategyKind::ShortText);
        assert_eq!(g.main_text, Rect::new(0, 0, 100, 50));
        assert_eq!(g.sub_text, Rect::new(0, 50, 100, 100));
    }

    #[test]
    fn test_hidden_progress_changes_strategy() {
        let data = ComplicationData::ranged_value(3.0, 0.0, 10.0)
            .with_short_text(ComplicationText::plain("3"));
        let mut layout_input = input(&data, 100, 100, 0);
        let shown = LayoutGeometry::compute(&layout_input);
        assert!(!shown.ranged_value.is_empty());

        layout_input.ranged_value_progress_hidden = true;
        let hidden = LayoutGeometry::compute(&layout_input);
        assert_eq!(hidden.strategy, LayoutStrategyKind::ShortText);
        assert!(hidden.ranged_value.is_empty());
    }
}
