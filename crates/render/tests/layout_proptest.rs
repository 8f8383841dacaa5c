//! Property-based tests for ring math and layout geometry.

use complication_render::layout::{LayoutGeometry, LayoutInput};
use complication_render::ranged_value::{progress, RangedArcs};
use complication_types::{
    ComplicationData, ComplicationText, ImageHandle, ImageStyle, PlaceholderKind, RangedValue,
};
use proptest::prelude::*;

fn sample_content(index: usize) -> ComplicationData {
    let text = || ComplicationText::plain("12:45");
    let title = || ComplicationText::plain("Sun");
    let icon = || ImageHandle::resource("icon");
    match index % 10 {
        0 => ComplicationData::short_text(text()),
        1 => ComplicationData::short_text(text()).with_short_title(title()).with_icon(icon()),
        2 => ComplicationData::long_text(text()).with_long_title(title()),
        3 => ComplicationData::long_text(text())
            .with_small_image(ImageHandle::resource("photo"), ImageStyle::Photo),
        4 => ComplicationData::icon(icon()),
        5 => ComplicationData::small_image(ImageHandle::resource("avatar"), ImageStyle::Icon),
        6 => ComplicationData::large_image(ImageHandle::resource("wallpaper")),
        7 => ComplicationData::ranged_value(30.0, 0.0, 100.0)
            .with_icon(icon())
            .with_short_text(text()),
        8 => ComplicationData::placeholder(PlaceholderKind::LongText)
            .with_long_text(ComplicationText::Placeholder)
            .with_long_title(ComplicationText::Placeholder),
        _ => ComplicationData::new(complication_types::ContentKind::NoPermission)
            .with_short_text(text()),
    }
}

proptest! {
    /// Progress always lands in [0, 1], whatever the inputs.
    #[test]
    fn progress_is_a_fraction(value in any::<f32>(), min in any::<f32>(), max in any::<f32>()) {
        let p = progress(value, min, max);
        prop_assert!((0.0..=1.0).contains(&p), "progress({}, {}, {}) = {}", value, min, max, p);
    }

    /// Arcs plus both gaps cover the full circle unless a sweep was clamped to zero.
    #[test]
    fn arcs_cover_the_circle(value in 0.0f32..=100.0, gap in 0.0f64..20.0) {
        let arcs = RangedArcs::compute(&RangedValue::new(value, 0.0, 100.0), -90.0, gap);
        let p = arcs.progress;
        prop_assume!(360.0 * p >= arcs.gap && 360.0 * (1.0 - p) >= arcs.gap);
        let total = arcs.in_progress_sweep + arcs.remaining_sweep + 2.0 * arcs.gap;
        prop_assert!((total - 360.0).abs() < 1e-6, "total sweep {}", total);
        prop_assert!(arcs.in_progress_sweep >= 0.0 && arcs.remaining_sweep >= 0.0);
    }

    /// Every element sits inside the inner bounds, which sit inside the background.
    #[test]
    fn elements_stay_inside_inner_bounds(
        kind in 0usize..10,
        width in 1i32..400,
        height in 1i32..400,
        radius_fraction in 0.0f64..=1.0,
        hidden in any::<bool>(),
    ) {
        let data = sample_content(kind);
        let corner_radius = (width.min(height) as f64 / 2.0 * radius_fraction) as i32;
        let geometry = LayoutGeometry::compute(&LayoutInput {
            data: &data,
            width,
            height,
            ranged_value_progress_hidden: hidden,
            corner_radius,
            compensation: 1.0,
        });

        prop_assert!(geometry.background.contains(&geometry.inner_bounds)
            || geometry.inner_bounds.is_empty());
        let elements = [
            geometry.icon,
            geometry.small_image,
            geometry.large_image,
            geometry.main_text,
            geometry.sub_text,
            geometry.ranged_value,
        ];
        for rect in elements.iter().filter(|rect| !rect.is_empty()) {
            prop_assert!(
                geometry.inner_bounds.contains(rect),
                "{:?} escapes inner bounds {:?}", rect, geometry.inner_bounds
            );
        }
    }
}
