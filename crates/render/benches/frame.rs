//! Criterion benchmarks for per-frame work.
//!
//! Run: cargo bench -p complication-render --bench frame
//!
//!   draw_cached_*   steady-state frame with layout and text metrics reused
//!   relayout_*      bounds changing every frame

use std::hint::black_box;

use chrono::{TimeZone, Utc};
use complication_render::mocks::RecordingCanvas;
use complication_render::ComplicationRenderer;
use complication_types::{ComplicationData, ComplicationStyle, ComplicationText, Rect};
use criterion::{criterion_group, criterion_main, Criterion};

fn renderer_with(data: ComplicationData) -> ComplicationRenderer {
    let mut renderer =
        ComplicationRenderer::new(ComplicationStyle::default(), ComplicationStyle::default());
    renderer.set_bounds(Rect::from_size(120, 120));
    renderer.set_content(Some(data), false);
    renderer
}

fn bench_draw(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let contents = [
        (
            "short_text",
            ComplicationData::short_text(ComplicationText::plain("72"))
                .with_short_title(ComplicationText::plain("bpm")),
        ),
        (
            "ranged",
            ComplicationData::ranged_value(64.0, 0.0, 100.0)
                .with_short_text(ComplicationText::plain("64%")),
        ),
        (
            "long_text",
            ComplicationData::long_text(ComplicationText::plain(
                "Team sync in the large meeting room",
            )),
        ),
    ];

    for (name, data) in contents {
        let mut renderer = renderer_with(data);
        let mut canvas = RecordingCanvas::new();
        c.bench_function(&format!("draw_cached_{}", name), |b| {
            b.iter(|| {
                canvas.clear();
                black_box(renderer.draw(&mut canvas, now, false, false, false, false))
            })
        });
    }
}

fn bench_relayout(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let mut renderer = renderer_with(
        ComplicationData::short_text(ComplicationText::plain("12"))
            .with_short_title(ComplicationText::plain("km")),
    );
    let mut canvas = RecordingCanvas::new();
    let mut size = 80;
    c.bench_function("relayout_short_text", |b| {
        b.iter(|| {
            size = if size >= 160 { 80 } else { size + 1 };
            renderer.set_bounds(Rect::from_size(size, size));
            canvas.clear();
            black_box(renderer.draw(&mut canvas, now, false, false, false, false))
        })
    });
}

criterion_group!(benches, bench_draw, bench_relayout);
criterion_main!(benches);
