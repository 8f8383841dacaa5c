//! complication-render: layout and drawing of watch-face complications.
//!
//! Drawing goes through the `Canvas` trait. The Cairo backend lives behind
//! the `cairo` feature; `mocks::RecordingCanvas` records calls for tests.

pub mod canvas;
pub mod composer;
pub mod drawable;
pub mod images;
pub mod layout;
pub mod mocks;
pub mod paint_set;
pub mod ranged_value;
pub mod renderer;
pub mod text_renderer;

#[cfg(feature = "cairo")]
pub mod cairo_canvas;
#[cfg(feature = "cairo")]
pub mod pango_text;

pub use canvas::{
    Canvas, ColorFilter, Gravity, ImageData, Paint, PaintStyle, TextAlignment, TextExtent,
    TextPaint,
};
pub use composer::{image_corner_radius, FrameState, IdleReason};
pub use drawable::{ComplicationDrawable, DrawMode, RenderParameters, SlotBoundsType, WatchState};
pub use images::{
    ImageCallback, ImageLoader, ImageResolver, ImageSlot, ImageSlots, InvalidateListener,
    Invalidator, LoadMode,
};
pub use layout::{LayoutGeometry, LayoutInput, LayoutStrategyKind};
pub use paint_set::{PaintSet, PaintSetManager};
pub use renderer::ComplicationRenderer;
pub use text_renderer::{RelativePadding, TextRenderer};

#[cfg(feature = "cairo")]
pub use cairo_canvas::{image_from_surface, surface_from_image, CairoCanvas};
#[cfg(feature = "cairo")]
pub use pango_text::clear_pango_caches;
