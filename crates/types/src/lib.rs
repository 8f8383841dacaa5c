//! complication-types: Shared data types for watch-face complication rendering.
//!
//! This crate contains pure data types (content snapshots, styles, geometry,
//! colors) shared by the renderer and its hosts. They have no drawing
//! backend dependencies, making them suitable as a foundation layer.

pub mod color;
pub mod content;
pub mod geometry;
pub mod style;

// Re-export commonly used types at the crate root for convenience
pub use color::Color;
pub use content::{
    ActivityWindow, ComplicationData, ComplicationText, ContentKind, ImageHandle, ImageStyle,
    PlaceholderFlags, PlaceholderKind, RangedValue, TimeDifferenceStyle,
};
pub use geometry::{Rect, RectF};
pub use style::{BorderStyle, ComplicationStyle, RendererConfig};
