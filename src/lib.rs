//! watchface-complications: preview tooling for complication rendering
//!
//! The layout and drawing engine lives in `complication-render`; this crate
//! adds the JSON preview configuration and, with the `cairo` feature, a PNG
//! image loader and an offscreen preview renderer.

pub mod config;
#[cfg(feature = "cairo")]
pub mod loader;
#[cfg(feature = "cairo")]
pub mod preview;

// Re-export commonly used types
pub use complication_render as render;
pub use complication_types as types;
pub use config::{PreviewConfig, SlotConfig};
