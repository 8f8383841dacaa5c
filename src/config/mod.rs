//! Configuration management

mod settings;

pub use settings::{CanvasConfig, PreviewConfig, SlotConfig, WatchConfig, CONFIG_VERSION};
