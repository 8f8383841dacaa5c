//! Preview configuration: a canvas plus the complication slots drawn on it

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use complication_types::{
    Color, ComplicationData, ComplicationStyle, ComplicationText, ImageHandle, Rect,
    RendererConfig,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current config format version
pub const CONFIG_VERSION: u32 = 1;

/// Everything needed to render one preview frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewConfig {
    /// Version of the config format
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub canvas: CanvasConfig,
    /// Device display capabilities
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub active_style: ComplicationStyle,
    #[serde(default = "default_ambient_style")]
    pub ambient_style: ComplicationStyle,
    /// Shown for NoData content without a placeholder
    #[serde(default)]
    pub no_data_text: Option<String>,
    /// Directory for `resource` image handles and relative file paths.
    /// Relative to the config file when loaded from disk.
    #[serde(default)]
    pub image_dir: Option<PathBuf>,
    #[serde(default)]
    pub slots: Vec<SlotConfig>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_ambient_style() -> ComplicationStyle {
    ComplicationStyle {
        text_color: Color::LIGHT_GRAY,
        title_color: Color::LIGHT_GRAY,
        icon_color: Color::LIGHT_GRAY,
        ranged_value_primary_color: Color::LIGHT_GRAY,
        ranged_value_secondary_color: Color::DARK_GRAY,
        border_color: Color::DARK_GRAY,
        ..ComplicationStyle::default()
    }
}

/// Output surface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_size")]
    pub width: i32,
    #[serde(default = "default_canvas_size")]
    pub height: i32,
    #[serde(default = "default_canvas_background")]
    pub background: Color,
}

fn default_canvas_size() -> i32 {
    450
}

fn default_canvas_background() -> Color {
    Color::BLACK
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_size(),
            height: default_canvas_size(),
            background: default_canvas_background(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchConfig {
    #[serde(default)]
    pub low_bit_ambient: bool,
    #[serde(default)]
    pub burn_in_protection: bool,
}

/// One complication slot on the canvas
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotConfig {
    pub id: String,
    pub bounds: Rect,
    #[serde(default)]
    pub content: Option<ComplicationData>,
    /// Last tap on this slot, for the tap highlight
    #[serde(default)]
    pub last_tap: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ranged_value_progress_hidden: bool,
}

impl SlotConfig {
    pub fn new(id: impl Into<String>, bounds: Rect, content: ComplicationData) -> Self {
        Self {
            id: id.into(),
            bounds,
            content: Some(content),
            last_tap: None,
            ranged_value_progress_hidden: false,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            canvas: CanvasConfig::default(),
            watch: WatchConfig::default(),
            renderer: RendererConfig::default(),
            active_style: ComplicationStyle::default(),
            ambient_style: default_ambient_style(),
            no_data_text: None,
            image_dir: None,
            slots: vec![
                SlotConfig::new(
                    "top",
                    Rect::new(165, 60, 285, 120),
                    ComplicationData::short_text(ComplicationText::plain("72"))
                        .with_short_title(ComplicationText::plain("bpm")),
                ),
                SlotConfig::new(
                    "left",
                    Rect::new(60, 175, 160, 275),
                    ComplicationData::ranged_value(64.0, 0.0, 100.0)
                        .with_short_text(ComplicationText::plain("64%")),
                ),
                SlotConfig::new(
                    "right",
                    Rect::new(290, 175, 390, 275),
                    ComplicationData::icon(ImageHandle::resource("weather")),
                ),
                SlotConfig::new(
                    "bottom",
                    Rect::new(75, 320, 375, 380),
                    ComplicationData::long_text(ComplicationText::plain(
                        "Team sync in the large meeting room",
                    ))
                    .with_long_title(ComplicationText::plain("10:30")),
                ),
            ],
        }
    }
}

impl PreviewConfig {
    /// Load configuration from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            log::info!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path()?)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("org", "watchface", "complication-preview")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("preview.json"))
    }

    /// Load configuration from a specific file path.
    ///
    /// A relative `image_dir` is resolved against the file's directory; when
    /// absent, that directory itself is used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if config.version > CONFIG_VERSION {
            log::warn!(
                "Config version {} is newer than supported version {}",
                config.version,
                CONFIG_VERSION
            );
        }

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.image_dir = Some(match config.image_dir.take() {
            Some(dir) if dir.is_relative() => base.join(dir),
            Some(dir) => dir,
            None => base.to_path_buf(),
        });
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Slots that would draw nothing because their bounds leave the canvas
    pub fn slots_outside_canvas(&self) -> Vec<&str> {
        let canvas = Rect::from_size(self.canvas.width, self.canvas.height);
        self.slots
            .iter()
            .filter(|slot| !canvas.contains(&slot.bounds))
            .map(|slot| slot.id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use complication_types::ContentKind;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preview.json");

        let config = PreviewConfig::default();
        config.save_to_path(&path).unwrap();
        let loaded = PreviewConfig::load_from_path(&path).unwrap();

        assert_eq!(loaded.slots, config.slots);
        assert_eq!(loaded.active_style, config.active_style);
        assert_eq!(loaded.image_dir.as_deref(), path.parent());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.json");
        std::fs::write(
            &path,
            r#"{
                "canvas": { "width": 200 },
                "image_dir": "icons",
                "slots": [
                    {
                        "id": "only",
                        "bounds": { "left": 10, "top": 10, "right": 90, "bottom": 50 },
                        "content": {
                            "kind": { "type": "short_text" },
                            "short_text": { "type": "plain", "text": "5" }
                        }
                    }
                ]
            }"#,
        )
        .unwrap();

        let config = PreviewConfig::load_from_path(&path).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.canvas.width, 200);
        assert_eq!(config.canvas.height, 450);
        assert_eq!(config.image_dir, Some(dir.path().join("icons")));
        assert_eq!(config.slots.len(), 1);
        let content = config.slots[0].content.as_ref().unwrap();
        assert_eq!(content.kind, ContentKind::ShortText);
        assert_eq!(content.short_text, Some(ComplicationText::plain("5")));
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = PreviewConfig::load_from_path(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
    }

    #[test]
    fn test_default_slots_fit_canvas() {
        let mut config = PreviewConfig::default();
        assert!(config.slots_outside_canvas().is_empty());
        config.canvas.width = 300;
        assert_eq!(config.slots_outside_canvas(), vec!["right", "bottom"]);
    }
}
