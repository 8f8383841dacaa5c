//! Visual style of a complication and the renderer's tunables.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Border drawing style
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BorderStyle {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "solid")]
    #[default]
    Solid,
    #[serde(rename = "dashed")]
    Dashed,
}

/// Style for one display mode (active or ambient)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplicationStyle {
    #[serde(default = "default_background_color")]
    pub background_color: Color,

    // Border
    #[serde(default)]
    pub border_style: BorderStyle,
    #[serde(default = "default_border_color")]
    pub border_color: Color,
    #[serde(default = "default_border_width")]
    pub border_width: f64,
    /// Corner radius in pixels; clamped to half the shorter side when drawn
    #[serde(default = "default_border_radius")]
    pub border_radius: i32,
    #[serde(default = "default_dash")]
    pub border_dash_width: f64,
    #[serde(default = "default_dash")]
    pub border_dash_gap: f64,

    // Text
    #[serde(default = "default_text_color")]
    pub text_color: Color,
    #[serde(default = "default_title_color")]
    pub title_color: Color,
    #[serde(default = "default_text_size")]
    pub text_size: f64,
    #[serde(default = "default_title_size")]
    pub title_size: f64,
    #[serde(default = "default_font")]
    pub text_font: String,
    #[serde(default = "default_font")]
    pub title_font: String,

    // Images
    #[serde(default = "default_icon_color")]
    pub icon_color: Color,
    /// SRC_IN tint applied to photo-style images, none by default
    #[serde(default)]
    pub image_color_filter: Option<Color>,

    // Ranged value
    #[serde(default = "default_ranged_primary")]
    pub ranged_value_primary_color: Color,
    #[serde(default = "default_ranged_secondary")]
    pub ranged_value_secondary_color: Color,
    #[serde(default = "default_ring_width")]
    pub ranged_value_ring_width: f64,

    #[serde(default = "default_highlight_color")]
    pub highlight_color: Color,
}

fn default_background_color() -> Color {
    Color::BLACK
}

fn default_border_color() -> Color {
    Color::WHITE
}

fn default_border_width() -> f64 {
    1.0
}

fn default_border_radius() -> i32 {
    i32::MAX // Fully rounded
}

fn default_dash() -> f64 {
    3.0
}

fn default_text_color() -> Color {
    Color::WHITE
}

fn default_title_color() -> Color {
    Color::LIGHT_GRAY
}

fn default_text_size() -> f64 {
    16.0
}

fn default_title_size() -> f64 {
    14.0
}

fn default_font() -> String {
    "Sans".to_string()
}

fn default_icon_color() -> Color {
    Color::WHITE
}

fn default_ranged_primary() -> Color {
    Color::WHITE
}

fn default_ranged_secondary() -> Color {
    Color::LIGHT_GRAY
}

fn default_ring_width() -> f64 {
    2.0
}

fn default_highlight_color() -> Color {
    Color::new(1.0, 1.0, 1.0, 0.33)
}

impl Default for ComplicationStyle {
    fn default() -> Self {
        Self {
            background_color: default_background_color(),
            border_style: BorderStyle::default(),
            border_color: default_border_color(),
            border_width: default_border_width(),
            border_radius: default_border_radius(),
            border_dash_width: default_dash(),
            border_dash_gap: default_dash(),
            text_color: default_text_color(),
            title_color: default_title_color(),
            text_size: default_text_size(),
            title_size: default_title_size(),
            text_font: default_font(),
            title_font: default_font(),
            icon_color: default_icon_color(),
            image_color_filter: None,
            ranged_value_primary_color: default_ranged_primary(),
            ranged_value_secondary_color: default_ranged_secondary(),
            ranged_value_ring_width: default_ring_width(),
            highlight_color: default_highlight_color(),
        }
    }
}

impl ComplicationStyle {
    /// Copy of this style with every color recolored towards `tint`
    pub fn tinted(&self, tint: Color) -> ComplicationStyle {
        ComplicationStyle {
            background_color: self.background_color.tinted(tint),
            border_color: self.border_color.tinted(tint),
            text_color: self.text_color.tinted(tint),
            title_color: self.title_color.tinted(tint),
            icon_color: self.icon_color.tinted(tint),
            image_color_filter: Some(self.image_color_filter.unwrap_or(Color::WHITE).tinted(tint)),
            ranged_value_primary_color: self.ranged_value_primary_color.tinted(tint),
            ranged_value_secondary_color: self.ranged_value_secondary_color.tinted(tint),
            highlight_color: self.highlight_color.tinted(tint),
            ..self.clone()
        }
    }

    /// Corner radius clamped to half the shorter side of a `width` x `height` box
    pub fn clamped_border_radius(&self, width: i32, height: i32) -> i32 {
        if width <= 0 || height <= 0 {
            return 0;
        }
        (width.min(height) / 2).min(self.border_radius.max(0))
    }
}

/// Renderer tunables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RendererConfig {
    /// Divisor applied to the inner-bounds inset; 1.0 keeps the geometric inset
    #[serde(default = "default_compensation")]
    pub inner_bounds_compensation: f64,
    /// Tint of the style drawn when the tap action was lost
    #[serde(default = "default_tap_action_lost_tint")]
    pub tap_action_lost_tint: Color,
    /// Color of synthesized placeholder blocks
    #[serde(default = "default_placeholder_color")]
    pub placeholder_color: Color,
    /// Start of the ranged-value arcs in degrees (0 = 3 o'clock, clockwise)
    #[serde(default = "default_start_angle")]
    pub ranged_start_angle: f64,
    /// Gap between the two ranged-value arcs in degrees
    #[serde(default = "default_gap")]
    pub ranged_gap_degrees: f64,
    /// How long a tap keeps the complication highlighted
    #[serde(default = "default_highlight_duration")]
    pub highlight_duration_ms: i64,
    #[serde(default = "default_highlight_expansion")]
    pub highlight_expansion: f64,
    #[serde(default = "default_highlight_stroke")]
    pub highlight_stroke_width: f64,
}

fn default_compensation() -> f64 {
    1.0
}

fn default_tap_action_lost_tint() -> Color {
    Color::DARK_GRAY
}

fn default_placeholder_color() -> Color {
    Color::LIGHT_GRAY
}

fn default_start_angle() -> f64 {
    -90.0 // 12 o'clock
}

fn default_gap() -> f64 {
    4.0
}

fn default_highlight_duration() -> i64 {
    300
}

fn default_highlight_expansion() -> f64 {
    6.0
}

fn default_highlight_stroke() -> f64 {
    3.0
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            inner_bounds_compensation: default_compensation(),
            tap_action_lost_tint: default_tap_action_lost_tint(),
            placeholder_color: default_placeholder_color(),
            ranged_start_angle: default_start_angle(),
            ranged_gap_degrees: default_gap(),
            highlight_duration_ms: default_highlight_duration(),
            highlight_expansion: default_highlight_expansion(),
            highlight_stroke_width: default_highlight_stroke(),
        }
    }
}

impl RendererConfig {
    /// Compensation divisor, falling back to 1.0 when not strictly positive
    pub fn compensation(&self) -> f64 {
        if self.inner_bounds_compensation.is_finite() && self.inner_bounds_compensation > 0.0 {
            self.inner_bounds_compensation
        } else {
            1.0
        }
    }
}
