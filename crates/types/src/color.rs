//! Foundational color type used by styles and paints.

use serde::{Deserialize, Serialize};

/// RGBA color with alpha channel, components in 0.0..=1.0
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    /// Equivalent of 0xFF444444
    pub const DARK_GRAY: Color = Color::new(
        0.266_666_666_666_666_66,
        0.266_666_666_666_666_66,
        0.266_666_666_666_666_66,
        1.0,
    );
    /// Equivalent of 0xFFCCCCCC
    pub const LIGHT_GRAY: Color = Color::new(0.8, 0.8, 0.8, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a as f64 / 255.0,
        }
    }

    pub fn to_rgba8(&self) -> (u8, u8, u8, u8) {
        (
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        )
    }

    /// Relative luminance (Rec. 709 weights)
    pub fn luminance(&self) -> f64 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    /// Recolor towards `tint`, keeping this color's brightness and alpha.
    ///
    /// Black stays black and white becomes the tint itself, so contrast
    /// between foreground and background survives the recolor.
    pub fn tinted(&self, tint: Color) -> Color {
        let l = self.luminance().clamp(0.0, 1.0);
        Color {
            r: tint.r * l,
            g: tint.g * l,
            b: tint.b * l,
            a: self.a,
        }
    }

    pub fn with_alpha(&self, a: f64) -> Color {
        Color { a, ..*self }
    }

    /// Apply to Cairo context
    #[cfg(feature = "cairo")]
    pub fn apply_to_cairo(&self, cr: &cairo::Context) {
        cr.set_source_rgba(self.r, self.g, self.b, self.a);
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tint_keeps_black_and_alpha() {
        let tint = Color::DARK_GRAY;
        assert_eq!(Color::BLACK.tinted(tint), Color::new(0.0, 0.0, 0.0, 1.0));

        let half = Color::new(1.0, 1.0, 1.0, 0.5).tinted(tint);
        assert!((half.r - tint.r).abs() < 1e-9);
        assert_eq!(half.a, 0.5);
    }

    #[test]
    fn test_rgba8_roundtrip() {
        let c = Color::from_rgba8(10, 200, 30, 255);
        assert_eq!(c.to_rgba8(), (10, 200, 30, 255));
    }
}
