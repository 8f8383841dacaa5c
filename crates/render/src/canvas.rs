//! Drawing seam between the complication pipeline and a 2D backend.
//!
//! The pipeline only ever talks to a `Canvas`. Text shaping, line breaking
//! and image rasterization belong to the backend; the pipeline decides
//! where things go and with which paint.

use std::fmt;
use std::sync::Arc;

use complication_types::{Color, Rect, RectF};

/// Fill or stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaintStyle {
    #[default]
    Fill,
    Stroke,
}

/// Immutable paint description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color,
    pub style: PaintStyle,
    pub stroke_width: f64,
    pub anti_alias: bool,
    /// (dash length, gap length) for dashed strokes
    pub dash: Option<(f64, f64)>,
}

impl Paint {
    pub fn fill(color: Color) -> Self {
        Self {
            color,
            style: PaintStyle::Fill,
            stroke_width: 0.0,
            anti_alias: true,
            dash: None,
        }
    }

    pub fn stroke(color: Color, width: f64) -> Self {
        Self {
            color,
            style: PaintStyle::Stroke,
            stroke_width: width,
            anti_alias: true,
            dash: None,
        }
    }

    pub fn with_anti_alias(self, anti_alias: bool) -> Self {
        Self { anti_alias, ..self }
    }

    pub fn with_dash(self, dash: Option<(f64, f64)>) -> Self {
        Self { dash, ..self }
    }
}

/// Paint for text
#[derive(Debug, Clone, PartialEq)]
pub struct TextPaint {
    pub color: Color,
    pub size: f64,
    pub font_family: String,
    pub anti_alias: bool,
}

impl Default for TextPaint {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            size: 16.0,
            font_family: "Sans".to_string(),
            anti_alias: true,
        }
    }
}

/// Color filter applied when drawing an image
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorFilter {
    /// Keep the image's alpha, replace its color (Porter-Duff SRC_IN)
    Tint(Color),
}

/// Horizontal text alignment inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextAlignment {
    Start,
    #[default]
    Center,
}

/// Vertical placement of a text block inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gravity {
    Top,
    #[default]
    CenterVertical,
    Bottom,
}

/// Measured size of a laid out text block
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
    pub line_count: u32,
}

/// Decoded image, RGBA8 with straight alpha, shared cheaply by reference
#[derive(Clone)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl ImageData {
    /// Returns None when the buffer does not hold `width * height` RGBA pixels
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if pixels.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels: pixels.into(),
        })
    }

    /// Single-color image, handy for tests and synthesized content
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let (r, g, b, a) = color.to_rgba8();
        let pixels: Vec<u8> = std::iter::repeat([r, g, b, a])
            .take(width as usize * height as usize)
            .flatten()
            .collect();
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Identity of the pixel buffer, stable across clones
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.pixels) as *const u8 as usize
    }

    pub fn same_image(&self, other: &ImageData) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl PartialEq for ImageData {
    fn eq(&self, other: &Self) -> bool {
        self.same_image(other)
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("id", &self.id())
            .finish()
    }
}

/// 2D drawing backend.
///
/// Angles are in degrees, 0 at 3 o'clock, growing clockwise. Implementations
/// must not fail: backend errors are logged and swallowed.
pub trait Canvas {
    fn save(&mut self);

    fn restore(&mut self);

    fn translate(&mut self, dx: f64, dy: f64);

    fn draw_rect(&mut self, rect: RectF, paint: &Paint);

    fn draw_round_rect(&mut self, rect: RectF, rx: f64, ry: f64, paint: &Paint);

    /// Draw an arc of the ellipse inscribed in `oval`
    fn draw_arc(&mut self, oval: RectF, start_angle: f64, sweep_angle: f64, paint: &Paint);

    /// Draw `image` scaled into `dest`, clipped to rounded corners when `corner_radius > 0`
    fn draw_image(
        &mut self,
        image: &ImageData,
        dest: Rect,
        corner_radius: f64,
        filter: Option<ColorFilter>,
    );

    /// Lay out `text` within `max_width`, wrapping to at most `max_lines`
    fn measure_text(
        &mut self,
        text: &str,
        paint: &TextPaint,
        max_width: f64,
        max_lines: u32,
    ) -> TextExtent;

    /// Draw `text` laid out as by `measure_text`, with its block's top-left at `rect`'s
    fn draw_text(
        &mut self,
        text: &str,
        paint: &TextPaint,
        rect: RectF,
        max_lines: u32,
        alignment: TextAlignment,
    );
}
