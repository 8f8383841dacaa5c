//! `Canvas` implementation on top of a Cairo context.
//!
//! Decoded images are converted to Cairo surfaces once and kept in a
//! thread-local cache keyed by pixel buffer identity (Cairo objects are not
//! thread-safe).

use std::cell::RefCell;
use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, PI};
use std::time::Instant;

use anyhow::{Context as _, Result};
use cairo::{Antialias, Context, Format, ImageSurface};
use complication_types::{Rect, RectF};

use crate::canvas::{
    Canvas, ColorFilter, ImageData, Paint, PaintStyle, TextAlignment, TextExtent, TextPaint,
};
use crate::pango_text;

/// Convert straight-alpha RGBA to a premultiplied ARGB32 surface
pub fn surface_from_image(image: &ImageData) -> Result<ImageSurface> {
    let width = image.width() as i32;
    let height = image.height() as i32;
    let stride = Format::ARgb32
        .stride_for_width(image.width())
        .context("Image too wide for a Cairo surface")? as usize;

    let mut data = vec![0u8; stride * image.height() as usize];
    for (y, row) in image.pixels().chunks_exact(image.width() as usize * 4).enumerate() {
        let out = &mut data[y * stride..y * stride + row.len()];
        for (src, dst) in row.chunks_exact(4).zip(out.chunks_exact_mut(4)) {
            let a = src[3] as u32;
            let premultiply = |c: u8| ((c as u32 * a + 127) / 255) as u8;
            let argb = u32::from_be_bytes([
                src[3],
                premultiply(src[0]),
                premultiply(src[1]),
                premultiply(src[2]),
            ]);
            dst.copy_from_slice(&argb.to_ne_bytes());
        }
    }

    ImageSurface::create_for_data(data, Format::ARgb32, width, height, stride as i32)
        .context("Failed to create image surface")
}

/// Read a Cairo image surface back into straight-alpha RGBA
pub fn image_from_surface(surface: &mut ImageSurface) -> Result<ImageData> {
    surface.flush();
    let width = surface.width().max(0) as usize;
    let height = surface.height().max(0) as usize;
    let stride = surface.stride().max(0) as usize;
    let has_alpha = surface.format() == Format::ARgb32;
    let data = surface.data().context("Image surface is still borrowed")?;

    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        let row = &data[y * stride..y * stride + width * 4];
        for px in row.chunks_exact(4) {
            let [a, r, g, b] = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]).to_be_bytes();
            let a = if has_alpha { a } else { 255 };
            let unpremultiply = |c: u8| {
                if a == 0 {
                    0
                } else {
                    ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8
                }
            };
            pixels.extend_from_slice(&[unpremultiply(r), unpremultiply(g), unpremultiply(b), a]);
        }
    }

    ImageData::from_rgba(width as u32, height as u32, pixels)
        .context("Surface size does not match its data")
}

// Thread-local surface cache (Cairo surfaces aren't thread-safe)
thread_local! {
    static SURFACE_CACHE: RefCell<SurfaceCache> = RefCell::new(SurfaceCache::new());
}

/// Get or create the surface for an image
fn get_cached_surface(image: &ImageData) -> Option<ImageSurface> {
    SURFACE_CACHE.with(|cache| cache.borrow_mut().get_or_create(image))
}

/// Cache of converted image surfaces
struct SurfaceCache {
    cache: HashMap<usize, SurfaceEntry>,
    max_entries: usize,
}

struct SurfaceEntry {
    /// Keeps the pixel buffer alive so its address cannot be reused by another image
    image: ImageData,
    surface: ImageSurface,
    last_access: Instant,
}

impl SurfaceCache {
    fn new() -> Self {
        Self {
            cache: HashMap::new(),
            max_entries: 16,
        }
    }

    fn get_or_create(&mut self, image: &ImageData) -> Option<ImageSurface> {
        if let Some(entry) = self.cache.get_mut(&image.id()) {
            if entry.image.same_image(image) {
                entry.last_access = Instant::now();
                return Some(entry.surface.clone());
            }
        }

        let surface = match surface_from_image(image) {
            Ok(surface) => surface,
            Err(e) => {
                log::warn!("Skipping image: {:#}", e);
                return None;
            }
        };

        // Evict LRU if full
        if self.cache.len() >= self.max_entries {
            if let Some(oldest_key) = self
                .cache
                .iter()
                .min_by_key(|(_, e)| e.last_access)
                .map(|(k, _)| *k)
            {
                self.cache.remove(&oldest_key);
            }
        }

        self.cache.insert(
            image.id(),
            SurfaceEntry {
                image: image.clone(),
                surface: surface.clone(),
                last_access: Instant::now(),
            },
        );
        Some(surface)
    }
}

/// Add a rounded rectangle path with elliptical corners
fn rounded_rectangle(cr: &Context, rect: RectF, rx: f64, ry: f64) {
    let rx = rx.clamp(0.0, rect.width() / 2.0);
    let ry = ry.clamp(0.0, rect.height() / 2.0);
    if rx <= 0.0 || ry <= 0.0 {
        cr.rectangle(rect.left, rect.top, rect.width(), rect.height());
        return;
    }

    let corners = [
        (rect.right - rx, rect.top + ry, -FRAC_PI_2, 0.0),
        (rect.right - rx, rect.bottom - ry, 0.0, FRAC_PI_2),
        (rect.left + rx, rect.bottom - ry, FRAC_PI_2, PI),
        (rect.left + rx, rect.top + ry, PI, 3.0 * FRAC_PI_2),
    ];
    cr.new_sub_path();
    for (cx, cy, start, end) in corners {
        let matrix = cr.matrix();
        cr.translate(cx, cy);
        cr.scale(rx, ry);
        cr.arc(0.0, 0.0, 1.0, start, end);
        cr.set_matrix(matrix);
    }
    cr.close_path();
}

pub struct CairoCanvas {
    cr: Context,
}

impl CairoCanvas {
    pub fn new(cr: Context) -> Self {
        Self { cr }
    }

    pub fn context(&self) -> &Context {
        &self.cr
    }

    fn apply_paint(&self, paint: &Paint) {
        paint.color.apply_to_cairo(&self.cr);
        self.cr.set_antialias(if paint.anti_alias {
            Antialias::Default
        } else {
            Antialias::None
        });
        self.cr.set_line_width(paint.stroke_width);
        match paint.dash {
            Some((on, off)) => self.cr.set_dash(&[on, off], 0.0),
            None => self.cr.set_dash(&[], 0.0),
        }
    }

    fn finish_path(&self, paint: &Paint) {
        let result = match paint.style {
            PaintStyle::Fill => self.cr.fill(),
            PaintStyle::Stroke => self.cr.stroke(),
        };
        if let Err(e) = result {
            log::warn!("Cairo drawing failed: {}", e);
        }
    }
}

impl Canvas for CairoCanvas {
    fn save(&mut self) {
        if let Err(e) = self.cr.save() {
            log::warn!("Cairo save failed: {}", e);
        }
    }

    fn restore(&mut self) {
        if let Err(e) = self.cr.restore() {
            log::warn!("Cairo restore failed: {}", e);
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.cr.translate(dx, dy);
    }

    fn draw_rect(&mut self, rect: RectF, paint: &Paint) {
        self.apply_paint(paint);
        self.cr
            .rectangle(rect.left, rect.top, rect.width(), rect.height());
        self.finish_path(paint);
    }

    fn draw_round_rect(&mut self, rect: RectF, rx: f64, ry: f64, paint: &Paint) {
        self.apply_paint(paint);
        rounded_rectangle(&self.cr, rect, rx, ry);
        self.finish_path(paint);
    }

    fn draw_arc(&mut self, oval: RectF, start_angle: f64, sweep_angle: f64, paint: &Paint) {
        if oval.is_empty() {
            return;
        }
        self.apply_paint(paint);
        let start = start_angle.to_radians();
        let end = (start_angle + sweep_angle).to_radians();

        self.cr.new_sub_path();
        let matrix = self.cr.matrix();
        self.cr.translate(oval.center_x(), oval.center_y());
        self.cr.scale(oval.width() / 2.0, oval.height() / 2.0);
        self.cr.arc(0.0, 0.0, 1.0, start, end);
        // Stroke in unscaled space so the line width stays uniform
        self.cr.set_matrix(matrix);
        self.finish_path(paint);
    }

    fn draw_image(
        &mut self,
        image: &ImageData,
        dest: Rect,
        corner_radius: f64,
        filter: Option<ColorFilter>,
    ) {
        if dest.is_empty() || image.width() == 0 || image.height() == 0 {
            return;
        }
        let Some(surface) = get_cached_surface(image) else {
            return;
        };

        self.save();
        let dest_f = dest.to_f();
        if corner_radius > 0.0 {
            rounded_rectangle(&self.cr, dest_f, corner_radius, corner_radius);
            self.cr.clip();
        }
        self.cr.translate(dest_f.left, dest_f.top);
        self.cr.scale(
            dest_f.width() / image.width() as f64,
            dest_f.height() / image.height() as f64,
        );

        let result = match filter {
            Some(ColorFilter::Tint(color)) => {
                // SRC_IN: the tint shows through the image's alpha
                color.apply_to_cairo(&self.cr);
                self.cr.mask_surface(&surface, 0.0, 0.0)
            }
            None => self
                .cr
                .set_source_surface(&surface, 0.0, 0.0)
                .and_then(|_| self.cr.paint()),
        };
        if let Err(e) = result {
            log::warn!("Failed to draw image: {}", e);
        }
        self.restore();
    }

    fn measure_text(
        &mut self,
        text: &str,
        paint: &TextPaint,
        max_width: f64,
        max_lines: u32,
    ) -> TextExtent {
        pango_text::measure_text(&self.cr, text, paint, max_width, max_lines)
    }

    fn draw_text(
        &mut self,
        text: &str,
        paint: &TextPaint,
        rect: RectF,
        max_lines: u32,
        alignment: TextAlignment,
    ) {
        self.cr.set_antialias(if paint.anti_alias {
            Antialias::Default
        } else {
            Antialias::None
        });
        pango_text::show_text_block(
            &self.cr,
            rect.left,
            rect.top,
            text,
            paint,
            rect.width(),
            max_lines,
            alignment,
        );
    }
}
