//! Pango text layout for the Cairo backend
//!
//! Text goes through Pango rather than Cairo's toy font API, which keeps
//! font resources managed by fontconfig and gives us wrapping, ellipsizing
//! and alignment for free. Font descriptions are cached per thread.

use std::cell::RefCell;
use std::collections::HashMap;

use cairo::Context;
use pango::{Alignment, EllipsizeMode, FontDescription, Layout, WrapMode};
use pangocairo::functions::{create_layout, show_layout};

use crate::canvas::{TextAlignment, TextExtent, TextPaint};

/// Cache for FontDescription objects to avoid repeated allocations
struct FontDescriptionCache {
    cache: HashMap<FontKey, FontDescription>,
    max_entries: usize,
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
struct FontKey {
    family: String,
    size_pango: i32, // Absolute size in Pango units (pixels * PANGO_SCALE)
}

impl FontDescriptionCache {
    fn new() -> Self {
        Self {
            cache: HashMap::new(),
            max_entries: 32,
        }
    }

    fn get_or_create(&mut self, family: &str, size: f64) -> FontDescription {
        let size_pango = (size * pango::SCALE as f64) as i32;
        let key = FontKey {
            family: family.to_string(),
            size_pango,
        };

        if let Some(desc) = self.cache.get(&key) {
            return desc.clone();
        }

        // Evict if full (simple eviction - just clear half)
        if self.cache.len() >= self.max_entries {
            let keys_to_remove: Vec<_> = self
                .cache
                .keys()
                .take(self.max_entries / 2)
                .cloned()
                .collect();
            for k in keys_to_remove {
                self.cache.remove(&k);
            }
        }

        let mut desc = FontDescription::new();
        desc.set_family(family);
        desc.set_absolute_size(size_pango as f64);

        self.cache.insert(key, desc.clone());
        desc
    }
}

thread_local! {
    static FONT_DESC_CACHE: RefCell<FontDescriptionCache> =
        RefCell::new(FontDescriptionCache::new());
}

/// Clear the font cache of the current thread
pub fn clear_pango_caches() {
    FONT_DESC_CACHE.with(|cache| cache.borrow_mut().cache.clear());
    log::debug!("Pango font cache cleared");
}

/// Build a layout wrapped to `max_width` and capped at `max_lines`, ellipsizing the rest
fn text_layout(
    cr: &Context,
    text: &str,
    paint: &TextPaint,
    max_width: f64,
    max_lines: u32,
    alignment: TextAlignment,
) -> Layout {
    let font_desc = FONT_DESC_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_create(&paint.font_family, paint.size)
    });

    let layout = create_layout(cr);
    layout.set_font_description(Some(&font_desc));
    layout.set_width((max_width.max(0.0) * pango::SCALE as f64) as i32);
    layout.set_wrap(WrapMode::WordChar);
    layout.set_ellipsize(EllipsizeMode::End);
    // Negative height limits the number of lines
    layout.set_height(-(max_lines.max(1) as i32));
    layout.set_alignment(match alignment {
        TextAlignment::Start => Alignment::Left,
        TextAlignment::Center => Alignment::Center,
    });
    layout.set_text(text);
    layout
}

pub fn measure_text(
    cr: &Context,
    text: &str,
    paint: &TextPaint,
    max_width: f64,
    max_lines: u32,
) -> TextExtent {
    let layout = text_layout(cr, text, paint, max_width, max_lines, TextAlignment::Start);
    let (width, height) = layout.pixel_size();
    TextExtent {
        width: width as f64,
        height: height as f64,
        line_count: layout.line_count().max(0) as u32,
    }
}

/// Show text with its layout box's top-left at (x, y)
pub fn show_text_block(
    cr: &Context,
    x: f64,
    y: f64,
    text: &str,
    paint: &TextPaint,
    max_width: f64,
    max_lines: u32,
    alignment: TextAlignment,
) {
    let layout = text_layout(cr, text, paint, max_width, max_lines, alignment);
    paint.color.apply_to_cairo(cr);
    cr.move_to(x, y);
    show_layout(cr, &layout);
}
