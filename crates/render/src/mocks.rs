//! Mock implementations for testing
//!
//! `RecordingCanvas` records every draw call instead of rasterizing, and
//! `MockImageLoader` serves images from a map, optionally holding async
//! completions until the test releases them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use complication_types::{Color, ImageHandle, Rect, RectF};

use crate::canvas::{Canvas, ColorFilter, ImageData, Paint, TextAlignment, TextExtent, TextPaint};
use crate::images::{ImageCallback, ImageLoader};

/// One recorded canvas operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Save,
    Restore,
    Translate {
        dx: f64,
        dy: f64,
    },
    Rect {
        rect: RectF,
        paint: Paint,
    },
    RoundRect {
        rect: RectF,
        rx: f64,
        ry: f64,
        paint: Paint,
    },
    Arc {
        oval: RectF,
        start_angle: f64,
        sweep_angle: f64,
        paint: Paint,
    },
    Image {
        dest: Rect,
        corner_radius: f64,
        filter: Option<ColorFilter>,
        image_id: usize,
    },
    Text {
        text: String,
        rect: RectF,
        color: Color,
        max_lines: u32,
        alignment: TextAlignment,
    },
}

impl DrawCall {
    /// Whether this call puts pixels on the canvas
    pub fn is_drawing(&self) -> bool {
        !matches!(
            self,
            DrawCall::Save | DrawCall::Restore | DrawCall::Translate { .. }
        )
    }
}

/// Canvas that records calls.
///
/// Text is measured with a fixed advance per character and wraps greedily at
/// character boundaries, which keeps test expectations simple.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    calls: Vec<DrawCall>,
    measure_count: usize,
    /// Advance per character as a fraction of the font size
    char_width: f64,
    /// Line height as a fraction of the font size
    line_height: f64,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            measure_count: 0,
            char_width: 0.5,
            line_height: 1.2,
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Calls that put pixels on the canvas, in order
    pub fn draw_calls(&self) -> Vec<&DrawCall> {
        self.calls.iter().filter(|call| call.is_drawing()).collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn measure_count(&self) -> usize {
        self.measure_count
    }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.measure_count = 0;
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) {
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.calls.push(DrawCall::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.calls.push(DrawCall::Translate { dx, dy });
    }

    fn draw_rect(&mut self, rect: RectF, paint: &Paint) {
        self.calls.push(DrawCall::Rect {
            rect,
            paint: *paint,
        });
    }

    fn draw_round_rect(&mut self, rect: RectF, rx: f64, ry: f64, paint: &Paint) {
        self.calls.push(DrawCall::RoundRect {
            rect,
            rx,
            ry,
            paint: *paint,
        });
    }

    fn draw_arc(&mut self, oval: RectF, start_angle: f64, sweep_angle: f64, paint: &Paint) {
        self.calls.push(DrawCall::Arc {
            oval,
            start_angle,
            sweep_angle,
            paint: *paint,
        });
    }

    fn draw_image(
        &mut self,
        image: &ImageData,
        dest: Rect,
        corner_radius: f64,
        filter: Option<ColorFilter>,
    ) {
        self.calls.push(DrawCall::Image {
            dest,
            corner_radius,
            filter,
            image_id: image.id(),
        });
    }

    fn measure_text(
        &mut self,
        text: &str,
        paint: &TextPaint,
        max_width: f64,
        max_lines: u32,
    ) -> TextExtent {
        self.measure_count += 1;
        let advance = paint.size * self.char_width;
        let chars = text.chars().count() as f64;
        let per_line = if advance > 0.0 {
            (max_width / advance).floor().max(1.0)
        } else {
            chars.max(1.0)
        };
        let lines = ((chars / per_line).ceil() as u32).clamp(1, max_lines.max(1));
        TextExtent {
            width: (chars.min(per_line) * advance).min(max_width),
            height: lines as f64 * paint.size * self.line_height,
            line_count: lines,
        }
    }

    fn draw_text(
        &mut self,
        text: &str,
        paint: &TextPaint,
        rect: RectF,
        max_lines: u32,
        alignment: TextAlignment,
    ) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            rect,
            color: paint.color,
            max_lines,
            alignment,
        });
    }
}

/// Image loader backed by a map
#[derive(Default)]
pub struct MockImageLoader {
    images: HashMap<ImageHandle, ImageData>,
    deferred: bool,
    pending: Mutex<Vec<(ImageHandle, ImageCallback)>>,
    requests: AtomicUsize,
}

impl MockImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, handle: ImageHandle, image: ImageData) -> Self {
        self.images.insert(handle, image);
        self
    }

    /// Hold async completions until `complete_all`
    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .map(|pending| pending.len())
            .unwrap_or_default()
    }

    /// Run every held completion, returning how many ran
    pub fn complete_all(&self) -> usize {
        let pending = match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(_) => return 0,
        };
        let count = pending.len();
        // Callbacks run without the lock held
        for (handle, on_complete) in pending {
            on_complete(self.images.get(&handle).cloned());
        }
        count
    }
}

impl ImageLoader for MockImageLoader {
    fn resolve(&self, handle: &ImageHandle) -> Option<ImageData> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.images.get(handle).cloned()
    }

    fn resolve_async(&self, handle: &ImageHandle, on_complete: ImageCallback) {
        if !self.deferred {
            on_complete(self.resolve(handle));
            return;
        }
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut pending) = self.pending.lock() {
            pending.push((handle.clone(), on_complete));
        }
    }
}
