//! Host-facing wrapper: one complication slot on a watch face.
//!
//! Translates per-frame render parameters (draw mode, visible layers, last
//! tap) into renderer calls, and draws the tap highlight outline.

use chrono::{DateTime, Duration, Utc};
use complication_types::{Color, ComplicationData, Rect, RectF, RendererConfig};

use crate::canvas::{Canvas, Paint};
use crate::composer::{FrameState, IdleReason};
use crate::renderer::ComplicationRenderer;

/// Display capabilities of the device, fixed for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WatchState {
    pub has_low_bit_ambient: bool,
    pub has_burn_in_protection: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    #[default]
    Interactive,
    Ambient,
}

/// What the host wants from this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderParameters {
    pub draw_mode: DrawMode,
    /// Whether the complications layer is drawn at all
    pub draw_complications: bool,
    /// When this slot was last tapped
    pub last_tap: Option<DateTime<Utc>>,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            draw_mode: DrawMode::Interactive,
            draw_complications: true,
            last_tap: None,
        }
    }
}

/// Shape of a slot's bounds; only round-rect slots get a highlight outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotBoundsType {
    #[default]
    RoundRect,
    Background,
}

pub struct ComplicationDrawable {
    renderer: ComplicationRenderer,
    watch_state: WatchState,
    highlight_duration: Duration,
    highlight_expansion: f64,
    highlight_stroke_width: f64,
}

impl ComplicationDrawable {
    pub fn new(renderer: ComplicationRenderer, watch_state: WatchState) -> Self {
        let config: &RendererConfig = renderer.config();
        let highlight_duration = Duration::milliseconds(config.highlight_duration_ms.max(0));
        let highlight_expansion = config.highlight_expansion;
        let highlight_stroke_width = config.highlight_stroke_width;
        Self {
            renderer,
            watch_state,
            highlight_duration,
            highlight_expansion,
            highlight_stroke_width,
        }
    }

    pub fn renderer(&self) -> &ComplicationRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut ComplicationRenderer {
        &mut self.renderer
    }

    pub fn watch_state(&self) -> WatchState {
        self.watch_state
    }

    /// Assign content, loading its images synchronously or not
    pub fn load_data(&mut self, data: ComplicationData, load_async: bool) -> bool {
        self.renderer.set_content(Some(data), load_async)
    }

    pub fn data(&self) -> Option<&ComplicationData> {
        self.renderer.content()
    }

    /// Whether a tap at `tap` still highlights at `now`: `[tap, tap + duration)`
    pub fn is_highlighted(&self, tap: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        tap.is_some_and(|tap| now >= tap && now < tap + self.highlight_duration)
    }

    /// Render one frame into `bounds`.
    ///
    /// `override_data`, when given and different from the current content,
    /// replaces it with synchronously loaded images first.
    pub fn render(
        &mut self,
        canvas: &mut dyn Canvas,
        bounds: Rect,
        now: DateTime<Utc>,
        params: &RenderParameters,
        override_data: Option<&ComplicationData>,
    ) -> FrameState {
        if let Some(data) = override_data {
            if self.renderer.content() != Some(data) {
                self.renderer.set_content(Some(data.clone()), false);
            }
        }

        if !params.draw_complications {
            return FrameState::Idle(IdleReason::LayerHidden);
        }

        self.renderer.set_bounds(bounds);
        let highlighted = self.is_highlighted(params.last_tap, now);
        self.renderer.draw(
            canvas,
            now,
            params.draw_mode == DrawMode::Ambient,
            self.watch_state.has_low_bit_ambient,
            self.watch_state.has_burn_in_protection,
            highlighted,
        )
    }

    /// Outline drawn around a slot, e.g. while editing the watch face
    pub fn draw_highlight(
        &self,
        canvas: &mut dyn Canvas,
        bounds: Rect,
        bounds_type: SlotBoundsType,
        color: Color,
    ) {
        if bounds_type != SlotBoundsType::RoundRect || bounds.is_empty() {
            return;
        }
        let mut outline = RectF::from(bounds);
        outline.inset(-self.highlight_expansion, -self.highlight_expansion);
        let radius = outline.width().min(outline.height()) / 2.0;
        let paint = Paint::stroke(color, self.highlight_stroke_width);
        canvas.draw_round_rect(outline, radius, radius, &paint);
    }
}
