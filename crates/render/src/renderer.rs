//! Stateful complication renderer.
//!
//! Holds the current content, bounds, styles and the caches derived from
//! them: layout geometry, paint bundles, text measurement and resolved
//! images. Geometry is recomputed only when content, bounds, styles or the
//! hidden-progress flag change; drawing reuses it frame after frame.
//!
//! A renderer is single threaded: `draw`, `set_content` and `set_bounds` take
//! `&mut self`. Only image completions arrive from other threads, and they
//! touch nothing but the shared image slots.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use complication_types::{
    ComplicationData, ComplicationStyle, ComplicationText, ContentKind, PlaceholderFlags, Rect,
    RendererConfig,
};

use crate::canvas::Canvas;
use crate::composer::{Frame, FrameState, IdleReason};
use crate::images::{ImageLoader, ImageResolver, InvalidateListener, Invalidator, LoadMode};
use crate::layout::{LayoutGeometry, LayoutInput, LayoutStrategyKind};
use crate::paint_set::PaintSetManager;
use crate::text_renderer::TextRenderer;

pub struct ComplicationRenderer {
    config: RendererConfig,
    /// Content as assigned by the caller
    content: Option<ComplicationData>,
    /// Content actually rendered, after no-data substitution
    effective: Option<ComplicationData>,
    no_data_text: Option<String>,
    placeholders: PlaceholderFlags,
    bounds: Rect,
    ranged_value_progress_hidden: bool,
    paints: PaintSetManager,
    geometry: LayoutGeometry,
    layout_revision: u64,
    main_text: TextRenderer,
    sub_text: TextRenderer,
    invalidator: Invalidator,
    images: ImageResolver,
}

impl ComplicationRenderer {
    pub fn new(active_style: ComplicationStyle, ambient_style: ComplicationStyle) -> Self {
        Self::with_config(RendererConfig::default(), active_style, ambient_style)
    }

    pub fn with_config(
        config: RendererConfig,
        active_style: ComplicationStyle,
        ambient_style: ComplicationStyle,
    ) -> Self {
        let invalidator = Invalidator::new();
        let paints =
            PaintSetManager::new(active_style, ambient_style, config.tap_action_lost_tint);
        Self {
            config,
            content: None,
            effective: None,
            no_data_text: None,
            placeholders: PlaceholderFlags::default(),
            bounds: Rect::EMPTY,
            ranged_value_progress_hidden: false,
            paints,
            geometry: LayoutGeometry::default(),
            layout_revision: 0,
            main_text: TextRenderer::new(),
            sub_text: TextRenderer::new(),
            images: ImageResolver::new(invalidator.clone()),
            invalidator,
        }
    }

    pub fn set_image_loader(&mut self, loader: Option<Arc<dyn ImageLoader>>) {
        self.images.set_loader(loader);
    }

    /// Register the single redraw listener, replacing any previous one
    pub fn set_on_invalidate(&mut self, listener: Option<InvalidateListener>) {
        self.invalidator.set_listener(listener);
    }

    /// Assign new content.
    ///
    /// Content equal to the current content is ignored: no layout, no image
    /// loads, no redraw signal. Returns whether anything changed.
    pub fn set_content(&mut self, content: Option<ComplicationData>, load_async: bool) -> bool {
        if self.content == content {
            log::trace!("Complication content unchanged, skipping update");
            return false;
        }
        self.content = content;
        self.refresh_effective_content(load_async);
        true
    }

    pub fn content(&self) -> Option<&ComplicationData> {
        self.content.as_ref()
    }

    /// Content being drawn, after no-data substitution
    pub fn effective_content(&self) -> Option<&ComplicationData> {
        self.effective.as_ref()
    }

    /// Text shown for NoData content that has no placeholder.
    ///
    /// Unset, such content draws nothing but its background.
    pub fn set_no_data_text(&mut self, text: Option<String>) {
        if self.no_data_text == text {
            return;
        }
        self.no_data_text = text;
        let is_plain_no_data = self
            .content
            .as_ref()
            .is_some_and(|data| data.kind == ContentKind::NoData { placeholder: None });
        if is_plain_no_data {
            self.refresh_effective_content(true);
        }
    }

    /// Set the target rectangle in canvas coordinates.
    ///
    /// Returns whether the bounds changed. Layout is recomputed only when the
    /// size changes; a pure move keeps the geometry.
    pub fn set_bounds(&mut self, bounds: Rect) -> bool {
        if self.bounds == bounds {
            return false;
        }
        let resized =
            self.bounds.width() != bounds.width() || self.bounds.height() != bounds.height();
        self.bounds = bounds;
        if resized {
            self.calculate_layout();
        }
        true
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_ranged_value_progress_hidden(&mut self, hidden: bool) {
        if self.ranged_value_progress_hidden != hidden {
            self.ranged_value_progress_hidden = hidden;
            self.calculate_layout();
        }
    }

    pub fn is_ranged_value_progress_hidden(&self) -> bool {
        self.ranged_value_progress_hidden
    }

    /// Replace both styles; rebuilds every paint bundle and the layout
    pub fn update_style(
        &mut self,
        active_style: ComplicationStyle,
        ambient_style: ComplicationStyle,
    ) {
        self.paints.update_style(active_style, ambient_style);
        self.calculate_layout();
    }

    pub fn active_style(&self) -> &ComplicationStyle {
        self.paints.active_style()
    }

    pub fn ambient_style(&self) -> &ComplicationStyle {
        self.paints.ambient_style()
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn geometry(&self) -> &LayoutGeometry {
        &self.geometry
    }

    pub fn placeholders(&self) -> PlaceholderFlags {
        self.placeholders
    }

    /// Bumped on every layout recomputation
    pub fn layout_revision(&self) -> u64 {
        self.layout_revision
    }

    /// How many times the ambient paint bundles were rebuilt
    pub fn ambient_paint_rebuilds(&self) -> u64 {
        self.paints.ambient_rebuilds()
    }

    /// Draw the complication for instant `now`.
    ///
    /// Does nothing when there is no content, the content is Empty or
    /// NotConfigured, `now` is outside its activity window, or the bounds
    /// have no area.
    pub fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        now: DateTime<Utc>,
        in_ambient: bool,
        low_bit_ambient: bool,
        burn_in_protection: bool,
        show_highlight: bool,
    ) -> FrameState {
        let Some(data) = self.effective.as_ref() else {
            return FrameState::Idle(IdleReason::NoContent);
        };
        match data.kind {
            ContentKind::Empty => return FrameState::Idle(IdleReason::Empty),
            ContentKind::NotConfigured => return FrameState::Idle(IdleReason::NotConfigured),
            _ => {}
        }
        if !data.is_active_at(now) {
            log::trace!("Complication inactive at {}", now);
            return FrameState::Idle(IdleReason::Inactive);
        }
        if self.bounds.is_empty() {
            return FrameState::Idle(IdleReason::EmptyBounds);
        }

        let paints = self.paints.select(
            in_ambient,
            data.tap_action_lost,
            low_bit_ambient,
            burn_in_protection,
        );
        update_texts(
            data,
            self.geometry.strategy,
            &mut self.main_text,
            &mut self.sub_text,
            now,
        );

        let slots = self.images.slots();
        canvas.save();
        canvas.translate(self.bounds.left as f64, self.bounds.top as f64);
        let mut frame = Frame {
            canvas: &mut *canvas,
            data,
            paints,
            geometry: &mut self.geometry,
            placeholders: self.placeholders,
            images: &slots,
            config: &self.config,
            width: self.bounds.width(),
            height: self.bounds.height(),
        };
        frame.draw(&mut self.main_text, &mut self.sub_text, show_highlight);
        canvas.restore();

        FrameState::Drawn
    }

    fn refresh_effective_content(&mut self, load_async: bool) {
        let Some(content) = self.content.as_ref() else {
            self.effective = None;
            self.placeholders = PlaceholderFlags::default();
            self.images.clear();
            self.main_text.set_text("");
            self.sub_text.set_text("");
            self.geometry = LayoutGeometry::default();
            return;
        };

        let effective = match (&self.no_data_text, content.kind) {
            (Some(text), ContentKind::NoData { placeholder: None }) => {
                ComplicationData::short_text(ComplicationText::plain(text.clone()))
                    .with_activity(content.activity)
                    .with_tap_action_lost(content.tap_action_lost)
            }
            _ => content.clone(),
        };

        self.placeholders = PlaceholderFlags::derive(&effective);
        let mode = if load_async {
            LoadMode::Async
        } else {
            LoadMode::Sync
        };
        self.images.resolve(&effective, mode);
        self.effective = Some(effective);
        self.calculate_layout();
    }

    fn calculate_layout(&mut self) {
        let Some(data) = self.effective.as_ref() else {
            self.geometry = LayoutGeometry::default();
            return;
        };
        if self.bounds.is_empty() {
            self.geometry = LayoutGeometry::default();
            return;
        }
        let (width, height) = (self.bounds.width(), self.bounds.height());
        let corner_radius = self
            .paints
            .active_style()
            .clamped_border_radius(width, height)
            .max(
                self.paints
                    .ambient_style()
                    .clamped_border_radius(width, height),
            );
        self.geometry.update(&LayoutInput {
            data,
            width,
            height,
            ranged_value_progress_hidden: self.ranged_value_progress_hidden,
            corner_radius,
            compensation: self.config.compensation(),
        });
        self.layout_revision += 1;
        log::debug!(
            "Complication layout {} ({:?}) for {}x{}",
            self.layout_revision,
            self.geometry.strategy,
            width,
            height
        );
    }
}

/// Push this frame's text into the text renderers.
///
/// Long text without a title may wrap to two lines; everything else is one line.
fn update_texts(
    data: &ComplicationData,
    strategy: LayoutStrategyKind,
    main_text: &mut TextRenderer,
    sub_text: &mut TextRenderer,
    now: DateTime<Utc>,
) {
    let (text, title) = if strategy.uses_long_text() {
        (&data.long_text, &data.long_title)
    } else {
        (&data.short_text, &data.short_title)
    };

    match text {
        Some(text) => main_text.set_text(&text.text_at(now)),
        None => main_text.set_text(""),
    }
    match title {
        Some(title) => sub_text.set_text(&title.text_at(now)),
        None => sub_text.set_text(""),
    }
    main_text.set_max_lines(if strategy.uses_long_text() && title.is_none() {
        2
    } else {
        1
    });
    sub_text.set_max_lines(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::RecordingCanvas;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn renderer() -> ComplicationRenderer {
        let mut renderer =
            ComplicationRenderer::new(ComplicationStyle::default(), ComplicationStyle::default());
        renderer.set_bounds(Rect::new(10, 10, 110, 110));
        renderer
    }

    #[test]
    fn test_equal_content_is_ignored() {
        let mut renderer = renderer();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        renderer.set_on_invalidate(Some(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })));

        let data = ComplicationData::short_text(ComplicationText::plain("12"));
        assert!(renderer.set_content(Some(data.clone()), true));
        let revision = renderer.layout_revision();
        let signals = count.load(Ordering::SeqCst);

        assert!(!renderer.set_content(Some(data), true));
        assert_eq!(renderer.layout_revision(), revision);
        assert_eq!(count.load(Ordering::SeqCst), signals);
    }

    #[test]
    fn test_nan_value_is_still_equal_content() {
        let mut renderer = renderer();
        let data = ComplicationData::ranged_value(f32::NAN, 0.0, 100.0);
        assert!(renderer.set_content(Some(data.clone()), false));
        let revision = renderer.layout_revision();
        assert!(!renderer.set_content(Some(data), false));
        assert_eq!(renderer.layout_revision(), revision);
    }

    #[test]
    fn test_empty_bounds_reset_geometry() {
        let mut renderer = renderer();
        renderer.set_content(
            Some(ComplicationData::short_text(ComplicationText::plain("1"))),
            false,
        );
        assert!(!renderer.geometry().main_text.is_empty());

        renderer.set_bounds(Rect::EMPTY);
        assert_eq!(*renderer.geometry(), LayoutGeometry::default());
    }

    #[test]
    fn test_move_keeps_layout() {
        let mut renderer = renderer();
        renderer.set_content(
            Some(ComplicationData::short_text(ComplicationText::plain("1"))),
            false,
        );
        let revision = renderer.layout_revision();
        assert!(renderer.set_bounds(Rect::new(50, 50, 150, 150)));
        assert_eq!(renderer.layout_revision(), revision);
        assert!(renderer.set_bounds(Rect::new(50, 50, 160, 150)));
        assert_eq!(renderer.layout_revision(), revision + 1);
        assert!(!renderer.set_bounds(Rect::new(50, 50, 160, 150)));
    }

    #[test]
    fn test_no_data_text_substitution() {
        let mut renderer = renderer();
        renderer.set_content(Some(ComplicationData::no_data()), false);
        assert_eq!(renderer.geometry().strategy, LayoutStrategyKind::Default);

        renderer.set_no_data_text(Some("--".to_string()));
        let effective = renderer.effective_content().unwrap();
        assert_eq!(effective.kind, ContentKind::ShortText);
        assert_eq!(renderer.geometry().strategy, LayoutStrategyKind::ShortText);
        assert_eq!(renderer.content().unwrap().kind, ContentKind::NoData { placeholder: None });

        let mut canvas = RecordingCanvas::new();
        renderer.draw(&mut canvas, now(), false, false, false, false);
        assert_eq!(canvas.texts(), vec!["--"]);
    }

    #[test]
    fn test_long_text_without_title_wraps() {
        let mut renderer = renderer();
        renderer.set_content(
            Some(ComplicationData::long_text(ComplicationText::plain(
                "Lunch with the design team",
            ))),
            false,
        );
        let mut canvas = RecordingCanvas::new();
        renderer.draw(&mut canvas, now(), false, false, false, false);
        let max_lines: Vec<u32> = canvas
            .calls()
            .iter()
            .filter_map(|call| match call {
                crate::mocks::DrawCall::Text { max_lines, .. } => Some(*max_lines),
                _ => None,
            })
            .collect();
        assert_eq!(max_lines, vec![2]);
    }

    #[test]
    fn test_clearing_content_goes_idle() {
        let mut renderer = renderer();
        renderer.set_content(
            Some(ComplicationData::short_text(ComplicationText::plain("1"))),
            false,
        );
        assert!(renderer.set_content(None, false));
        let mut canvas = RecordingCanvas::new();
        assert_eq!(
            renderer.draw(&mut canvas, now(), false, false, false, false),
            FrameState::Idle(IdleReason::NoContent)
        );
        assert!(canvas.calls().is_empty());
    }
}
