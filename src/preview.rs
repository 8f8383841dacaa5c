//! Render a preview configuration into a Cairo image surface

use anyhow::{Context as _, Result};
use cairo::{Context, Format, ImageSurface};
use chrono::{DateTime, Utc};
use complication_render::{
    CairoCanvas, ComplicationDrawable, ComplicationRenderer, DrawMode, FrameState, ImageLoader,
    ImageSlot, RenderParameters, WatchState,
};
use complication_types::ComplicationData;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::{PreviewConfig, SlotConfig};
use crate::loader::FileImageLoader;

/// How long to wait for background image loads of one slot
const ASYNC_IMAGE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewOptions {
    pub now: DateTime<Utc>,
    pub ambient: bool,
    /// Load images on the calling thread instead of in the background
    pub sync_images: bool,
}

/// Rendered canvas plus what each slot did
pub struct PreviewFrame {
    pub surface: ImageSurface,
    pub states: Vec<(String, FrameState)>,
}

pub fn render_preview(config: &PreviewConfig, options: &PreviewOptions) -> Result<PreviewFrame> {
    let surface = ImageSurface::create(Format::ARgb32, config.canvas.width, config.canvas.height)
        .context("Failed to create preview surface")?;
    let cr = Context::new(&surface).context("Failed to create Cairo context")?;
    config.canvas.background.apply_to_cairo(&cr);
    cr.paint().context("Failed to paint background")?;

    let image_dir = config.image_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let loader: Arc<dyn ImageLoader> = Arc::new(FileImageLoader::new(image_dir));
    let watch_state = WatchState {
        has_low_bit_ambient: config.watch.low_bit_ambient,
        has_burn_in_protection: config.watch.burn_in_protection,
    };

    let mut canvas = CairoCanvas::new(cr);
    let mut states = Vec::with_capacity(config.slots.len());
    for slot in &config.slots {
        let mut drawable = build_drawable(config, slot, Arc::clone(&loader), watch_state, options);
        let params = RenderParameters {
            draw_mode: if options.ambient {
                DrawMode::Ambient
            } else {
                DrawMode::Interactive
            },
            draw_complications: true,
            last_tap: slot.last_tap,
        };
        let state = drawable.render(&mut canvas, slot.bounds, options.now, &params, None);
        log::debug!("Slot '{}': {:?}", slot.id, state);
        states.push((slot.id.clone(), state));
    }
    drop(canvas);

    surface.flush();
    Ok(PreviewFrame { surface, states })
}

fn build_drawable(
    config: &PreviewConfig,
    slot: &SlotConfig,
    loader: Arc<dyn ImageLoader>,
    watch_state: WatchState,
    options: &PreviewOptions,
) -> ComplicationDrawable {
    let mut renderer = ComplicationRenderer::with_config(
        config.renderer.clone(),
        config.active_style.clone(),
        config.ambient_style.clone(),
    );
    renderer.set_image_loader(Some(loader));
    renderer.set_no_data_text(config.no_data_text.clone());
    renderer.set_ranged_value_progress_hidden(slot.ranged_value_progress_hidden);

    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    renderer.set_on_invalidate(Some(Box::new(move || {
        if let Ok(tx) = tx.lock() {
            let _ = tx.send(());
        }
    })));

    let mut drawable = ComplicationDrawable::new(renderer, watch_state);
    if let Some(content) = slot.content.clone() {
        let expected = image_count(&content);
        drawable.load_data(content, !options.sync_images);
        if !options.sync_images {
            wait_for_images(&rx, expected, &slot.id);
        }
    }
    drawable
}

/// Images the renderer will ask the loader for
fn image_count(data: &ComplicationData) -> usize {
    ImageSlot::ALL
        .iter()
        .filter_map(|slot| slot.handle(data))
        .filter(|handle| !handle.is_placeholder())
        .count()
}

/// Block until `expected` images reported in. Failed loads never report,
/// so this gives up after a timeout.
fn wait_for_images(rx: &mpsc::Receiver<()>, expected: usize, slot_id: &str) {
    let deadline = Instant::now() + ASYNC_IMAGE_TIMEOUT;
    let mut loaded = 0;
    while loaded < expected {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if rx.recv_timeout(remaining).is_err() {
            log::warn!(
                "Slot '{}': {} of {} images loaded before timeout",
                slot_id,
                loaded,
                expected
            );
            return;
        }
        loaded += 1;
    }
}
