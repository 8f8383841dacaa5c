//! Image loader reading PNG files from disk

use anyhow::{Context, Result};
use cairo::ImageSurface;
use complication_render::{image_from_surface, ImageCallback, ImageData, ImageLoader};
use complication_types::ImageHandle;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Resolves `file` handles (relative paths against `base_dir`) and
/// `resource` handles as `<base_dir>/<name>.png`
#[derive(Debug, Clone)]
pub struct FileImageLoader {
    base_dir: PathBuf,
}

impl FileImageLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// File a handle refers to, None for placeholders
    pub fn path_for(&self, handle: &ImageHandle) -> Option<PathBuf> {
        match handle {
            ImageHandle::File { path } if path.is_absolute() => Some(path.clone()),
            ImageHandle::File { path } => Some(self.base_dir.join(path)),
            ImageHandle::Resource { name } => {
                let mut path = self.base_dir.join(name);
                if path.extension().is_none() {
                    path.set_extension("png");
                }
                Some(path)
            }
            ImageHandle::Placeholder => None,
        }
    }

    fn load(path: &Path) -> Result<ImageData> {
        let mut file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let mut surface = ImageSurface::create_from_png(&mut file)
            .with_context(|| format!("Failed to decode {}", path.display()))?;
        image_from_surface(&mut surface)
    }
}

impl ImageLoader for FileImageLoader {
    fn resolve(&self, handle: &ImageHandle) -> Option<ImageData> {
        let path = self.path_for(handle)?;
        match Self::load(&path) {
            Ok(image) => {
                log::debug!(
                    "Loaded {} ({}x{})",
                    path.display(),
                    image.width(),
                    image.height()
                );
                Some(image)
            }
            Err(e) => {
                log::warn!("{:#}", e);
                None
            }
        }
    }

    /// Decode on a background thread; the callback runs there too
    fn resolve_async(&self, handle: &ImageHandle, on_complete: ImageCallback) {
        let loader = self.clone();
        let handle = handle.clone();
        let spawned = std::thread::Builder::new()
            .name("image-loader".to_string())
            .spawn(move || on_complete(loader.resolve(&handle)));
        if let Err(e) = spawned {
            log::error!("Failed to spawn image loader thread: {}", e);
        }
    }
}
