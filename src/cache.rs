//! Per-config image and brush cache.
//!
//! Images are registered on first request and decoded lazily on first
//! access to their pixels. Entries are partitioned by `{Edition}.{ConfigName}`
//! so switching config variants never serves another variant's assets.
//! Nothing is evicted during a session.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock, RwLock};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::RgbaImage;

use crate::error::Result;
use crate::models::draw::Color;
use crate::models::layout::{Config, ImageAsset};

// ---------------------------------------------------------------------------
// CachedImage
// ---------------------------------------------------------------------------

/// Where an image's bytes come from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    File(PathBuf),
    /// Payload carried on the card itself (custom art).
    Embedded(Vec<u8>),
}

/// An image plus its anchor, decoded on first access to its pixels.
#[derive(Debug)]
pub struct CachedImage {
    id: String,
    source: ImageSource,
    x: f64,
    y: f64,
    bitmap: OnceLock<Option<Arc<RgbaImage>>>,
}

impl CachedImage {
    /// Wrap a config asset. Does not touch the file.
    pub fn from_asset(asset: &ImageAsset) -> Self {
        Self {
            id: asset.id.clone(),
            source: ImageSource::File(asset.path.clone()),
            x: asset.x,
            y: asset.y,
            bitmap: OnceLock::new(),
        }
    }

    /// Decode a base64 image payload eagerly.
    ///
    /// Fails if the payload is not base64 or not a decodable image, so the
    /// caller can drop the element instead of drawing a broken one.
    pub fn from_base64(id: impl Into<String>, payload: &str) -> Result<Self> {
        let bytes = STANDARD.decode(payload.trim())?;
        let decoded = image::load_from_memory(&bytes)?.to_rgba8();
        let bitmap = OnceLock::new();
        let _ = bitmap.set(Some(Arc::new(decoded)));
        Ok(Self {
            id: id.into(),
            source: ImageSource::Embedded(bytes),
            x: 0.0,
            y: 0.0,
            bitmap,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn source_label(&self) -> String {
        match &self.source {
            ImageSource::File(path) => path.display().to_string(),
            ImageSource::Embedded(_) => "embedded".to_string(),
        }
    }

    pub fn anchor(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn is_decoded(&self) -> bool {
        self.bitmap.get().is_some()
    }

    /// Decoded pixels, decoding on first call.
    ///
    /// Returns `None` if the file is missing or undecodable; the failure is
    /// logged once and remembered.
    pub fn bitmap(&self) -> Option<Arc<RgbaImage>> {
        self.bitmap
            .get_or_init(|| {
                let decoded = match &self.source {
                    ImageSource::File(path) => image::open(path).map(|img| img.to_rgba8()),
                    ImageSource::Embedded(bytes) => {
                        image::load_from_memory(bytes).map(|img| img.to_rgba8())
                    }
                };
                match decoded {
                    Ok(img) => Some(Arc::new(img)),
                    Err(e) => {
                        log::warn!("Failed to decode image '{}' ({}): {}", self.id, self.source_label(), e);
                        None
                    }
                }
            })
            .clone()
    }
}

// ---------------------------------------------------------------------------
// AssetCache
// ---------------------------------------------------------------------------

type Partition<T> = HashMap<String, T>;

/// Shared image and brush cache.
///
/// Safe to share across threads: lookups take a read lock, inserts take the
/// write lock and keep whichever entry landed first.
#[derive(Debug, Default)]
pub struct AssetCache {
    images: RwLock<HashMap<String, Partition<Arc<CachedImage>>>>,
    brushes: RwLock<HashMap<String, Partition<Color>>>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached image for `image_id` in `config`'s partition.
    ///
    /// On miss, registers the config's asset (without decoding it). Returns
    /// `None`, never an error, if the config has no such asset.
    pub fn image(&self, config: &Config, image_id: &str) -> Option<Arc<CachedImage>> {
        let partition = config.cache_key();

        if let Ok(images) = self.images.read() {
            if let Some(hit) = images.get(&partition).and_then(|p| p.get(image_id)) {
                return Some(hit.clone());
            }
        }

        let asset = config.image_asset(image_id)?;
        let entry = Arc::new(CachedImage::from_asset(asset));

        let mut images = match self.images.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let cached = images
            .entry(partition)
            .or_default()
            .entry(image_id.to_string())
            .or_insert_with(|| {
                log::debug!("Cached image '{}' from {}", image_id, asset.path.display());
                entry
            })
            .clone();
        Some(cached)
    }

    /// Get the brush color for a named color constant in `config`.
    ///
    /// Returns `None` if the constant is missing or not a color.
    pub fn brush(&self, config: &Config, color_key: &str) -> Option<Color> {
        let partition = config.cache_key();

        if let Ok(brushes) = self.brushes.read() {
            if let Some(hit) = brushes.get(&partition).and_then(|p| p.get(color_key)) {
                return Some(*hit);
            }
        }

        let raw = config.constant(color_key)?;
        let color = match Color::parse(raw) {
            Ok(color) => color,
            Err(e) => {
                log::debug!("Constant '{}' is not a color: {}", color_key, e);
                return None;
            }
        };

        let mut brushes = match self.brushes.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Some(
            *brushes
                .entry(partition)
                .or_default()
                .entry(color_key.to_string())
                .or_insert(color),
        )
    }

    /// Number of cached images across all partitions.
    pub fn image_count(&self) -> usize {
        self.images
            .read()
            .map(|images| images.values().map(HashMap::len).sum())
            .unwrap_or(0)
    }

    pub fn brush_count(&self) -> usize {
        self.brushes
            .read()
            .map(|brushes| brushes.values().map(HashMap::len).sum())
            .unwrap_or(0)
    }

    /// Drop every entry. Only used when the config registry is reloaded.
    pub fn clear(&self) {
        if let Ok(mut images) = self.images.write() {
            images.clear();
        }
        if let Ok(mut brushes) = self.brushes.write() {
            brushes.clear();
        }
    }
}
