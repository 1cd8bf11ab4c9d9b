//! Render pipeline: turns a card and its config into draw operations.
//!
//! Every lookup miss (descriptor, asset, enum, embedded decode) is absorbed
//! where it happens and the element is left out. The only error a render
//! returns is a card whose edition does not match the renderer.

pub mod first_edition;
pub mod steps;

pub use first_edition::FirstEditionRenderer;
pub use steps::{first_edition_steps, Step, TextBoxSource};

use crate::cache::{AssetCache, CachedImage};
use crate::config::{self, Platform};
use crate::error::Result;
use crate::models::card::{Card, Edition};
use crate::models::draw::{AssetHandle, Color, DrawOp, Stretch};
use crate::models::layout::{BoxDescriptor, Config};
use crate::resolve::{first_match, suffixes};

/// Render-wide switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Draw a magenta placeholder behind every resolved box.
    pub debug: bool,
    /// Selects platform-suffixed constants.
    pub platform: Platform,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            debug: false,
            platform: Platform::current(),
        }
    }
}

/// A renderer for one edition's card layouts.
pub trait CardRenderer: Send + Sync {
    fn edition(&self) -> Edition;

    /// Produce the draw list for `card`.
    ///
    /// Fails only with [`ComposeError::EditionMismatch`](crate::ComposeError::EditionMismatch).
    fn render(
        &self,
        card: &Card,
        config: &Config,
        cache: &AssetCache,
        options: RenderOptions,
    ) -> Result<Vec<DrawOp>>;
}

/// Which image boxes to try when placing an image.
#[derive(Debug, Clone, Copy)]
pub enum BoxChain<'a> {
    /// Suffix chain of the matched image id.
    Suffixes,
    /// An explicit override chain.
    Explicit(&'a [String]),
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// Accumulates draw operations for a single render.
pub struct Canvas<'a> {
    config: &'a Config,
    cache: &'a AssetCache,
    options: RenderOptions,
    ops: Vec<DrawOp>,
}

impl<'a> Canvas<'a> {
    pub fn new(config: &'a Config, cache: &'a AssetCache, options: RenderOptions) -> Self {
        Self {
            config,
            cache,
            options,
            ops: Vec::new(),
        }
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    pub fn cache(&self) -> &'a AssetCache {
        self.cache
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    /// Black card body inset by `InnerRectMargin`. Needs `CardWidth` and `CardHeight`.
    pub fn add_background(&mut self) -> bool {
        let Some((width, height)) = self.config.card_size() else {
            return false;
        };
        let margin = self
            .config
            .constant_f64(config::INNER_RECT_MARGIN)
            .unwrap_or(0.0);
        self.fill_rect(
            margin,
            margin,
            width - 2.0 * margin,
            height - 2.0 * margin,
            Color::BLACK,
        );
        true
    }

    /// Place the first cached image among `candidates`.
    ///
    /// The image goes into the first image box found in `boxes`; without a
    /// box it is drawn at its anchor, unscaled. Returns `false` when no
    /// candidate names an asset.
    pub fn add_image(&mut self, candidates: &[String], boxes: BoxChain<'_>) -> bool {
        let config = self.config;
        let cache = self.cache;

        let hit = first_match(candidates, |id| cache.image(config, id));

        let chain = match boxes {
            BoxChain::Explicit(ids) => ids.to_vec(),
            BoxChain::Suffixes => match (&hit, candidates.first()) {
                (Some((id, _)), _) => suffixes(id),
                (None, Some(first)) => suffixes(first),
                (None, None) => Vec::new(),
            },
        };
        let bounds = first_match(&chain, |id| config.image_box(id)).map(|(_, b)| &b.bounds);

        if let Some(b) = bounds {
            self.placeholder(b);
        }

        let Some((_, image)) = hit else {
            log::debug!("No image asset for any of {:?}", candidates);
            return false;
        };

        self.ops.push(place_image(image, bounds, Stretch::Uniform));
        true
    }

    /// Decode an embedded base64 payload into the first box in `boxes`.
    ///
    /// Without a box nothing is drawn. A payload that fails to decode is
    /// logged and skipped; the rest of the render carries on.
    pub fn add_embedded_image(
        &mut self,
        id: &str,
        payload: &str,
        boxes: &[String],
        stretch: Stretch,
    ) -> bool {
        let config = self.config;
        let Some((_, descriptor)) = first_match(boxes, |box_id| config.image_box(box_id)) else {
            log::debug!("No image box for embedded image '{}' among {:?}", id, boxes);
            return false;
        };
        let bounds = &descriptor.bounds;
        self.placeholder(bounds);

        if payload.trim().is_empty() {
            return false;
        }

        match CachedImage::from_base64(id, payload) {
            Ok(image) => {
                self.ops
                    .push(place_image(std::sync::Arc::new(image), Some(bounds), stretch));
                true
            }
            Err(e) => {
                log::warn!("Skipping embedded image '{}': {}", id, e);
                false
            }
        }
    }

    /// Place `content` in the first text box among `candidates`.
    ///
    /// Applies the box's styling, upper-cases for all-caps boxes and shifts
    /// by the platform text offset constants.
    pub fn add_text(&mut self, candidates: &[String], content: &str) -> bool {
        let config = self.config;
        let Some((_, descriptor)) = first_match(candidates, |id| config.text_box(id)) else {
            log::debug!("No text box for any of {:?}", candidates);
            return false;
        };
        let bounds = &descriptor.bounds;
        self.placeholder(bounds);

        let platform = self.options.platform;
        let offset_x = config
            .platform_constant_f64(config::TEXT_OFFSET_X, platform)
            .unwrap_or(0.0);
        let offset_y = config
            .platform_constant_f64(config::TEXT_OFFSET_Y, platform)
            .unwrap_or(0.0);

        let text = if descriptor.all_caps {
            content.to_uppercase()
        } else {
            content.to_string()
        };

        self.ops.push(DrawOp::PlaceText {
            text,
            font: descriptor.font_family.clone(),
            size: descriptor.font_size,
            alignment: descriptor.alignment,
            color: descriptor.color,
            caps: descriptor.all_caps,
            x: bounds.x + offset_x,
            y: bounds.y + offset_y,
            width: bounds.width,
            height: bounds.height,
            rotation: bounds.rotate_degrees,
        });
        true
    }

    fn placeholder(&mut self, bounds: &BoxDescriptor) {
        if self.options.debug {
            self.fill_rect(bounds.x, bounds.y, bounds.width, bounds.height, Color::MAGENTA);
        }
    }
}

fn place_image(
    image: std::sync::Arc<CachedImage>,
    bounds: Option<&BoxDescriptor>,
    stretch: Stretch,
) -> DrawOp {
    match bounds {
        Some(b) => DrawOp::PlaceImage {
            asset: AssetHandle::new(image),
            x: b.x,
            y: b.y,
            width: Some(b.width),
            height: Some(b.height),
            rotation: b.rotate_degrees,
            stretch,
        },
        None => {
            let (x, y) = image.anchor();
            DrawOp::PlaceImage {
                asset: AssetHandle::new(image),
                x,
                y,
                width: None,
                height: None,
                rotation: 0.0,
                stretch: Stretch::None,
            }
        }
    }
}
