//! Card composition engine.
//!
//! Turns a card (a bag of string fields) and a declarative layout config into
//! an ordered list of draw operations for an external rasterizer. Configs are
//! loaded once from markup; images are cached per config variant and decoded
//! lazily.
//!
//! # Quick start
//!
//! ```no_run
//! use card_composer::{Card, CardType, Edition, RenderContext};
//!
//! let ctx = RenderContext::builder()
//!     .config_file("config.xml")
//!     .build()
//!     .unwrap();
//!
//! let mut card = Card::new();
//! card.set_edition(Edition::FirstEdition);
//! card.set_card_type(CardType::Artifact);
//! card.set_value("Title", "Tricorder");
//!
//! let ops = ctx.render(&card).unwrap();
//! println!("{}", card_composer::draw_ops_to_json(&ops).unwrap());
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod registry;
pub mod render;
pub mod resolve;

#[cfg(feature = "async")]
pub use async_client::AsyncRenderContext;
pub use cache::AssetCache;
pub use config::Platform;
pub use error::{ComposeError, Result};
pub use models::*;
pub use registry::ConfigRegistry;
pub use render::{CardRenderer, FirstEditionRenderer, RenderOptions};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// RenderContextBuilder
// ---------------------------------------------------------------------------

/// Builder for a [`RenderContext`].
///
/// Use [`RenderContext::builder()`] to obtain one.
#[derive(Debug, Clone, Default)]
pub struct RenderContextBuilder {
    config_file: Option<PathBuf>,
    debug: bool,
    platform: Option<Platform>,
}

impl RenderContextBuilder {
    /// Set the config document to load.
    ///
    /// If not set, [`config::default_config_path`] is used.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Draw magenta placeholders for every resolved box. Defaults to `false`.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Override the platform used for platform-suffixed constants.
    ///
    /// Defaults to the platform this binary was built for.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Load the config document and build the context.
    pub fn build(self) -> Result<RenderContext> {
        let path = self.config_file.unwrap_or_else(config::default_config_path);
        let registry = ConfigRegistry::from_file(&path)?;
        let options = RenderOptions {
            debug: self.debug,
            platform: self.platform.unwrap_or_else(Platform::current),
        };
        Ok(RenderContext {
            registry,
            cache: AssetCache::new(),
            options,
            config_file: Some(path),
        })
    }
}

// ---------------------------------------------------------------------------
// RenderContext
// ---------------------------------------------------------------------------

/// Owns the config registry and the asset cache; the entry point for renders.
///
/// Rendering takes `&self`, so a context can be shared across threads and
/// render several cards at once.
#[derive(Debug)]
pub struct RenderContext {
    registry: ConfigRegistry,
    cache: AssetCache,
    options: RenderOptions,
    config_file: Option<PathBuf>,
}

impl RenderContext {
    pub fn builder() -> RenderContextBuilder {
        RenderContextBuilder::default()
    }

    /// Wrap an already-loaded registry.
    pub fn new(registry: ConfigRegistry, options: RenderOptions) -> Self {
        Self {
            registry,
            cache: AssetCache::new(),
            options,
            config_file: None,
        }
    }

    pub fn registry(&self) -> &ConfigRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.options.debug = debug;
    }

    /// The `Default` config for the card's edition.
    pub fn config_for(&self, card: &Card) -> Result<Arc<Config>> {
        let edition = card.edition();
        self.registry
            .get_default(edition)
            .ok_or_else(|| ComposeError::NotFound(format!("no config for {edition}")))
    }

    /// Render with the card's edition's `Default` config.
    pub fn render(&self, card: &Card) -> Result<Vec<DrawOp>> {
        let config = self.config_for(card)?;
        self.render_with(card, &config)
    }

    /// Render with a named config variant of the card's edition.
    pub fn render_named(&self, card: &Card, name: &str) -> Result<Vec<DrawOp>> {
        let edition = card.edition();
        let config = self
            .registry
            .get(edition, name)
            .ok_or_else(|| ComposeError::NotFound(format!("no config {edition}.{name}")))?;
        self.render_with(card, &config)
    }

    /// Render against a specific config variant.
    pub fn render_with(&self, card: &Card, config: &Config) -> Result<Vec<DrawOp>> {
        match card.edition() {
            Edition::FirstEdition => {
                FirstEditionRenderer.render(card, config, &self.cache, self.options)
            }
            other => Err(ComposeError::NotFound(format!("no renderer for {other}"))),
        }
    }

    /// Fields an editor shows for `card`, using its edition's default config.
    pub fn editable_fields(&self, card: &Card) -> Vec<EditorField> {
        let config = self.registry.get_default(card.edition());
        models::editable_fields(card, config.as_deref())
    }

    /// Reload the config document and drop every cached asset.
    ///
    /// Fails with [`ComposeError::NotFound`] for a context built from an
    /// in-memory registry.
    pub fn reload(&mut self) -> Result<()> {
        let path = self
            .config_file
            .clone()
            .ok_or_else(|| ComposeError::NotFound("context has no config file".to_string()))?;
        self.registry = ConfigRegistry::from_file(&path)?;
        self.cache.clear();
        log::info!("Reloaded {} configs from {}", self.registry.len(), path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let configs: Vec<String> = self.registry.iter().map(|c| c.cache_key()).collect();
        write!(
            f,
            "RenderContext(configs=[{}], cached_images={}, debug={}, platform={})",
            configs.join(", "),
            self.cache.image_count(),
            self.options.debug,
            self.options.platform
        )
    }
}
