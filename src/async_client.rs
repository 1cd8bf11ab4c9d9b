//! Async wrapper around [`RenderContext`] for use in async runtimes (Tokio, etc.).
//!
//! Renders run on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], since image decoding and file reads block.
//!
//! # Example
//!
//! ```no_run
//! use card_composer::{AsyncRenderContext, Card};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let ctx = AsyncRenderContext::builder()
//!         .config_file("config.xml")
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     let ops = ctx.render(Card::new()).await.unwrap();
//!     println!("{} draw ops", ops.len());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Platform;
use crate::error::{ComposeError, Result};
use crate::models::{Card, DrawOp};
use crate::RenderContext;

// ---------------------------------------------------------------------------
// AsyncRenderContextBuilder
// ---------------------------------------------------------------------------

/// Builder for an [`AsyncRenderContext`].
#[derive(Debug, Clone, Default)]
pub struct AsyncRenderContextBuilder {
    config_file: Option<PathBuf>,
    debug: bool,
    platform: Option<Platform>,
}

impl AsyncRenderContextBuilder {
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Load the config document on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncRenderContext> {
        tokio::task::spawn_blocking(move || {
            let mut builder = RenderContext::builder().debug(self.debug);
            if let Some(path) = self.config_file {
                builder = builder.config_file(path);
            }
            if let Some(platform) = self.platform {
                builder = builder.platform(platform);
            }
            let ctx = builder.build()?;
            Ok(AsyncRenderContext {
                inner: Arc::new(ctx),
            })
        })
        .await
        .map_err(join_error)?
    }
}

// ---------------------------------------------------------------------------
// AsyncRenderContext
// ---------------------------------------------------------------------------

/// Async wrapper around [`RenderContext`].
///
/// The context is shared through an [`Arc`] without a lock: rendering only
/// needs `&RenderContext` and the asset cache synchronizes itself, so
/// concurrent renders proceed in parallel. Clones share the same context.
#[derive(Debug, Clone)]
pub struct AsyncRenderContext {
    inner: Arc<RenderContext>,
}

impl AsyncRenderContext {
    pub fn builder() -> AsyncRenderContextBuilder {
        AsyncRenderContextBuilder::default()
    }

    /// Wrap an existing context.
    pub fn from_context(ctx: RenderContext) -> Self {
        Self {
            inner: Arc::new(ctx),
        }
    }

    /// Run a sync operation on the blocking thread pool.
    ///
    /// ```no_run
    /// # use card_composer::AsyncRenderContext;
    /// # async fn example(ctx: AsyncRenderContext) -> card_composer::Result<()> {
    /// let configs = ctx.run(|c| Ok(c.registry().len())).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&RenderContext) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let ctx = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&ctx))
            .await
            .map_err(join_error)?
    }

    /// Render a card with its edition's default config.
    pub async fn render(&self, card: Card) -> Result<Vec<DrawOp>> {
        self.run(move |c| c.render(&card)).await
    }

    /// Render several cards concurrently, preserving input order.
    pub async fn render_all(&self, cards: Vec<Card>) -> Result<Vec<Vec<DrawOp>>> {
        let handles: Vec<_> = cards
            .into_iter()
            .map(|card| {
                let ctx = self.inner.clone();
                tokio::task::spawn_blocking(move || ctx.render(&card))
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await.map_err(join_error)??);
        }
        Ok(results)
    }

    pub fn context(&self) -> &RenderContext {
        &self.inner
    }
}

fn join_error(e: tokio::task::JoinError) -> ComposeError {
    ComposeError::InvalidValue(format!("Task join error: {e}"))
}
