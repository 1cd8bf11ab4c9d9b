//! Draw operations: the render pipeline's output, consumed by a rasterizer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::CachedImage;
use crate::error::{ComposeError, Result};
use crate::models::layout::{TextAlignment, TextColor};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGBA color, used for filled rectangles and brushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB`, `#AARRGGBB` or a handful of named colors.
    pub fn parse(value: &str) -> Result<Color> {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "black" => return Ok(Color::BLACK),
            "white" => return Ok(Color::WHITE),
            "magenta" => return Ok(Color::MAGENTA),
            "transparent" => return Ok(Color { r: 0, g: 0, b: 0, a: 0 }),
            _ => {}
        }

        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let byte = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| ComposeError::InvalidValue(format!("bad color '{value}'")))
        };
        match hex.len() {
            6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Color {
                a: byte(0)?,
                r: byte(2)?,
                g: byte(4)?,
                b: byte(6)?,
            }),
            _ => Err(ComposeError::InvalidValue(format!("bad color '{value}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Draw operations
// ---------------------------------------------------------------------------

/// How an image fills its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stretch {
    /// Natural size at the asset's anchor.
    None,
    /// Scale to fit inside the box, preserving aspect ratio.
    Uniform,
    /// Scale to cover the box, preserving aspect ratio (card art).
    UniformToFill,
}

/// Reference to the image a [`DrawOp::PlaceImage`] draws.
///
/// Serializes as its id and source; the decoded pixels stay with the cache.
#[derive(Debug, Clone, Serialize)]
pub struct AssetHandle {
    pub id: String,
    pub source: String,
    #[serde(skip)]
    pub image: Arc<CachedImage>,
}

impl AssetHandle {
    pub fn new(image: Arc<CachedImage>) -> Self {
        Self {
            id: image.id().to_string(),
            source: image.source_label(),
            image,
        }
    }
}

impl PartialEq for AssetHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.source == other.source
    }
}

/// One instruction for the rasterizer. Later operations draw over earlier ones.
///
/// Rotations are in degrees about the element's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op")]
pub enum DrawOp {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    PlaceImage {
        asset: AssetHandle,
        x: f64,
        y: f64,
        /// `None` draws at the image's natural size.
        width: Option<f64>,
        height: Option<f64>,
        rotation: f64,
        stretch: Stretch,
    },
    PlaceText {
        text: String,
        font: String,
        size: f64,
        alignment: TextAlignment,
        color: TextColor,
        caps: bool,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rotation: f64,
    },
}

impl DrawOp {
    pub fn is_image(&self) -> bool {
        matches!(self, DrawOp::PlaceImage { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, DrawOp::PlaceText { .. })
    }

    /// Asset id for image operations.
    pub fn asset_id(&self) -> Option<&str> {
        match self {
            DrawOp::PlaceImage { asset, .. } => Some(&asset.id),
            _ => None,
        }
    }
}

/// Serialize a draw list for an out-of-process rasterizer.
pub fn draw_ops_to_json(ops: &[DrawOp]) -> Result<String> {
    Ok(serde_json::to_string_pretty(ops)?)
}
