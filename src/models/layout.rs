use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{self, Platform};
use crate::error::ComposeError;
use crate::models::card::Edition;
use crate::models::draw::Color;
use crate::models::dynamic_enum::DynamicEnum;

// ---------------------------------------------------------------------------
// Assets and descriptors
// ---------------------------------------------------------------------------

/// An image file registered by a config, with the anchor used when it is
/// placed without a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub id: String,
    pub path: PathBuf,
    pub x: f64,
    pub y: f64,
}

impl ImageAsset {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            x,
            y,
        }
    }
}

/// An authored rectangle: position, size and rotation in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxDescriptor {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotate_degrees: f64,
}

impl BoxDescriptor {
    pub fn new(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64, rotate_degrees: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
            rotate_degrees,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBoxDescriptor {
    pub bounds: BoxDescriptor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextColor {
    #[default]
    Black,
    White,
}

impl TextColor {
    pub fn color(self) -> Color {
        match self {
            TextColor::Black => Color::BLACK,
            TextColor::White => Color::WHITE,
        }
    }
}

impl FromStr for TextAlignment {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "left" => Ok(TextAlignment::Left),
            "center" => Ok(TextAlignment::Center),
            "right" => Ok(TextAlignment::Right),
            other => Err(ComposeError::InvalidValue(format!("unknown alignment '{other}'"))),
        }
    }
}

impl FromStr for TextColor {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "black" => Ok(TextColor::Black),
            "white" => Ok(TextColor::White),
            other => Err(ComposeError::InvalidValue(format!("unknown text color '{other}'"))),
        }
    }
}

impl fmt::Display for TextAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextAlignment::Left => "left",
            TextAlignment::Center => "center",
            TextAlignment::Right => "right",
        })
    }
}

/// A text box: a rectangle plus font styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBoxDescriptor {
    pub bounds: BoxDescriptor,
    pub font_family: String,
    pub font_size: f64,
    pub alignment: TextAlignment,
    pub color: TextColor,
    pub all_caps: bool,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// A layout config for one edition and named variant.
///
/// Built by the loader and never mutated afterwards. Every map is keyed by
/// the same case-sensitive dotted-ID namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    edition: Edition,
    name: String,
    constants: HashMap<String, String>,
    enums: HashMap<String, DynamicEnum>,
    image_assets: HashMap<String, ImageAsset>,
    image_boxes: HashMap<String, ImageBoxDescriptor>,
    text_boxes: HashMap<String, TextBoxDescriptor>,
}

impl Config {
    pub(crate) fn new(edition: Edition, name: impl Into<String>) -> Self {
        Self {
            edition,
            name: name.into(),
            constants: HashMap::new(),
            enums: HashMap::new(),
            image_assets: HashMap::new(),
            image_boxes: HashMap::new(),
            text_boxes: HashMap::new(),
        }
    }

    pub fn edition(&self) -> Edition {
        self.edition
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cache partition key: `{Edition}.{Name}`.
    pub fn cache_key(&self) -> String {
        format!("{}.{}", self.edition, self.name)
    }

    // -- Constants ---------------------------------------------------------

    pub fn constant(&self, key: &str) -> Option<&str> {
        self.constants.get(key).map(String::as_str)
    }

    /// Read a constant as a number. Unparseable values read as `0.0`.
    pub fn constant_f64(&self, key: &str) -> Option<f64> {
        self.constant(key).map(parse_f64_or_zero)
    }

    /// Read `{key}.{platform}` if authored, otherwise `{key}`.
    pub fn platform_constant(&self, key: &str, platform: Platform) -> Option<&str> {
        self.constant(&format!("{}.{}", key, platform.suffix()))
            .or_else(|| self.constant(key))
    }

    pub fn platform_constant_f64(&self, key: &str, platform: Platform) -> Option<f64> {
        self.platform_constant(key, platform).map(parse_f64_or_zero)
    }

    /// Canvas size from `CardWidth` / `CardHeight`, if both are authored.
    pub fn card_size(&self) -> Option<(f64, f64)> {
        Some((
            self.constant_f64(config::CARD_WIDTH)?,
            self.constant_f64(config::CARD_HEIGHT)?,
        ))
    }

    pub fn constants(&self) -> &HashMap<String, String> {
        &self.constants
    }

    // -- Lookups -----------------------------------------------------------

    pub fn dynamic_enum(&self, id: &str) -> Option<&DynamicEnum> {
        self.enums.get(id)
    }

    pub fn enums(&self) -> &HashMap<String, DynamicEnum> {
        &self.enums
    }

    pub fn image_asset(&self, id: &str) -> Option<&ImageAsset> {
        self.image_assets.get(id)
    }

    pub fn image_assets(&self) -> &HashMap<String, ImageAsset> {
        &self.image_assets
    }

    pub fn image_box(&self, id: &str) -> Option<&ImageBoxDescriptor> {
        self.image_boxes.get(id)
    }

    pub fn image_boxes(&self) -> &HashMap<String, ImageBoxDescriptor> {
        &self.image_boxes
    }

    pub fn text_box(&self, id: &str) -> Option<&TextBoxDescriptor> {
        self.text_boxes.get(id)
    }

    pub fn text_boxes(&self) -> &HashMap<String, TextBoxDescriptor> {
        &self.text_boxes
    }

    // -- Loader-only mutation ----------------------------------------------

    pub(crate) fn insert_constant(&mut self, id: String, value: String) {
        self.constants.insert(id, value);
    }

    pub(crate) fn insert_enum(&mut self, id: String, value: DynamicEnum) {
        self.enums.insert(id, value);
    }

    pub(crate) fn insert_image_asset(&mut self, asset: ImageAsset) {
        self.image_assets.insert(asset.id.clone(), asset);
    }

    pub(crate) fn insert_image_box(&mut self, descriptor: ImageBoxDescriptor) {
        self.image_boxes
            .insert(descriptor.bounds.id.clone(), descriptor);
    }

    pub(crate) fn insert_text_box(&mut self, descriptor: TextBoxDescriptor) {
        self.text_boxes
            .insert(descriptor.bounds.id.clone(), descriptor);
    }

    /// Resolve a config-relative path against `base_dir`.
    pub(crate) fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            base_dir.join(candidate)
        }
    }
}

pub(crate) fn parse_f64_or_zero(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}
