//! Shared fixtures for the integration tests.
//!
//! Builds a temporary asset directory with tiny PNGs laid out the way a real
//! config expects, plus config documents that reference it.

#![allow(dead_code)]

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use card_composer::loader;
use card_composer::{AssetCache, Card, CardType, Config, DrawOp, Edition, Platform, RenderOptions};
use card_composer::{CardRenderer, FirstEditionRenderer};
use image::{ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;

/// Minimal layout: a title bar image + box and a title text box.
pub const MINIMAL_CONFIG: &str = r#"
<config edition="FirstEdition" name="Default">
  <image id="TypedTitleBar" path="TypedTitleBar.png" x="10" y="20"/>
  <imagebox id="TypedTitleBar" x="30" y="40" width="600" height="80"/>
  <textbox id="TypedTextBox.Title" font="Lore" size="24" align="center" color="white" caps="false" x="50" y="60" width="500" height="40"/>
</config>
"#;

/// A fuller First Edition layout exercising enums, overrides and missions.
pub const FULL_CONFIG: &str = r##"
<config edition="FirstEdition" name="Default">
  <constant id="CardWidth" value="750"/>
  <constant id="CardHeight" value="1050"/>
  <constant id="InnerRectMargin" value="15"/>
  <constant id="TextOffsetX" value="1"/>
  <constant id="TextOffsetY" value="2"/>
  <constant id="TextOffsetY.Windows" value="5"/>
  <constant id="AffiliationColor.Federation" value="#0000FF"/>
  <constant id="AffiliationColor.Klingon" value="#AA0000"/>

  <image id="Border" path="Border" enum="true" custom="true"/>
  <image id="ExpansionIcon" path="ExpansionIcon" enum="true" optional="true"/>
  <image id="TypedTextBox" path="TypedTextBox"/>
  <image id="Affiliation" path="Affiliation"/>
  <image id="MissionTitleBar" path="MissionTitleBar.png" x="0" y="0"/>

  <enum id="TypedTextBox" values="ThreeLoreThreeGametext|SevenGametext"/>
  <enum id="MissionTextBox" values="Standard"/>
  <enum id="Affiliation" values="Federation|Klingon" optional="true"/>

  <imagebox id="ArtBox.Medium" x="60" y="120" width="630" height="460"/>
  <imagebox id="ArtBox.Wide" x="40" y="100" width="670" height="300"/>
  <imagebox id="TypedTextBox" x="40" y="600" width="670" height="380"/>
  <imagebox id="MissionTitleBar" x="20" y="20" width="710" height="70"/>
  <imagebox id="ExpansionIcon" x="600" y="900" width="40" height="40"/>
  <imagebox id="TypedTextBox.ThreeLoreThreeGametext.ExpansionIcon" x="610" y="910" width="40" height="40"/>
  <imagebox id="Border.Custom" x="0" y="0" width="750" height="1050"/>
  <imagebox id="AffiliationBox.1.1.Top" x="20" y="400" width="30" height="30"/>
  <imagebox id="AffiliationBox.2.1.Top" x="20" y="400" width="30" height="15"/>
  <imagebox id="AffiliationBox.2.1.Bottom" x="20" y="415" width="30" height="15"/>
  <imagebox id="AffiliationBox.2.2.Top" x="60" y="400" width="30" height="15"/>
  <imagebox id="AffiliationBox.2.2.Bottom" x="60" y="415" width="30" height="15"/>

  <textbox id="TypedTextBox.Title" font="Lore" size="24" align="center" color="white" x="50" y="60" width="500" height="40"/>
  <textbox id="TypedTextBox.ThreeLoreThreeGametext.Lore" font="Lore" size="14" align="left" color="black" x="50" y="620" width="640" height="120"/>
  <textbox id="ThreeLoreThreeGametext.Gametext" font="Gametext" size="14" align="left" color="black" x="50" y="750" width="640" height="150"/>
  <textbox id="Copyright" font="Gametext" size="8" align="right" color="white" x="400" y="1000" width="300" height="12"/>
  <textbox id="Rarity.Artifact" font="Gametext" size="8" align="left" color="white" caps="true" x="60" y="1000" width="100" height="12"/>
  <textbox id="MissionTextBox.Title" font="Lore" size="22" align="center" color="white" x="60" y="30" width="630" height="40"/>
  <textbox id="MissionTextBox.Span" font="Gametext" size="18" align="right" color="white" x="650" y="30" width="60" height="40"/>
</config>
"##;

/// Temporary asset directory. Keep it alive for the duration of the test.
pub struct Assets {
    pub dir: TempDir,
}

impl Assets {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Asset directory used by [`FULL_CONFIG`] and [`MINIMAL_CONFIG`].
    pub fn standard() -> Self {
        let assets = Self::new();
        assets.png("TypedTitleBar.png");
        assets.png("MissionTitleBar.png");
        assets.png("Border/01Premiere.png");
        assets.png("Border/02AlternateUniverse.png");
        assets.png("ExpansionIcon/01Premiere.png");
        assets.png("TypedTextBox/ThreeLoreThreeGametext.png");
        assets.png("TypedTextBox/SevenGametext.png");
        assets.png("Affiliation/Federation.png");
        assets.png("Affiliation/Klingon.png");
        assets
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a 2x2 PNG at `relative`, creating parent directories.
    pub fn png(&self, relative: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, png_bytes(2, 2)).unwrap();
        path
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn load(&self, xml: &str) -> Config {
        loader::load_config(xml.as_bytes(), self.path()).unwrap()
    }
}

/// Encode a solid-color PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

pub fn png_base64() -> String {
    STANDARD.encode(png_bytes(4, 3))
}

pub fn card(card_type: CardType, title: &str) -> Card {
    let mut card = Card::new();
    card.set_edition(Edition::FirstEdition);
    card.set_card_type(card_type);
    card.set_value("Title", title);
    card
}

pub fn options() -> RenderOptions {
    RenderOptions {
        debug: false,
        platform: Platform::Linux,
    }
}

pub fn render(card: &Card, config: &Config) -> Vec<DrawOp> {
    render_with(card, config, options())
}

pub fn render_with(card: &Card, config: &Config, options: RenderOptions) -> Vec<DrawOp> {
    let cache = AssetCache::new();
    FirstEditionRenderer
        .render(card, config, &cache, options)
        .unwrap()
}

/// Texts of every `PlaceText` op, in order.
pub fn texts(ops: &[DrawOp]) -> Vec<&str> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::PlaceText { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Asset ids of every `PlaceImage` op, in order.
pub fn image_ids(ops: &[DrawOp]) -> Vec<&str> {
    ops.iter().filter_map(DrawOp::asset_id).collect()
}

pub fn find_image<'a>(ops: &'a [DrawOp], id: &str) -> Option<&'a DrawOp> {
    ops.iter().find(|op| op.asset_id() == Some(id))
}

pub fn find_text<'a>(ops: &'a [DrawOp], content: &str) -> Option<&'a DrawOp> {
    ops.iter()
        .find(|op| matches!(op, DrawOp::PlaceText { text, .. } if text == content))
}
