//! Config markup parser.
//!
//! Element names are matched case-insensitively; attribute names are not.
//! Parsing is tolerant: unknown elements and attributes are ignored,
//! unparseable numbers read as `0`, unparseable booleans as `false`. Only an
//! unreadable stream, a missing `<config>` element or an unknown edition
//! fail the load.

use std::collections::HashMap;
use std::fs;
use std::io::BufRead;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::config::DEFAULT_CONFIG_NAME;
use crate::error::{ComposeError, Result};
use crate::models::card::Edition;
use crate::models::dynamic_enum::{friendly_value, DynamicEnum};
use crate::models::layout::{
    parse_f64_or_zero, BoxDescriptor, Config, ImageAsset, ImageBoxDescriptor, TextBoxDescriptor,
};

/// Parse the first `<config>` element of a document.
pub fn load_config<R: BufRead>(input: R, base_dir: &Path) -> Result<Config> {
    load_configs(input, base_dir)?
        .into_iter()
        .next()
        .ok_or_else(|| ComposeError::MissingRoot("config".to_string()))
}

/// Parse every `<config>` element of a document, in document order.
///
/// Fails with [`ComposeError::MissingRoot`] if there are none.
pub fn load_configs<R: BufRead>(input: R, base_dir: &Path) -> Result<Vec<Config>> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut configs = Vec::new();
    let mut current: Option<Config> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                handle_element(&e, base_dir, &mut current, &mut configs)?;
            }
            Event::Empty(e) => {
                if handle_element(&e, base_dir, &mut current, &mut configs)? {
                    // A self-closing `<config/>` has no children.
                    if let Some(done) = current.take() {
                        configs.push(done);
                    }
                }
            }
            Event::End(e) => {
                if e.name().as_ref().eq_ignore_ascii_case(b"config") {
                    if let Some(done) = current.take() {
                        configs.push(done);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(unclosed) = current.take() {
        configs.push(unclosed);
    }

    if configs.is_empty() {
        return Err(ComposeError::MissingRoot("config".to_string()));
    }

    for config in &configs {
        log::info!(
            "Loaded config {} ({} assets, {} image boxes, {} text boxes, {} enums)",
            config.cache_key(),
            config.image_assets().len(),
            config.image_boxes().len(),
            config.text_boxes().len(),
            config.enums().len()
        );
    }

    Ok(configs)
}

/// Parse a config file, resolving relative asset paths against its directory.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<Vec<Config>> {
    let path = path.as_ref();
    let contents = fs::read(path)?;
    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    load_configs(contents.as_slice(), base_dir)
}

// ---------------------------------------------------------------------------
// Elements
// ---------------------------------------------------------------------------

/// Apply one element. Returns `true` if it opened a new `<config>`.
fn handle_element(
    e: &BytesStart<'_>,
    base_dir: &Path,
    current: &mut Option<Config>,
    finished: &mut Vec<Config>,
) -> Result<bool> {
    let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
    let attrs = attributes(e)?;

    if name == "config" {
        if let Some(previous) = current.take() {
            finished.push(previous);
        }
        let edition_raw = attrs.get("edition").map(String::as_str).unwrap_or("");
        let edition: Edition = edition_raw.parse()?;
        let config_name = attrs
            .get("name")
            .filter(|n| !n.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_CONFIG_NAME.to_string());
        *current = Some(Config::new(edition, config_name));
        return Ok(true);
    }

    let Some(config) = current.as_mut() else {
        return Ok(false);
    };
    let Some(id) = attrs.get("id").cloned() else {
        log::debug!("Ignoring <{}> without an id", name);
        return Ok(false);
    };

    match name.as_str() {
        "constant" => {
            let value = attrs.get("value").cloned().unwrap_or_default();
            config.insert_constant(id, value);
        }
        "enum" => {
            let values = attrs.get("values").map(String::as_str).unwrap_or("");
            let friendly: Vec<String> = values
                .split('|')
                .filter(|v| !v.is_empty())
                .map(friendly_value)
                .collect();
            let dynamic_enum = DynamicEnum::new(
                &id,
                friendly,
                bool_attr(&attrs, "optional"),
                bool_attr(&attrs, "custom"),
            );
            config.insert_enum(id, dynamic_enum);
        }
        "image" => load_image(config, &id, &attrs, base_dir)?,
        "imagebox" => {
            config.insert_image_box(ImageBoxDescriptor {
                bounds: bounds(&id, &attrs),
            });
        }
        "textbox" => {
            config.insert_text_box(TextBoxDescriptor {
                bounds: bounds(&id, &attrs),
                font_family: attrs.get("font").cloned().unwrap_or_default(),
                font_size: f64_attr(&attrs, "size"),
                alignment: attrs
                    .get("align")
                    .and_then(|a| a.parse().ok())
                    .unwrap_or_default(),
                color: attrs
                    .get("color")
                    .and_then(|c| c.parse().ok())
                    .unwrap_or_default(),
                all_caps: bool_attr(&attrs, "caps"),
            });
        }
        other => log::debug!("Ignoring unknown config element <{}>", other),
    }

    Ok(false)
}

/// Register an `<image>`: one asset for a file, one per file for a directory.
fn load_image(
    config: &mut Config,
    id: &str,
    attrs: &HashMap<String, String>,
    base_dir: &Path,
) -> Result<()> {
    let raw_path = attrs.get("path").map(String::as_str).unwrap_or("");
    let path = Config::resolve_path(base_dir, raw_path);
    let x = f64_attr(attrs, "x");
    let y = f64_attr(attrs, "y");

    if path.is_file() {
        config.insert_image_asset(ImageAsset::new(id, path, x, y));
    } else if path.is_dir() {
        let entries = match fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Skipping image '{}': cannot read {}: {}", id, path.display(), e);
                return Ok(());
            }
        };
        let mut files: Vec<_> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file())
            .collect();
        files.sort();

        let mut file_ids = Vec::with_capacity(files.len());
        for file in files {
            let file_id = file_id(&file);
            let asset_id = format!("{id}.{file_id}");
            config.insert_image_asset(ImageAsset::new(asset_id, file, x, y));
            file_ids.push(file_id);
        }

        if bool_attr(attrs, "enum") {
            let friendly: Vec<String> = file_ids.iter().map(|f| friendly_value(f)).collect();
            let dynamic_enum = DynamicEnum::new(
                id,
                friendly,
                bool_attr(attrs, "optional"),
                bool_attr(attrs, "custom"),
            );
            config.insert_enum(id.to_string(), dynamic_enum);
        }
    } else {
        log::debug!("Image '{}' path {} does not exist", id, path.display());
    }

    Ok(())
}

/// File stem with leading digits stripped: `01Premiere.png` -> `Premiere`.
fn file_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default()
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .to_string()
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

fn attributes(e: &BytesStart<'_>) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value()?.to_string();
        map.insert(key, value);
    }
    Ok(map)
}

fn f64_attr(attrs: &HashMap<String, String>, key: &str) -> f64 {
    attrs.get(key).map(|v| parse_f64_or_zero(v)).unwrap_or(0.0)
}

fn bool_attr(attrs: &HashMap<String, String>, key: &str) -> bool {
    attrs
        .get(key)
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn bounds(id: &str, attrs: &HashMap<String, String>) -> BoxDescriptor {
    BoxDescriptor::new(
        id,
        f64_attr(attrs, "x"),
        f64_attr(attrs, "y"),
        f64_attr(attrs, "width"),
        f64_attr(attrs, "height"),
        f64_attr(attrs, "rotate"),
    )
}
