use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_CONFIG_FILE: &str = "config.xml";
pub const DEFAULT_CONFIG_NAME: &str = "Default";

// Well-known layout constants
pub const CARD_WIDTH: &str = "CardWidth";
pub const CARD_HEIGHT: &str = "CardHeight";
pub const INNER_RECT_MARGIN: &str = "InnerRectMargin";
pub const TEXT_OFFSET_X: &str = "TextOffsetX";
pub const TEXT_OFFSET_Y: &str = "TextOffsetY";

/// Host platform, used to pick `{key}.{platform}` variants of constants.
///
/// Text rendering differs slightly between platforms, so configs can
/// author e.g. `TextOffsetY.Windows` next to a plain `TextOffsetY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Windows,
    MacOS,
    Linux,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOS,
            _ => Platform::Linux,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOS => "MacOS",
            Platform::Linux => "Linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Locate the config document used when none is given explicitly.
///
/// Prefers `config.xml` in the working directory, then
/// `<user config dir>/card-composer/config.xml`.
pub fn default_config_path() -> PathBuf {
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        dir.join(APP_NAME).join(DEFAULT_CONFIG_FILE)
    } else {
        local
    }
}
