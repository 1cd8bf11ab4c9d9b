//! Config registry keyed by (edition, name).

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use crate::config::DEFAULT_CONFIG_NAME;
use crate::error::{ComposeError, Result};
use crate::loader;
use crate::models::card::Edition;
use crate::models::layout::Config;

/// All loaded configs. Populated at startup, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ConfigRegistry {
    configs: HashMap<Edition, HashMap<String, Arc<Config>>>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a config. Fails if its (edition, name) is already taken.
    pub fn add(&mut self, config: Config) -> Result<()> {
        let by_name = self.configs.entry(config.edition()).or_default();
        if by_name.contains_key(config.name()) {
            return Err(ComposeError::InvalidValue(format!(
                "config {} is already registered",
                config.cache_key()
            )));
        }
        by_name.insert(config.name().to_string(), Arc::new(config));
        Ok(())
    }

    pub fn get(&self, edition: Edition, name: &str) -> Option<Arc<Config>> {
        self.configs
            .get(&edition)
            .and_then(|by_name| by_name.get(name))
            .cloned()
    }

    /// The `Default` config for an edition.
    pub fn get_default(&self, edition: Edition) -> Option<Arc<Config>> {
        self.get(edition, DEFAULT_CONFIG_NAME)
    }

    /// Names registered for an edition, sorted.
    pub fn names(&self, edition: Edition) -> Vec<String> {
        let mut names: Vec<String> = self
            .configs
            .get(&edition)
            .map(|by_name| by_name.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.configs.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Config>> {
        self.configs.values().flat_map(|by_name| by_name.values())
    }

    // -- Loading -----------------------------------------------------------

    /// Load every `<config>` in a document.
    pub fn load_xml<R: BufRead>(input: R, base_dir: &Path) -> Result<Self> {
        let mut registry = Self::new();
        for config in loader::load_configs(input, base_dir)? {
            registry.add(config)?;
        }
        Ok(registry)
    }

    /// Load a config file; asset paths resolve against its directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut registry = Self::new();
        for config in loader::load_config_file(path)? {
            registry.add(config)?;
        }
        Ok(registry)
    }
}
