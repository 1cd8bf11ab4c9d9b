//! Edit session over a single card with dirty tracking.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ComposeError, Result};
use crate::models::card::{Card, CardType, Edition};
use crate::models::dynamic_enum::DynamicEnum;

/// A card being edited, plus the snapshot it was opened or last saved as.
///
/// A brand new card is dirty until it is first saved, even with no edits.
#[derive(Debug, Clone)]
pub struct CardSession {
    card: Card,
    original: Card,
    file: Option<PathBuf>,
    unsaved_new: bool,
}

impl CardSession {
    /// Start a session on an empty card.
    pub fn new_card() -> Self {
        Self {
            card: Card::new(),
            original: Card::new(),
            file: None,
            unsaved_new: true,
        }
    }

    /// Start a clean session on an existing card that has no backing file.
    pub fn from_card(card: Card) -> Self {
        Self {
            original: card.clone(),
            card,
            file: None,
            unsaved_new: false,
        }
    }

    /// Open a card file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = fs::canonicalize(path.as_ref())?;
        let card = Card::load_file(&path)?;
        log::debug!("Opened card {} ({} fields)", path.display(), card.len());
        Ok(Self {
            original: card.clone(),
            card,
            file: Some(path),
            unsaved_new: false,
        })
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn original(&self) -> &Card {
        &self.original
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    // -- Edits -------------------------------------------------------------

    /// Set a field. Returns `true` if the value changed.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> bool {
        self.card.set_value(key, value)
    }

    pub fn set_edition(&mut self, edition: Edition) -> bool {
        self.card.set_edition(edition)
    }

    pub fn set_card_type(&mut self, card_type: CardType) -> bool {
        self.card.set_card_type(card_type)
    }

    /// Set a dynamic enum field from its friendly form. Unknown input clamps.
    pub fn set_dynamic_friendly(&mut self, dynamic_enum: &DynamicEnum, friendly: &str) -> bool {
        let value = dynamic_enum.value_for(friendly).to_string();
        self.card.set_value(dynamic_enum.id(), value)
    }

    /// Friendly form of a dynamic enum field, normalized through the enum.
    pub fn dynamic_friendly<'a>(&'a self, dynamic_enum: &'a DynamicEnum) -> &'a str {
        dynamic_enum.friendly_for(self.card.dynamic_value(dynamic_enum))
    }

    // -- Dirty tracking ----------------------------------------------------

    pub fn is_dirty(&self) -> bool {
        self.unsaved_new || self.card != self.original
    }

    /// Keys whose value differs from the snapshot, sorted.
    pub fn changed_keys(&self) -> Vec<String> {
        let keys: BTreeSet<&str> = self
            .card
            .iter()
            .chain(self.original.iter())
            .map(|(k, _)| k)
            .collect();

        keys.into_iter()
            .filter(|k| self.card.get(k) != self.original.get(k))
            .map(str::to_string)
            .collect()
    }

    /// Discard edits, restoring the snapshot.
    pub fn revert(&mut self) {
        self.card = self.original.clone();
    }

    // -- Persistence -------------------------------------------------------

    /// Save to the session's file.
    ///
    /// Fails with [`ComposeError::NotFound`] if the session has never been
    /// saved or opened; use [`save_as`](Self::save_as) then.
    pub fn save(&mut self) -> Result<()> {
        let path = self
            .file
            .clone()
            .ok_or_else(|| ComposeError::NotFound("card has no file name".to_string()))?;
        self.save_as(path)
    }

    /// Save to `path` and make it the session's file.
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.card.save_file(path)?;
        self.file = Some(path.to_path_buf());
        self.original = self.card.clone();
        self.unsaved_new = false;
        log::debug!("Saved card to {}", path.display());
        Ok(())
    }
}
