use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};

use crate::config::{APP_NAME, APP_VERSION};
use crate::error::{ComposeError, Result};
use crate::models::dynamic_enum::{friendly_value, DynamicEnum, NONE_VALUE};

// ---------------------------------------------------------------------------
// Field keys
// ---------------------------------------------------------------------------

pub const EDITION_KEY: &str = "Edition";
pub const CARD_TYPE_KEY: &str = "CardType";

pub const BORDER_KEY: &str = "Border";
pub const PROPERTY_LOGO_KEY: &str = "PropertyLogo";
pub const EXPANSION_ICON_KEY: &str = "ExpansionIcon";
pub const ART_KEY: &str = "Art";

pub const TYPED_TEXT_BOX_KEY: &str = "TypedTextBox";
pub const Q_TYPED_TEXT_BOX_KEY: &str = "QTypedTextBox";
pub const MISSION_TEXT_BOX_KEY: &str = "MissionTextBox";

pub const TITLE_KEY: &str = "Title";
pub const LORE_KEY: &str = "Lore";
pub const GAMETEXT_KEY: &str = "Gametext";
pub const COPYRIGHT_KEY: &str = "Copyright";
pub const RARITY_KEY: &str = "Rarity";
pub const SPAN_KEY: &str = "Span";
pub const AFFILIATION_KEY: &str = "Affiliation";

pub const MAX_AFFILIATIONS: usize = 5;

const CARD_ELEMENT: &str = "Card";

// ---------------------------------------------------------------------------
// Program-level enums
// ---------------------------------------------------------------------------

/// Parsing and naming shared by the program-level enums stored on a card.
///
/// The card keeps every field as a string; this trait is the bridge used by
/// [`Card::enum_value`] and [`Card::set_enum_value`].
pub trait CardEnum: Copy + Default + FromStr + fmt::Display {
    /// Field key the enum is stored under.
    const KEY: &'static str;

    fn all() -> &'static [Self];

    fn friendly_name(self) -> String {
        friendly_value(&self.to_string())
    }
}

macro_rules! card_enum {
    ($name:ident, $key:expr, [$first:ident $(, $variant:ident)* $(,)?]) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            $first,
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$name::$first, $($name::$variant,)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $name::$first => stringify!($first),
                    $($name::$variant => stringify!($variant),)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ComposeError;

            fn from_str(s: &str) -> Result<Self> {
                let trimmed = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == trimmed)
                    .ok_or_else(|| {
                        ComposeError::InvalidValue(format!(
                            "'{}' is not a valid {}",
                            s,
                            stringify!($name)
                        ))
                    })
            }
        }

        impl CardEnum for $name {
            const KEY: &'static str = $key;

            fn all() -> &'static [Self] {
                $name::ALL
            }
        }
    };
}

card_enum!(Edition, EDITION_KEY, [FirstEdition, SecondEdition]);

card_enum!(
    CardType,
    CARD_TYPE_KEY,
    [
        Artifact,
        DilemmaBoth,
        DilemmaPlanet,
        DilemmaSpace,
        Doorway,
        Equipment,
        Event,
        Facility,
        Incident,
        Interrupt,
        MissionBoth,
        MissionPlanet,
        MissionSpace,
        Objective,
        Personnel,
        QArtifact,
        QDilemma,
        QEvent,
        QInterrupt,
        QMission,
        Ship,
        Tactic,
    ]
);

impl CardType {
    /// Typed cards carry a type name graphic in their title bar.
    pub fn is_typed(self) -> bool {
        matches!(
            self,
            CardType::Artifact
                | CardType::DilemmaBoth
                | CardType::DilemmaPlanet
                | CardType::DilemmaSpace
                | CardType::Doorway
                | CardType::Event
                | CardType::Equipment
                | CardType::Incident
                | CardType::Interrupt
                | CardType::Objective
        )
    }

    pub fn is_q_typed(self) -> bool {
        matches!(
            self,
            CardType::QArtifact | CardType::QDilemma | CardType::QEvent | CardType::QInterrupt
        )
    }

    pub fn is_mission(self) -> bool {
        matches!(
            self,
            CardType::MissionBoth | CardType::MissionPlanet | CardType::MissionSpace
        )
    }

    /// Typed cards with a selectable text box layout.
    pub fn has_typed_text_box(self) -> bool {
        matches!(
            self,
            CardType::Artifact
                | CardType::DilemmaBoth
                | CardType::DilemmaPlanet
                | CardType::DilemmaSpace
                | CardType::Event
                | CardType::Equipment
                | CardType::Interrupt
        )
    }

    pub fn has_property_logo(self) -> bool {
        self.is_typed() || self.is_q_typed()
    }

    pub fn has_affiliations(self) -> bool {
        self.is_mission()
    }

    pub fn has_lore(self) -> bool {
        !matches!(
            self,
            CardType::Doorway | CardType::Incident | CardType::Objective
        )
    }
}

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// A card: a passive bag of string fields.
///
/// Edition and card type are stored as strings like everything else and
/// parsed on read. Equality is structural over the field map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card {
    data: BTreeMap<String, String>,
}

impl Card {
    /// Create an empty card.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edition(&self) -> Edition {
        self.enum_value()
    }

    pub fn set_edition(&mut self, edition: Edition) -> bool {
        self.set_enum_value(edition)
    }

    pub fn card_type(&self) -> CardType {
        self.enum_value()
    }

    pub fn set_card_type(&mut self, card_type: CardType) -> bool {
        self.set_enum_value(card_type)
    }

    /// Read a program-level enum, falling back to its default when the
    /// field is missing or unparseable.
    pub fn enum_value<E: CardEnum>(&self) -> E {
        self.enum_value_at(E::KEY)
    }

    pub fn enum_value_at<E: CardEnum>(&self, key: &str) -> E {
        self.data
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_enum_value<E: CardEnum>(&mut self, value: E) -> bool {
        self.set_value(E::KEY, value.to_string())
    }

    /// Raw stored value, blank or not.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Get a field, or `default` when it is missing or blank.
    pub fn value_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.data.get(key) {
            Some(v) if !v.trim().is_empty() => v,
            _ => default,
        }
    }

    /// Get a field, or an empty string when it is missing or blank.
    pub fn value(&self, key: &str) -> &str {
        self.value_or(key, "")
    }

    /// Current value of a dynamic enum field; blank reads as the enum default.
    pub fn dynamic_value<'a>(&'a self, dynamic_enum: &'a DynamicEnum) -> &'a str {
        self.value_or(dynamic_enum.id(), dynamic_enum.default_value())
    }

    /// `{enumId}.{value}` for a dynamic enum field.
    pub fn fully_qualified_value(&self, dynamic_enum: &DynamicEnum) -> String {
        format!("{}.{}", dynamic_enum.id(), self.dynamic_value(dynamic_enum))
    }

    /// Set a field. Returns `true` if the stored value changed.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let value = value.into();
        match self.data.insert(key.into(), value.clone()) {
            Some(old) => old != value,
            None => true,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.data.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Affiliations in slot order: `Affiliation`, `Affiliation2` .. `Affiliation5`.
    ///
    /// Stops at the first blank or `None` slot.
    pub fn affiliations(&self) -> Vec<&str> {
        let mut values = Vec::new();
        for i in 1..=MAX_AFFILIATIONS {
            let value = self.value(&affiliation_key(i));
            if value.is_empty() || value == NONE_VALUE {
                break;
            }
            values.push(value);
        }
        values
    }

    // -- Markup ------------------------------------------------------------

    /// Read a card from card markup.
    ///
    /// Every child element of `<Card>` becomes a field; blank values are
    /// skipped. Fails if the document has no `<Card>` element.
    pub fn load_xml<R: BufRead>(input: R) -> Result<Card> {
        let mut reader = Reader::from_reader(input);
        let mut buf = Vec::new();
        let mut card = Card::new();
        let mut found_root = false;
        let mut depth = 0usize;
        let mut current: Option<(String, String)> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let name = element_name(&e)?;
                    if !found_root {
                        if name == CARD_ELEMENT {
                            found_root = true;
                            depth = 1;
                        }
                    } else {
                        depth += 1;
                        if depth == 2 {
                            current = Some((name, String::new()));
                        }
                    }
                }
                Event::Empty(e) if !found_root => {
                    if element_name(&e)? == CARD_ELEMENT {
                        found_root = true;
                        break;
                    }
                }
                Event::Text(t) => {
                    if let Some((_, text)) = current.as_mut() {
                        text.push_str(&t.unescape()?);
                    }
                }
                Event::CData(c) => {
                    if let Some((_, text)) = current.as_mut() {
                        text.push_str(&String::from_utf8_lossy(&c));
                    }
                }
                Event::End(_) if found_root => {
                    if depth == 2 {
                        if let Some((key, value)) = current.take() {
                            if !value.trim().is_empty() {
                                card.data.insert(key, value);
                            }
                        }
                    }
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !found_root {
            return Err(ComposeError::MissingRoot(CARD_ELEMENT.to_string()));
        }
        Ok(card)
    }

    /// Write the card as card markup, skipping blank keys and values.
    ///
    /// Fails with [`ComposeError::InvalidValue`] before writing anything if a
    /// field key is not a valid element name.
    pub fn save_xml<W: Write>(&self, output: W) -> Result<()> {
        if let Some(bad) = self
            .data
            .iter()
            .find(|(k, v)| !k.trim().is_empty() && !v.trim().is_empty() && !is_element_name(k))
            .map(|(k, _)| k)
        {
            return Err(ComposeError::InvalidValue(format!(
                "field key '{bad}' is not a valid element name"
            )));
        }

        let mut writer = Writer::new_with_indent(output, b' ', 2);

        let comment = format!(" Created with {} v{}. ", APP_NAME, APP_VERSION);
        writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?;
        writer.write_event(Event::Start(BytesStart::new(CARD_ELEMENT)))?;

        for (key, value) in &self.data {
            if key.trim().is_empty() || value.trim().is_empty() {
                continue;
            }
            writer.write_event(Event::Start(BytesStart::new(key.as_str())))?;
            writer.write_event(Event::Text(BytesText::new(value)))?;
            writer.write_event(Event::End(BytesEnd::new(key.as_str())))?;
        }

        writer.write_event(Event::End(BytesEnd::new(CARD_ELEMENT)))?;
        writer.into_inner().flush()?;
        Ok(())
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Card> {
        let file = fs::File::open(path)?;
        Card::load_xml(BufReader::new(file))
    }

    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = fs::File::create(path)?;
        self.save_xml(BufWriter::new(file))
    }

    // -- JSON --------------------------------------------------------------

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Card> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Field key of the 1-based affiliation slot (`Affiliation`, `Affiliation2`, ...).
pub fn affiliation_key(index: usize) -> String {
    if index > 1 {
        format!("{}{}", AFFILIATION_KEY, index)
    } else {
        AFFILIATION_KEY.to_string()
    }
}

/// Field key holding the embedded payload for a `Custom` enum selection.
pub fn custom_payload_key(enum_id: &str) -> String {
    format!("Custom{}", enum_id)
}

/// An XML element name: a letter or `_` followed by letters, digits, `_`,
/// `-` or `.`.
fn is_element_name(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn element_name(e: &BytesStart<'_>) -> Result<String> {
    std::str::from_utf8(e.name().as_ref())
        .map(|s| s.to_string())
        .map_err(|err| ComposeError::InvalidValue(format!("element name is not UTF-8: {err}")))
}
