//! Editor field model: which card fields an editor shows, and which are live
//! for the card's current type.

use serde::Serialize;

use crate::models::card::{
    affiliation_key, Card, CardEnum, CardType, Edition, AFFILIATION_KEY, ART_KEY, BORDER_KEY,
    COPYRIGHT_KEY, EXPANSION_ICON_KEY, GAMETEXT_KEY, LORE_KEY, MAX_AFFILIATIONS,
    MISSION_TEXT_BOX_KEY, PROPERTY_LOGO_KEY, Q_TYPED_TEXT_BOX_KEY, RARITY_KEY, SPAN_KEY,
    TITLE_KEY, TYPED_TEXT_BOX_KEY,
};
use crate::models::dynamic_enum::{friendly_value, DynamicEnum};
use crate::models::layout::Config;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "values")]
pub enum FieldKind {
    Edition,
    CardType,
    DynamicEnum(DynamicEnum),
    Text,
    /// Base64 image payload stored on the card.
    Image,
}

/// One editable field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorField {
    pub key: String,
    pub friendly_key: String,
    pub kind: FieldKind,
    /// `false` when the field has no effect for the card's current type.
    pub enabled: bool,
}

impl EditorField {
    fn new(key: &str, kind: FieldKind, enabled: bool) -> Self {
        Self {
            key: key.to_string(),
            friendly_key: friendly_value(key),
            kind,
            enabled,
        }
    }
}

/// Enum-backed fields in display order, with the card types they apply to.
const ENUM_FIELDS: &[(&str, fn(CardType) -> bool)] = &[
    (BORDER_KEY, always),
    (PROPERTY_LOGO_KEY, CardType::has_property_logo),
    (EXPANSION_ICON_KEY, always),
    (TYPED_TEXT_BOX_KEY, CardType::has_typed_text_box),
    (Q_TYPED_TEXT_BOX_KEY, CardType::is_q_typed),
    (MISSION_TEXT_BOX_KEY, CardType::is_mission),
];

const TEXT_FIELDS: &[(&str, fn(CardType) -> bool)] = &[
    (TITLE_KEY, always),
    (LORE_KEY, CardType::has_lore),
    (GAMETEXT_KEY, always),
    (SPAN_KEY, CardType::is_mission),
    (COPYRIGHT_KEY, always),
    (RARITY_KEY, always),
];

fn always(_: CardType) -> bool {
    true
}

/// Fields an editor shows for `card`.
///
/// The edition selector is always present. Everything else depends on the
/// edition having a layout: only First Edition does. Enum fields appear only
/// if `config` declares the enum; affiliation slots appear when it declares
/// an `Affiliation` enum.
pub fn editable_fields(card: &Card, config: Option<&Config>) -> Vec<EditorField> {
    let mut fields = vec![EditorField::new(Edition::KEY, FieldKind::Edition, true)];

    if card.edition() != Edition::FirstEdition {
        return fields;
    }

    let card_type = card.card_type();
    fields.push(EditorField::new(CardType::KEY, FieldKind::CardType, true));

    if let Some(config) = config {
        for (key, applies) in ENUM_FIELDS {
            if let Some(dynamic_enum) = config.dynamic_enum(key) {
                fields.push(EditorField::new(
                    key,
                    FieldKind::DynamicEnum(dynamic_enum.clone()),
                    applies(card_type),
                ));
            }
        }

        if let Some(affiliations) = config.dynamic_enum(AFFILIATION_KEY) {
            for slot in 1..=MAX_AFFILIATIONS {
                fields.push(EditorField::new(
                    &affiliation_key(slot),
                    FieldKind::DynamicEnum(affiliations.clone()),
                    card_type.has_affiliations(),
                ));
            }
        }
    }

    for (key, applies) in TEXT_FIELDS {
        fields.push(EditorField::new(key, FieldKind::Text, applies(card_type)));
    }

    let has_art = !matches!(
        card_type,
        CardType::Tactic | CardType::Facility | CardType::Personnel | CardType::Ship | CardType::QMission
    );
    fields.push(EditorField::new(ART_KEY, FieldKind::Image, has_art));

    fields
}
