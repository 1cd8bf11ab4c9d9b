//! Per-card-type step tables for the First Edition renderer.
//!
//! Each card type maps to the ordered list of elements it draws. Steps run
//! in table order (later steps paint over earlier ones); a step whose
//! descriptors or assets are missing contributes nothing.

use crate::models::card::{
    CardType, MISSION_TEXT_BOX_KEY, Q_TYPED_TEXT_BOX_KEY, TYPED_TEXT_BOX_KEY,
};

pub const TYPED_TITLE_BAR: &str = "TypedTitleBar";
pub const MISSION_TITLE_BAR: &str = "MissionTitleBar";

pub const ART_BOX_MEDIUM: &str = "ArtBox.Medium";
pub const ART_BOX_EXTRA_LARGE: &str = "ArtBox.ExtraLarge";
pub const ART_BOX_WIDE: &str = "ArtBox.Wide";

pub const ART_BORDER_MEDIUM: &str = "ArtBorder.Medium";
pub const ART_BORDER_WIDE: &str = "ArtBorder.Wide";

pub const SEVEN_GAMETEXT: &str = "SevenGametext";

/// Which text box layout a card uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBoxSource {
    /// Selected by the card's value for this dynamic enum.
    Enum(&'static str),
    /// Always this layout, regardless of the card.
    Fixed(&'static str, &'static str),
}

impl TextBoxSource {
    pub fn key(self) -> &'static str {
        match self {
            TextBoxSource::Enum(key) | TextBoxSource::Fixed(key, _) => key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Black rectangle inset by `InnerRectMargin`.
    Background,
    /// Embedded card art in the given image box.
    Art(&'static str),
    TitleBar(&'static str),
    /// `TypedTitle.{name}` graphic.
    TitleGraphic(&'static str),
    /// `TypedTitle.Q` drawn over the title graphic.
    QOverlay,
    PropertyLogo,
    TextBoxFrame(TextBoxSource),
    /// Title, lore and gametext.
    TypedText(TextBoxSource),
    /// Title, lore, gametext and span.
    MissionText(TextBoxSource),
    Copyright,
    Rarity,
    /// Expansion icon; its box can be overridden per text box layout.
    ExpansionIcon(Option<TextBoxSource>),
    Border,
    InnerBorder,
    AffiliationBoxes,
    ArtBorder(&'static str),
}

/// Steps for a card type, in draw order.
pub fn first_edition_steps(card_type: CardType) -> Vec<Step> {
    use CardType::*;

    let enum_text_box = TextBoxSource::Enum(TYPED_TEXT_BOX_KEY);
    let seven_gametext = TextBoxSource::Fixed(TYPED_TEXT_BOX_KEY, SEVEN_GAMETEXT);

    match card_type {
        Artifact | DilemmaBoth | DilemmaPlanet | DilemmaSpace | Event | Equipment | Interrupt => {
            typed(card_type.as_str(), ART_BOX_MEDIUM, enum_text_box, Some(ART_BORDER_MEDIUM), false)
        }
        Incident | Objective => typed(
            card_type.as_str(),
            ART_BOX_MEDIUM,
            seven_gametext,
            Some(ART_BORDER_MEDIUM),
            false,
        ),
        Doorway => typed(card_type.as_str(), ART_BOX_EXTRA_LARGE, seven_gametext, None, false),
        QArtifact => q_typed(Artifact),
        QDilemma => q_typed(DilemmaBoth),
        QEvent => q_typed(Event),
        QInterrupt => q_typed(Interrupt),
        MissionBoth | MissionPlanet | MissionSpace => mission(),
        Tactic => vec![
            Step::Background,
            Step::TitleBar(TYPED_TITLE_BAR),
            Step::TitleGraphic(card_type.as_str()),
            Step::Copyright,
            Step::Rarity,
            Step::ExpansionIcon(None),
            Step::Border,
            Step::InnerBorder,
        ],
        Facility | Personnel | Ship | QMission => vec![
            Step::Background,
            Step::Copyright,
            Step::Rarity,
            Step::ExpansionIcon(None),
            Step::Border,
            Step::InnerBorder,
        ],
    }
}

fn typed(
    title: &'static str,
    art_box: &'static str,
    text_box: TextBoxSource,
    art_border: Option<&'static str>,
    q_overlay: bool,
) -> Vec<Step> {
    let mut steps = vec![
        Step::Background,
        Step::Art(art_box),
        Step::TitleBar(TYPED_TITLE_BAR),
        Step::TitleGraphic(title),
    ];
    if q_overlay {
        steps.push(Step::QOverlay);
    }
    steps.extend([
        Step::PropertyLogo,
        Step::TextBoxFrame(text_box),
        Step::TypedText(text_box),
        Step::Copyright,
        Step::Rarity,
        Step::ExpansionIcon(Some(text_box)),
        Step::Border,
        Step::InnerBorder,
    ]);
    if let Some(border) = art_border {
        steps.push(Step::ArtBorder(border));
    }
    steps
}

/// Q cards reuse the base type's title graphic with the Q overlay on top.
fn q_typed(base: CardType) -> Vec<Step> {
    typed(
        base.as_str(),
        ART_BOX_MEDIUM,
        TextBoxSource::Enum(Q_TYPED_TEXT_BOX_KEY),
        Some(ART_BORDER_MEDIUM),
        true,
    )
}

fn mission() -> Vec<Step> {
    let text_box = TextBoxSource::Enum(MISSION_TEXT_BOX_KEY);
    vec![
        Step::Background,
        Step::Art(ART_BOX_WIDE),
        Step::TitleBar(MISSION_TITLE_BAR),
        Step::TextBoxFrame(text_box),
        Step::MissionText(text_box),
        Step::Copyright,
        Step::Rarity,
        Step::ExpansionIcon(Some(text_box)),
        Step::Border,
        Step::InnerBorder,
        Step::AffiliationBoxes,
        Step::ArtBorder(ART_BORDER_WIDE),
    ]
}
