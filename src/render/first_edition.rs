//! First Edition card renderer.

use crate::cache::AssetCache;
use crate::error::{ComposeError, Result};
use crate::models::card::{
    custom_payload_key, Card, CardType, Edition, ART_KEY, BORDER_KEY, COPYRIGHT_KEY,
    EXPANSION_ICON_KEY, GAMETEXT_KEY, LORE_KEY, PROPERTY_LOGO_KEY, RARITY_KEY, SPAN_KEY,
    TITLE_KEY,
};
use crate::models::draw::{DrawOp, Stretch};
use crate::models::dynamic_enum::{is_custom, NONE_VALUE};
use crate::models::layout::Config;
use crate::render::steps::{first_edition_steps, Step, TextBoxSource};
use crate::render::{BoxChain, Canvas, CardRenderer, RenderOptions};
use crate::resolve::{dual_axis, single_axis, suffixes};

const INNER_BORDER: &str = "InnerBorder";
const TYPED_TITLE: &str = "TypedTitle";
const Q_OVERLAY: &str = "TypedTitle.Q";
const Q_TEXT_BOX: &str = "TypedTextBox.Q";
const AFFILIATION_BOX: &str = "AffiliationBox";
const AFFILIATION_COLOR: &str = "AffiliationColor";
const AFFILIATION_LOGO: &str = "Affiliation";

#[derive(Debug, Clone, Copy, Default)]
pub struct FirstEditionRenderer;

impl CardRenderer for FirstEditionRenderer {
    fn edition(&self) -> Edition {
        Edition::FirstEdition
    }

    fn render(
        &self,
        card: &Card,
        config: &Config,
        cache: &AssetCache,
        options: RenderOptions,
    ) -> Result<Vec<DrawOp>> {
        let found = card.edition();
        if found != self.edition() {
            return Err(ComposeError::EditionMismatch {
                expected: self.edition(),
                found,
            });
        }

        let card_type = card.card_type();
        let mut canvas = Canvas::new(config, cache, options);
        for step in first_edition_steps(card_type) {
            run_step(&mut canvas, card, card_type, step);
        }

        let ops = canvas.into_ops();
        log::debug!(
            "Rendered {} card '{}' with {} ({} ops)",
            card_type,
            card.value(TITLE_KEY),
            config.cache_key(),
            ops.len()
        );
        Ok(ops)
    }
}

fn run_step(canvas: &mut Canvas<'_>, card: &Card, card_type: CardType, step: Step) {
    match step {
        Step::Background => {
            canvas.add_background();
        }
        Step::Art(box_id) => {
            canvas.add_embedded_image(
                ART_KEY,
                card.value(ART_KEY),
                &[box_id.to_string()],
                Stretch::UniformToFill,
            );
        }
        Step::TitleBar(id) | Step::ArtBorder(id) => {
            canvas.add_image(&[id.to_string()], BoxChain::Suffixes);
        }
        Step::TitleGraphic(name) => {
            canvas.add_image(&[format!("{TYPED_TITLE}.{name}")], BoxChain::Suffixes);
        }
        Step::QOverlay => {
            canvas.add_image(&[Q_OVERLAY.to_string()], BoxChain::Suffixes);
        }
        Step::PropertyLogo => add_enum_image(canvas, card, PROPERTY_LOGO_KEY, None),
        Step::Border => add_enum_image(canvas, card, BORDER_KEY, None),
        Step::TextBoxFrame(source) => add_text_box_frame(canvas, card, card_type, source),
        Step::TypedText(source) => {
            add_text_runs(canvas, card, source, &[TITLE_KEY], &[LORE_KEY, GAMETEXT_KEY]);
        }
        Step::MissionText(source) => {
            add_text_runs(
                canvas,
                card,
                source,
                &[TITLE_KEY, SPAN_KEY],
                &[LORE_KEY, GAMETEXT_KEY],
            );
        }
        Step::Copyright => add_type_keyed_text(canvas, card, card_type, COPYRIGHT_KEY),
        Step::Rarity => add_type_keyed_text(canvas, card, card_type, RARITY_KEY),
        Step::ExpansionIcon(source) => add_enum_image(canvas, card, EXPANSION_ICON_KEY, source),
        Step::InnerBorder => {
            canvas.add_image(&[INNER_BORDER.to_string()], BoxChain::Suffixes);
        }
        Step::AffiliationBoxes => add_affiliation_boxes(canvas, card),
    }
}

// ---------------------------------------------------------------------------
// Enum-keyed images
// ---------------------------------------------------------------------------

/// The card's value for an enum-keyed field.
///
/// With a config enum the card value is read through it (blank reads as the
/// enum default). Without one, a non-blank card value is used as is.
fn enum_selection(card: &Card, config: &Config, key: &str) -> Option<String> {
    let value = match config.dynamic_enum(key) {
        Some(dynamic_enum) => card.dynamic_value(dynamic_enum),
        None => card.value(key),
    };
    (!value.is_empty()).then(|| value.to_string())
}

fn text_box_selection(card: &Card, config: &Config, source: TextBoxSource) -> Option<String> {
    match source {
        TextBoxSource::Enum(key) => enum_selection(card, config, key),
        TextBoxSource::Fixed(_, value) => Some(value.to_string()),
    }
}

/// Draw the image selected by an enum field.
///
/// `None` draws nothing and `Custom` draws the card's embedded payload. When
/// `text_box` is given, the box is resolved with the dual-axis chain against
/// the text box layout; otherwise the suffix chain of the image id is used.
fn add_enum_image(
    canvas: &mut Canvas<'_>,
    card: &Card,
    key: &str,
    text_box: Option<TextBoxSource>,
) {
    let config = canvas.config();
    let value = enum_selection(card, config, key);
    if value.as_deref() == Some(NONE_VALUE) {
        return;
    }

    let boxes = text_box.map(|source| {
        let layout = text_box_selection(card, config, source);
        dual_axis(
            (source.key(), layout.as_deref()),
            (key, value.as_deref()),
        )
    });

    match value.as_deref() {
        Some(v) if is_custom(v) => {
            let box_ids = boxes.unwrap_or_else(|| single_axis(key, Some(v)));
            canvas.add_embedded_image(
                key,
                card.value(&custom_payload_key(key)),
                &box_ids,
                Stretch::Uniform,
            );
        }
        _ => {
            let ids = single_axis(key, value.as_deref());
            match &boxes {
                Some(box_ids) => canvas.add_image(&ids, BoxChain::Explicit(box_ids)),
                None => canvas.add_image(&ids, BoxChain::Suffixes),
            };
        }
    }
}

/// Frame image for the card's text box layout.
///
/// Q cards fall back to the shared `TypedTextBox.Q` frame after their own
/// enum chain.
fn add_text_box_frame(
    canvas: &mut Canvas<'_>,
    card: &Card,
    card_type: CardType,
    source: TextBoxSource,
) {
    let key = source.key();
    let value = text_box_selection(card, canvas.config(), source);

    if let (TextBoxSource::Enum(_), Some(v)) = (source, value.as_deref()) {
        if v == NONE_VALUE {
            return;
        }
        if is_custom(v) {
            canvas.add_embedded_image(
                key,
                card.value(&custom_payload_key(key)),
                &single_axis(key, Some(v)),
                Stretch::Uniform,
            );
            return;
        }
    }

    let mut ids = single_axis(key, value.as_deref());
    if card_type.is_q_typed() {
        ids.push(Q_TEXT_BOX.to_string());
    }
    canvas.add_image(&ids, BoxChain::Explicit(&ids));
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// Place text runs for a text box layout.
///
/// `plain` fields use `{key}.{field}`; `layout_keyed` fields use
/// `{key}.{layout}.{field}`. Both fall back along the suffix chain.
fn add_text_runs(
    canvas: &mut Canvas<'_>,
    card: &Card,
    source: TextBoxSource,
    plain: &[&str],
    layout_keyed: &[&str],
) {
    let key = source.key();
    let layout = text_box_selection(card, canvas.config(), source);

    for field in plain {
        canvas.add_text(&suffixes(&format!("{key}.{field}")), card.value(field));
    }
    for field in layout_keyed {
        let id = match &layout {
            Some(layout) => format!("{key}.{layout}.{field}"),
            None => format!("{key}.{field}"),
        };
        canvas.add_text(&suffixes(&id), card.value(field));
    }
}

/// Copyright and rarity lines can be placed per card type.
fn add_type_keyed_text(canvas: &mut Canvas<'_>, card: &Card, card_type: CardType, key: &str) {
    canvas.add_text(&single_axis(key, Some(card_type.as_str())), card.value(key));
}

// ---------------------------------------------------------------------------
// Affiliations
// ---------------------------------------------------------------------------

/// Player-box overlays for mission cards.
///
/// Each affiliation gets a top and bottom box keyed by affiliation count and
/// 1-based index (`AffiliationBox.2.1.Top`). Boxes are filled with the
/// `AffiliationColor.{name}` brush and then the `Affiliation.{name}` logo.
fn add_affiliation_boxes(canvas: &mut Canvas<'_>, card: &Card) {
    let config = canvas.config();
    let cache = canvas.cache();
    let affiliations = card.affiliations();
    let count = affiliations.len();

    for (index, affiliation) in affiliations.iter().enumerate() {
        for side in ["Top", "Bottom"] {
            let box_id = format!("{AFFILIATION_BOX}.{count}.{}.{side}", index + 1);
            let Some(descriptor) = config.image_box(&box_id) else {
                log::debug!("No affiliation box '{}'", box_id);
                continue;
            };
            let b = &descriptor.bounds;

            if let Some(color) = cache.brush(config, &format!("{AFFILIATION_COLOR}.{affiliation}")) {
                canvas.fill_rect(b.x, b.y, b.width, b.height, color);
            }
            canvas.add_image(
                &[format!("{AFFILIATION_LOGO}.{affiliation}")],
                BoxChain::Explicit(&[box_id]),
            );
        }
    }
}
