//! Edit sessions and the editor field model.

mod common;

use card_composer::{
    editable_fields, Card, CardSession, CardType, ComposeError, Edition, FieldKind,
};

// ---------------------------------------------------------------------------
// Dirty tracking
// ---------------------------------------------------------------------------

#[test]
fn new_card_is_dirty_until_saved() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = CardSession::new_card();

    assert!(session.is_dirty());
    assert!(session.changed_keys().is_empty());

    session.save_as(dir.path().join("new.xml")).unwrap();
    assert!(!session.is_dirty());
}

#[test]
fn opened_card_is_clean_and_tracks_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tricorder.xml");
    common::card(CardType::Artifact, "Tricorder")
        .save_file(&path)
        .unwrap();

    let mut session = CardSession::open(&path).unwrap();
    assert!(!session.is_dirty());
    assert!(session.file().unwrap().ends_with("tricorder.xml"));

    assert!(!session.set_value("Title", "Tricorder"));
    assert!(!session.is_dirty());

    assert!(session.set_value("Title", "Medical Tricorder"));
    assert!(session.set_value("Lore", "Scans lifeforms."));
    assert!(session.is_dirty());
    assert_eq!(session.changed_keys(), vec!["Lore", "Title"]);
}

#[test]
fn setting_a_value_back_clears_dirty_state() {
    let mut session = CardSession::from_card(common::card(CardType::Event, "Red Alert!"));

    session.set_card_type(CardType::Interrupt);
    assert!(session.is_dirty());
    session.set_card_type(CardType::Event);
    assert!(!session.is_dirty());
}

#[test]
fn revert_restores_snapshot() {
    let original = common::card(CardType::Event, "Red Alert!");
    let mut session = CardSession::from_card(original.clone());

    session.set_value("Title", "Yellow Alert");
    session.set_edition(Edition::SecondEdition);
    session.revert();

    assert_eq!(session.card(), &original);
    assert!(!session.is_dirty());
}

#[test]
fn save_commits_snapshot_and_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("card.xml");
    let mut session = CardSession::new_card();
    session.set_value("Title", "Tricorder");
    session.save_as(&path).unwrap();

    session.set_value("Title", "Phaser");
    session.save().unwrap();

    assert!(!session.is_dirty());
    assert_eq!(session.original().value("Title"), "Phaser");
    assert_eq!(Card::load_file(&path).unwrap().value("Title"), "Phaser");
}

#[test]
fn save_without_file_fails() {
    let mut session = CardSession::new_card();

    let err = session.save().unwrap_err();

    assert!(matches!(err, ComposeError::NotFound(_)));
    assert!(session.is_dirty());
}

#[test]
fn open_missing_file_fails() {
    assert!(CardSession::open("/no/such/card.xml").is_err());
}

#[test]
fn dynamic_fields_edit_through_friendly_values() {
    let assets = common::Assets::standard();
    let config = assets.load(common::FULL_CONFIG);
    let text_boxes = config.dynamic_enum("TypedTextBox").unwrap();
    let mut session = CardSession::from_card(common::card(CardType::Artifact, "Tricorder"));

    assert_eq!(session.dynamic_friendly(text_boxes), "Three Lore Three Gametext");

    assert!(session.set_dynamic_friendly(text_boxes, "Seven Gametext"));
    assert_eq!(session.card().value("TypedTextBox"), "SevenGametext");

    // Unknown friendly input clamps to the first value.
    session.set_dynamic_friendly(text_boxes, "Eleven Gametext");
    assert_eq!(session.card().value("TypedTextBox"), "ThreeLoreThreeGametext");

    session.set_value("TypedTextBox", "Stale");
    assert_eq!(session.dynamic_friendly(text_boxes), "Three Lore Three Gametext");
}

// ---------------------------------------------------------------------------
// Editor fields
// ---------------------------------------------------------------------------

fn keys(fields: &[card_composer::EditorField]) -> Vec<&str> {
    fields.iter().map(|f| f.key.as_str()).collect()
}

#[test]
fn second_edition_only_offers_edition() {
    let mut card = Card::new();
    card.set_edition(Edition::SecondEdition);

    let fields = editable_fields(&card, None);

    assert_eq!(keys(&fields), vec!["Edition"]);
    assert_eq!(fields[0].kind, FieldKind::Edition);
}

#[test]
fn first_edition_fields_follow_config_enums() {
    let assets = common::Assets::standard();
    let config = assets.load(common::FULL_CONFIG);
    let card = common::card(CardType::Artifact, "Tricorder");

    let fields = editable_fields(&card, Some(&config));

    assert_eq!(
        keys(&fields),
        vec![
            "Edition",
            "CardType",
            "Border",
            "ExpansionIcon",
            "TypedTextBox",
            "MissionTextBox",
            "Affiliation",
            "Affiliation2",
            "Affiliation3",
            "Affiliation4",
            "Affiliation5",
            "Title",
            "Lore",
            "Gametext",
            "Span",
            "Copyright",
            "Rarity",
            "Art",
        ]
    );
}

#[test]
fn enablement_follows_card_type() {
    let assets = common::Assets::standard();
    let config = assets.load(common::FULL_CONFIG);
    let enabled = |card_type: CardType, key: &str| {
        let card = common::card(card_type, "x");
        editable_fields(&card, Some(&config))
            .into_iter()
            .find(|f| f.key == key)
            .map(|f| f.enabled)
            .unwrap()
    };

    assert!(enabled(CardType::Artifact, "TypedTextBox"));
    assert!(!enabled(CardType::Doorway, "TypedTextBox"));
    assert!(!enabled(CardType::Artifact, "MissionTextBox"));
    assert!(enabled(CardType::MissionPlanet, "MissionTextBox"));
    assert!(enabled(CardType::MissionPlanet, "Affiliation3"));
    assert!(!enabled(CardType::Artifact, "Affiliation"));
    assert!(!enabled(CardType::Objective, "Lore"));
    assert!(enabled(CardType::MissionBoth, "Span"));
    assert!(!enabled(CardType::Personnel, "Art"));
}

#[test]
fn enum_fields_carry_their_values() {
    let assets = common::Assets::standard();
    let config = assets.load(common::FULL_CONFIG);
    let card = common::card(CardType::Artifact, "Tricorder");

    let fields = editable_fields(&card, Some(&config));
    let border = fields.iter().find(|f| f.key == "Border").unwrap();

    assert_eq!(border.friendly_key, "Border");
    match &border.kind {
        FieldKind::DynamicEnum(e) => {
            assert_eq!(e.friendly_values(), ["Premiere", "Alternate Universe", "Custom"]);
        }
        other => panic!("unexpected {other:?}"),
    }
    let text_box = fields.iter().find(|f| f.key == "TypedTextBox").unwrap();
    assert_eq!(text_box.friendly_key, "Typed Text Box");
}
