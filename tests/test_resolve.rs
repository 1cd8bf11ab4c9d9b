//! Override chain construction.

use std::collections::HashMap;

use card_composer::resolve::{dual_axis, first_match, single_axis, suffixes};

#[test]
fn single_axis_tries_value_then_bare_id() {
    assert_eq!(
        single_axis("Border", Some("Premiere")),
        vec!["Border.Premiere", "Border"]
    );
    assert_eq!(single_axis("Border", None), vec!["Border"]);
}

#[test]
fn dual_axis_yields_six_candidates_most_specific_first() {
    let ids = dual_axis(
        ("TypedTextBox", Some("ThreeLoreThreeGametext")),
        ("ExpansionIcon", Some("Premiere")),
    );

    assert_eq!(
        ids,
        vec![
            "TypedTextBox.ThreeLoreThreeGametext.ExpansionIcon.Premiere",
            "TypedTextBox.ThreeLoreThreeGametext.ExpansionIcon",
            "TypedTextBox.ExpansionIcon.Premiere",
            "TypedTextBox.ExpansionIcon",
            "ExpansionIcon.Premiere",
            "ExpansionIcon",
        ]
    );
}

#[test]
fn dual_axis_order_depends_only_on_inputs() {
    let pairs = [
        (("A", "1"), ("B", "2")),
        (("MissionTextBox", "Standard"), ("ExpansionIcon", "Custom")),
        (("X", "y.z"), ("W", "v")),
    ];

    for ((e1, v1), (e2, v2)) in pairs {
        let ids = dual_axis((e1, Some(v1)), (e2, Some(v2)));
        assert_eq!(ids.len(), 6);
        assert_eq!(ids[0], format!("{e1}.{v1}.{e2}.{v2}"));
        assert_eq!(ids[1], format!("{e1}.{v1}.{e2}"));
        assert_eq!(ids[2], format!("{e1}.{e2}.{v2}"));
        assert_eq!(ids[3], format!("{e1}.{e2}"));
        assert_eq!(ids[4], format!("{e2}.{v2}"));
        assert_eq!(ids[5], e2);
        assert_eq!(ids, dual_axis((e1, Some(v1)), (e2, Some(v2))));
    }
}

#[test]
fn dual_axis_drops_candidates_needing_missing_values() {
    assert_eq!(
        dual_axis(("TypedTextBox", None), ("ExpansionIcon", Some("Premiere"))),
        vec![
            "TypedTextBox.ExpansionIcon.Premiere",
            "TypedTextBox.ExpansionIcon",
            "ExpansionIcon.Premiere",
            "ExpansionIcon",
        ]
    );
    assert_eq!(
        dual_axis(("TypedTextBox", Some("SevenGametext")), ("ExpansionIcon", None)),
        vec![
            "TypedTextBox.SevenGametext.ExpansionIcon",
            "TypedTextBox.ExpansionIcon",
            "ExpansionIcon",
        ]
    );
}

#[test]
fn suffixes_strip_leading_segments() {
    assert_eq!(
        suffixes("TypedTextBox.ThreeLoreThreeGametext.Title"),
        vec![
            "TypedTextBox.ThreeLoreThreeGametext.Title",
            "ThreeLoreThreeGametext.Title",
            "Title",
        ]
    );
    assert_eq!(suffixes("InnerBorder"), vec!["InnerBorder"]);
    assert_eq!(suffixes("Trailing."), vec!["Trailing."]);
}

#[test]
fn first_match_returns_first_hit_with_its_id() {
    let boxes: HashMap<&str, u32> = [("Title", 1), ("ThreeLoreThreeGametext.Title", 2)]
        .into_iter()
        .collect();
    let chain = suffixes("TypedTextBox.ThreeLoreThreeGametext.Title");

    let hit = first_match(&chain, |id| boxes.get(id).copied());

    assert_eq!(hit, Some(("ThreeLoreThreeGametext.Title", 2)));
    assert_eq!(first_match(&chain, |_| None::<u32>), None);
}
