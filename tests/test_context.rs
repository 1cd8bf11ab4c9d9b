//! RenderContext construction, lookup and reload.

mod common;

use std::fs;

use card_composer::{
    draw_ops_to_json, CardType, ComposeError, ConfigRegistry, DrawOp, Edition, Platform,
    RenderContext, RenderOptions,
};

fn context(assets: &common::Assets) -> RenderContext {
    let path = assets.write("config.xml", common::FULL_CONFIG);
    RenderContext::builder()
        .config_file(path)
        .platform(Platform::Linux)
        .build()
        .unwrap()
}

#[test]
fn builder_loads_config_file() {
    let assets = common::Assets::standard();
    let ctx = context(&assets);

    assert_eq!(ctx.registry().len(), 1);
    assert!(!ctx.options().debug);
    assert_eq!(ctx.options().platform, Platform::Linux);
}

#[test]
fn builder_fails_for_missing_file() {
    let err = RenderContext::builder()
        .config_file("/no/such/config.xml")
        .build()
        .unwrap_err();

    assert!(matches!(err, ComposeError::Io(_)));
}

#[test]
fn render_uses_default_config_for_card_edition() {
    let assets = common::Assets::standard();
    let ctx = context(&assets);

    let ops = ctx.render(&common::card(CardType::Artifact, "Tricorder")).unwrap();

    assert!(common::find_text(&ops, "Tricorder").is_some());
    assert!(ctx.cache().image_count() > 0);
}

#[test]
fn render_without_config_for_edition_is_not_found() {
    let assets = common::Assets::standard();
    let ctx = context(&assets);
    let mut card = common::card(CardType::Artifact, "Tricorder");
    card.set_edition(Edition::SecondEdition);

    let err = ctx.render(&card).unwrap_err();

    assert!(matches!(err, ComposeError::NotFound(_)));
}

#[test]
fn render_named_uses_that_variant() {
    let assets = common::Assets::standard();
    let path = assets.write(
        "config.xml",
        &format!(
            r#"<configs>{}
               <config edition="FirstEdition" name="Regional">
                 <textbox id="TypedTextBox.Title" x="5" y="6" width="100" height="20"/>
               </config>
               </configs>"#,
            common::FULL_CONFIG
        ),
    );
    let ctx = RenderContext::builder()
        .config_file(path)
        .platform(Platform::Linux)
        .build()
        .unwrap();
    let card = common::card(CardType::Artifact, "Tricorder");

    let regional = ctx.render_named(&card, "Regional").unwrap();
    let default = ctx.render_named(&card, "Default").unwrap();

    assert_eq!(regional.len(), 1, "{regional:?}");
    assert!(matches!(
        common::find_text(&regional, "Tricorder"),
        Some(DrawOp::PlaceText { x, y, .. }) if (*x, *y) == (5.0, 6.0)
    ));
    assert_eq!(default, ctx.render(&card).unwrap());
}

#[test]
fn render_named_with_unknown_variant_is_not_found() {
    let assets = common::Assets::standard();
    let ctx = context(&assets);

    let err = ctx
        .render_named(&common::card(CardType::Artifact, "Tricorder"), "Regional")
        .unwrap_err();

    assert!(matches!(err, ComposeError::NotFound(ref msg) if msg.contains("Regional")));
}

#[test]
fn second_edition_has_no_renderer() {
    let registry = ConfigRegistry::load_xml(
        r#"<config edition="SecondEdition"/>"#.as_bytes(),
        std::path::Path::new("."),
    )
    .unwrap();
    let ctx = RenderContext::new(registry, RenderOptions::default());
    let mut card = common::card(CardType::Artifact, "Tricorder");
    card.set_edition(Edition::SecondEdition);

    assert!(ctx.config_for(&card).is_ok());
    assert!(matches!(ctx.render(&card), Err(ComposeError::NotFound(_))));
}

#[test]
fn debug_toggle_applies_to_later_renders() {
    let assets = common::Assets::standard();
    let mut ctx = context(&assets);
    let card = common::card(CardType::Artifact, "Tricorder");
    let plain = ctx.render(&card).unwrap().len();

    ctx.set_debug(true);
    let debug = ctx.render(&card).unwrap().len();

    assert!(debug > plain);
}

#[test]
fn reload_picks_up_changes_and_clears_cache() {
    let assets = common::Assets::standard();
    let mut ctx = context(&assets);
    ctx.render(&common::card(CardType::Artifact, "Tricorder")).unwrap();
    assert!(ctx.cache().image_count() > 0);

    fs::write(
        assets.path().join("config.xml"),
        common::FULL_CONFIG.replace(r#"name="Default""#, r#"name="Regional""#)
            + r#"<config edition="FirstEdition"/>"#,
    )
    .unwrap();
    ctx.reload().unwrap();

    assert_eq!(ctx.cache().image_count(), 0);
    assert_eq!(ctx.registry().names(Edition::FirstEdition), vec!["Default", "Regional"]);
}

#[test]
fn reload_without_file_fails() {
    let mut ctx = RenderContext::new(ConfigRegistry::new(), RenderOptions::default());

    assert!(matches!(ctx.reload(), Err(ComposeError::NotFound(_))));
}

#[test]
fn editable_fields_use_default_config() {
    let assets = common::Assets::standard();
    let ctx = context(&assets);

    let fields = ctx.editable_fields(&common::card(CardType::MissionBoth, "Vulcan"));

    assert!(fields.iter().any(|f| f.key == "MissionTextBox" && f.enabled));
}

#[test]
fn draw_ops_export_as_tagged_json() {
    let assets = common::Assets::standard();
    let ctx = context(&assets);
    let ops = ctx.render(&common::card(CardType::Artifact, "Tricorder")).unwrap();

    let json = draw_ops_to_json(&ops).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let ops_json = value.as_array().unwrap();
    assert_eq!(ops_json.len(), ops.len());
    assert_eq!(ops_json[0]["op"], "FillRect");
    let frame = ops_json
        .iter()
        .find(|op| op["op"] == "PlaceImage")
        .unwrap();
    assert_eq!(frame["asset"]["id"], "TypedTextBox.ThreeLoreThreeGametext");
    assert!(frame["asset"].get("image").is_none());
}

#[test]
fn display_summarizes_context() {
    let assets = common::Assets::standard();
    let ctx = context(&assets);

    let text = ctx.to_string();

    assert!(text.contains("FirstEdition.Default"), "{text}");
    assert!(text.contains("platform=Linux"), "{text}");
}

// ---------------------------------------------------------------------------
// Async
// ---------------------------------------------------------------------------

#[cfg(feature = "async")]
mod async_context {
    use super::common;
    use card_composer::{AsyncRenderContext, CardType};

    #[tokio::test]
    async fn renders_on_blocking_pool() {
        let assets = common::Assets::standard();
        let path = assets.write("config.xml", common::FULL_CONFIG);
        let ctx = AsyncRenderContext::builder()
            .config_file(path)
            .build()
            .await
            .unwrap();

        let ops = ctx
            .render(common::card(CardType::Artifact, "Tricorder"))
            .await
            .unwrap();
        assert!(common::find_text(&ops, "Tricorder").is_some());

        let all = ctx
            .render_all(vec![
                common::card(CardType::Artifact, "Tricorder"),
                common::card(CardType::MissionSpace, "Vulcan"),
            ])
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert!(common::find_text(&all[1], "Vulcan").is_some());
    }
}
