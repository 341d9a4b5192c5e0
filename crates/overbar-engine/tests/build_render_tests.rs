//! End-to-end tests: configuration through pack build and flush to live
//! rendering.

use std::collections::HashMap;
use std::sync::Arc;

use overbar_engine::prelude::*;

struct Stub;

impl GlyphImage for Stub {
    fn encode(&self, layer: i32) -> Vec<u8> {
        vec![layer as u8, 0xAB]
    }
}

fn registry() -> TextRegistry {
    let chars = "0123456789/%";
    let mut registry = TextRegistry::new();
    registry.insert(
        "unicode",
        TextAsset::new(
            8,
            chars.chars().map(|c| (c, 5)).collect::<HashMap<_, _>>(),
            vec![TextStrip::new(vec![chars.to_owned()], Arc::new(Stub))],
        ),
    );
    registry
}

fn group(value: serde_json::Value) -> LayoutGroup {
    let placeholders = Placeholders::standard();
    LayoutGroup::from_value("boss", value, &registry(), &placeholders).unwrap()
}

fn pair(health: f64, max: f64) -> SubjectPair {
    SubjectPair::new(
        Subject::new("Zombie", health, max),
        Subject::new("Steve", 20.0, 20.0),
    )
}

// ---------------------------------------------------------------------------
// Build and flush
// ---------------------------------------------------------------------------

#[test]
fn pack_contains_expected_paths() {
    let mut group = group(serde_json::json!({
        "layer": 7,
        "texts": [{
            "name": "hp", "x": 0, "y": 12, "group-y": 10,
            "text": "unicode", "align": "left", "pattern": "[health]"
        }]
    }));
    let mut pack = OverlayPack::new("overbar");
    group.build(&mut pack, 2);

    let artifacts = pack.flush().unwrap();
    let paths: Vec<&str> = artifacts.iter().map(|a| a.path.as_str()).collect();
    assert_eq!(
        paths,
        [
            "assets/overbar/font/boss/hp/1.json",
            "assets/overbar/font/boss/hp/2.json",
            "assets/overbar/textures/boss/text/7/1.png",
        ]
    );
}

#[test]
fn texture_encodes_with_the_layout_layer() {
    let mut group = group(serde_json::json!({
        "texts": [{
            "name": "hp", "x": 0, "y": 0, "layer": 9,
            "text": "unicode", "align": "left", "pattern": "x"
        }]
    }));
    let mut pack = OverlayPack::new("overbar");
    group.build(&mut pack, 1);

    let artifacts = pack.flush().unwrap();
    let texture = artifacts
        .iter()
        .find(|a| a.path.ends_with(".png"))
        .unwrap();
    assert_eq!(texture.bytes, vec![9, 0xAB]);
}

#[test]
fn font_documents_follow_the_client_schema() {
    let mut group = group(serde_json::json!({
        "texts": [{
            "name": "hp", "x": 0, "y": 12, "group-y": 10, "scale": 2.0,
            "text": "unicode", "align": "left", "pattern": "x"
        }]
    }));
    let mut pack = OverlayPack::new("overbar");
    group.build(&mut pack, 2);

    let artifacts = pack.flush().unwrap();
    for (index, y) in [(1, 12), (2, 22)] {
        let font = artifacts
            .iter()
            .find(|a| a.path == format!("assets/overbar/font/boss/hp/{index}.json"))
            .unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&font.bytes).unwrap();
        let providers = doc["providers"].as_array().unwrap();
        assert_eq!(providers.len(), 2);
        assert_eq!(
            providers[0],
            serde_json::json!({ "type": "space", "advances": { " ": 4 } })
        );
        // height = 8 x 2.0 = 16; ascent = min(y, height).
        assert_eq!(providers[1]["type"], "bitmap");
        assert_eq!(providers[1]["file"], "overbar:boss/text/1/1.png");
        assert_eq!(providers[1]["height"], 16);
        assert_eq!(providers[1]["ascent"], y.min(16));
        assert_eq!(providers[1]["chars"], serde_json::json!(["0123456789/%"]));
    }
}

#[test]
fn two_identical_builds_flush_identical_digests() {
    let build = || {
        let mut group = group(serde_json::json!({
            "texts": [{
                "name": "hp", "x": 3, "y": 12, "group-x": 2, "group-y": 10,
                "text": "unicode", "align": "center", "pattern": "[health]"
            }]
        }));
        let mut pack = OverlayPack::new("overbar");
        group.build(&mut pack, 5);
        pack.flush()
            .unwrap()
            .into_iter()
            .map(|a| (a.path, a.digest))
            .collect::<Vec<_>>()
    };
    assert_eq!(build(), build());
}

#[test]
fn layouts_sharing_a_layer_share_the_texture() {
    let mut group = group(serde_json::json!({
        "layer": 4,
        "texts": [
            { "name": "hp", "x": 0, "y": 0, "text": "unicode",
              "align": "left", "pattern": "x" },
            { "name": "pct", "x": 0, "y": 10, "text": "unicode",
              "align": "left", "pattern": "y" }
        ]
    }));
    let mut pack = OverlayPack::new("overbar");
    group.build(&mut pack, 1);
    // Both members register boss/text/4/1.png; the first wins and the
    // bytes are identical by construction.
    assert_eq!(pack.texture_count(), 1);
    assert_eq!(pack.font_count(), 2);
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn renders_substituted_text_with_alignment() {
    let mut group = group(serde_json::json!({
        "texts": [{
            "name": "hp", "x": 100, "y": 12,
            "text": "unicode", "align": "right", "pattern": "[health]/[max-health]"
        }]
    }));
    let mut pack = OverlayPack::new("overbar");
    group.build(&mut pack, 1);

    let renderer = group.texts()[0].create_renderer(pair(14.0, 20.0));
    let component = renderer.render(0);
    assert_eq!(component.text, "14/20");
    // Five known characters at width 5 + 1 spacing each.
    assert_eq!(component.width, 30);
    assert_eq!(component.x, 100 - 30);
    assert_eq!(component.font.to_string(), "overbar:boss/hp/1");
}

#[test]
fn group_count_walks_the_width_keys() {
    let mut group = group(serde_json::json!({
        "texts": [{
            "name": "hp", "x": 0, "y": 0, "group-x": 10,
            "text": "unicode", "align": "left", "pattern": "x"
        }]
    }));
    let mut pack = OverlayPack::new("overbar");
    group.build(&mut pack, 3);

    let renderer = group.texts()[0].create_renderer(pair(10.0, 20.0));
    assert_eq!(renderer.render(0).font.to_string(), "overbar:boss/hp/1");
    assert_eq!(renderer.render(2).font.to_string(), "overbar:boss/hp/3");
    assert_eq!(renderer.render(50).font.to_string(), "overbar:boss/hp/3");
    assert_eq!(renderer.render(50).x, 20);
}

#[test]
fn conditions_gate_rendering_per_pair() {
    let group = group(serde_json::json!({
        "texts": [{
            "name": "hp", "x": 0, "y": 0,
            "conditions": [
                { "left": "percent", "op": "<", "right": "50" },
                { "left": "dead", "op": "==", "right": "false", "gate": "AND" }
            ],
            "text": "unicode", "align": "left", "pattern": "[health]"
        }]
    }));
    let layout = &group.texts()[0];
    assert!(layout.create_renderer(pair(4.0, 20.0)).can_render());
    assert!(!layout.create_renderer(pair(19.0, 20.0)).can_render());
    assert!(!layout.create_renderer(pair(0.0, 20.0)).can_render());
}

#[test]
fn duration_counts_down_across_ticks() {
    let group = group(serde_json::json!({
        "texts": [{
            "name": "hp", "x": 0, "y": 0, "duration": 2,
            "text": "unicode", "align": "left", "pattern": "[health]"
        }]
    }));
    let mut renderer = group.texts()[0].create_renderer(pair(10.0, 20.0));
    let mut shown = 0;
    while renderer.has_next() {
        shown += 1;
        assert!(shown <= 2, "renderer outlived its duration");
    }
    assert_eq!(shown, 2);
}

// ---------------------------------------------------------------------------
// Configuration failures
// ---------------------------------------------------------------------------

#[test]
fn invalid_configurations_fail_group_construction() {
    let placeholders = Placeholders::standard();
    let registry = registry();
    let cases = [
        // Unknown text asset.
        serde_json::json!({ "texts": [{ "name": "a", "x": 0, "y": 0,
            "text": "missing", "align": "left", "pattern": "x" }] }),
        // Unsupported gate keyword.
        serde_json::json!({ "texts": [{ "name": "a", "x": 0, "y": 0,
            "text": "unicode", "align": "left", "pattern": "x",
            "conditions": [{ "left": "health", "op": ">", "right": "0", "gate": "nand" }] }] }),
        // Unknown placeholder in the pattern.
        serde_json::json!({ "texts": [{ "name": "a", "x": 0, "y": 0,
            "text": "unicode", "align": "left", "pattern": "[no-such-thing]" }] }),
        // Unterminated placeholder bracket.
        serde_json::json!({ "texts": [{ "name": "a", "x": 0, "y": 0,
            "text": "unicode", "align": "left", "pattern": "[health" }] }),
        // Zero scale.
        serde_json::json!({ "texts": [{ "name": "a", "x": 0, "y": 0, "scale": 0.0,
            "text": "unicode", "align": "left", "pattern": "x" }] }),
    ];
    for value in cases {
        assert!(
            LayoutGroup::from_value("boss", value.clone(), &registry, &placeholders).is_err(),
            "accepted invalid config: {value}"
        );
    }
}

#[test]
fn out_of_range_layer_is_clamped_not_fatal() {
    let mut group = group(serde_json::json!({
        "texts": [{
            "name": "hp", "x": 0, "y": 0, "layer": 400,
            "text": "unicode", "align": "left", "pattern": "x"
        }]
    }));
    assert_eq!(group.texts()[0].layout().layer(), 254);

    let mut pack = OverlayPack::new("overbar");
    group.build(&mut pack, 1);
    assert!(pack.contains_texture("boss/text/254/1.png"));
}
