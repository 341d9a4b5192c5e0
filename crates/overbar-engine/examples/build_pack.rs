//! End-to-end demo -- build a health-bar pack and drive a renderer.
//!
//! Constructs a layout group from inline JSON configuration, builds it
//! against an in-memory pack, writes the flushed artifacts to
//! `target/demo-pack/`, and then ticks a renderer for a wounded subject,
//! printing the positioned components.
//!
//! Run with:
//!   cargo run --example build_pack -p overbar-engine

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use overbar_engine::prelude::*;
use tracing_subscriber::EnvFilter;

/// A flat placeholder image; a real host rasterizes glyph strips here.
struct FlatStrip {
    width: u32,
    height: u32,
}

impl GlyphImage for FlatStrip {
    fn encode(&self, layer: i32) -> Vec<u8> {
        // Stand-in payload: dimensions plus the layer-dependent opacity
        // byte a real encoder would bake into every pixel.
        let opacity = 255 - layer as u8;
        let mut bytes = Vec::with_capacity(9);
        bytes.extend_from_slice(&self.width.to_be_bytes());
        bytes.extend_from_slice(&self.height.to_be_bytes());
        bytes.push(opacity);
        bytes
    }
}

fn registry() -> TextRegistry {
    let digits = "0123456789/.%";
    let mut widths = HashMap::new();
    for c in digits.chars() {
        widths.insert(c, 5);
    }
    let mut registry = TextRegistry::new();
    registry.insert(
        "unicode",
        TextAsset::new(
            8,
            widths,
            vec![TextStrip::new(
                vec![digits.to_owned()],
                Arc::new(FlatStrip {
                    width: 13 * 8,
                    height: 8,
                }),
            )],
        ),
    );
    registry
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let registry = registry();
    let placeholders = Placeholders::standard();

    let mut group = LayoutGroup::from_value(
        "boss",
        serde_json::json!({
            "layer": 2,
            "texts": [
                {
                    "name": "hp",
                    "x": 0, "y": 12, "group-y": 10, "scale": 1.5,
                    "text": "unicode",
                    "align": "center",
                    "pattern": "[health]/[max-health]",
                    "conditions": [
                        { "left": "dead", "op": "==", "right": "false" }
                    ]
                },
                {
                    "name": "percent",
                    "x": 0, "y": 24, "group-y": 10,
                    "text": "unicode",
                    "align": "center",
                    "duration": 5,
                    "pattern": "[(number)percent]%"
                }
            ]
        }),
        &registry,
        &placeholders,
    )?;

    let mut pack = OverlayPack::new("overbar");
    group.build(&mut pack, 3);

    let out = Path::new("target/demo-pack");
    for artifact in pack.flush()? {
        let path = out.join(&artifact.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&path, &artifact.bytes)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("{}  {}", &artifact.digest[..16], artifact.path);
    }

    let pair = SubjectPair::new(
        Subject::new("Zombie", 14.0, 20.0),
        Subject::new("Steve", 20.0, 20.0),
    );
    let hp = group
        .text("hp")
        .context("hp layout missing from group")?;
    let mut renderer = hp.create_renderer(pair);

    for tick in 0..3 {
        if !renderer.has_next() {
            break;
        }
        if !renderer.can_render() {
            continue;
        }
        let component = renderer.render(tick % 3);
        println!(
            "tick {tick}: '{}' width={} x={} font={}",
            component.text, component.width, component.x, component.font
        );
    }

    Ok(())
}
