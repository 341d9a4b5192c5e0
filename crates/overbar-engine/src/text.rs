//! Text layouts: scale derivation, font emission, and the per-pair
//! renderer.
//!
//! A [`TextLayout`] is constructed once from configuration: it resolves its
//! text asset, derives a scaled height and a rescaled character-width table,
//! and compiles its pattern. [`build`](TextLayout::build) then emits the
//! layout's textures and font documents into the pack, allocating one
//! [`WidthKey`] per repetition index. At run time,
//! [`create_renderer`](TextLayout::create_renderer) hands out one
//! [`GaugeRenderer`] per subject attachment; the renderer gates on the
//! layout's condition, counts its expiry ticks, and positions the
//! live-substituted string by alignment.
//!
//! # Width model
//!
//! Pixel width of a rendered string is the sum over its characters of: 4
//! for a space, the rescaled character width plus 1 pixel of spacing for a
//! known character, and 1 (spacing only) for an unknown one. Width lookups
//! never fail; unknown characters degrade to zero width.

use std::collections::HashMap;
use std::sync::Arc;

use overbar_core::key::ResourceKey;
use overbar_core::placeholder::Placeholders;
use overbar_core::subject::SubjectPair;
use overbar_core::template::Template;
use overbar_pack::font::{ascent_for, clamp_glyph_height, FontDocument, FontProvider};
use overbar_pack::pack::OverlayPack;
use overbar_pack::text::{TextResolver, TextStrip};
use tracing::debug;

use crate::config::{Align, TextLayoutConfig};
use crate::layout::Layout;
use crate::LayoutError;

// ---------------------------------------------------------------------------
// WidthKey
// ---------------------------------------------------------------------------

/// The font resource and x-offset serving one repetition index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidthKey {
    /// Identifier of the emitted font resource.
    pub key: ResourceKey,
    /// Horizontal pixel offset of this repetition.
    pub x: i32,
}

impl WidthKey {
    /// The fallback key for layouts that were never built: the client's
    /// default font at x-offset 0.
    pub fn default_font() -> Self {
        Self {
            key: ResourceKey::default_font(),
            x: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// PixelComponent
// ---------------------------------------------------------------------------

/// A positioned, width-known renderable unit, produced fresh every render
/// call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelComponent {
    /// Pixel width of the rendered string.
    pub width: i32,
    /// Horizontal offset after alignment.
    pub x: i32,
    /// Font resource carrying the string's glyphs.
    pub font: ResourceKey,
    /// The substituted string.
    pub text: String,
}

// ---------------------------------------------------------------------------
// TextLayout
// ---------------------------------------------------------------------------

/// Dedup key for emitted font documents within one build pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DedupKey {
    name: String,
    y: i32,
    height: i32,
}

/// A text layout element: derived metrics, compiled pattern, and -- after
/// [`build`](Self::build) -- the width keys its renderers select from.
#[derive(Debug, Clone)]
pub struct TextLayout {
    layout: Layout,
    parent: String,
    name: String,
    height: i32,
    char_width: HashMap<char, i32>,
    strips: Vec<TextStrip>,
    align: Align,
    duration: i64,
    pattern: Template,
    width_keys: Vec<WidthKey>,
}

impl TextLayout {
    /// Construct from configuration.
    ///
    /// Resolves the named text asset (absence is fatal), derives
    /// `height = round(native_height x scale)` capped at the client's glyph
    /// limit, rescales the character-width table by the derived height, and
    /// compiles the pattern.
    pub fn new(
        parent: &str,
        default_layer: i32,
        config: &TextLayoutConfig,
        resolver: &dyn TextResolver,
        placeholders: &Placeholders,
    ) -> Result<Self, LayoutError> {
        let layout = Layout::new(&config.name, default_layer, &config.layout, placeholders)?;

        let asset = resolver
            .resolve(&config.text)
            .ok_or_else(|| LayoutError::UnknownText {
                element: config.name.clone(),
                text: config.text.clone(),
            })?;

        let height = clamp_glyph_height((asset.height() as f64 * layout.scale()).round() as i32);
        // Widths rescale by the derived height, not the native one, so the
        // two roundings stay consistent.
        let div = height as f64 / asset.height() as f64;
        let char_width = asset
            .char_widths()
            .iter()
            .map(|(&c, &w)| (c, (w as f64 * div).round() as i32))
            .collect();

        let pattern = Template::compile(&config.pattern, placeholders).map_err(|source| {
            LayoutError::Pattern {
                element: config.name.clone(),
                source,
            }
        })?;

        Ok(Self {
            layout,
            parent: parent.to_owned(),
            name: config.name.clone(),
            height,
            char_width,
            strips: asset.strips().to_vec(),
            align: config.align,
            duration: config.duration,
            pattern,
            width_keys: Vec::new(),
        })
    }

    /// Emit this layout's resources into the pack for `count` repetitions.
    ///
    /// Textures land under `<parent>/text/<layer>/<n>.png`, one per strip,
    /// encoded lazily with the layout's layer. Each repetition index gets a
    /// font document under `<parent>/<name>/<i + 1>.json` -- unless an
    /// identical `(name, y, height)` triple was already emitted in this
    /// pass, in which case its key is reused. `width_keys` ends up with
    /// exactly `count` entries in index order.
    pub fn build(&mut self, pack: &mut OverlayPack, count: usize) {
        self.width_keys.clear();

        let file_parent = format!("{}/text/{}", self.parent, self.layout.layer());
        let mut strip_files = Vec::with_capacity(self.strips.len());
        for (index, strip) in self.strips.iter().enumerate() {
            let file_name = format!("{}/{}.png", file_parent, index + 1);
            strip_files.push((
                format!("{}:{}", pack.namespace(), file_name),
                strip.chars().to_vec(),
            ));
            let image = Arc::clone(strip.image());
            let layer = self.layout.layer();
            pack.texture(file_name, move || image.encode(layer));
        }

        let mut emitted: HashMap<DedupKey, WidthKey> = HashMap::new();
        for i in 0..count {
            let y = self.layout.y() + self.layout.group_y() * i as i32;
            let name = format!("{}/{}/{}", self.parent, self.name, i + 1);
            let dedup = DedupKey {
                name: name.clone(),
                y,
                height: self.height,
            };

            let key = match emitted.get(&dedup) {
                Some(existing) => existing.clone(),
                None => {
                    let height = self.height;
                    let files = strip_files.clone();
                    pack.font(format!("{name}.json"), move || {
                        let mut doc = FontDocument::with_space();
                        for (file, chars) in files {
                            doc.push(FontProvider::Bitmap {
                                file,
                                ascent: ascent_for(y, height),
                                height,
                                chars,
                            });
                        }
                        doc
                    });
                    let key = WidthKey {
                        key: pack.key(&name),
                        x: self.layout.x() + self.layout.group_x() * i as i32,
                    };
                    emitted.insert(dedup, key.clone());
                    key
                }
            };
            self.width_keys.push(key);
        }
    }

    /// Create a renderer bound to one subject attachment.
    pub fn create_renderer(&self, pair: SubjectPair) -> GaugeRenderer<'_> {
        GaugeRenderer {
            layout: self,
            pair,
            elapsed: 0,
        }
    }

    /// Shared layout attributes.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Derived pixel height.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Rescaled per-character pixel widths.
    pub fn char_width(&self) -> &HashMap<char, i32> {
        &self.char_width
    }

    /// Horizontal alignment.
    pub fn align(&self) -> Align {
        self.align
    }

    /// Expiry duration in ticks; negative means unbounded.
    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Width keys allocated by [`build`](Self::build), one per repetition
    /// index. Empty until built.
    pub fn width_keys(&self) -> &[WidthKey] {
        &self.width_keys
    }

    /// Pixel width of a string under this layout's width table.
    pub fn width_of(&self, text: &str) -> i32 {
        text.chars()
            .map(|c| {
                if c == ' ' {
                    4
                } else {
                    match self.char_width.get(&c) {
                        Some(w) => w + 1,
                        None => {
                            debug!(element = %self.name, character = %c, "width lookup miss");
                            1
                        }
                    }
                }
            })
            .sum()
    }
}

// ---------------------------------------------------------------------------
// GaugeRenderer
// ---------------------------------------------------------------------------

/// Per-attachment render state: an elapsed counter over an immutable
/// layout and the subject pair it renders for.
///
/// The renderer is a two-state machine, Active then Expired, with no way
/// back: once [`has_next`](Self::has_next) returns `false` it returns
/// `false` forever.
#[derive(Debug)]
pub struct GaugeRenderer<'a> {
    layout: &'a TextLayout,
    pair: SubjectPair,
    elapsed: i64,
}

impl GaugeRenderer<'_> {
    /// Advance the elapsed counter and report whether this renderer is
    /// still usable.
    ///
    /// Call at most once per tick; this is the sole authority on expiry.
    /// With `duration = D >= 0` the renderer yields exactly `D` `true`
    /// results (the first call already counts), with a negative duration it
    /// never expires.
    pub fn has_next(&mut self) -> bool {
        self.elapsed += 1;
        self.layout.duration < 0 || self.elapsed <= self.layout.duration
    }

    /// Evaluate the layout's condition against the subject pair. Pure; may
    /// be called any number of times per tick.
    pub fn can_render(&self) -> bool {
        self.layout.layout.condition().eval(&self.pair)
    }

    /// Produce the positioned component for the current tick.
    ///
    /// Selects the width key at `min(group_count, width_keys.len() - 1)`,
    /// falling back to the client's default font when the layout was never
    /// built; substitutes the pattern; and offsets the anchor by alignment.
    /// No side effects.
    pub fn render(&self, group_count: usize) -> PixelComponent {
        let keys = self.layout.width_keys();
        let key = keys
            .get(group_count.min(keys.len().saturating_sub(1)))
            .cloned()
            .unwrap_or_else(WidthKey::default_font);

        let text = self.layout.pattern.render(&self.pair);
        let width = self.layout.width_of(&text);
        let x = key.x
            + match self.layout.align {
                Align::Left => 0,
                Align::Center => -width / 2,
                Align::Right => -width,
            };

        PixelComponent {
            width,
            x,
            font: key.key,
            text,
        }
    }

    /// The subject pair this renderer is bound to.
    pub fn pair(&self) -> &SubjectPair {
        &self.pair
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use overbar_core::subject::Subject;
    use overbar_pack::text::{GlyphImage, TextAsset, TextRegistry};

    struct Stub;

    impl GlyphImage for Stub {
        fn encode(&self, layer: i32) -> Vec<u8> {
            vec![layer as u8]
        }
    }

    fn registry() -> TextRegistry {
        let mut registry = TextRegistry::new();
        registry.insert(
            "unicode",
            TextAsset::new(
                8,
                HashMap::from([('0', 4), ('1', 2), ('2', 4), ('/', 3)]),
                vec![TextStrip::new(
                    vec!["0123456789/".to_owned()],
                    Arc::new(Stub),
                )],
            ),
        );
        registry
    }

    fn layout(value: serde_json::Value) -> TextLayout {
        let ph = Placeholders::standard();
        let config = TextLayoutConfig::from_value(value).unwrap();
        TextLayout::new("boss", 1, &config, &registry(), &ph).unwrap()
    }

    fn pair(health: f64, max: f64) -> SubjectPair {
        SubjectPair::new(
            Subject::new("Zombie", health, max),
            Subject::new("Steve", 20.0, 20.0),
        )
    }

    // -- scaling ------------------------------------------------------------

    #[test]
    fn height_and_widths_scale_together() {
        let layout = layout(serde_json::json!({
            "name": "hp", "x": 0, "y": 0, "scale": 2.0,
            "text": "unicode", "align": "left", "pattern": "[health]"
        }));
        assert_eq!(layout.height(), 16);
        assert_eq!(layout.char_width()[&'0'], 8);
        assert_eq!(layout.char_width()[&'1'], 4);
    }

    #[test]
    fn derived_height_is_capped() {
        let layout = layout(serde_json::json!({
            "name": "hp", "x": 0, "y": 0, "scale": 100.0,
            "text": "unicode", "align": "left", "pattern": "x"
        }));
        assert_eq!(layout.height(), 512);
    }

    #[test]
    fn missing_text_asset_is_fatal() {
        let ph = Placeholders::standard();
        let config = TextLayoutConfig::from_value(serde_json::json!({
            "name": "hp", "x": 0, "y": 0,
            "text": "nope", "align": "left", "pattern": "x"
        }))
        .unwrap();
        let err = TextLayout::new("boss", 1, &config, &registry(), &ph).unwrap_err();
        assert!(matches!(err, LayoutError::UnknownText { .. }));
    }

    // -- width --------------------------------------------------------------

    #[test]
    fn width_sums_spaces_known_and_unknown_chars() {
        let layout = layout(serde_json::json!({
            "name": "hp", "x": 0, "y": 0,
            "text": "unicode", "align": "left", "pattern": "x"
        }));
        // '0' is 4+1, space is 4, 'X' unknown is 0+1.
        assert_eq!(layout.width_of("0 X"), 5 + 4 + 1);
        assert_eq!(layout.width_of(""), 0);
    }

    // -- build --------------------------------------------------------------

    #[test]
    fn build_emits_textures_and_one_font_per_index() {
        let mut layout = layout(serde_json::json!({
            "name": "hp", "x": 2, "y": 12, "group-x": 3, "group-y": 10, "layer": 7,
            "text": "unicode", "align": "left", "pattern": "x"
        }));
        let mut pack = OverlayPack::new("overbar");
        layout.build(&mut pack, 3);

        assert!(pack.contains_texture("boss/text/7/1.png"));
        assert_eq!(pack.texture_count(), 1);
        for i in 1..=3 {
            assert!(pack.contains_font(&format!("boss/hp/{i}.json")));
        }
        assert_eq!(pack.font_count(), 3);

        let keys = layout.width_keys();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0], WidthKey { key: pack.key("boss/hp/1"), x: 2 });
        assert_eq!(keys[1], WidthKey { key: pack.key("boss/hp/2"), x: 5 });
        assert_eq!(keys[2], WidthKey { key: pack.key("boss/hp/3"), x: 8 });
    }

    #[test]
    fn font_document_shape_and_ascent() {
        let mut layout = layout(serde_json::json!({
            "name": "hp", "x": 0, "y": 40, "scale": 2.0,
            "text": "unicode", "align": "left", "pattern": "x"
        }));
        let mut pack = OverlayPack::new("overbar");
        layout.build(&mut pack, 1);

        let artifacts = pack.flush().unwrap();
        let font = artifacts
            .iter()
            .find(|a| a.path.ends_with("hp/1.json"))
            .unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&font.bytes).unwrap();
        let providers = doc["providers"].as_array().unwrap();
        assert_eq!(providers[0], serde_json::json!({ "type": "space", "advances": { " ": 4 } }));
        assert_eq!(providers[1]["type"], "bitmap");
        assert_eq!(providers[1]["file"], "overbar:boss/text/1/1.png");
        // y = 40 > height = 16, so ascent is capped at the height.
        assert_eq!(providers[1]["ascent"], 16);
        assert_eq!(providers[1]["height"], 16);
        assert_eq!(providers[1]["chars"][0], "0123456789/");
    }

    #[test]
    fn rebuilding_does_not_duplicate_pack_entries_or_keys() {
        let mut layout = layout(serde_json::json!({
            "name": "hp", "x": 0, "y": 0,
            "text": "unicode", "align": "left", "pattern": "x"
        }));
        let mut pack = OverlayPack::new("overbar");
        layout.build(&mut pack, 2);
        layout.build(&mut pack, 2);
        assert_eq!(pack.font_count(), 2);
        assert_eq!(pack.texture_count(), 1);
        assert_eq!(layout.width_keys().len(), 2);
    }

    #[test]
    fn build_is_deterministic() {
        let build = || {
            let mut layout = layout(serde_json::json!({
                "name": "hp", "x": 1, "y": 2, "group-y": 6, "scale": 1.5,
                "text": "unicode", "align": "left", "pattern": "x"
            }));
            let mut pack = OverlayPack::new("overbar");
            layout.build(&mut pack, 4);
            (layout.width_keys().to_vec(), pack.flush().unwrap())
        };
        assert_eq!(build(), build());
    }

    // -- renderer -----------------------------------------------------------

    #[test]
    fn has_next_boundary() {
        let layout = layout(serde_json::json!({
            "name": "hp", "x": 0, "y": 0, "duration": 0,
            "text": "unicode", "align": "left", "pattern": "x"
        }));
        let mut renderer = layout.create_renderer(pair(10.0, 20.0));
        // duration = 0: the very first call already expires.
        assert!(!renderer.has_next());

        let layout = self::layout(serde_json::json!({
            "name": "hp", "x": 0, "y": 0, "duration": 3,
            "text": "unicode", "align": "left", "pattern": "x"
        }));
        let mut renderer = layout.create_renderer(pair(10.0, 20.0));
        assert!(renderer.has_next());
        assert!(renderer.has_next());
        assert!(renderer.has_next());
        assert!(!renderer.has_next());
        assert!(!renderer.has_next());
    }

    #[test]
    fn unbounded_duration_never_expires() {
        let layout = layout(serde_json::json!({
            "name": "hp", "x": 0, "y": 0,
            "text": "unicode", "align": "left", "pattern": "x"
        }));
        let mut renderer = layout.create_renderer(pair(10.0, 20.0));
        for _ in 0..1000 {
            assert!(renderer.has_next());
        }
    }

    #[test]
    fn can_render_follows_condition() {
        let layout = layout(serde_json::json!({
            "name": "hp", "x": 0, "y": 0,
            "conditions": [{ "left": "percent", "op": "<", "right": "50" }],
            "text": "unicode", "align": "left", "pattern": "x"
        }));
        assert!(layout.create_renderer(pair(4.0, 20.0)).can_render());
        assert!(!layout.create_renderer(pair(19.0, 20.0)).can_render());
    }

    #[test]
    fn render_substitutes_and_aligns() {
        for (align, expected_x) in [("left", 10), ("center", 10 - 23 / 2), ("right", 10 - 23)] {
            let mut layout = layout(serde_json::json!({
                "name": "hp", "x": 10, "y": 0,
                "text": "unicode", "align": align, "pattern": "[health]/[max-health]"
            }));
            let mut pack = OverlayPack::new("overbar");
            layout.build(&mut pack, 1);

            let renderer = layout.create_renderer(pair(10.0, 20.0));
            let component = renderer.render(0);
            assert_eq!(component.text, "10/20");
            // "10/20": 2+1, 4+1, 3+1, 4+1, 4+1 = 23.
            assert_eq!(component.width, 23);
            assert_eq!(component.x, expected_x, "align {align}");
            assert_eq!(component.font, pack.key("boss/hp/1"));
        }
    }

    #[test]
    fn render_selects_key_by_group_count() {
        let mut layout = layout(serde_json::json!({
            "name": "hp", "x": 0, "y": 0, "group-x": 5,
            "text": "unicode", "align": "left", "pattern": "x"
        }));
        let mut pack = OverlayPack::new("overbar");
        layout.build(&mut pack, 3);

        let renderer = layout.create_renderer(pair(10.0, 20.0));
        assert_eq!(renderer.render(0).x, 0);
        assert_eq!(renderer.render(1).x, 5);
        assert_eq!(renderer.render(2).x, 10);
        // Past the end clamps to the last key.
        assert_eq!(renderer.render(99).x, 10);
    }

    #[test]
    fn unbuilt_layout_falls_back_to_default_font() {
        let layout = layout(serde_json::json!({
            "name": "hp", "x": 7, "y": 0,
            "text": "unicode", "align": "left", "pattern": "[health]"
        }));
        let renderer = layout.create_renderer(pair(10.0, 20.0));
        let component = renderer.render(5);
        assert_eq!(component.font, ResourceKey::default_font());
        // Default key sits at x-offset 0, not the layout anchor.
        assert_eq!(component.x, 0);
        assert_eq!(component.text, "10");
    }

    #[test]
    fn render_has_no_side_effects() {
        let layout = layout(serde_json::json!({
            "name": "hp", "x": 0, "y": 0,
            "text": "unicode", "align": "left", "pattern": "[health]"
        }));
        let renderer = layout.create_renderer(pair(10.0, 20.0));
        let first = renderer.render(0);
        let second = renderer.render(0);
        assert_eq!(first, second);
    }
}
