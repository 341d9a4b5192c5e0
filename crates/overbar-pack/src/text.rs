//! Text assets: named bitmap-font sources and the resolver seam.
//!
//! A [`TextAsset`] is the raw material a text layout is built from: a native
//! pixel height, a per-character width table, and an ordered list of bitmap
//! strips. Each strip pairs the glyph-cell rows that go into a font
//! provider's `chars` array with a host-owned [`GlyphImage`] that encodes
//! the strip's pixels at flush time.
//!
//! Assets are resolved by name through the [`TextResolver`] trait. The
//! in-memory [`TextRegistry`] covers tests and simple hosts; production
//! hosts back the trait with their own asset store.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// GlyphImage
// ---------------------------------------------------------------------------

/// Host-owned pixel encoding for one bitmap strip.
///
/// The pack registers the strip lazily; `encode` runs once at flush time
/// with the owning layout's layer, which parameterizes the opacity
/// transform. Image manipulation and PNG encoding live entirely on the host
/// side of this trait.
pub trait GlyphImage: Send + Sync {
    /// Produce the final image bytes for the given layer.
    fn encode(&self, layer: i32) -> Vec<u8>;
}

// ---------------------------------------------------------------------------
// TextStrip
// ---------------------------------------------------------------------------

/// One bitmap strip of a text asset: glyph-cell rows plus the image that
/// backs them.
#[derive(Clone)]
pub struct TextStrip {
    chars: Vec<String>,
    image: Arc<dyn GlyphImage>,
}

impl TextStrip {
    /// Create a strip from its glyph-cell rows and backing image.
    ///
    /// Each row is a string whose characters map left-to-right onto the
    /// strip's glyph cells, exactly as a bitmap font provider expects.
    pub fn new(chars: Vec<String>, image: Arc<dyn GlyphImage>) -> Self {
        Self { chars, image }
    }

    /// The glyph-cell rows.
    pub fn chars(&self) -> &[String] {
        &self.chars
    }

    /// The backing image.
    pub fn image(&self) -> &Arc<dyn GlyphImage> {
        &self.image
    }
}

impl fmt::Debug for TextStrip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextStrip")
            .field("chars", &self.chars)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// TextAsset
// ---------------------------------------------------------------------------

/// A named bitmap-font source: native height, character widths, and strips.
///
/// Read-only to the layout core; layouts derive their scaled height and
/// width tables from it at construction time.
#[derive(Debug, Clone)]
pub struct TextAsset {
    height: i32,
    char_widths: HashMap<char, i32>,
    strips: Vec<TextStrip>,
}

impl TextAsset {
    /// Create an asset from its native height, width table, and strips.
    pub fn new(height: i32, char_widths: HashMap<char, i32>, strips: Vec<TextStrip>) -> Self {
        Self {
            height,
            char_widths,
            strips,
        }
    }

    /// Native pixel height of the glyphs.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Native per-character pixel widths.
    pub fn char_widths(&self) -> &HashMap<char, i32> {
        &self.char_widths
    }

    /// The bitmap strips, in provider order.
    pub fn strips(&self) -> &[TextStrip] {
        &self.strips
    }
}

// ---------------------------------------------------------------------------
// TextResolver
// ---------------------------------------------------------------------------

/// Resolves a configured text name to its asset.
pub trait TextResolver {
    /// Look up an asset by name. `None` is a fatal configuration error for
    /// the layout that referenced the name.
    fn resolve(&self, name: &str) -> Option<&TextAsset>;
}

/// A simple in-memory resolver.
#[derive(Debug, Default)]
pub struct TextRegistry {
    assets: HashMap<String, TextAsset>,
}

impl TextRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset under a name, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, asset: TextAsset) {
        let name = name.into();
        tracing::debug!(name = %name, strips = asset.strips().len(), "registered text asset");
        self.assets.insert(name, asset);
    }

    /// Number of registered assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl TextResolver for TextRegistry {
    fn resolve(&self, name: &str) -> Option<&TextAsset> {
        self.assets.get(name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
