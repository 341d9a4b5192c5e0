//! Bitmap font provider documents.
//!
//! The client's font renderer consumes JSON documents with a `providers`
//! array. Every document Overbar emits starts with a fixed-advance space
//! provider (space = 4 pixels) followed by one bitmap provider per text
//! strip. This module is the serde data model for those documents plus the
//! client's format constants.
//!
//! # Document shape
//!
//! ```json
//! {
//!   "providers": [
//!     { "type": "space", "advances": { " ": 4 } },
//!     { "type": "bitmap", "file": "overbar:boss/text/1/1.png",
//!       "ascent": 12, "height": 16, "chars": ["0123456789"] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Format constants
// ---------------------------------------------------------------------------

/// The client rejects bitmap glyphs taller than this.
pub const MAX_GLYPH_HEIGHT: i32 = 512;

/// Fixed pixel advance of the leading space provider.
pub const SPACE_ADVANCE: i32 = 4;

/// Cap a derived glyph height to what the client accepts.
pub fn clamp_glyph_height(height: i32) -> i32 {
    height.min(MAX_GLYPH_HEIGHT)
}

/// Derive a provider's ascent from a repetition's vertical pixel offset.
///
/// The client rejects `ascent > height`, so the offset is capped at the
/// glyph height.
pub fn ascent_for(y: i32, height: i32) -> i32 {
    y.min(height)
}

// ---------------------------------------------------------------------------
// FontProvider
// ---------------------------------------------------------------------------

/// One entry in a font document's `providers` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FontProvider {
    /// Fixed character advances with no glyphs.
    Space { advances: BTreeMap<String, i32> },
    /// A bitmap strip: glyph cells cut from `file`.
    Bitmap {
        file: String,
        ascent: i32,
        height: i32,
        chars: Vec<String>,
    },
}

impl FontProvider {
    /// The leading provider of every Overbar font: a 4-pixel space advance.
    pub fn space_advance_4() -> Self {
        FontProvider::Space {
            advances: BTreeMap::from([(" ".to_owned(), SPACE_ADVANCE)]),
        }
    }
}

// ---------------------------------------------------------------------------
// FontDocument
// ---------------------------------------------------------------------------

/// A complete font provider document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontDocument {
    pub providers: Vec<FontProvider>,
}

impl FontDocument {
    /// A document seeded with the leading space provider.
    pub fn with_space() -> Self {
        Self {
            providers: vec![FontProvider::space_advance_4()],
        }
    }

    /// Append a provider.
    pub fn push(&mut self, provider: FontProvider) {
        self.providers.push(provider);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
