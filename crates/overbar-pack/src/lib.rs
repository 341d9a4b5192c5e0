//! Overbar pack -- text assets, font documents, and the artifact pipeline.
//!
//! This crate is the build-time half of the Overbar gauge renderer: it holds
//! the [`TextAsset`](text::TextAsset) model and resolver seam that layouts
//! consume, the [`FontDocument`](font::FontDocument) serde model for the
//! client's bitmap font format, and the [`OverlayPack`](pack::OverlayPack)
//! collaborator that collects lazily-supplied resources and flushes them
//! into digest-tagged artifacts.
//!
//! # Design
//!
//! Resource suppliers are deferred: registering a texture or font stores a
//! thunk, and pixels are only encoded (and documents only serialized) when
//! the pack is flushed, once, in path order. Writing the artifact bytes to
//! disk or network is the caller's job.
//!
//! # Example
//!
//! ```
//! use overbar_pack::prelude::*;
//!
//! let mut pack = OverlayPack::new("overbar");
//! pack.font("boss/hp/1.json", FontDocument::with_space);
//! pack.texture("boss/text/1/1.png", || vec![0u8; 4]);
//!
//! let artifacts = pack.flush().unwrap();
//! assert_eq!(artifacts.len(), 2);
//! ```

#![deny(unsafe_code)]

pub mod font;
pub mod pack;
pub mod text;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::font::{
        ascent_for, clamp_glyph_height, FontDocument, FontProvider, MAX_GLYPH_HEIGHT,
        SPACE_ADVANCE,
    };
    pub use crate::pack::{OverlayPack, PackArtifact, PackError};
    pub use crate::text::{GlyphImage, TextAsset, TextRegistry, TextResolver, TextStrip};
}
