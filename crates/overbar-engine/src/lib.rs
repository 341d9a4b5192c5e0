//! Overbar engine -- configuration, layout construction, pack build, and
//! per-subject rendering.
//!
//! This crate ties the value layer (`overbar-core`) and the artifact
//! pipeline (`overbar-pack`) into the gauge renderer proper. A
//! [`LayoutGroup`](group::LayoutGroup) is constructed from operator
//! configuration, validated eagerly; its members derive scaled metrics from
//! their text assets and compile their patterns. Building the group against
//! an [`OverlayPack`](overbar_pack::pack::OverlayPack) emits the font
//! documents and textures the client needs, and allocates per-repetition
//! width keys. At run time each subject attachment gets a
//! [`GaugeRenderer`](text::GaugeRenderer) that gates on conditions, counts
//! its expiry ticks, and produces positioned
//! [`PixelComponent`](text::PixelComponent)s.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use overbar_engine::prelude::*;
//!
//! struct Flat;
//!
//! impl GlyphImage for Flat {
//!     fn encode(&self, _layer: i32) -> Vec<u8> {
//!         vec![0u8; 16]
//!     }
//! }
//!
//! let mut registry = TextRegistry::new();
//! registry.insert(
//!     "unicode",
//!     TextAsset::new(
//!         8,
//!         HashMap::from([('0', 4), ('1', 2), ('/', 3)]),
//!         vec![TextStrip::new(vec!["0123456789/".to_owned()], Arc::new(Flat))],
//!     ),
//! );
//!
//! let placeholders = Placeholders::standard();
//! let mut group = LayoutGroup::from_value(
//!     "boss",
//!     serde_json::json!({
//!         "layer": 2,
//!         "texts": [{
//!             "name": "hp", "x": 0, "y": 12, "text": "unicode",
//!             "align": "center", "pattern": "[health]/[max-health]"
//!         }]
//!     }),
//!     &registry,
//!     &placeholders,
//! )
//! .unwrap();
//!
//! let mut pack = OverlayPack::new("overbar");
//! group.build(&mut pack, 1);
//! let artifacts = pack.flush().unwrap();
//! assert!(artifacts.iter().any(|a| a.path == "assets/overbar/font/boss/hp/1.json"));
//!
//! let pair = SubjectPair::new(
//!     Subject::new("Zombie", 14.0, 20.0),
//!     Subject::new("Steve", 20.0, 20.0),
//! );
//! let mut renderer = group.texts()[0].create_renderer(pair);
//! assert!(renderer.has_next());
//! assert!(renderer.can_render());
//! assert_eq!(renderer.render(0).text, "14/20");
//! ```

#![deny(unsafe_code)]

use overbar_core::condition::ConditionError;
use overbar_core::template::TemplateError;
use thiserror::Error;

pub mod config;
pub mod group;
pub mod layout;
pub mod text;

pub use overbar_core;
pub use overbar_pack;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while constructing layouts from configuration.
///
/// Every variant is a configuration mistake surfaced at construction time;
/// nothing here occurs during rendering, which is total.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A configuration tree failed to deserialize.
    #[error("invalid {context} configuration: {source}")]
    Config {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A scale that is not a positive finite number.
    #[error("layout '{element}': scale must be a positive number, got {scale}")]
    InvalidScale { element: String, scale: f64 },

    /// A text layout referenced an unregistered text asset.
    #[error("layout '{element}': unknown text asset '{text}'")]
    UnknownText { element: String, text: String },

    /// An alignment value outside left/center/right.
    #[error("unknown alignment '{value}', expected left, center, or right")]
    UnknownAlign { value: String },

    /// A condition failed to build.
    #[error("layout '{element}': {source}")]
    Condition {
        element: String,
        #[source]
        source: ConditionError,
    },

    /// A pattern failed to compile.
    #[error("layout '{element}': {source}")]
    Pattern {
        element: String,
        #[source]
        source: TemplateError,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::{Align, GroupConfig, LayoutConfig, TextLayoutConfig};
    pub use crate::group::LayoutGroup;
    pub use crate::layout::Layout;
    pub use crate::text::{GaugeRenderer, PixelComponent, TextLayout, WidthKey};
    pub use crate::LayoutError;
    pub use overbar_core::prelude::*;
    pub use overbar_pack::prelude::*;
}
