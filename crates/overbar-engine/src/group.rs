//! Layout groups: a named collection of text layouts sharing a default
//! layer.
//!
//! A group is built from a [`GroupConfig`] whose members are constructed in
//! declaration order; any member failing validation aborts the whole group.
//! [`build`](LayoutGroup::build) fans out to every member with the same
//! repetition count.

use overbar_core::placeholder::Placeholders;
use overbar_pack::pack::OverlayPack;
use overbar_pack::text::TextResolver;
use tracing::debug;

use crate::config::GroupConfig;
use crate::text::TextLayout;
use crate::LayoutError;

/// A named group of text layouts.
#[derive(Debug, Clone)]
pub struct LayoutGroup {
    name: String,
    layer: i32,
    texts: Vec<TextLayout>,
}

impl LayoutGroup {
    /// Construct a group and all of its members from configuration.
    ///
    /// The group name becomes the path parent for every resource its
    /// members emit; the group layer is the default for members that set
    /// none.
    pub fn from_config(
        name: &str,
        config: &GroupConfig,
        resolver: &dyn TextResolver,
        placeholders: &Placeholders,
    ) -> Result<Self, LayoutError> {
        let mut texts = Vec::with_capacity(config.texts.len());
        for text in &config.texts {
            texts.push(TextLayout::new(
                name,
                config.layer,
                text,
                resolver,
                placeholders,
            )?);
        }
        debug!(group = %name, texts = texts.len(), "constructed layout group");
        Ok(Self {
            name: name.to_owned(),
            layer: config.layer,
            texts,
        })
    }

    /// Construct from a dynamic configuration tree.
    pub fn from_value(
        name: &str,
        value: serde_json::Value,
        resolver: &dyn TextResolver,
        placeholders: &Placeholders,
    ) -> Result<Self, LayoutError> {
        Self::from_config(name, &GroupConfig::from_value(value)?, resolver, placeholders)
    }

    /// Emit every member's resources into the pack for `count` repetitions.
    pub fn build(&mut self, pack: &mut OverlayPack, count: usize) {
        for text in &mut self.texts {
            text.build(pack, count);
        }
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default layer for members that set none.
    pub fn layer(&self) -> i32 {
        self.layer
    }

    /// Member layouts, in declaration order.
    pub fn texts(&self) -> &[TextLayout] {
        &self.texts
    }

    /// Look up a member by element name.
    pub fn text(&self, name: &str) -> Option<&TextLayout> {
        self.texts.iter().find(|t| t.name() == name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
