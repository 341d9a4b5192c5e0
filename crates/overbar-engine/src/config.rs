//! Typed configuration schema for layouts and groups.
//!
//! Configuration arrives as free-form trees (YAML or JSON on the host
//! side); this module maps them onto explicit serde structs with required
//! vs. defaulted fields and enumerations validated at parse time, instead
//! of ad-hoc key lookups scattered through construction. Unknown keys are
//! ignored for forward compatibility.
//!
//! Keys are kebab-case, matching the operator-facing configuration files
//! (`group-x`, `group-y`, ...). Hosts with dynamic trees enter through the
//! `from_value` constructors.

use std::str::FromStr;

use overbar_core::condition::ConditionConfig;
use serde::{Deserialize, Deserializer, Serialize};

use crate::LayoutError;

// ---------------------------------------------------------------------------
// Align
// ---------------------------------------------------------------------------

/// Horizontal alignment of rendered text around its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

impl FromStr for Align {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Align::Left),
            "center" => Ok(Align::Center),
            "right" => Ok(Align::Right),
            other => Err(LayoutError::UnknownAlign {
                value: other.to_owned(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Align {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// LayoutConfig
// ---------------------------------------------------------------------------

/// Geometry and gating attributes shared by every layout element.
///
/// `x` and `y` are required; their absence is a configuration error, not a
/// silent zero. `layer` falls back to the caller-supplied default when
/// absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayoutConfig {
    /// Horizontal pixel anchor.
    pub x: i32,
    /// Vertical pixel anchor.
    pub y: i32,
    /// Horizontal pixel delta per repetition index.
    #[serde(default)]
    pub group_x: i32,
    /// Vertical pixel delta per repetition index.
    #[serde(default)]
    pub group_y: i32,
    /// Scale factor; must be > 0.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Draw-order layer; clamped to `[1, 254]`, defaults to the parent's.
    #[serde(default)]
    pub layer: Option<i32>,
    /// Sub-conditions folded into the layout's gating condition.
    #[serde(default)]
    pub conditions: Vec<ConditionConfig>,
}

fn default_scale() -> f64 {
    1.0
}

// ---------------------------------------------------------------------------
// TextLayoutConfig
// ---------------------------------------------------------------------------

/// Configuration of one text layout element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TextLayoutConfig {
    /// Element name; feeds the emitted font resource paths.
    pub name: String,
    /// Shared layout attributes.
    #[serde(flatten)]
    pub layout: LayoutConfig,
    /// Name of the text asset to render with.
    pub text: String,
    /// Horizontal alignment.
    pub align: Align,
    /// Ticks this element stays alive; negative means unbounded.
    #[serde(default = "default_duration")]
    pub duration: i64,
    /// Pattern with `[placeholder]` segments, substituted every render.
    pub pattern: String,
}

fn default_duration() -> i64 {
    -1
}

impl TextLayoutConfig {
    /// Deserialize from a dynamic configuration tree.
    pub fn from_value(value: serde_json::Value) -> Result<Self, LayoutError> {
        serde_json::from_value(value).map_err(|source| LayoutError::Config {
            context: "text layout".to_owned(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// GroupConfig
// ---------------------------------------------------------------------------

/// Configuration of a layout group: a default layer and its text elements
/// in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupConfig {
    /// Default layer for members that set none.
    #[serde(default = "default_group_layer")]
    pub layer: i32,
    /// Member text layouts, built in declaration order.
    #[serde(default)]
    pub texts: Vec<TextLayoutConfig>,
}

fn default_group_layer() -> i32 {
    1
}

impl GroupConfig {
    /// Deserialize from a dynamic configuration tree.
    pub fn from_value(value: serde_json::Value) -> Result<Self, LayoutError> {
        serde_json::from_value(value).map_err(|source| LayoutError::Config {
            context: "group".to_owned(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
