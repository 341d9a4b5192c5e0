//! The layout base: geometry and gating shared by every drawable element.
//!
//! A [`Layout`] holds the pixel anchor, per-repetition deltas, scale,
//! clamped layer, and the gating [`Condition`], all validated at
//! construction and immutable afterwards.

use overbar_core::condition::Condition;
use overbar_core::placeholder::Placeholders;
use tracing::warn;

use crate::config::LayoutConfig;
use crate::LayoutError;

/// Inclusive layer range the client accepts.
const LAYER_RANGE: (i32, i32) = (1, 254);

/// Shared geometric and gating attributes of a layout element.
#[derive(Debug, Clone)]
pub struct Layout {
    x: i32,
    y: i32,
    group_x: i32,
    group_y: i32,
    scale: f64,
    layer: i32,
    condition: Condition,
}

impl Layout {
    /// Validate a configuration section into a layout.
    ///
    /// `element` names the owning element in error messages. `default_layer`
    /// applies when the section sets no layer; either way the result is
    /// clamped to `[1, 254]` (with a warning), never rejected. A scale that
    /// is not a positive finite number is a configuration error.
    pub fn new(
        element: &str,
        default_layer: i32,
        config: &LayoutConfig,
        placeholders: &Placeholders,
    ) -> Result<Self, LayoutError> {
        if !config.scale.is_finite() || config.scale <= 0.0 {
            return Err(LayoutError::InvalidScale {
                element: element.to_owned(),
                scale: config.scale,
            });
        }

        let configured = config.layer.unwrap_or(default_layer);
        let layer = configured.clamp(LAYER_RANGE.0, LAYER_RANGE.1);
        if layer != configured {
            warn!(
                element = %element,
                configured,
                layer,
                "layer outside [1, 254], clamped"
            );
        }

        let condition = Condition::build(&config.conditions, placeholders).map_err(|source| {
            LayoutError::Condition {
                element: element.to_owned(),
                source,
            }
        })?;

        Ok(Self {
            x: config.x,
            y: config.y,
            group_x: config.group_x,
            group_y: config.group_y,
            scale: config.scale,
            layer,
            condition,
        })
    }

    /// Horizontal pixel anchor.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Vertical pixel anchor.
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Horizontal pixel delta per repetition index.
    pub fn group_x(&self) -> i32 {
        self.group_x
    }

    /// Vertical pixel delta per repetition index.
    pub fn group_y(&self) -> i32 {
        self.group_y
    }

    /// Scale factor, always > 0.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Draw-order layer, always in `[1, 254]`.
    pub fn layer(&self) -> i32 {
        self.layer
    }

    /// The gating condition.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
