//! Namespaced resource keys for pack artifacts.
//!
//! Every font document and texture this system emits is addressed by a
//! [`ResourceKey`] of the form `namespace:path`, matching the client's
//! resource addressing scheme. Keys are plain value types: cheap to clone,
//! hashable, ordered, and serialized as their display string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ExprError;

// ---------------------------------------------------------------------------
// ResourceKey
// ---------------------------------------------------------------------------

/// A namespaced identifier for a pack resource.
///
/// Displayed and serialized as `namespace:path`, e.g. `overbar:boss/hp/1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    namespace: String,
    path: String,
}

impl ResourceKey {
    /// Create a key from a namespace and a path. Both are used verbatim.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// The client's built-in font.
    ///
    /// Used as the render fallback when a text layout was never built and
    /// therefore has no width keys of its own.
    pub fn default_font() -> Self {
        Self::new("minecraft", "default")
    }

    /// The namespace component.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The path component.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ResourceKey {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((namespace, path)) if !namespace.is_empty() && !path.is_empty() => {
                Ok(Self::new(namespace, path))
            }
            _ => Err(ExprError::InvalidKey { key: s.to_owned() }),
        }
    }
}

impl Serialize for ResourceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
