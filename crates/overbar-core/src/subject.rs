//! The runtime evaluation context for gauges.
//!
//! Every condition and template in this system is evaluated against a
//! [`SubjectPair`]: the entity the gauge is attached to (the target) and the
//! player observing it (the viewer). The pair is assembled fresh by the host
//! whenever an overlay attachment is created; this crate only reads it.
//!
//! Beyond the fixed vital fields, a [`Subject`] carries an open `stats` map
//! so hosts can expose game-specific values (armor, shield, rage, ...) to
//! placeholders without extending this crate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Subject
// ---------------------------------------------------------------------------

/// One side of a [`SubjectPair`]: a named entity with vital stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Display name (entity custom name, player name, ...).
    pub name: String,
    /// Current health value.
    pub health: f64,
    /// Maximum health value.
    pub max_health: f64,
    /// Host-defined named values, consulted by the `stat` placeholder.
    #[serde(default)]
    pub stats: HashMap<String, f64>,
}

impl Subject {
    /// Create a subject with the given name and vitals and no extra stats.
    pub fn new(name: impl Into<String>, health: f64, max_health: f64) -> Self {
        Self {
            name: name.into(),
            health,
            max_health,
            stats: HashMap::new(),
        }
    }

    /// Add a host-defined stat, consuming and returning the subject.
    pub fn with_stat(mut self, key: impl Into<String>, value: f64) -> Self {
        self.stats.insert(key.into(), value);
        self
    }

    /// Look up a host-defined stat by key.
    pub fn stat(&self, key: &str) -> Option<f64> {
        self.stats.get(key).copied()
    }
}

// ---------------------------------------------------------------------------
// SubjectPair
// ---------------------------------------------------------------------------

/// The context a condition or pattern is evaluated against: the gauge's
/// target entity plus the viewer it is rendered for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectPair {
    /// The entity the gauge is attached to.
    pub target: Subject,
    /// The player observing the gauge.
    pub viewer: Subject,
}

impl SubjectPair {
    /// Pair a target with a viewer.
    pub fn new(target: Subject, viewer: Subject) -> Self {
        Self { target, viewer }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
