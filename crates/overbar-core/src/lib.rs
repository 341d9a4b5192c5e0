//! Overbar core -- subjects, placeholders, templates, and conditions.
//!
//! This crate holds the value layer of the Overbar gauge renderer: the
//! runtime [`SubjectPair`](subject::SubjectPair) context, the typed
//! [`Placeholders`](placeholder::Placeholders) registry, the
//! [`Template`](template::Template) pattern compiler, the
//! [`Condition`](condition::Condition) expression tree, and the namespaced
//! [`ResourceKey`](key::ResourceKey) value type.
//!
//! Everything here is immutable after construction and safe to share
//! read-only across any number of renderers. Construction is fallible and
//! surfaces configuration mistakes; evaluation is total and runs every tick.
//!
//! # Quick Start
//!
//! ```
//! use overbar_core::prelude::*;
//!
//! let placeholders = Placeholders::standard();
//! let template = Template::compile("[name] [health]/[max-health]", &placeholders).unwrap();
//!
//! let pair = SubjectPair::new(
//!     Subject::new("Zombie", 14.0, 20.0),
//!     Subject::new("Steve", 20.0, 20.0),
//! );
//! assert_eq!(template.render(&pair), "Zombie 14/20");
//! ```

#![deny(unsafe_code)]

pub mod condition;
pub mod key;
pub mod placeholder;
pub mod subject;
pub mod template;

pub use placeholder::ExprError;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::condition::{
        CompareOp, Comparison, Condition, ConditionConfig, ConditionError, Gate,
    };
    pub use crate::key::ResourceKey;
    pub use crate::placeholder::{Placeholder, Placeholders, Value};
    pub use crate::subject::{Subject, SubjectPair};
    pub use crate::template::{Template, TemplateError};
    pub use crate::ExprError;
}
