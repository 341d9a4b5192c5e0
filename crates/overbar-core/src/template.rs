//! Pattern templates with live placeholder substitution.
//!
//! A pattern is literal text interleaved with `[expression]` segments, each
//! parsed by the [`Placeholders`] registry at compile time. Compilation
//! happens once per layout; [`Template::render`] runs every tick and never
//! fails.
//!
//! A `]` with no preceding `[` is literal text. An unterminated `[` is a
//! compile error.
//!
//! # Example
//!
//! ```
//! use overbar_core::placeholder::Placeholders;
//! use overbar_core::subject::{Subject, SubjectPair};
//! use overbar_core::template::Template;
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

use thiserror::Error;

use crate::placeholder::{ExprError, Placeholder, Placeholders};
use crate::subject::SubjectPair;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while compiling a pattern.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A `[` was opened but never closed.
    #[error("unterminated '[' in pattern '{pattern}'")]
    Unterminated { pattern: String },

    /// A bracketed expression failed to parse.
    #[error("invalid placeholder in pattern: {0}")]
    Expr(#[from] ExprError),
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Part {
    Literal(String),
    Expr(Placeholder),
}

/// A compiled pattern, ready for per-tick substitution.
#[derive(Debug, Clone)]
pub struct Template {
    pattern: String,
    parts: Vec<Part>,
}

impl Template {
    /// Compile a pattern against a placeholder registry.
    pub fn compile(pattern: &str, placeholders: &Placeholders) -> Result<Self, TemplateError> {
        let mut parts = Vec::new();
        let mut rest = pattern;

        while let Some(open) = rest.find('[') {
            if open > 0 {
                parts.push(Part::Literal(rest[..open].to_owned()));
            }
            let after = &rest[open + 1..];
            let close = after.find(']').ok_or_else(|| TemplateError::Unterminated {
                pattern: pattern.to_owned(),
            })?;
            parts.push(Part::Expr(placeholders.parse(&after[..close])?));
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            parts.push(Part::Literal(rest.to_owned()));
        }

        Ok(Self {
            pattern: pattern.to_owned(),
            parts,
        })
    }

    /// Substitute every placeholder against the subject pair.
    pub fn render(&self, pair: &SubjectPair) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(s) => out.push_str(s),
                Part::Expr(p) => out.push_str(&p.render(pair)),
            }
        }
        out
    }

    /// The source pattern this template was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
