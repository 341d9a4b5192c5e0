//! Typed placeholder sources evaluated against a subject pair.
//!
//! A placeholder expression names a value source that is resolved at render
//! time against the current [`SubjectPair`]. Expressions follow the grammar
//!
//! ```text
//! [(cast)]name[:arg1,arg2,...]
//! ```
//!
//! where `cast` is one of `number`, `string`, or `boolean`, `name` is drawn
//! from `[a-zA-Z0-9_.()-]`, and the optional colon-separated arguments are
//! consumed by the source's builder. An expression that names no registered
//! source falls back to primitive literal parsing: a bare `f64`, a
//! `'single-quoted'` string, or `true`/`false`.
//!
//! Parsing happens once at layout construction; evaluation is pure and cheap,
//! safe to run every tick.
//!
//! # Example
//!
//! ```
//! use overbar_core::placeholder::Placeholders;
//! use overbar_core::subject::{Subject, SubjectPair};
//!
//! let placeholders = Placeholders::standard();
//! let health = placeholders.parse("health").unwrap();
//!
//! let pair = SubjectPair::new(
//!     Subject::new("Zombie", 14.0, 20.0),
//!     Subject::new("Steve", 20.0, 20.0),
//! );
//! assert_eq!(health.render(&pair), "14");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::subject::SubjectPair;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while parsing expressions and resource keys.
#[derive(Debug, Error)]
pub enum ExprError {
    /// A resource key string was not of the form `namespace:path`.
    #[error("invalid resource key '{key}' (expected 'namespace:path')")]
    InvalidKey { key: String },

    /// The expression was empty.
    #[error("empty placeholder expression")]
    Empty,

    /// A cast prefix named an unknown value kind.
    #[error("unsupported cast '{cast}' (expected 'number', 'string', or 'boolean')")]
    UnsupportedCast { cast: String },

    /// The expression named no registered source and parsed as no primitive.
    #[error("unable to parse placeholder '{expr}'")]
    UnknownSource { expr: String },

    /// A source was given fewer arguments than its builder requires.
    #[error("placeholder '{name}' requires at least {required} argument(s), got {given}")]
    MissingArgs {
        name: String,
        required: usize,
        given: usize,
    },
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A runtime value produced by a placeholder source.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Value {
    /// Render the value as the string that appears in substituted patterns.
    ///
    /// Numbers use the shortest `f64` representation, so integral values
    /// print without a fractional part (`14.0` renders as `"14"`).
    pub fn render(&self) -> String {
        match self {
            Value::Number(n) => n.to_string(),
            Value::Text(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
        }
    }
}

/// The three value kinds a placeholder source can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Number,
    Text,
    Bool,
}

impl Kind {
    /// Parse a primitive literal of this kind.
    ///
    /// Strings require single quotes here so that bare words stay errors
    /// rather than silently becoming literals.
    fn parse_literal(self, s: &str) -> Option<Value> {
        match self {
            Kind::Number => s.parse::<f64>().ok().map(Value::Number),
            Kind::Text => {
                let stripped = s.strip_prefix('\'')?.strip_suffix('\'')?;
                Some(Value::Text(stripped.to_owned()))
            }
            Kind::Bool => match s {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
        }
    }

    /// Re-parse a source's string rendering into this kind, as done by a
    /// cast prefix. Unlike literals, any string is a valid `Text`.
    fn parse_rendering(self, s: &str) -> Option<Value> {
        match self {
            Kind::Text => Some(Value::Text(s.to_owned())),
            _ => self.parse_literal(s),
        }
    }

    /// The value this kind degrades to when a cast fails at runtime.
    fn zero(self) -> Value {
        match self {
            Kind::Number => Value::Number(0.0),
            Kind::Text => Value::Text(String::new()),
            Kind::Bool => Value::Bool(false),
        }
    }
}

impl FromStr for Kind {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "number" => Ok(Kind::Number),
            "string" => Ok(Kind::Text),
            "boolean" => Ok(Kind::Bool),
            other => Err(ExprError::UnsupportedCast {
                cast: other.to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Placeholder
// ---------------------------------------------------------------------------

type SourceFn = Arc<dyn Fn(&SubjectPair) -> Value + Send + Sync>;

/// A compiled placeholder: the parsed expression bound to its value source.
///
/// Evaluation never fails; sources degrade to their documented zero values
/// instead of erroring in the render path.
#[derive(Clone)]
pub struct Placeholder {
    expr: String,
    source: SourceFn,
}

impl Placeholder {
    /// Evaluate against a subject pair.
    pub fn value(&self, pair: &SubjectPair) -> Value {
        (self.source)(pair)
    }

    /// Evaluate and render as a string.
    pub fn render(&self, pair: &SubjectPair) -> String {
        self.value(pair).render()
    }

    /// The source expression this placeholder was parsed from.
    pub fn expr(&self) -> &str {
        &self.expr
    }
}

impl fmt::Debug for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Placeholder").field(&self.expr).finish()
    }
}

// ---------------------------------------------------------------------------
// Placeholders registry
// ---------------------------------------------------------------------------

struct Builder {
    kind: Kind,
    required_args: usize,
    build: Box<dyn Fn(&[String]) -> SourceFn + Send + Sync>,
}

/// Registry of named value sources.
///
/// Hosts register sources with [`number`](Self::number) and friends, then
/// hand the registry to layout construction, which calls
/// [`parse`](Self::parse) for every expression in patterns and conditions.
pub struct Placeholders {
    map: HashMap<String, Builder>,
}

impl Placeholders {
    /// An empty registry with no sources.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// The standard registry: `health`, `max-health`, `percent`, `stat`,
    /// `name`, `viewer-name`, and `dead`.
    pub fn standard() -> Self {
        let mut placeholders = Self::new();
        placeholders.number("health", |pair| pair.target.health);
        placeholders.number("max-health", |pair| pair.target.max_health);
        placeholders.number("percent", |pair| {
            if pair.target.max_health == 0.0 {
                0.0
            } else {
                100.0 * pair.target.health / pair.target.max_health
            }
        });
        placeholders.number_with_args("stat", 1, |args, pair| {
            pair.target.stat(&args[0]).unwrap_or(0.0)
        });
        placeholders.text("name", |pair| pair.target.name.clone());
        placeholders.text("viewer-name", |pair| pair.viewer.name.clone());
        placeholders.bool("dead", |pair| pair.target.health <= 0.0);
        placeholders
    }

    /// Register a zero-argument number source.
    pub fn number<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&SubjectPair) -> f64 + Send + Sync + 'static,
    {
        self.register(name, Kind::Number, 0, move |_args, pair| {
            Value::Number(f(pair))
        });
    }

    /// Register a zero-argument text source.
    pub fn text<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&SubjectPair) -> String + Send + Sync + 'static,
    {
        self.register(name, Kind::Text, 0, move |_args, pair| Value::Text(f(pair)));
    }

    /// Register a zero-argument boolean source.
    pub fn bool<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&SubjectPair) -> bool + Send + Sync + 'static,
    {
        self.register(name, Kind::Bool, 0, move |_args, pair| Value::Bool(f(pair)));
    }

    /// Register a number source that consumes an argument list.
    ///
    /// Expressions binding this source must supply at least `required_args`
    /// arguments; fewer is a construction-time error.
    pub fn number_with_args<F>(&mut self, name: impl Into<String>, required_args: usize, f: F)
    where
        F: Fn(&[String], &SubjectPair) -> f64 + Send + Sync + 'static,
    {
        self.register(name, Kind::Number, required_args, move |args, pair| {
            Value::Number(f(args, pair))
        });
    }

    /// Register a text source that consumes an argument list.
    pub fn text_with_args<F>(&mut self, name: impl Into<String>, required_args: usize, f: F)
    where
        F: Fn(&[String], &SubjectPair) -> String + Send + Sync + 'static,
    {
        self.register(name, Kind::Text, required_args, move |args, pair| {
            Value::Text(f(args, pair))
        });
    }

    /// Register a boolean source that consumes an argument list.
    pub fn bool_with_args<F>(&mut self, name: impl Into<String>, required_args: usize, f: F)
    where
        F: Fn(&[String], &SubjectPair) -> bool + Send + Sync + 'static,
    {
        self.register(name, Kind::Bool, required_args, move |args, pair| {
            Value::Bool(f(args, pair))
        });
    }

    fn register<F>(&mut self, name: impl Into<String>, kind: Kind, required_args: usize, f: F)
    where
        F: Fn(&[String], &SubjectPair) -> Value + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.map.insert(
            name.into(),
            Builder {
                kind,
                required_args,
                build: Box::new(move |args: &[String]| {
                    let f = Arc::clone(&f);
                    let args = args.to_vec();
                    Arc::new(move |pair: &SubjectPair| f(&args, pair))
                }),
            },
        );
    }

    /// Parse an expression into a compiled [`Placeholder`].
    ///
    /// Resolution order: registered source (applying any cast prefix via the
    /// source's string rendering), then primitive literal, then failure.
    pub fn parse(&self, expr: &str) -> Result<Placeholder, ExprError> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(ExprError::Empty);
        }

        let source = match split_expr(trimmed) {
            Some((cast_name, name, args)) => {
                let cast = cast_name.map(Kind::from_str).transpose()?;
                match self.map.get(name) {
                    Some(builder) => {
                        if args.len() < builder.required_args {
                            return Err(ExprError::MissingArgs {
                                name: name.to_owned(),
                                required: builder.required_args,
                                given: args.len(),
                            });
                        }
                        let source = (builder.build)(&args);
                        match cast {
                            Some(kind) if kind != builder.kind => {
                                Arc::new(move |pair: &SubjectPair| {
                                    let rendered = source(pair).render();
                                    kind.parse_rendering(&rendered)
                                        .unwrap_or_else(|| kind.zero())
                                }) as SourceFn
                            }
                            _ => source,
                        }
                    }
                    // Structured but unregistered: the name itself may be a
                    // primitive (e.g. a bare number or boolean).
                    None => primitive(name).ok_or_else(|| ExprError::UnknownSource {
                        expr: trimmed.to_owned(),
                    })?,
                }
            }
            // Not a structured expression (quotes, spaces, ...): the whole
            // string must be a primitive literal.
            None => primitive(trimmed).ok_or_else(|| ExprError::UnknownSource {
                expr: trimmed.to_owned(),
            })?,
        };

        Ok(Placeholder {
            expr: trimmed.to_owned(),
            source,
        })
    }
}

impl Default for Placeholders {
    /// Defaults to the standard registry.
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Placeholders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.map.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Placeholders").field("names", &names).finish()
    }
}

/// Split `[(cast)]name[:args]` into its parts, or `None` if the string does
/// not fit the structured grammar.
fn split_expr(expr: &str) -> Option<(Option<&str>, &str, Vec<String>)> {
    let (cast, rest) = match expr.strip_prefix('(') {
        Some(stripped) => {
            let (cast, rest) = stripped.split_once(')')?;
            (Some(cast), rest)
        }
        None => (None, expr),
    };

    let (name, args) = match rest.split_once(':') {
        Some((name, args)) => (name, args.split(',').map(str::to_owned).collect()),
        None => (rest, Vec::new()),
    };

    let name_ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '(' | ')' | '-'));
    if name_ok {
        Some((cast, name, args))
    } else {
        None
    }
}

/// Parse a primitive literal: number, `'quoted'` string, or boolean.
fn primitive(s: &str) -> Option<SourceFn> {
    let value = Kind::Number
        .parse_literal(s)
        .or_else(|| Kind::Text.parse_literal(s))
        .or_else(|| Kind::Bool.parse_literal(s))?;
    Some(Arc::new(move |_pair: &SubjectPair| value.clone()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
