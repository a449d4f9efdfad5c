//! A closed variant set for dynamically shaped values.

use std::fmt;

/// Coarse capability classes of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// Ordered and element-wise comparable.
    Sequence,
    /// Object-like; contents are opaque to identity checks.
    Object,
    /// Compared by value.
    Scalar,
}

/// A dynamically shaped value.
///
/// The runtime deals in a handful of dynamic shapes — ordered sequences,
/// keyed records, opaque objects whose contents it never inspects, and
/// scalars. [`Value`] is the closed set of those shapes, shared by the
/// dirty-check equality utility and by error-context rendering.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// An ordered sequence of values.
    Sequence(Vec<Value>),
    /// A keyed record; insertion order is preserved for rendering.
    Record(Vec<(String, Value)>),
    /// An object or callable whose contents are never inspected. The label
    /// is only used for rendering.
    Opaque(&'static str),
    /// A string.
    Str(String),
    /// A number with the identity semantics of an IEEE double.
    Num(f64),
    /// A boolean.
    Bool(bool),
    /// The absent value.
    Null,
}

impl Value {
    /// Convenience constructor for string values.
    #[must_use]
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// Builds a sequence of string values — the shape of a dependency path.
    #[must_use]
    pub fn path<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Sequence(labels.into_iter().map(|label| Self::Str(label.into())).collect())
    }

    /// The capability class of this value.
    ///
    /// The probe is approximate by construction: an [`Opaque`](Self::Opaque)
    /// value may well be list-like underneath, but the runtime has no way to
    /// tell and classifies it as an object.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Record(_) | Self::Opaque(_) => ValueKind::Object,
            Self::Str(_) | Self::Num(_) | Self::Bool(_) | Self::Null => ValueKind::Scalar,
        }
    }
}

fn fmt_num(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        #[allow(clippy::cast_possible_truncation)]
        let whole = n as i64;
        write!(f, "{whole}")
    } else {
        write!(f, "{n}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt(f)?;
                }
                f.write_str("]")
            }
            Self::Record(fields) => {
                f.write_str("{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    // String field values render quoted so they survive
                    // round trips through log output unambiguously.
                    match value {
                        Self::Str(s) => write!(f, "{key}:{s:?}")?,
                        other => write!(f, "{key}:{other}")?,
                    }
                }
                f.write_str("}")
            }
            Self::Opaque(label) => f.write_str(label),
            Self::Str(s) => f.write_str(s),
            Self::Num(n) => fmt_num(*n, f),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
        }
    }
}
