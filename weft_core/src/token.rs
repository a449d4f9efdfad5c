//! Resolution keys.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a [`Token`] once forward references are unwrapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKey {
    /// A token backed by a Rust type.
    Type(TypeId),
    /// An opaque injection token, identified by a process-unique id.
    Opaque(u64),
}

#[derive(Clone)]
enum Repr {
    Type { id: TypeId, name: &'static str },
    Opaque { id: u64, desc: Arc<str> },
    Forward(Arc<dyn Fn() -> Token + Send + Sync>),
}

/// A [`Token`] identifies a resolvable dependency.
///
/// Tokens come in three shapes: Rust types (concrete types and trait
/// objects alike, via [`Token::of`]), opaque injection tokens
/// ([`Token::opaque`]), and deferred forward references
/// ([`Token::forward`]) that yield the real token when unwrapped. Forward
/// references exist to break declaration cycles and must be resolved before
/// a token is compared or looked up — see [`resolve_forward_ref`]; equality
/// and hashing resolve them implicitly.
#[derive(Clone)]
pub struct Token {
    repr: Repr,
    source: Option<&'static str>,
}

static NEXT_OPAQUE_ID: AtomicU64 = AtomicU64::new(1);

impl Token {
    /// Returns the token for the Rust type `T`.
    ///
    /// `T` may be unsized, so trait objects work: `Token::of::<dyn Logger>()`
    /// names an abstract dependency the same way a concrete type does.
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            repr: Repr::Type {
                id: TypeId::of::<T>(),
                name: type_name::<T>(),
            },
            source: None,
        }
    }

    /// Creates a fresh opaque injection token described by `desc`.
    ///
    /// Every call yields a distinct token, even for equal descriptions.
    #[must_use]
    pub fn opaque(desc: impl Into<Arc<str>>) -> Self {
        Self {
            repr: Repr::Opaque {
                id: NEXT_OPAQUE_ID.fetch_add(1, Ordering::Relaxed),
                desc: desc.into(),
            },
            source: None,
        }
    }

    /// Wraps a deferred reference yielding the real token when resolved.
    #[must_use]
    pub fn forward<F>(f: F) -> Self
    where
        F: Fn() -> Token + Send + Sync + 'static,
    {
        Self {
            repr: Repr::Forward(Arc::new(f)),
            source: None,
        }
    }

    /// Attaches a source label, surfaced in dependency paths on failure.
    #[must_use]
    pub fn with_source(mut self, source: &'static str) -> Self {
        self.source = Some(source);
        self
    }

    /// The source label, if any.
    #[must_use]
    pub const fn source(&self) -> Option<&'static str> {
        self.source
    }

    /// Returns `true` if this token is an unresolved forward reference.
    #[must_use]
    pub const fn is_forward_ref(&self) -> bool {
        matches!(self.repr, Repr::Forward(_))
    }

    /// The resolved identity of this token.
    ///
    /// A forward reference is unwrapped first; see [`resolve_forward_ref`].
    #[must_use]
    pub fn key(&self) -> TokenKey {
        match &self.repr {
            Repr::Type { id, .. } => TokenKey::Type(*id),
            Repr::Opaque { id, .. } => TokenKey::Opaque(*id),
            Repr::Forward(f) => f().key(),
        }
    }
}

/// Unwraps one level of forward reference; identity for anything else.
///
/// Lookups require a resolved token, so every resolution entry point applies
/// this before consulting an injector — including each entry of a
/// dependency list.
#[must_use]
pub fn resolve_forward_ref(token: &Token) -> Token {
    match &token.repr {
        Repr::Forward(f) => f(),
        _ => token.clone(),
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Type { name, .. } => f.write_str(name),
            Repr::Opaque { desc, .. } => f.write_str(desc),
            Repr::Forward(forward) => forward().fmt(f),
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Type { name, .. } => write!(f, "Token({name})"),
            Repr::Opaque { id, desc } => write!(f, "Token(#{id} {desc})"),
            Repr::Forward(_) => f.write_str("Token(forward)"),
        }
    }
}
