//! Resolution failures.

use std::error::Error as StdError;
use std::fmt;

use crate::token::Token;
use crate::value::Value;

/// Marker glyph prefixed to already-rendered failure text so repeated
/// boundary formatting does not stack blank lines.
const NO_NEW_LINE: char = '¬';

/// [`Error`] is the failure raised by resolution entry points and injector
/// implementations.
///
/// Every class is fatal to the resolution attempt and propagates unchanged,
/// except [`NotFound`](Self::NotFound), which is augmented with a source
/// label at each injector boundary it unwinds through — never swallowed.
/// The `OPTIONAL` flag converts only a not-found miss into an empty result;
/// it suppresses no other class.
#[derive(Debug, Clone)]
pub enum Error {
    /// `inject` was called with no injection context established at all.
    NoContext,
    /// Resolution was attempted while the established context is
    /// intentionally injector-less.
    NoInjector {
        /// Stringified token of the failed request.
        token: String,
    },
    /// Nothing provides the requested token.
    NotFound(NotFound),
    /// A multi-annotation dependency descriptor carried no annotations.
    EmptyDependencyList,
    /// The tree-aware entry point would delegate to itself.
    WouldRecurse,
    /// A generated factory was invoked for a constructor no injection
    /// signature could be derived for.
    InvalidFactory {
        /// The offending type. Carried structurally so the failing class is
        /// identifiable even though the message does not name it.
        type_name: &'static str,
        /// The invalid constructor-parameter position, when known.
        index: Option<usize>,
    },
}

impl Error {
    /// An injector-less-context failure for `token`.
    #[must_use]
    pub fn no_injector(token: &Token) -> Self {
        Self::NoInjector {
            token: token.to_string(),
        }
    }

    /// Returns `true` for the no-injection-context failure.
    #[must_use]
    pub const fn is_no_context(&self) -> bool {
        matches!(self, Self::NoContext)
    }

    /// Returns `true` for a not-found failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` for the recursion-guard failure.
    #[must_use]
    pub const fn is_would_recurse(&self) -> bool {
        matches!(self, Self::WouldRecurse)
    }

    /// The structured not-found payload, if this is one.
    #[must_use]
    pub const fn not_found(&self) -> Option<&NotFound> {
        match self {
            Self::NotFound(not_found) => Some(not_found),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoContext => f.write_str("inject() must be called from an injection context"),
            Self::NoInjector { token } => {
                write!(f, "no injector context to resolve `{token}`")
            }
            Self::NotFound(not_found) => not_found.fmt(f),
            Self::EmptyDependencyList => f.write_str("arguments array must have arguments"),
            Self::WouldRecurse => {
                f.write_str("delegating to inject() here would cause infinite recursion")
            }
            Self::InvalidFactory { index: None, .. } => {
                f.write_str("this constructor is not compatible with dependency injection")
            }
            Self::InvalidFactory {
                index: Some(index), ..
            } => {
                write!(
                    f,
                    "this constructor is not compatible with dependency injection \
                     because its dependency at index {index} of the parameter list is invalid.\n\
                     This can happen if the dependency type is a primitive, or if injection \
                     metadata is missing for the class or one of its ancestors.\n\
                     Check that the parameter at index {index} has a resolvable type and that \
                     the class and its ancestors declare injection metadata"
                )
            }
        }
    }
}

impl StdError for Error {}

/// [`Result`] is an alias to [`core::result::Result`] with [`Error`] as the
/// default error type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// A structured "no provider" failure.
///
/// Injector implementations raise it with the original failure text. Each
/// injector boundary the error unwinds through prepends a source label to
/// [`path`](Self::path); the outermost boundary then renders the display
/// string once from the structured fields via [`catch_injector_error`],
/// moving the trail into [`resolved_path`](Self::resolved_path) for
/// diagnostics.
#[derive(Debug, Clone)]
pub struct NotFound {
    /// Stringified token that failed to resolve.
    pub token: String,
    /// The failure text; replaced by the rendered trail when finalized.
    pub message: String,
    /// Source labels accumulated while the failure unwinds, outermost first.
    pub path: Vec<String>,
    /// The finalized trail, kept for diagnostics and tooling.
    pub resolved_path: Option<Vec<String>>,
    /// Label of the injector that finalized the failure.
    pub injector: Option<String>,
    /// Source label of the requesting site, if one was supplied.
    pub source: Option<String>,
}

impl NotFound {
    /// A fresh failure for `token`, starting the trail at the token itself.
    #[must_use]
    pub fn new(token: &Token) -> Self {
        Self {
            token: token.to_string(),
            message: format!("No provider for {token}!"),
            path: vec![token.to_string()],
            resolved_path: None,
            injector: None,
            source: None,
        }
    }

    /// A fresh failure for `token` reported by a named provider scope.
    #[must_use]
    pub fn provider_not_found(token: &Token, source: Option<&str>) -> Self {
        let mut not_found = Self::new(token);
        if let Some(source) = source {
            not_found.message = format!("No provider for {token} found in {source}!");
            not_found.source = Some(source.to_owned());
        }
        not_found
    }

    /// Prepends a boundary label to the accumulating trail.
    pub fn prepend_source(&mut self, label: impl Into<String>) {
        self.path.insert(0, label.into());
    }

    /// Returns `true` once the trail has been rendered and finalized.
    #[must_use]
    pub const fn finalized(&self) -> bool {
        self.resolved_path.is_some()
    }
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Finalizes a not-found failure at the outermost injector boundary.
///
/// Prepends the token's own source label (when it carries one) to the
/// accumulated dependency path, renders the display text once from the
/// structured fields, moves the trail into the finalized slot, and hands
/// the error back for re-raising. Already-finalized errors — and every
/// other failure class — pass through untouched, so repeated wrapping in
/// nested scopes is harmless.
#[must_use]
pub fn catch_injector_error(
    error: Error,
    token: &Token,
    injector_label: &str,
    source: Option<&str>,
) -> Error {
    let Error::NotFound(mut not_found) = error else {
        return error;
    };
    if not_found.finalized() {
        return Error::NotFound(not_found);
    }
    if let Some(label) = token.source() {
        not_found.prepend_source(label);
    }
    let text = format!("\n{}", not_found.message);
    not_found.message = format_error(
        &text,
        &Value::path(not_found.path.iter().cloned()),
        injector_label,
        source,
    );
    not_found.injector = Some(injector_label.to_owned());
    not_found.source = source.map(str::to_owned);
    not_found.resolved_path = Some(std::mem::take(&mut not_found.path));
    Error::NotFound(not_found)
}

/// Renders a failure trail.
///
/// `context` is either the dependency path (a sequence, rendered
/// `A -> B -> C`) or a record of named fields (rendered `{key:value, …}`
/// with string values quoted). Embedded newlines in `text` are re-indented
/// by two spaces; a leading newline — and the private marker glyph that
/// suppresses doubled blank lines on repeated wrapping — is stripped. The
/// `(source)` segment is omitted entirely when no source label is given.
#[must_use]
pub fn format_error(
    text: &str,
    context: &Value,
    injector_label: &str,
    source: Option<&str>,
) -> String {
    let text = text
        .strip_prefix('\n')
        .map_or(text, |rest| rest.strip_prefix(NO_NEW_LINE).unwrap_or(rest));
    let context = match context {
        Value::Sequence(items) => items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> "),
        other => other.to_string(),
    };
    let text = text.replace('\n', "\n  ");
    match source {
        Some(source) => format!("{injector_label}({source})[{context}]: {text}"),
        None => format!("{injector_label}[{context}]: {text}"),
    }
}

#[cfg(test)]
mod tests {
    use crate::token::Token;
    use crate::value::Value;

    use super::{Error, NotFound, catch_injector_error, format_error};

    struct Service;

    #[test]
    fn test_format_error_path() {
        let got = format_error("\nmsg", &Value::path(["A", "B"]), "NullInjectorError", None);
        assert_eq!(got, "NullInjectorError[A -> B]: msg");
    }

    #[test]
    fn test_format_error_record_with_source() {
        let context = Value::Record(vec![
            ("a".into(), Value::str("x")),
            ("b".into(), Value::Num(1.0)),
        ]);
        let got = format_error("text", &context, "Err", Some("Src"));
        assert_eq!(got, r#"Err(Src)[a:"x", b:1]: text"#);
    }

    #[test]
    fn test_format_error_strips_marker_and_indents() {
        let got = format_error("\n¬already rendered", &Value::path(["A"]), "Err", None);
        assert_eq!(got, "Err[A]: already rendered");

        let got = format_error("first\nsecond", &Value::path(["A"]), "Err", None);
        assert_eq!(got, "Err[A]: first\n  second");
    }

    #[test]
    fn test_catch_injector_error_finalizes_trail() {
        let token = Token::of::<Service>();
        let mut not_found = NotFound::new(&token);
        not_found.path = vec!["A".into(), "B".into()];
        not_found.message = "No provider for B!".into();

        let caught = catch_injector_error(
            Error::NotFound(not_found),
            &token,
            "NullInjectorError",
            None,
        );
        let not_found = caught.not_found().unwrap();
        assert_eq!(not_found.message, "NullInjectorError[A -> B]: No provider for B!");
        assert_eq!(
            not_found.resolved_path.as_deref(),
            Some(&["A".to_string(), "B".to_string()][..])
        );
        assert!(not_found.path.is_empty());

        // Wrapping again at an outer scope changes nothing.
        let again = catch_injector_error(caught.clone(), &token, "Outer", None);
        assert_eq!(
            again.not_found().unwrap().message,
            not_found.message.clone()
        );
    }

    #[test]
    fn test_catch_injector_error_prepends_token_source() {
        let token = Token::opaque("Dep").with_source("AppModule");
        let caught = catch_injector_error(
            Error::NotFound(NotFound::new(&token)),
            &token,
            "Err",
            Some("Src"),
        );
        let not_found = caught.not_found().unwrap();
        assert_eq!(
            not_found.resolved_path.as_deref(),
            Some(&["AppModule".to_string(), "Dep".to_string()][..])
        );
        assert_eq!(not_found.message, "Err(Src)[AppModule -> Dep]: No provider for Dep!");
    }

    #[test]
    fn test_provider_not_found_names_the_scope() {
        let token = Token::opaque("Renderer");
        let not_found = NotFound::provider_not_found(&token, Some("RootScope"));
        assert_eq!(not_found.message, "No provider for Renderer found in RootScope!");
        assert_eq!(not_found.source.as_deref(), Some("RootScope"));

        let bare = NotFound::provider_not_found(&token, None);
        assert_eq!(bare.message, "No provider for Renderer!");
    }

    #[test]
    fn test_other_classes_pass_through() {
        let token = Token::of::<Service>();
        let caught = catch_injector_error(Error::NoContext, &token, "Err", None);
        assert!(caught.is_no_context());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Error::NoContext.to_string(),
            "inject() must be called from an injection context"
        );
        assert_eq!(
            Error::EmptyDependencyList.to_string(),
            "arguments array must have arguments"
        );
        let invalid = Error::InvalidFactory {
            type_name: "Widget",
            index: None,
        };
        assert_eq!(
            invalid.to_string(),
            "this constructor is not compatible with dependency injection"
        );
        let indexed = Error::InvalidFactory {
            type_name: "Widget",
            index: Some(2),
        };
        assert!(indexed.to_string().contains("index 2"));
    }
}
