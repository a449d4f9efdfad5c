//! The flat, context-independent resolution entry points.
//!
//! Everything here resolves against the *current injector context* — the
//! process-wide slot in [`weft_core::context`] — without any awareness of
//! the component tree. The tree-aware layer interposes itself through the
//! [`switch`](crate::switch) and is otherwise invisible to this module.

use std::sync::OnceLock;

use weft_core::context::{InjectorContext, current_injector};
use weft_core::erased::Erased;
use weft_core::error::{Error, Result};
use weft_core::flags::InjectFlags;
use weft_core::injector::{Injector, NotFoundValue};
use weft_core::token::{Token, resolve_forward_ref};

use crate::switch;

/// Resolves `token` against the currently established injector context,
/// ignoring any installed tree-aware implementation.
///
/// # Errors
///
/// Fails with [`Error::NoContext`] when no context is established at all;
/// in limp mode, with whatever the root fallback raises; otherwise with
/// whatever the active injector raises on a miss — unless
/// [`OPTIONAL`](InjectFlags::OPTIONAL) is set, which turns the miss into
/// `Ok(None)`.
pub fn inject_injector_only(token: &Token, flags: InjectFlags) -> Result<Option<Erased>> {
    match current_injector() {
        InjectorContext::Unset => Err(Error::NoContext),
        InjectorContext::Limp => {
            switch::inject_root_limp_mode(token, NotFoundValue::Raise, flags)
        }
        InjectorContext::Active(injector) => {
            let not_found = if flags.contains(InjectFlags::OPTIONAL) {
                NotFoundValue::Null
            } else {
                NotFoundValue::Raise
            };
            injector.get(token, not_found, flags)
        }
    }
}

/// Resolves `token` from the currently active injection strategy.
///
/// This is the general-purpose entry point. A tree-aware runtime may have
/// interposed itself through the [`switch`](crate::switch), in which case
/// the call is routed there transparently; otherwise resolution is
/// flat-only. Forward references are unwrapped first.
///
/// # Errors
///
/// See [`inject_injector_only`]; an interposed implementation may raise its
/// own failures on top.
pub fn inject(token: &Token, flags: InjectFlags) -> Result<Option<Erased>> {
    let token = resolve_forward_ref(token);
    trace!("token" = %token, flags = ?flags, "inject");
    match switch::inject_implementation() {
        Some(implementation) => implementation(&token, flags),
        None => inject_injector_only(&token, flags),
    }
}

/// Resolves `T`'s own type token and downcasts the result.
///
/// Convenience wrapper over [`inject`] for call sites that know the
/// concrete type statically.
///
/// # Errors
///
/// See [`inject`].
///
/// # Panics
///
/// Panics if the active injector provides a value of a different type for
/// `T`'s token, which is a provider bug.
pub fn inject_typed<T>(flags: InjectFlags) -> Result<Option<T>>
where
    T: Clone + Send + Sync + 'static,
{
    Ok(inject(&Token::of::<T>(), flags)?.map(|erased| {
        erased
            .extract::<T>()
            .expect("value provided for a type token should be of that type")
    }))
}

/// A constructor-parameter dependency descriptor, as emitted by generated
/// factory code.
#[derive(Clone, Debug)]
pub enum ParamDep {
    /// A bare token, resolved with default flags.
    Token(Token),
    /// A decorated parameter: the ordered annotations applied to it.
    Annotated(Vec<ParamAnnotation>),
}

/// One annotation on a decorated constructor parameter.
#[derive(Clone, Debug)]
pub enum ParamAnnotation {
    /// The parameter's own token.
    Token(Token),
    /// An explicit injection annotation supplying its own token.
    Inject(Token),
    /// A resolution-flag modifier.
    Flags(InjectFlags),
}

impl ParamAnnotation {
    /// The `Host` modifier: stop walking at the nearest host boundary.
    #[must_use]
    pub const fn host() -> Self {
        Self::Flags(InjectFlags::HOST)
    }

    /// The `Self` modifier: consult only the requesting scope.
    #[must_use]
    pub const fn self_scope() -> Self {
        Self::Flags(InjectFlags::SELF)
    }

    /// The `SkipSelf` modifier: start resolution at the parent scope.
    #[must_use]
    pub const fn skip_self() -> Self {
        Self::Flags(InjectFlags::SKIP_SELF)
    }

    /// The `Optional` modifier: a miss yields no value instead of failing.
    #[must_use]
    pub const fn optional() -> Self {
        Self::Flags(InjectFlags::OPTIONAL)
    }
}

fn unspecified_token() -> &'static Token {
    // An annotated parameter may carry only flag modifiers and never name a
    // token. The descriptor is underspecified; resolution proceeds with a
    // reserved token nothing provides, so the miss surfaces through the
    // ordinary not-found path instead of a stricter contract being invented
    // here.
    static UNSPECIFIED: OnceLock<Token> = OnceLock::new();
    UNSPECIFIED.get_or_init(|| Token::opaque("unspecified"))
}

/// Resolves a generated factory's dependency list, in order.
///
/// Plain entries resolve with default flags. An annotated entry is scanned
/// in order: token-bearing annotations overwrite the effective token — the
/// last one wins, with an explicit [`Inject`](ParamAnnotation::Inject)
/// supplying its own token — while flag modifiers accumulate. The entry is
/// then resolved once with the combined flags. Results mirror the input
/// order.
///
/// # Errors
///
/// Fails with [`Error::EmptyDependencyList`] on an annotated entry with no
/// annotations, and propagates any resolution failure.
pub fn inject_args(deps: &[ParamDep]) -> Result<Vec<Option<Erased>>> {
    let mut args = Vec::with_capacity(deps.len());
    for dep in deps {
        match dep {
            ParamDep::Token(token) => args.push(inject(token, InjectFlags::DEFAULT)?),
            ParamDep::Annotated(annotations) => {
                if annotations.is_empty() {
                    return Err(Error::EmptyDependencyList);
                }
                let mut token = None;
                let mut flags = InjectFlags::DEFAULT;
                for annotation in annotations {
                    match annotation {
                        ParamAnnotation::Token(t) | ParamAnnotation::Inject(t) => token = Some(t),
                        ParamAnnotation::Flags(f) => flags |= *f,
                    }
                }
                args.push(inject(token.unwrap_or_else(|| unspecified_token()), flags)?);
            }
        }
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use weft_core::context::{InjectorContext, ScopedInjector, current_injector};
    use weft_core::erased::Erased;
    use weft_core::error::{Error, Result};
    use weft_core::flags::InjectFlags;
    use weft_core::injector::{Injector, NotFoundValue};
    use weft_core::token::Token;

    use weft_util::StaticInjector;

    use super::{ParamAnnotation, ParamDep, inject, inject_args, inject_typed};

    struct Service;

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Config(&'static str);

    /// Records every `get` call so tests can observe the effective token
    /// and flags.
    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<(String, InjectFlags)>>,
    }

    impl Recording {
        fn new() -> Arc<Self> {
            Arc::default()
        }
    }

    impl Injector for Recording {
        fn get(
            &self,
            token: &Token,
            _not_found: NotFoundValue,
            flags: InjectFlags,
        ) -> Result<Option<Erased>> {
            self.calls
                .lock()
                .unwrap()
                .push((token.to_string(), flags));
            Ok(Some(Erased::new(0_i32)))
        }
    }

    #[test]
    fn test_inject_without_context_fails_for_every_flag_combination() {
        for flags in [
            InjectFlags::DEFAULT,
            InjectFlags::HOST,
            InjectFlags::SELF | InjectFlags::SKIP_SELF,
            InjectFlags::OPTIONAL,
            InjectFlags::OPTIONAL | InjectFlags::HOST,
        ] {
            let result = inject(&Token::of::<Service>(), flags);
            assert!(matches!(result, Err(Error::NoContext)), "flags: {flags:?}");
        }
    }

    #[test]
    fn test_limp_mode_optional_yields_nothing() {
        let _scope = ScopedInjector::enter(InjectorContext::Limp);
        let got = inject(&Token::of::<Service>(), InjectFlags::OPTIONAL).unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn test_limp_mode_without_optional_fails() {
        let _scope = ScopedInjector::enter(InjectorContext::Limp);
        let result = inject(&Token::of::<Service>(), InjectFlags::DEFAULT);
        assert!(matches!(result, Err(Error::NoInjector { .. })));
    }

    #[test]
    fn test_inject_resolves_from_the_active_injector() {
        let injector = StaticInjector::builder()
            .with_type(Config("prod"))
            .build();
        let _scope = ScopedInjector::enter(InjectorContext::Active(Arc::new(injector)));

        let got = inject(&Token::of::<Config>(), InjectFlags::DEFAULT)
            .unwrap()
            .unwrap();
        assert_eq!(got.extract::<Config>(), Some(Config("prod")));

        let typed = inject_typed::<Config>(InjectFlags::DEFAULT).unwrap();
        assert_eq!(typed, Some(Config("prod")));
    }

    #[test]
    fn test_optional_miss_resolves_to_nothing() {
        let injector = StaticInjector::builder().build();
        let _scope = ScopedInjector::enter(InjectorContext::Active(Arc::new(injector)));

        let got = inject(&Token::of::<Service>(), InjectFlags::OPTIONAL).unwrap();
        assert!(got.is_none());

        let miss = inject(&Token::of::<Service>(), InjectFlags::DEFAULT);
        assert!(miss.unwrap_err().is_not_found());
    }

    #[test]
    fn test_inject_unwraps_forward_references() {
        let injector = StaticInjector::builder().with_type(Config("fwd")).build();
        let _scope = ScopedInjector::enter(InjectorContext::Active(Arc::new(injector)));

        let forward = Token::forward(Token::of::<Config>);
        let got = inject(&forward, InjectFlags::DEFAULT).unwrap().unwrap();
        assert_eq!(got.extract::<Config>(), Some(Config("fwd")));
    }

    #[test]
    fn test_inject_args_empty_list_yields_empty() {
        assert!(inject_args(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_inject_args_empty_annotations_fail() {
        let result = inject_args(&[ParamDep::Annotated(vec![])]);
        assert!(matches!(result, Err(Error::EmptyDependencyList)));
    }

    #[test]
    fn test_inject_args_explicit_inject_with_host_modifier() {
        let recording = Recording::new();
        let as_injector: Arc<dyn Injector> = recording.clone();
        let _scope = ScopedInjector::enter(InjectorContext::Active(as_injector));

        let explicit = Token::opaque("explicit");
        inject_args(&[ParamDep::Annotated(vec![
            ParamAnnotation::Inject(explicit.clone()),
            ParamAnnotation::host(),
        ])])
        .unwrap();

        let calls = recording.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "explicit");
        assert_eq!(calls[0].1, InjectFlags::HOST);
    }

    #[test]
    fn test_inject_args_last_token_wins_and_flags_accumulate() {
        let recording = Recording::new();
        let as_injector: Arc<dyn Injector> = recording.clone();
        let _scope = ScopedInjector::enter(InjectorContext::Active(as_injector));

        let first = Token::opaque("first");
        let second = Token::opaque("second");
        inject_args(&[ParamDep::Annotated(vec![
            ParamAnnotation::optional(),
            ParamAnnotation::Token(first),
            ParamAnnotation::skip_self(),
            ParamAnnotation::Token(second),
        ])])
        .unwrap();

        let calls = recording.calls.lock().unwrap();
        assert_eq!(calls[0].0, "second");
        assert_eq!(calls[0].1, InjectFlags::OPTIONAL | InjectFlags::SKIP_SELF);
    }

    #[test]
    fn test_inject_args_flag_only_annotations_resolve_the_unspecified_token() {
        let injector = StaticInjector::builder().build();
        let _scope = ScopedInjector::enter(InjectorContext::Active(Arc::new(injector)));

        // No token was ever named; the miss surfaces as an ordinary
        // not-found failure for the reserved token.
        let result = inject_args(&[ParamDep::Annotated(vec![ParamAnnotation::self_scope()])]);
        let err = result.unwrap_err();
        assert_eq!(err.not_found().unwrap().token, "unspecified");
    }

    #[test]
    fn test_inject_args_preserves_input_order() {
        let injector = StaticInjector::builder()
            .with_type(Config("a"))
            .with_type(7_i32)
            .build();
        let _scope = ScopedInjector::enter(InjectorContext::Active(Arc::new(injector)));

        let got = inject_args(&[
            ParamDep::Token(Token::of::<i32>()),
            ParamDep::Token(Token::of::<Config>()),
        ])
        .unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].as_ref().unwrap().extract::<i32>(), Some(7));
        assert_eq!(
            got[1].as_ref().unwrap().extract::<Config>(),
            Some(Config("a"))
        );
    }

    #[test]
    fn test_reentrant_resolution_restores_the_context() {
        // `Service`'s factory injects `Config`, which is missing, so the
        // inner resolution fails — and the context slot still unwinds back
        // to exactly where it started.
        let injector = StaticInjector::builder()
            .with_factory(&Token::of::<Service>(), || {
                let inner = inject(&Token::of::<Config>(), InjectFlags::DEFAULT)?;
                Ok(Erased::new(inner))
            })
            .build();
        let _scope = ScopedInjector::enter(InjectorContext::Active(Arc::new(injector)));

        let result = inject(&Token::of::<Service>(), InjectFlags::DEFAULT);
        assert!(result.unwrap_err().is_not_found());
        assert!(matches!(current_injector(), InjectorContext::Active(_)));

        drop(_scope);
        assert!(current_injector().is_unset());
    }

}
