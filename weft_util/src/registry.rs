//! A reference flat injector backed by static registrations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use weft_core::context::{InjectorContext, ScopedInjector, current_injector};
use weft_core::erased::Erased;
use weft_core::error::{Error, NotFound, Result, catch_injector_error};
use weft_core::flags::InjectFlags;
use weft_core::injector::{Injector, NotFoundValue};
use weft_core::token::{Token, TokenKey, resolve_forward_ref};

/// Constructs a value for a lazily provided token.
pub type Factory = Arc<dyn Fn() -> Result<Erased> + Send + Sync>;

/// Boundary label stamped onto finalized not-found failures.
const BOUNDARY_LABEL: &str = "StaticInjectorError";

enum Provider {
    Value(Erased),
    Factory(Factory),
}

struct Inner {
    parent: Option<Arc<dyn Injector>>,
    providers: HashMap<TokenKey, Provider>,
    constructed: Mutex<HashMap<TokenKey, Erased>>,
}

/// A flat injector resolving tokens from a fixed registration map.
///
/// Values are handed out as registered. Factories run on first request with
/// this injector established as the current context — so they may re-enter
/// the runtime's resolution entry points for their own dependencies — and
/// the constructed value is memoized. Lookups reduce the scope flags to the internal check
/// bits; `HOST` has no meaning for a flat chain and passes through. On a
/// miss the [`NotFoundValue`] contract applies, and a failure unwinding
/// through a factory picks up this boundary's request on its dependency
/// path.
#[derive(Clone)]
pub struct StaticInjector(Arc<Inner>);

/// A builder for [`StaticInjector`].
pub struct StaticInjectorBuilder {
    parent: Option<Arc<dyn Injector>>,
    providers: HashMap<TokenKey, Provider>,
}

impl StaticInjector {
    /// Returns a new builder with no registrations.
    #[must_use]
    pub fn builder() -> StaticInjectorBuilder {
        StaticInjectorBuilder {
            parent: None,
            providers: HashMap::new(),
        }
    }

    fn checks(flags: InjectFlags) -> InjectFlags {
        if flags.contains(InjectFlags::SKIP_SELF) {
            InjectFlags::CHECK_PARENT
        } else if flags.contains(InjectFlags::SELF) {
            InjectFlags::CHECK_SELF
        } else {
            InjectFlags::CHECK_SELF | InjectFlags::CHECK_PARENT
        }
    }

    fn resolve(
        &self,
        token: &Token,
        not_found: NotFoundValue,
        flags: InjectFlags,
    ) -> Result<Option<Erased>> {
        let checks = Self::checks(flags);
        if checks.contains(InjectFlags::CHECK_SELF) {
            if let Some(value) = self.resolve_local(token)? {
                return Ok(Some(value));
            }
        }
        if checks.contains(InjectFlags::CHECK_PARENT) {
            if let Some(parent) = &self.0.parent {
                // The parent walks its own scope from the top.
                let parent_flags = flags.without(InjectFlags::SELF | InjectFlags::SKIP_SELF);
                return parent.get(token, not_found, parent_flags);
            }
        }
        match not_found {
            NotFoundValue::Null => Ok(None),
            NotFoundValue::Raise => Err(Error::NotFound(NotFound::new(token))),
        }
    }

    fn resolve_local(&self, token: &Token) -> Result<Option<Erased>> {
        let key = token.key();
        let cached = self
            .0
            .constructed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(hit) = cached {
            return Ok(Some(hit));
        }
        match self.0.providers.get(&key) {
            None => Ok(None),
            Some(Provider::Value(value)) => Ok(Some(value.clone())),
            Some(Provider::Factory(factory)) => {
                let constructed = {
                    // The factory may re-enter the resolution entry points;
                    // the guard restores the displaced context on every
                    // exit path.
                    let _scope =
                        ScopedInjector::enter(InjectorContext::Active(Arc::new(self.clone())));
                    factory()
                };
                match constructed {
                    Ok(value) => {
                        self.0
                            .constructed
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .insert(key, value.clone());
                        Ok(Some(value))
                    }
                    Err(Error::NotFound(mut inner)) if !inner.finalized() => {
                        // A nested resolution missed; record this
                        // boundary's request on the trail.
                        inner.prepend_source(token.to_string());
                        Err(Error::NotFound(inner))
                    }
                    Err(err) => Err(err),
                }
            }
        }
    }
}

impl Injector for StaticInjector {
    fn get(
        &self,
        token: &Token,
        not_found: NotFoundValue,
        flags: InjectFlags,
    ) -> Result<Option<Erased>> {
        let token = resolve_forward_ref(token);
        // Only the outermost request of a nested chain finalizes the trail;
        // everything below it rethrows raw so labels keep accumulating.
        let outermost = current_injector().is_unset();
        match self.resolve(&token, not_found, flags) {
            Err(err) if outermost => Err(catch_injector_error(err, &token, BOUNDARY_LABEL, None)),
            other => other,
        }
    }
}

impl StaticInjectorBuilder {
    /// Resolves tokens missing from the local map against `parent`.
    #[must_use]
    pub fn with_parent(mut self, parent: Arc<dyn Injector>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Registers an eager value for `token`.
    #[must_use]
    pub fn with_value(mut self, token: &Token, value: Erased) -> Self {
        self.providers.insert(token.key(), Provider::Value(value));
        self
    }

    /// Registers `value` under its own type token.
    #[must_use]
    pub fn with_type<T>(self, value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        let token = Token::of::<T>();
        self.with_value(&token, Erased::new(value))
    }

    /// Registers a factory for `token`, run on first request and memoized.
    #[must_use]
    pub fn with_factory<F>(mut self, token: &Token, factory: F) -> Self
    where
        F: Fn() -> Result<Erased> + Send + Sync + 'static,
    {
        self.providers
            .insert(token.key(), Provider::Factory(Arc::new(factory)));
        self
    }

    /// Finalizes the registrations.
    #[must_use]
    pub fn build(self) -> StaticInjector {
        StaticInjector(Arc::new(Inner {
            parent: self.parent,
            providers: self.providers,
            constructed: Mutex::new(HashMap::new()),
        }))
    }
}
