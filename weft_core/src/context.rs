//! The current-injector slot.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use crate::injector::Injector;

/// The injector context consulted by the flat resolution entry point.
///
/// [`Unset`](Self::Unset) means no injection context is established and
/// calling the flat entry point is an error. [`Limp`](Self::Limp) means a
/// context exists but is intentionally injector-less; resolution falls back
/// to the root limp-mode hook. [`Active`](Self::Active) carries the
/// injector to resolve against.
#[derive(Clone, Default)]
pub enum InjectorContext {
    /// No injection context established.
    #[default]
    Unset,
    /// A context exists but is intentionally injector-less.
    Limp,
    /// Resolve against this injector.
    Active(Arc<dyn Injector>),
}

impl InjectorContext {
    /// Returns `true` if no context is established.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Returns `true` for the injector-less limp mode.
    #[must_use]
    pub const fn is_limp(&self) -> bool {
        matches!(self, Self::Limp)
    }
}

impl fmt::Debug for InjectorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("Unset"),
            Self::Limp => f.write_str("Limp"),
            Self::Active(_) => f.debug_tuple("Active").finish_non_exhaustive(),
        }
    }
}

thread_local! {
    static CURRENT_INJECTOR: RefCell<InjectorContext> =
        const { RefCell::new(InjectorContext::Unset) };
}

/// Swaps the current injector context, returning the displaced value.
///
/// The runtime is single-threaded and cooperative, so the slot lives in
/// thread-local storage. Callers owe the slot stack discipline: every swap
/// must be paired with a swap back to the returned value before the
/// surrounding call finishes, on every exit path. Prefer
/// [`ScopedInjector`], which restores on drop.
pub fn set_current_injector(next: InjectorContext) -> InjectorContext {
    CURRENT_INJECTOR.with(|slot| slot.replace(next))
}

/// A clone of the current injector context.
#[must_use]
pub fn current_injector() -> InjectorContext {
    CURRENT_INJECTOR.with(|slot| slot.borrow().clone())
}

/// Scoped acquisition of the injector context.
///
/// Restores the displaced context when dropped, keeping restoration LIFO
/// with call nesting even when the guarded call unwinds early.
#[must_use = "the displaced context is restored when the guard drops"]
pub struct ScopedInjector {
    previous: Option<InjectorContext>,
}

impl ScopedInjector {
    /// Establishes `context` for the lifetime of the returned guard.
    pub fn enter(context: InjectorContext) -> Self {
        Self {
            previous: Some(set_current_injector(context)),
        }
    }
}

impl Drop for ScopedInjector {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            set_current_injector(previous);
        }
    }
}
