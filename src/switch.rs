//! Process-wide selection of the low-level injection strategy.
//!
//! The flat entry point delegates through this switch so a tree-aware
//! runtime can interpose itself without the flat layer depending on it. The
//! indirection breaks what would otherwise be a dependency cycle between
//! the two layers and keeps the tree machinery optional for embedders that
//! never construct a view.

use std::cell::Cell;

use weft_core::erased::Erased;
use weft_core::error::{Error, Result};
use weft_core::flags::InjectFlags;
use weft_core::injector::NotFoundValue;
use weft_core::token::Token;

/// Signature of a low-level injection implementation.
pub type InjectImpl = fn(&Token, InjectFlags) -> Result<Option<Erased>>;

/// Signature of the root limp-mode fallback.
pub type LimpModeFallback = fn(&Token, NotFoundValue, InjectFlags) -> Result<Option<Erased>>;

thread_local! {
    static INJECT_IMPL: Cell<Option<InjectImpl>> = const { Cell::new(None) };
    static LIMP_MODE: Cell<LimpModeFallback> = const { Cell::new(default_limp_mode) };
}

/// The active low-level implementation, or `None` for flat-only resolution.
#[must_use]
pub fn inject_implementation() -> Option<InjectImpl> {
    INJECT_IMPL.with(Cell::get)
}

/// Installs `implementation` as the active low-level strategy, returning
/// the displaced one. `None` falls back to flat-only resolution.
pub fn set_inject_implementation(implementation: Option<InjectImpl>) -> Option<InjectImpl> {
    debug!(installed = implementation.is_some(), "switch inject implementation");
    INJECT_IMPL.with(|slot| slot.replace(implementation))
}

/// Fails when `candidate` is the active implementation.
///
/// Guards the tree-aware entry point against delegating to itself when no
/// render context exists.
///
/// # Errors
///
/// [`Error::WouldRecurse`] when the active implementation equals the
/// candidate.
pub fn assert_inject_implementation_not(candidate: InjectImpl) -> Result<()> {
    match inject_implementation() {
        Some(active) if std::ptr::fn_addr_eq(active, candidate) => Err(Error::WouldRecurse),
        _ => Ok(()),
    }
}

/// Resolves `token` through the root limp-mode fallback.
///
/// Used by the flat layer when the current context is established but
/// intentionally injector-less.
///
/// # Errors
///
/// Whatever the installed fallback raises; the default fallback fails with
/// [`Error::NoInjector`] unless the miss may be answered with no value.
pub fn inject_root_limp_mode(
    token: &Token,
    not_found: NotFoundValue,
    flags: InjectFlags,
) -> Result<Option<Erased>> {
    LIMP_MODE.with(Cell::get)(token, not_found, flags)
}

/// Installs a root limp-mode fallback, returning the displaced one.
pub fn set_limp_mode_fallback(fallback: LimpModeFallback) -> LimpModeFallback {
    LIMP_MODE.with(|slot| slot.replace(fallback))
}

fn default_limp_mode(
    token: &Token,
    not_found: NotFoundValue,
    flags: InjectFlags,
) -> Result<Option<Erased>> {
    if flags.contains(InjectFlags::OPTIONAL) || not_found == NotFoundValue::Null {
        Ok(None)
    } else {
        Err(Error::no_injector(token))
    }
}
