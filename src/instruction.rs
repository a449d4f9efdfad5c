//! Entry points invoked by generated factory code.

use std::any::type_name;

use weft_core::erased::Erased;
use weft_core::error::{Error, Result};
use weft_core::flags::InjectFlags;
use weft_core::injector::ViewResolver;
use weft_core::token::{Token, resolve_forward_ref};

use crate::inject::inject;
use crate::switch::{self, InjectImpl};
use crate::view::current_view;

/// Resolves `token` for a factory constructing within the component tree.
///
/// This is the construction-time sibling of [`inject`]: when a view frame
/// is current, resolution walks the node-injector tree from the frame's
/// node. With no frame — construction happening outside any tree, as in
/// isolated tests — it falls back to the flat entry point, after checking
/// that the flat path would not route straight back here.
///
/// # Errors
///
/// Fails with [`Error::WouldRecurse`] if invoked without a frame while
/// still installed as the active strategy, plus anything the delegated
/// resolution raises.
pub fn view_inject(token: &Token, flags: InjectFlags) -> Result<Option<Erased>> {
    let Some(frame) = current_view() else {
        switch::assert_inject_implementation_not(view_inject as InjectImpl)?;
        return inject(token, flags);
    };
    trace!("token" = %token, node = frame.node.0, "view inject");
    frame
        .resolver
        .get_or_create(frame.node, &resolve_forward_ref(token), flags)
}

/// The factory body generated for a class whose constructor no injection
/// signature could be derived for.
///
/// The subject type is carried on the error structurally, so the failing
/// class stays identifiable even though the message does not name it.
#[must_use]
pub fn invalid_factory<Subject>() -> Error
where
    Subject: ?Sized,
{
    Error::InvalidFactory {
        type_name: type_name::<Subject>(),
        index: None,
    }
}

/// Like [`invalid_factory`], but reporting which positional constructor
/// parameter could not be resolved, with remediation guidance in the
/// message.
#[must_use]
pub fn invalid_factory_dep<Subject>(index: usize) -> Error
where
    Subject: ?Sized,
{
    Error::InvalidFactory {
        type_name: type_name::<Subject>(),
        index: Some(index),
    }
}
