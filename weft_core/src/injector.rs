//! Collaborator contracts consumed by the resolution runtime.

use std::sync::Arc;

use crate::erased::Erased;
use crate::error::Result;
use crate::flags::InjectFlags;
use crate::token::Token;

/// What [`Injector::get`] yields when nothing provides the token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NotFoundValue {
    /// Fail with [`Error::NotFound`](crate::error::Error::NotFound).
    #[default]
    Raise,
    /// Yield no value.
    Null,
}

/// A flat, context-independent injector.
///
/// Implementations resolve a token to a value, typically consulting a
/// parent injector as directed by the scope bits in `flags`. On a miss they
/// honor `not_found`: [`Raise`](NotFoundValue::Raise) means fail with a
/// [`NotFound`](crate::error::NotFound) error carrying an accumulating
/// dependency path; [`Null`](NotFoundValue::Null) means yield `Ok(None)`.
pub trait Injector: Send + Sync {
    /// Resolves `token` to a value.
    ///
    /// # Errors
    ///
    /// Fails when the token is unresolvable and `not_found` is
    /// [`Raise`](NotFoundValue::Raise), or when constructing the value
    /// itself fails.
    fn get(
        &self,
        token: &Token,
        not_found: NotFoundValue,
        flags: InjectFlags,
    ) -> Result<Option<Erased>>;
}

impl<I> Injector for Arc<I>
where
    I: Injector + ?Sized,
{
    #[inline]
    fn get(
        &self,
        token: &Token,
        not_found: NotFoundValue,
        flags: InjectFlags,
    ) -> Result<Option<Erased>> {
        (**self).get(token, not_found, flags)
    }
}

impl<I> Injector for Box<I>
where
    I: Injector + ?Sized,
{
    #[inline]
    fn get(
        &self,
        token: &Token,
        not_found: NotFoundValue,
        flags: InjectFlags,
    ) -> Result<Option<Erased>> {
        (**self).get(token, not_found, flags)
    }
}

/// Opaque handle to a node in the component tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Walks the node-injector tree during view construction.
///
/// The resolver instance is the render context; `node` names the tree
/// position whose factory is executing.
pub trait ViewResolver: Send + Sync {
    /// Resolves `token` starting at `node`, creating the injectable if its
    /// provider has not produced one yet.
    ///
    /// # Errors
    ///
    /// Fails when the token is unresolvable and
    /// [`OPTIONAL`](InjectFlags::OPTIONAL) is not set, or when construction
    /// of the injectable fails.
    fn get_or_create(
        &self,
        node: NodeId,
        token: &Token,
        flags: InjectFlags,
    ) -> Result<Option<Erased>>;
}
