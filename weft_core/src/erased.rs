//! Shared values with erased type information.

use std::any::{Any, TypeId};
use std::sync::Arc;

/// [`Erased`] is a shared container for a resolved value of an arbitrary
/// type.
///
/// Resolution hands the same underlying value to every requester, so the
/// value is reference-counted and cloning is cheap. The contained type must
/// be `Send + Sync + 'static`; it does not need to implement [`Clone`]
/// itself.
#[derive(Clone)]
pub struct Erased(Arc<dyn Any + Send + Sync>);

impl Erased {
    /// Wraps `value`.
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self(Arc::new(value))
    }

    /// Returns the [`TypeId`] of the contained value.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        (*self.0).type_id()
    }

    /// Returns `true` if the contained value is of type `T`.
    #[must_use]
    pub fn is<T>(&self) -> bool
    where
        T: 'static,
    {
        (*self.0).is::<T>()
    }

    /// Returns a reference to the contained value if it is of type `T`.
    #[must_use]
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: 'static,
    {
        (*self.0).downcast_ref()
    }

    /// Clones the contained value out if it is of type `T`.
    #[must_use]
    pub fn extract<T>(&self) -> Option<T>
    where
        T: Clone + 'static,
    {
        self.downcast_ref::<T>().cloned()
    }
}

impl std::fmt::Debug for Erased {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Erased").finish_non_exhaustive()
    }
}
