//! Leaf errors and the identity rules used to match them
//!
//! A [`Cause`] is a shared handle to any `std::error::Error`. Two handles are
//! equal only when they point at the same error value, which is what lets a
//! sentinel declared once be recognised anywhere in a chain.

use crate::chain::ChainLevel;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Reusable sentinel error carrying only a message
///
/// Built by [`crate::new`]. Its rendering is exactly the message.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Definition {
    message: String,
}

impl Definition {
    pub(crate) fn new(message: String) -> Self {
        Self { message }
    }

    /// The message this definition was created with
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Shared handle to an opaque error introduced at some chain level
#[derive(Clone)]
pub struct Cause(Arc<dyn StdError + Send + Sync + 'static>);

impl Cause {
    /// Wrap any error value
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self(Arc::new(error))
    }

    /// Adopt an already shared error without re-allocating
    #[must_use]
    pub fn from_arc(error: Arc<dyn StdError + Send + Sync + 'static>) -> Self {
        Self(error)
    }

    /// Adopt a boxed error
    #[must_use]
    pub fn from_boxed(error: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        Self(Arc::from(error))
    }

    /// The shared error value
    #[must_use]
    pub fn inner(&self) -> &Arc<dyn StdError + Send + Sync + 'static> {
        &self.0
    }

    /// Whether both handles refer to the same error value
    #[must_use]
    pub fn ptr_eq(&self, other: &Cause) -> bool {
        same_error(self.as_dyn_error(), other.as_dyn_error())
    }

    /// The chain level behind this handle, if it is one
    #[must_use]
    pub fn as_chain_level(&self) -> Option<&ChainLevel> {
        self.0.downcast_ref::<ChainLevel>()
    }

    /// Whether `target` is this error, one of its sources, or anywhere in a
    /// chain reachable from it
    #[must_use]
    pub fn is(&self, target: &Cause) -> bool {
        matches(self.as_dyn_error(), target)
    }

    /// First value of type `T` in this error's `source()` chain, starting
    /// with the error itself
    #[must_use]
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: StdError + 'static,
    {
        let mut current = Some(self.as_dyn_error());
        while let Some(err) = current {
            if let Some(found) = err.downcast_ref::<T>() {
                return Some(found);
            }
            current = err.source();
        }
        None
    }
}

impl<E> From<E> for Cause
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl PartialEq for Cause {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Cause {}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{:#}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Anything that can be inspected as a `std::error::Error` trait object
///
/// Implemented for every concrete error type, for [`Cause`], and for the
/// common error trait objects, so the free traversal functions accept all of
/// them.
pub trait AsDynError {
    /// View `self` as an error trait object
    fn as_dyn_error(&self) -> &(dyn StdError + 'static);
}

impl<E> AsDynError for E
where
    E: StdError + 'static,
{
    fn as_dyn_error(&self) -> &(dyn StdError + 'static) {
        self
    }
}

impl AsDynError for Cause {
    fn as_dyn_error(&self) -> &(dyn StdError + 'static) {
        &*self.0
    }
}

impl AsDynError for dyn StdError + 'static {
    fn as_dyn_error(&self) -> &(dyn StdError + 'static) {
        self
    }
}

impl AsDynError for dyn StdError + Send + Sync + 'static {
    fn as_dyn_error(&self) -> &(dyn StdError + 'static) {
        self
    }
}

/// Identity of two errors. Chain levels compare by the level they share,
/// everything else by address.
pub(crate) fn same_error(a: &(dyn StdError + 'static), b: &(dyn StdError + 'static)) -> bool {
    if let (Some(x), Some(y)) = (
        a.downcast_ref::<ChainLevel>(),
        b.downcast_ref::<ChainLevel>(),
    ) {
        return x.ptr_eq(y);
    }
    std::ptr::addr_eq(a as *const dyn StdError, b as *const dyn StdError)
}

/// Walks `err` and its sources looking for `target`. A chain level met on
/// the way hands over to chain-aware matching, which covers its ancestors.
pub(crate) fn matches(err: &(dyn StdError + 'static), target: &Cause) -> bool {
    let wanted = target.as_dyn_error();
    let mut current = Some(err);
    while let Some(e) = current {
        if same_error(e, wanted) {
            return true;
        }
        if let Some(level) = e.downcast_ref::<ChainLevel>() {
            return level.is(target);
        }
        current = e.source();
    }
    false
}

/// Capability check: the first chain level found on `err` or its sources.
pub(crate) fn find_chain_level<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a ChainLevel> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(level) = e.downcast_ref::<ChainLevel>() {
            return Some(level);
        }
        current = e.source();
    }
    None
}
