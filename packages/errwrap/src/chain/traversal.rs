//! Identity tests and traversal towards the root

use super::types::ChainLevel;
use crate::cause::{find_chain_level, matches, same_error, AsDynError, Cause};
use std::error::Error as StdError;

/// Iterator over a level and its ancestors, ending at the root
#[derive(Clone)]
pub struct Levels<'a> {
    next: Option<&'a ChainLevel>,
}

impl<'a> Iterator for Levels<'a> {
    type Item = &'a ChainLevel;

    fn next(&mut self) -> Option<Self::Item> {
        let level = self.next?;
        self.next = level.inner.parent.as_ref();
        Some(level)
    }
}

impl std::iter::FusedIterator for Levels<'_> {}

impl ChainLevel {
    /// This level followed by every ancestor down to the root
    #[must_use]
    pub fn levels(&self) -> Levels<'_> {
        Levels { next: Some(self) }
    }

    /// Number of `parent` hops between this level and the root
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels().count() - 1
    }

    /// Whether `target` is this level, or one of the causes at this level
    /// or any ancestor
    #[must_use]
    pub fn is(&self, target: &Cause) -> bool {
        self.levels()
            .any(|level| level.is_level(target) || level.is_exact(target))
    }

    /// Whether `target` matches one of the causes introduced at this level,
    /// ignoring ancestors
    #[must_use]
    pub fn is_exact(&self, target: &Cause) -> bool {
        self.inner
            .causes
            .load()
            .iter()
            .any(|cause| matches(cause.as_dyn_error(), target))
    }

    fn is_level(&self, target: &Cause) -> bool {
        target.as_chain_level().is_some_and(|level| level.ptr_eq(self))
    }

    /// The first level, starting here and moving towards the root, that is
    /// `target` or introduced `target` as one of its causes
    #[must_use]
    pub fn wrapper(&self, target: &Cause) -> Option<ChainLevel> {
        self.levels()
            .find(|level| level.is_level(target) || level.is_exact(target))
            .cloned()
    }

    /// The cause, searched from this level towards the root, holding an
    /// error of type `T` in its source chain
    ///
    /// Causes that are chains themselves are searched recursively and the
    /// innermost matching cause is returned. Use [`Cause::downcast_ref`] on the
    /// result to borrow the `T`.
    #[must_use]
    pub fn find_as<T>(&self) -> Option<Cause>
    where
        T: StdError + 'static,
    {
        for level in self.levels() {
            let causes = level.inner.causes.load();
            for cause in causes.iter() {
                if cause.downcast_ref::<T>().is_some() {
                    return Some(cause.clone());
                }
                if let Some(found) = cause.as_chain_level().and_then(ChainLevel::find_as::<T>) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Whether any cause in the chain can be viewed as a `T`
    #[must_use]
    pub fn as_type<T>(&self) -> bool
    where
        T: StdError + 'static,
    {
        self.find_as::<T>().is_some()
    }

    /// Apply `f` to the first `T` found among the causes of the chain
    pub fn map_as<T, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R>
    where
        T: StdError + 'static,
    {
        let cause = self.find_as::<T>()?;
        cause.downcast_ref::<T>().map(f)
    }
}

/// Whether `target` is `err`, or is reachable from it through sources,
/// chain levels and their causes
#[must_use]
pub fn is<E>(err: &E, target: &Cause) -> bool
where
    E: AsDynError + ?Sized,
{
    matches(err.as_dyn_error(), target)
}

/// Whether `target` was introduced at `err`'s own level
///
/// For an error that is not a chain level this is plain identity.
#[must_use]
pub fn is_exact<E>(err: &E, target: &Cause) -> bool
where
    E: AsDynError + ?Sized,
{
    let err = err.as_dyn_error();
    match err.downcast_ref::<ChainLevel>() {
        Some(level) => level.is_exact(target),
        None => same_error(err, target.as_dyn_error()),
    }
}

/// Whether anything reachable from `err` can be viewed as a `T`
#[must_use]
pub fn as_type<T, E>(err: &E) -> bool
where
    T: StdError + 'static,
    E: AsDynError + ?Sized,
{
    map_as::<T, (), E>(err, |_| ()).is_some()
}

/// Apply `f` to the first `T` reachable from `err`
///
/// Sources of `err` are tried first; once a chain level is met its causes
/// are searched from that level towards the root.
pub fn map_as<T, R, E>(err: &E, f: impl FnOnce(&T) -> R) -> Option<R>
where
    T: StdError + 'static,
    E: AsDynError + ?Sized,
{
    let mut current = Some(err.as_dyn_error());
    while let Some(e) = current {
        if let Some(found) = e.downcast_ref::<T>() {
            return Some(f(found));
        }
        if let Some(level) = e.downcast_ref::<ChainLevel>() {
            return level.map_as::<T, R>(f);
        }
        current = e.source();
    }
    None
}

/// The level directly below `err`, or `None` for a root or a non-chain error
#[must_use]
pub fn unwrap<E>(err: &E) -> Option<ChainLevel>
where
    E: AsDynError + ?Sized,
{
    err.as_dyn_error()
        .downcast_ref::<ChainLevel>()?
        .parent_error()
        .cloned()
}

/// The level at which `target` entered the chain containing `err`
///
/// Walks from `err`'s level towards the root and returns the first level that
/// is `target` or lists it among its own causes.
#[must_use]
pub fn wrapper<E>(err: &E, target: &Cause) -> Option<ChainLevel>
where
    E: AsDynError + ?Sized,
{
    find_chain_level(err.as_dyn_error())?.wrapper(target)
}
