//! Chain level representation

use crate::cause::Cause;
use crate::stack::StackTrace;
use arc_swap::ArcSwap;
use std::error::Error as StdError;
use std::sync::{Arc, Weak};

/// One level of an error chain
///
/// A level holds the causes introduced at one logical layer, an optional
/// context message, the level it was wrapped around and the stack captured
/// when it was built. Cloning is cheap and yields the same level: identity,
/// equality and [`crate::append_into`] growth are shared between clones.
///
/// ```text
///   level Z   causes [usecase]   parent Y   root X
///      |
///   level Y   causes [domain]    parent X   root X
///      |
///   level X   causes [db]        no parent  no root
/// ```
#[derive(Clone)]
pub struct ChainLevel {
    pub(crate) inner: Arc<LevelInner>,
}

pub(crate) struct LevelInner {
    /// Never empty. Replaced wholesale on append so readers keep a stable view.
    pub(crate) causes: ArcSwap<Vec<Cause>>,
    pub(crate) context: String,
    pub(crate) parent: Option<ChainLevel>,
    /// Non-owning; the root stays alive through the `parent` links.
    pub(crate) root: Option<Weak<LevelInner>>,
    pub(crate) stack: StackTrace,
}

// Unlinks the parent chain iteratively so dropping a deep chain does not
// recurse once per level.
impl Drop for LevelInner {
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(level) = next {
            next = Arc::into_inner(level.inner).and_then(|mut inner| inner.parent.take());
        }
    }
}

impl ChainLevel {
    pub(crate) fn root_level(causes: Vec<Cause>, context: String, stack: StackTrace) -> Self {
        Self {
            inner: Arc::new(LevelInner {
                causes: ArcSwap::from_pointee(causes),
                context,
                parent: None,
                root: None,
                stack,
            }),
        }
    }

    pub(crate) fn wrapping(
        parent: ChainLevel,
        causes: Vec<Cause>,
        context: String,
        stack: StackTrace,
    ) -> Self {
        let root = parent
            .inner
            .root
            .clone()
            .unwrap_or_else(|| Arc::downgrade(&parent.inner));
        Self {
            inner: Arc::new(LevelInner {
                causes: ArcSwap::from_pointee(causes),
                context,
                parent: Some(parent),
                root: Some(root),
                stack,
            }),
        }
    }

    /// Causes introduced at this level, in insertion order
    #[must_use]
    pub fn current_causes(&self) -> Arc<Vec<Cause>> {
        self.inner.causes.load_full()
    }

    /// First cause recorded at this level
    #[must_use]
    pub fn first_cause(&self) -> Option<Cause> {
        self.inner.causes.load().first().cloned()
    }

    /// Context annotating this level's causes; empty when absent
    #[must_use]
    pub fn context_message(&self) -> &str {
        &self.inner.context
    }

    /// Bottom level of the chain, `None` when this level is the root
    #[must_use]
    pub fn root_cause(&self) -> Option<ChainLevel> {
        self.inner
            .root
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| ChainLevel { inner })
    }

    /// Level directly below this one, `None` when this level is the root
    #[must_use]
    pub fn parent_error(&self) -> Option<&ChainLevel> {
        self.inner.parent.as_ref()
    }

    /// Stack captured when this level was built
    #[must_use]
    pub fn stack_trace(&self) -> &StackTrace {
        &self.inner.stack
    }

    /// Whether this level has no parent
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.inner.parent.is_none()
    }

    /// Whether both handles refer to the same level
    #[must_use]
    pub fn ptr_eq(&self, other: &ChainLevel) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for ChainLevel {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ChainLevel {}

impl StdError for ChainLevel {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .parent
            .as_ref()
            .map(|parent| parent as &(dyn StdError + 'static))
    }
}

impl From<ChainLevel> for Option<Cause> {
    fn from(level: ChainLevel) -> Self {
        Some(Cause::new(level))
    }
}
