//! Building and wrapping chain levels
//!
//! Every public entry point here captures the stack itself, so the first
//! recorded frame is the code that called into errwrap. Keep them
//! `#[inline(never)]` and do not route one entry point through another.

use super::types::ChainLevel;
use crate::cause::{matches, AsDynError, Cause, Definition};
use crate::stack::StackTrace;
use log::{debug, trace, warn};

/// Create a standalone sentinel error carrying `message`
///
/// The result is a leaf, not a chain level. Declare it once and clone the
/// handle wherever the same error must be recognised later.
#[must_use]
pub fn new(message: impl Into<String>) -> Cause {
    Cause::new(Definition::new(message.into()))
}

/// Create a root level from `causes`
///
/// `None` entries are skipped. Returns `None` when no cause remains.
#[inline(never)]
#[must_use]
pub fn new_error<I>(causes: I) -> Option<ChainLevel>
where
    I: IntoIterator,
    I::Item: Into<Option<Cause>>,
{
    build_root(StackTrace::capture_caller(), String::new(), collect(causes))
}

/// Create a root level from `causes` annotated with `context`
///
/// `None` entries are skipped. Returns `None` when no cause remains.
#[inline(never)]
#[must_use]
pub fn new_error_with_message<I>(context: impl Into<String>, causes: I) -> Option<ChainLevel>
where
    I: IntoIterator,
    I::Item: Into<Option<Cause>>,
{
    build_root(StackTrace::capture_caller(), context.into(), collect(causes))
}

/// Grow the causes of an existing level in place
///
/// When `target` is a chain level the causes are appended to it and the same
/// level is returned; its parent, root and stack are left alone. Otherwise a
/// new root level is created, holding a foreign `target` as its first cause.
/// Returns `None` when there is neither a target nor any cause.
#[inline(never)]
#[must_use]
pub fn append_into<T, I>(target: T, causes: I) -> Option<ChainLevel>
where
    T: Into<Option<Cause>>,
    I: IntoIterator,
    I::Item: Into<Option<Cause>>,
{
    let causes = collect(causes);
    match target.into() {
        Some(target) => match target.as_chain_level() {
            Some(level) => {
                level.append(causes);
                Some(level.clone())
            }
            None => {
                let mut all = Vec::with_capacity(causes.len() + 1);
                all.push(target);
                all.extend(causes);
                build_root(StackTrace::capture_caller(), String::new(), all)
            }
        },
        None => build_root(StackTrace::capture_caller(), String::new(), causes),
    }
}

/// Wrap `parent` in a new level introducing `causes`
///
/// A foreign `parent` is first promoted to a root level that shares the
/// stack captured here. With no parent this behaves like [`new_error`]; with
/// a parent but no causes the (promoted) parent itself is returned.
#[inline(never)]
#[must_use]
pub fn wrap<P, I>(parent: P, causes: I) -> Option<ChainLevel>
where
    P: Into<Option<Cause>>,
    I: IntoIterator,
    I::Item: Into<Option<Cause>>,
{
    wrap_level(
        StackTrace::capture_caller(),
        parent.into(),
        String::new(),
        collect(causes),
    )
}

/// Same as [`wrap`], annotating the new level with `context`
#[inline(never)]
#[must_use]
pub fn wrap_with_message<P, I>(
    parent: P,
    context: impl Into<String>,
    causes: I,
) -> Option<ChainLevel>
where
    P: Into<Option<Cause>>,
    I: IntoIterator,
    I::Item: Into<Option<Cause>>,
{
    wrap_level(
        StackTrace::capture_caller(),
        parent.into(),
        context.into(),
        collect(causes),
    )
}

fn collect<I>(causes: I) -> Vec<Cause>
where
    I: IntoIterator,
    I::Item: Into<Option<Cause>>,
{
    causes.into_iter().filter_map(Into::into).collect()
}

fn build_root(stack: StackTrace, context: String, causes: Vec<Cause>) -> Option<ChainLevel> {
    if causes.is_empty() {
        debug!("no causes left after filtering, nothing to record");
        return None;
    }
    Some(ChainLevel::root_level(causes, context, stack))
}

fn wrap_level(
    stack: StackTrace,
    parent: Option<Cause>,
    context: String,
    causes: Vec<Cause>,
) -> Option<ChainLevel> {
    let Some(parent) = parent else {
        return build_root(stack, context, causes);
    };

    let parent = match parent.as_chain_level() {
        Some(level) => level.clone(),
        None => {
            trace!("promoting foreign error to root level: {parent}");
            ChainLevel::root_level(vec![parent], String::new(), stack.clone())
        }
    };

    if causes.is_empty() {
        debug!("wrap without causes, returning parent level");
        return Some(parent);
    }
    Some(ChainLevel::wrapping(parent, causes, context, stack))
}

impl ChainLevel {
    /// Appends `causes` in place, refusing any that would make the chain
    /// reach this level again.
    pub(crate) fn append(&self, causes: Vec<Cause>) {
        let me = Cause::new(self.clone());
        let causes: Vec<Cause> = causes
            .into_iter()
            .filter(|cause| {
                let cyclic = matches(cause.as_dyn_error(), &me);
                if cyclic {
                    warn!("refusing to append a cause that already contains this level: {cause}");
                }
                !cyclic
            })
            .collect();

        if causes.is_empty() {
            return;
        }

        self.inner.causes.rcu(|current| {
            let mut next = Vec::clone(current);
            next.extend(causes.iter().cloned());
            next
        });
    }
}
