//! Multi-level error chains that keep every original cause
//!
//! An error starts as a root [`ChainLevel`] and gains one level per layer it
//! propagates through (storage, domain, use case, application). Each level
//! keeps:
//! - the unmodified causes introduced at that layer
//! - an optional context message
//! - a stack captured where the level was built
//!
//! Any cause can be tested for anywhere in the chain with [`is`], and the
//! level that introduced it recovered with [`wrapper`].
//!
//! ```
//! use errwrap::{new, new_error, wrap, wrap_with_message, is, is_exact};
//!
//! let db = new("db error");
//! let domain = new("domain error");
//! let usecase = new("usecase error");
//!
//! let root = new_error([db.clone()]).unwrap();
//! let mid = wrap(root, [domain.clone()]).unwrap();
//! let top = wrap_with_message(mid, "ctx", [usecase.clone()]).unwrap();
//!
//! assert!(is(&top, &db));
//! assert!(is_exact(&top, &usecase));
//! assert!(!is_exact(&top, &domain));
//! assert_eq!(top.to_string(), "usecase error: ctx");
//! assert_eq!(format!("{top:#}"), "usecase error: ctx\ndomain error\ndb error");
//! ```

pub mod cause;
pub mod chain;
pub mod error;
pub mod format;
pub mod stack;

pub use cause::{AsDynError, Cause, Definition};
pub use chain::{
    append_into, as_type, is, is_exact, map_as, new, new_error, new_error_with_message, unwrap,
    wrap, wrap_with_message, wrapper, ChainLevel, Levels,
};
pub use error::{ConfigError, Result};
pub use format::{ChainFormat, Verbosity};
pub use stack::{Frame, FrameStyle, StackTrace, MAX_FRAMES};
