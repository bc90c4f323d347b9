//! Multi-level error chains
//!
//! Provides the chain level type and its three families of operations:
//! - Construction and wrapping as an error propagates up through layers
//! - Identity tests and traversal towards the root
//! - Rendering at short, full and full-with-stack verbosity

pub mod constructors;
pub mod display;
pub mod traversal;
pub mod types;

pub use constructors::{
    append_into, new, new_error, new_error_with_message, wrap, wrap_with_message,
};
pub use traversal::{as_type, is, is_exact, map_as, unwrap, wrapper, Levels};
pub use types::ChainLevel;
