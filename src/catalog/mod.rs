//! Command catalog model
//!
//! A catalog is a list of command groups, each holding operations with ordered,
//! typed parameters. It is built once through the builder methods and is
//! read-only afterwards.

pub mod group;
pub mod types;
pub mod value;

// Re-export main types
pub use group::*;
pub use types::*;
pub use value::*;
