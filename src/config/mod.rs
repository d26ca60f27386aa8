//! Configuration parsing and validation
//!
//! This module handles the cmdlex.yml settings file: its types, discovery and
//! validation.

pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use parse::*;
pub use schema::*;
pub use types::*;
