//! cmdlex - command lines from a catalog of typed operations
//!
//! cmdlex turns a catalog of command groups into a command line: it resolves
//! abbreviated operation names, binds positional and named arguments to typed
//! parameters, and renders help and shell completions from the same catalog.

// Public modules
pub mod binding;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod resolve;
pub mod runner;

// Re-export commonly used types
pub use error::{CmdlexError, Result};
pub use runner::{InvocationResult, InvocationStatus, Runner, RunnerBuilder};

/// Current version of cmdlex
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
