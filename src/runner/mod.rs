//! Invocation engine
//!
//! This module handles a single run against a command catalog: mode selection,
//! operation invocation, help, completion and completion scripts.

pub mod builder;
pub mod complete;
pub mod docs;
pub mod help;
pub mod invocation;
pub mod result;
pub mod script;
pub mod sink;

// Re-export main types
pub use builder::*;
pub use complete::{Completer, CompletionRequest};
pub use invocation::{Invocation, Mode, COMPLETE_FLAG, HELP_FLAG};
pub use result::*;
pub use script::{Shell, BASH_SCRIPT_FLAG, POWERSHELL_SCRIPT_FLAG};
pub use sink::{SharedBuffer, Sink};
