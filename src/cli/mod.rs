//! Host process wiring
//!
//! This module loads the settings, installs logging and runs the bundled demo
//! catalog for the `cmdlex` binary.

pub mod app;
pub mod demo;

// Re-export main types
pub use app::*;
